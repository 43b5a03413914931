//! Tally
//!
//! Apply the discounts defined in a fixture to its bills and print a receipt for each.
//!
//! Use `-f` to choose the fixture file
//! Use `-b` to process a single bill by name

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use tracing::info;

use tally::{
    fixtures::Fixture, logging::init_subscriber, receipt::Receipt, utils::TallyArgs,
};

fn main() -> Result<()> {
    let args = TallyArgs::parse();

    init_subscriber(&args.log_level, args.log_format)?;

    let fixture = Fixture::from_file(&args.fixture)?;

    let names: Vec<String> = match args.bill {
        Some(name) => vec![name],
        None => fixture.bill_names().map(str::to_string).collect(),
    };

    info!(
        fixture = %args.fixture.display(),
        bills = names.len(),
        "loaded fixture"
    );

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for name in &names {
        let mut bill = fixture.bill(name)?;

        bill.apply_discounts()?;

        writeln!(handle, "\n{name}")?;

        Receipt::from_bill(&bill)?.write_to(&mut handle, fixture.discount_meta())?;
    }

    Ok(())
}
