//! Receipt

use std::io;

use rusty_money::{Money, MoneyError, iso::Currency};
use slotmap::SlotMap;
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    bill::{Bill, DiscountApplication, DiscountGroup},
    discounts::{DiscountKey, DiscountMeta},
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The bill has not had its discounts applied.
    #[error("discounts have not been applied to the bill")]
    NotApplied,

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Breakdown of a bill after its discounts were applied.
#[derive(Debug, Clone)]
pub struct Receipt {
    /// Total before any discounts
    net: Money<'static, Currency>,

    /// Total after all discounts
    net_payable: Money<'static, Currency>,

    /// Discounts taken off, in the order they applied
    applications: SmallVec<[DiscountApplication; 4]>,
}

impl Receipt {
    /// Create a new receipt with the given details.
    pub fn new(
        net: Money<'static, Currency>,
        net_payable: Money<'static, Currency>,
        applications: SmallVec<[DiscountApplication; 4]>,
    ) -> Self {
        Self {
            net,
            net_payable,
            applications,
        }
    }

    /// Build a receipt from a bill whose discounts have been applied.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::NotApplied`] if the bill has no payable amount yet.
    pub fn from_bill(bill: &Bill<'_>) -> Result<Self, ReceiptError> {
        let net_payable = bill.net_payable().ok_or(ReceiptError::NotApplied)?;

        Ok(Self::new(
            bill.net(),
            net_payable,
            bill.applications().iter().copied().collect(),
        ))
    }

    /// Total before any discounts
    pub fn net(&self) -> Money<'static, Currency> {
        self.net
    }

    /// Total after all discounts
    pub fn net_payable(&self) -> Money<'static, Currency> {
        self.net_payable
    }

    /// Discounts taken off, in the order they applied
    pub fn applications(&self) -> &[DiscountApplication] {
        &self.applications
    }

    /// Calculate the savings made by applying discounts.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'static, Currency>, MoneyError> {
        self.net.sub(self.net_payable)
    }

    /// Write the receipt as a table followed by its totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the savings cannot be calculated or the output cannot be written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        discount_meta: &SlotMap<DiscountKey, DiscountMeta>,
    ) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Group", "Discount", "Amount"]);

        for application in &self.applications {
            let name = discount_meta
                .get(application.key)
                .map_or("Unknown discount", |meta| meta.name.as_str());

            builder.push_record([
                group_label(application.group).to_string(),
                name.to_string(),
                format!("-{}", application.amount),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..3), Alignment::right());

        writeln!(out, "{table}").map_err(|_err| ReceiptError::IO)?;

        let savings = self.savings()?;

        writeln!(out, " Net:      {}", self.net).map_err(|_err| ReceiptError::IO)?;
        writeln!(out, " Payable:  {}", self.net_payable).map_err(|_err| ReceiptError::IO)?;
        writeln!(out, " Savings:  {savings}").map_err(|_err| ReceiptError::IO)
    }
}

fn group_label(group: DiscountGroup) -> &'static str {
    match group {
        DiscountGroup::MutuallyExclusive => "Exclusive",
        DiscountGroup::AlwaysApplicable => "Always",
    }
}
