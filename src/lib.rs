//! Tally
//!
//! Tally is a retail bill discount engine: it decides which discounts apply to a bill and works
//! out the amount payable once they have been taken off.

pub mod bill;
pub mod categories;
pub mod discountable;
pub mod discounts;
pub mod fixtures;
pub mod logging;
pub mod prelude;
pub mod receipt;
pub mod users;
pub mod utils;

#[cfg(test)]
mod test_support;
