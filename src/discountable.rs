//! Discountable
//!
//! The view of a bill that discounts evaluate against.

use rusty_money::{Money, iso::Currency};

use crate::{categories::Category, users::User};

/// Anything discounts can be applied to.
///
/// Discounts only ever read through this trait, so a discount evaluated part
/// way through an application sees the payable amount as it stands at that
/// point.
pub trait Discountable {
    /// Category of the discountable, if set.
    fn category(&self) -> Option<Category>;

    /// User the discountable belongs to, if known.
    fn user(&self) -> Option<&User>;

    /// Total before any discounts.
    fn net(&self) -> Money<'static, Currency>;

    /// Total after the discounts applied so far; `None` before application starts.
    fn net_payable(&self) -> Option<Money<'static, Currency>>;
}
