//! Discounts
//!
//! The [`Discount`] capability, the terms every discount shares, and the
//! percentage arithmetic used to turn them into money.

use std::{fmt, sync::Arc};

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use serde::Deserialize;
use slotmap::new_key_type;
use thiserror::Error;
use tracing::trace;

use crate::{
    categories::{Category, CategorySet},
    discountable::Discountable,
};

pub mod spend_threshold;
pub mod store_wide;
pub mod user_type;

pub use spend_threshold::SpendThresholdDiscount;
pub use store_wide::StoreWideDiscount;
pub use user_type::{UserTypeDiscount, UserTypeDiscountBuilder};

new_key_type! {
    /// Discount Key
    pub struct DiscountKey;
}

/// Errors specific to discount evaluation.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// A required value was missing or a precondition did not hold.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A discount amount could not be represented in minor units.
    #[error("discount amount overflowed")]
    AmountOverflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Discount metadata
#[derive(Debug, Default, Clone)]
pub struct DiscountMeta {
    /// Discount name
    pub name: String,
}

/// How a discount's value is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// A percentage of the net total.
    #[default]
    Percentage,

    /// A fixed amount of money.
    FixedAmount,
}

/// The reduction a discount grants once it applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiscountValue {
    /// Take a percentage of the net total off (e.g., "10% off").
    PercentageOff(Percentage),

    /// Take a fixed amount off (e.g., "£5 off"), regardless of the remaining payable.
    AmountOff(Money<'static, Currency>),
}

impl DiscountValue {
    /// Returns the discount type for this value.
    pub fn discount_type(&self) -> DiscountType {
        match self {
            Self::PercentageOff(_) => DiscountType::Percentage,
            Self::AmountOff(_) => DiscountType::FixedAmount,
        }
    }

    /// Numeric magnitude of the value: percentage points or a money amount.
    pub fn magnitude(&self) -> Decimal {
        match self {
            Self::PercentageOff(percent) => (*percent) * Decimal::ONE_HUNDRED,
            Self::AmountOff(amount) => *amount.amount(),
        }
    }

    /// Check the value is a magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::InvalidArgument`] if the percentage or amount is negative.
    pub fn validate(&self) -> Result<(), DiscountError> {
        if self.magnitude() < Decimal::ZERO {
            return Err(DiscountError::InvalidArgument(
                "discount value must not be negative",
            ));
        }

        Ok(())
    }

    /// Calculate the reduction this value grants on `net`.
    ///
    /// Percentages are rounded to the currency's minor unit, midpoint away from zero.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::PercentConversion`] if the percentage of `net`
    /// cannot be represented in minor units.
    pub fn amount_on(
        &self,
        net: Money<'static, Currency>,
    ) -> Result<Money<'static, Currency>, DiscountError> {
        match self {
            Self::PercentageOff(percent) => Ok(Money::from_minor(
                percent_of_minor(percent, net.to_minor_units())?,
                net.currency(),
            )),
            Self::AmountOff(amount) => Ok(*amount),
        }
    }
}

/// Terms shared by every discount: identity, value and category exclusions.
#[derive(Debug, Clone)]
pub struct DiscountTerms {
    key: DiscountKey,
    value: DiscountValue,
    excluded_categories: CategorySet,
}

impl DiscountTerms {
    /// Create new discount terms.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::InvalidArgument`] if the value is negative.
    pub fn new(
        key: DiscountKey,
        value: DiscountValue,
        excluded_categories: CategorySet,
    ) -> Result<Self, DiscountError> {
        value.validate()?;

        Ok(Self {
            key,
            value,
            excluded_categories,
        })
    }

    /// Return the discount key
    pub fn key(&self) -> DiscountKey {
        self.key
    }

    /// Return the discount value
    pub fn value(&self) -> &DiscountValue {
        &self.value
    }

    /// Return the discount type
    pub fn discount_type(&self) -> DiscountType {
        self.value.discount_type()
    }

    /// Return the excluded categories
    pub fn excluded_categories(&self) -> &CategorySet {
        &self.excluded_categories
    }

    /// Whether the discount may apply to the given category.
    ///
    /// An unset category is never excluded.
    pub fn is_category_applicable(&self, category: Option<Category>) -> bool {
        category.is_none_or(|category| !self.excluded_categories.contains(category))
    }
}

/// A rule that may reduce the amount payable on a [`Discountable`].
///
/// Implementations must be immutable once constructed; they are shared between
/// bills as [`SharedDiscount`].
pub trait Discount: fmt::Debug + Send + Sync {
    /// Terms shared by all discounts.
    fn terms(&self) -> &DiscountTerms;

    /// Whether this discount applies to the discountable.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::InvalidArgument`] if the discountable lacks
    /// something this discount needs to decide.
    fn is_applicable(&self, discountable: &dyn Discountable) -> Result<bool, DiscountError>;

    /// The reduction this discount grants, assuming it applies.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if the amount cannot be calculated.
    fn amount(
        &self,
        discountable: &dyn Discountable,
    ) -> Result<Money<'static, Currency>, DiscountError> {
        self.terms().value().amount_on(discountable.net())
    }

    /// Return the discount key
    fn key(&self) -> DiscountKey {
        self.terms().key()
    }

    /// Calculate the reduction for the discountable.
    ///
    /// Returns `None` when the discount does not apply, which is distinct from
    /// applying for a zero amount.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if applicability or the amount cannot be determined.
    fn calculate(
        &self,
        discountable: &dyn Discountable,
    ) -> Result<Option<Money<'static, Currency>>, DiscountError> {
        if !self.is_applicable(discountable)? {
            trace!(discount = ?self.key(), "discount not applicable");

            return Ok(None);
        }

        self.amount(discountable).map(Some)
    }
}

/// Discount object shared between bills.
pub type SharedDiscount = Arc<dyn Discount>;

/// Wrap any discount implementation into a shared discount object.
pub fn discount<D>(discount: D) -> SharedDiscount
where
    D: Discount + 'static,
{
    Arc::new(discount)
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows or
/// cannot be safely represented.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // Percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}
