//! Spend Threshold Discount
//!
//! A fixed amount off for every whole threshold of the amount still payable,
//! e.g. "£5 off for every £100 spent".
//!
//! This discount reads the running payable rather than the net, so when it sits
//! after other always-applicable discounts it sees their reductions.

use rusty_money::{Money, MoneyError, iso::Currency};

use crate::{
    categories::CategorySet,
    discountable::Discountable,
    discounts::{Discount, DiscountError, DiscountKey, DiscountTerms, DiscountValue},
};

/// A discount granting a fixed amount per whole threshold of the payable amount.
#[derive(Debug, Clone)]
pub struct SpendThresholdDiscount {
    terms: DiscountTerms,
    threshold: Money<'static, Currency>,
    amount_per_step: Money<'static, Currency>,
}

impl SpendThresholdDiscount {
    /// Create a new spend threshold discount.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::InvalidArgument`] if the threshold is not
    /// positive or the threshold and amount use different currencies.
    pub fn new(
        key: DiscountKey,
        threshold: Money<'static, Currency>,
        amount_per_step: Money<'static, Currency>,
        excluded_categories: CategorySet,
    ) -> Result<Self, DiscountError> {
        if threshold.to_minor_units() <= 0 {
            return Err(DiscountError::InvalidArgument("threshold must be positive"));
        }

        if threshold.currency() != amount_per_step.currency() {
            return Err(DiscountError::InvalidArgument(
                "threshold and amount must share a currency",
            ));
        }

        Ok(Self {
            terms: DiscountTerms::new(
                key,
                DiscountValue::AmountOff(amount_per_step),
                excluded_categories,
            )?,
            threshold,
            amount_per_step,
        })
    }

    /// Return the spend threshold
    pub fn threshold(&self) -> Money<'static, Currency> {
        self.threshold
    }

    /// Number of whole thresholds covered by the running payable.
    fn steps(&self, discountable: &dyn Discountable) -> Result<i64, DiscountError> {
        let payable = discountable
            .net_payable()
            .unwrap_or_else(|| discountable.net());

        if payable.currency() != self.threshold.currency() {
            return Err(MoneyError::CurrencyMismatch {
                expected: self.threshold.currency().iso_alpha_code,
                actual: payable.currency().iso_alpha_code,
            }
            .into());
        }

        Ok(payable
            .to_minor_units()
            .div_euclid(self.threshold.to_minor_units()))
    }
}

impl Discount for SpendThresholdDiscount {
    fn terms(&self) -> &DiscountTerms {
        &self.terms
    }

    fn is_applicable(&self, discountable: &dyn Discountable) -> Result<bool, DiscountError> {
        if !self.terms.is_category_applicable(discountable.category()) {
            return Ok(false);
        }

        Ok(self.steps(discountable)? > 0)
    }

    fn amount(
        &self,
        discountable: &dyn Discountable,
    ) -> Result<Money<'static, Currency>, DiscountError> {
        let minor = self
            .steps(discountable)?
            .checked_mul(self.amount_per_step.to_minor_units())
            .ok_or(DiscountError::AmountOverflow)?;

        Ok(Money::from_minor(minor, self.amount_per_step.currency()))
    }
}
