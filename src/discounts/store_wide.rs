//! Store Wide Discount
//!
//! A discount open to everyone, limited only by its category exclusions.

use crate::{
    discountable::Discountable,
    discounts::{Discount, DiscountError, DiscountTerms},
};

/// A discount that applies to every discountable whose category is not excluded.
#[derive(Debug, Clone)]
pub struct StoreWideDiscount {
    terms: DiscountTerms,
}

impl StoreWideDiscount {
    /// Create a new store wide discount.
    pub fn new(terms: DiscountTerms) -> Self {
        Self { terms }
    }
}

impl Discount for StoreWideDiscount {
    fn terms(&self) -> &DiscountTerms {
        &self.terms
    }

    fn is_applicable(&self, discountable: &dyn Discountable) -> Result<bool, DiscountError> {
        Ok(self.terms.is_category_applicable(discountable.category()))
    }
}
