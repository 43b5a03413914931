//! Discount Fixtures

use serde::Deserialize;

use crate::{
    categories::Category,
    discounts::DiscountType,
    users::UserType,
};

/// Discount fixture from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountFixture {
    /// Discount reserved for one user type
    UserType {
        /// Discount name
        name: String,

        /// Discount value
        discount: DiscountValueFixture,

        /// Categories the discount never applies to
        #[serde(default)]
        exclude: Vec<Category>,

        /// User type the discount is reserved for
        #[serde(default)]
        user_type: Option<UserType>,
    },

    /// Discount open to every user
    StoreWide {
        /// Discount name
        name: String,

        /// Discount value
        discount: DiscountValueFixture,

        /// Categories the discount never applies to
        #[serde(default)]
        exclude: Vec<Category>,
    },

    /// Fixed amount per whole threshold of the payable amount
    SpendThreshold {
        /// Discount name
        name: String,

        /// Spend threshold (e.g., "100.00 GBP")
        threshold: String,

        /// Amount granted per threshold (e.g., "5.00 GBP")
        amount: String,

        /// Categories the discount never applies to
        #[serde(default)]
        exclude: Vec<Category>,
    },
}

impl DiscountFixture {
    /// Return the discount name
    pub fn name(&self) -> &str {
        match self {
            Self::UserType { name, .. }
            | Self::StoreWide { name, .. }
            | Self::SpendThreshold { name, .. } => name,
        }
    }
}

/// Discount value fixture: a type and its value
#[derive(Debug, Deserialize)]
pub struct DiscountValueFixture {
    /// How the value is interpreted; defaults to a percentage
    #[serde(rename = "type", default)]
    pub discount_type: DiscountType,

    /// Percentage (e.g., "10%") or price (e.g., "5.00 GBP")
    pub value: String,
}
