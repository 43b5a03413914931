//! Tally prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bill::{Bill, BillBuilder, DiscountApplication, DiscountGroup},
    categories::{Category, CategorySet},
    discountable::Discountable,
    discounts::{
        Discount, DiscountError, DiscountKey, DiscountMeta, DiscountTerms, DiscountType,
        DiscountValue, SharedDiscount, SpendThresholdDiscount, StoreWideDiscount,
        UserTypeDiscount, UserTypeDiscountBuilder, discount,
    },
    fixtures::{Fixture, FixtureError},
    receipt::{Receipt, ReceiptError},
    users::{User, UserType},
};
