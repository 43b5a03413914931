//! Shared helpers for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use rusty_money::{
    Money,
    iso::{Currency, GBP},
};

use crate::{
    categories::{Category, CategorySet},
    discountable::Discountable,
    discounts::{Discount, DiscountError, DiscountKey, DiscountTerms, DiscountValue},
    users::User,
};

pub(crate) fn gbp(minor: i64) -> Money<'static, Currency> {
    Money::from_minor(minor, GBP)
}

#[derive(Debug)]
pub(crate) struct StubDiscountable<'a> {
    user: Option<&'a User>,
    net: Money<'static, Currency>,
    net_payable: Option<Money<'static, Currency>>,
    category: Option<Category>,
}

impl<'a> StubDiscountable<'a> {
    pub(crate) fn new(
        user: Option<&'a User>,
        net: Money<'static, Currency>,
        category: Option<Category>,
    ) -> Self {
        Self {
            user,
            net,
            net_payable: None,
            category,
        }
    }

    pub(crate) fn with_net_payable(mut self, net_payable: Money<'static, Currency>) -> Self {
        self.net_payable = Some(net_payable);
        self
    }
}

impl Discountable for StubDiscountable<'_> {
    fn category(&self) -> Option<Category> {
        self.category
    }

    fn user(&self) -> Option<&User> {
        self.user
    }

    fn net(&self) -> Money<'static, Currency> {
        self.net
    }

    fn net_payable(&self) -> Option<Money<'static, Currency>> {
        self.net_payable
    }
}

/// Always (or never) applies, counting how often it is asked.
#[derive(Debug)]
pub(crate) struct CountingDiscount {
    terms: DiscountTerms,
    applies: bool,
    queries: AtomicUsize,
}

impl CountingDiscount {
    pub(crate) fn new(
        key: DiscountKey,
        amount: Money<'static, Currency>,
        applies: bool,
    ) -> Result<Self, DiscountError> {
        Ok(Self {
            terms: DiscountTerms::new(key, DiscountValue::AmountOff(amount), CategorySet::empty())?,
            applies,
            queries: AtomicUsize::new(0),
        })
    }

    pub(crate) fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Discount for CountingDiscount {
    fn terms(&self) -> &DiscountTerms {
        &self.terms
    }

    fn is_applicable(&self, _discountable: &dyn Discountable) -> Result<bool, DiscountError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        Ok(self.applies)
    }
}
