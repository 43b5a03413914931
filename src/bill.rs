//! Bill
//!
//! A user's bill and the algorithm that applies its discounts.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    categories::Category,
    discountable::Discountable,
    discounts::{DiscountError, DiscountKey, SharedDiscount},
    users::User,
};

/// Which discount collection an application came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountGroup {
    /// At most one discount from this group applies: the first that matches.
    MutuallyExclusive,

    /// Every matching discount from this group applies, cumulatively.
    AlwaysApplicable,
}

/// A discount that reduced the payable amount of a bill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountApplication {
    /// Discount that applied
    pub key: DiscountKey,

    /// Collection the discount was attached through
    pub group: DiscountGroup,

    /// Amount taken off the payable
    pub amount: Money<'static, Currency>,
}

/// A bill raised for a user.
///
/// Discounts are attached by the caller in the order they should be evaluated;
/// [`Bill::apply_discounts`] then derives the payable amount.
#[derive(Debug, Clone)]
pub struct Bill<'a> {
    user: &'a User,
    net: Money<'static, Currency>,
    net_payable: Option<Money<'static, Currency>>,
    category: Option<Category>,
    always_applicable_discounts: Vec<SharedDiscount>,
    mutually_exclusive_discounts: Vec<SharedDiscount>,
    applications: SmallVec<[DiscountApplication; 4]>,
}

impl<'a> Bill<'a> {
    /// Create a new bill with no discounts attached.
    pub fn new(user: &'a User, net: Money<'static, Currency>, category: Option<Category>) -> Self {
        Self {
            user,
            net,
            net_payable: None,
            category,
            always_applicable_discounts: Vec::new(),
            mutually_exclusive_discounts: Vec::new(),
            applications: SmallVec::new(),
        }
    }

    /// Start building a bill whose required fields may be missing.
    pub fn builder() -> BillBuilder<'a> {
        BillBuilder::default()
    }

    /// Apply the attached discounts and return the amount payable.
    ///
    /// The payable amount is recomputed from the net every time, so calling this
    /// again with the same discounts gives the same result.
    ///
    /// Mutually exclusive discounts are evaluated first, in insertion order, and
    /// only the first that applies is taken off; the rest are never evaluated.
    /// Every always-applicable discount is then evaluated in insertion order and
    /// each one that applies is taken off straight away.
    ///
    /// # Errors
    ///
    /// Returns the first [`DiscountError`] raised by any discount. The whole
    /// application is abandoned and the payable amount is left unset.
    pub fn apply_discounts(&mut self) -> Result<Money<'static, Currency>, DiscountError> {
        self.applications.clear();

        let result = self.apply_discount_groups();

        if result.is_err() {
            self.net_payable = None;
            self.applications.clear();
        }

        result
    }

    fn apply_discount_groups(&mut self) -> Result<Money<'static, Currency>, DiscountError> {
        self.net_payable = Some(self.net);

        let mut exclusive = None;

        for discount in &self.mutually_exclusive_discounts {
            if let Some(amount) = discount.calculate(&*self)? {
                exclusive = Some((discount.key(), amount));
                break;
            }
        }

        if let Some((key, amount)) = exclusive {
            self.take_off(key, DiscountGroup::MutuallyExclusive, amount)?;
        }

        // Each discount must see the payable left by the ones before it.
        for index in 0..self.always_applicable_discounts.len() {
            let Some(discount) = self.always_applicable_discounts.get(index).cloned() else {
                break;
            };

            if let Some(amount) = discount.calculate(&*self)? {
                self.take_off(discount.key(), DiscountGroup::AlwaysApplicable, amount)?;
            }
        }

        let net_payable = self.net_payable.unwrap_or(self.net);

        debug!(net = %self.net, %net_payable, applied = self.applications.len(), "discounts applied");

        Ok(net_payable)
    }

    fn take_off(
        &mut self,
        key: DiscountKey,
        group: DiscountGroup,
        amount: Money<'static, Currency>,
    ) -> Result<(), DiscountError> {
        let net_payable = self.net_payable.unwrap_or(self.net).sub(amount)?;

        debug!(discount = ?key, ?group, %amount, %net_payable, "discount applied");

        self.net_payable = Some(net_payable);
        self.applications.push(DiscountApplication { key, group, amount });

        Ok(())
    }

    /// Return the user the bill belongs to
    pub fn user(&self) -> &'a User {
        self.user
    }

    /// Set the user the bill belongs to
    pub fn set_user(&mut self, user: &'a User) {
        self.user = user;
    }

    /// Return the total before discounts
    pub fn net(&self) -> Money<'static, Currency> {
        self.net
    }

    /// Set the total before discounts
    pub fn set_net(&mut self, net: Money<'static, Currency>) {
        self.net = net;
    }

    /// Return the total after the last application, if discounts have been applied
    pub fn net_payable(&self) -> Option<Money<'static, Currency>> {
        self.net_payable
    }

    /// Override the payable total
    pub fn set_net_payable(&mut self, net_payable: Option<Money<'static, Currency>>) {
        self.net_payable = net_payable;
    }

    /// Return the bill category
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Set the bill category
    pub fn set_category(&mut self, category: Option<Category>) {
        self.category = category;
    }

    /// Return the always-applicable discounts in evaluation order
    pub fn always_applicable_discounts(&self) -> &[SharedDiscount] {
        &self.always_applicable_discounts
    }

    /// Replace the always-applicable discounts
    pub fn set_always_applicable_discounts(
        &mut self,
        discounts: impl IntoIterator<Item = SharedDiscount>,
    ) {
        self.always_applicable_discounts = discounts.into_iter().collect();
    }

    /// Append an always-applicable discount
    pub fn push_always_applicable(&mut self, discount: SharedDiscount) {
        self.always_applicable_discounts.push(discount);
    }

    /// Return the mutually exclusive discounts in evaluation order
    pub fn mutually_exclusive_discounts(&self) -> &[SharedDiscount] {
        &self.mutually_exclusive_discounts
    }

    /// Replace the mutually exclusive discounts
    pub fn set_mutually_exclusive_discounts(
        &mut self,
        discounts: impl IntoIterator<Item = SharedDiscount>,
    ) {
        self.mutually_exclusive_discounts = discounts.into_iter().collect();
    }

    /// Append a mutually exclusive discount
    pub fn push_mutually_exclusive(&mut self, discount: SharedDiscount) {
        self.mutually_exclusive_discounts.push(discount);
    }

    /// Discounts taken off by the last successful application, in order
    pub fn applications(&self) -> &[DiscountApplication] {
        &self.applications
    }
}

impl Discountable for Bill<'_> {
    fn category(&self) -> Option<Category> {
        self.category
    }

    fn user(&self) -> Option<&User> {
        Some(self.user)
    }

    fn net(&self) -> Money<'static, Currency> {
        self.net
    }

    fn net_payable(&self) -> Option<Money<'static, Currency>> {
        self.net_payable
    }
}

/// Builder for [`Bill`].
#[derive(Debug, Default, Clone)]
pub struct BillBuilder<'a> {
    user: Option<&'a User>,
    net: Option<Money<'static, Currency>>,
    category: Option<Category>,
}

impl<'a> BillBuilder<'a> {
    /// Set the user the bill belongs to.
    #[must_use]
    pub fn user(mut self, user: &'a User) -> Self {
        self.user = Some(user);
        self
    }

    /// Set the total before discounts.
    #[must_use]
    pub fn net(mut self, net: Money<'static, Currency>) -> Self {
        self.net = Some(net);
        self
    }

    /// Set the bill category.
    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Build the bill.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::InvalidArgument`] if the net or user is missing.
    pub fn build(self) -> Result<Bill<'a>, DiscountError> {
        let net = self
            .net
            .ok_or(DiscountError::InvalidArgument("net is required"))?;

        let user = self
            .user
            .ok_or(DiscountError::InvalidArgument("user is required"))?;

        Ok(Bill::new(user, net, self.category))
    }
}
