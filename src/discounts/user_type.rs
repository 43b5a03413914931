//! User Type Discount
//!
//! A discount reserved for users of one particular type, e.g. "10% off for premium members".

use crate::{
    categories::CategorySet,
    discountable::Discountable,
    discounts::{Discount, DiscountError, DiscountKey, DiscountTerms, DiscountValue},
    users::UserType,
};

/// A discount that applies when the discountable's user is of a given type.
#[derive(Debug, Clone)]
pub struct UserTypeDiscount {
    terms: DiscountTerms,
    user_type: UserType,
}

impl UserTypeDiscount {
    /// Create a new user type discount.
    pub fn new(terms: DiscountTerms, user_type: UserType) -> Self {
        Self { terms, user_type }
    }

    /// Start building a user type discount whose fields may be missing.
    pub fn builder(key: DiscountKey) -> UserTypeDiscountBuilder {
        UserTypeDiscountBuilder {
            key,
            value: None,
            excluded_categories: CategorySet::empty(),
            user_type: None,
        }
    }

    /// Return the user type this discount is reserved for.
    pub fn user_type(&self) -> UserType {
        self.user_type
    }
}

impl Discount for UserTypeDiscount {
    fn terms(&self) -> &DiscountTerms {
        &self.terms
    }

    fn is_applicable(&self, discountable: &dyn Discountable) -> Result<bool, DiscountError> {
        let user = discountable
            .user()
            .ok_or(DiscountError::InvalidArgument("discountable has no user"))?;

        let user_type = user
            .user_type()
            .ok_or(DiscountError::InvalidArgument("discountable user has no user type"))?;

        Ok(self.terms.is_category_applicable(discountable.category()) && self.user_type == user_type)
    }
}

/// Builder for [`UserTypeDiscount`].
#[derive(Debug, Clone)]
pub struct UserTypeDiscountBuilder {
    key: DiscountKey,
    value: Option<DiscountValue>,
    excluded_categories: CategorySet,
    user_type: Option<UserType>,
}

impl UserTypeDiscountBuilder {
    /// Set the discount value.
    #[must_use]
    pub fn value(mut self, value: DiscountValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the categories the discount never applies to.
    #[must_use]
    pub fn excluded_categories(mut self, excluded_categories: CategorySet) -> Self {
        self.excluded_categories = excluded_categories;
        self
    }

    /// Set the user type the discount is reserved for.
    #[must_use]
    pub fn user_type(mut self, user_type: UserType) -> Self {
        self.user_type = Some(user_type);
        self
    }

    /// Build the discount.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::InvalidArgument`] if the value or user type is missing.
    pub fn build(self) -> Result<UserTypeDiscount, DiscountError> {
        let value = self
            .value
            .ok_or(DiscountError::InvalidArgument("discount value is required"))?;

        let user_type = self
            .user_type
            .ok_or(DiscountError::InvalidArgument("user type is required"))?;

        Ok(UserTypeDiscount::new(
            DiscountTerms::new(self.key, value, self.excluded_categories)?,
            user_type,
        ))
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use crate::{
        categories::Category,
        discounts::DiscountType,
        test_support::{StubDiscountable, gbp},
        users::User,
    };

    use super::*;

    fn premium_ten_percent(excluded: &[Category]) -> TestResult<UserTypeDiscount> {
        Ok(UserTypeDiscount::builder(DiscountKey::default())
            .value(DiscountValue::PercentageOff(Percentage::from(0.1)))
            .excluded_categories(CategorySet::from_slice(excluded))
            .user_type(UserType::Premium)
            .build()?)
    }

    #[test]
    fn builder_without_user_type_fails() {
        let result = UserTypeDiscount::builder(DiscountKey::default())
            .value(DiscountValue::PercentageOff(Percentage::from(0.1)))
            .build();

        assert!(matches!(
            result,
            Err(DiscountError::InvalidArgument("user type is required"))
        ));
    }

    #[test]
    fn builder_without_value_fails() {
        let result = UserTypeDiscount::builder(DiscountKey::default())
            .user_type(UserType::Employee)
            .build();

        assert!(matches!(
            result,
            Err(DiscountError::InvalidArgument("discount value is required"))
        ));
    }

    #[test]
    fn builder_keeps_terms() -> TestResult {
        let discount = premium_ten_percent(&[Category::Groceries])?;

        assert_eq!(discount.user_type(), UserType::Premium);
        assert_eq!(discount.terms().discount_type(), DiscountType::Percentage);
        assert!(discount.terms().excluded_categories().contains(Category::Groceries));

        Ok(())
    }

    #[test]
    fn applies_to_matching_user_type() -> TestResult {
        let user = User::new(UserType::Premium);
        let discountable = StubDiscountable::new(Some(&user), gbp(10_000), Some(Category::Home));
        let discount = premium_ten_percent(&[])?;

        assert!(discount.is_applicable(&discountable)?);
        assert_eq!(discount.calculate(&discountable)?, Some(gbp(1_000)));

        Ok(())
    }

    #[test]
    fn does_not_apply_to_other_user_types() -> TestResult {
        let user = User::new(UserType::Customer);
        let discountable = StubDiscountable::new(Some(&user), gbp(10_000), Some(Category::Home));
        let discount = premium_ten_percent(&[])?;

        assert!(!discount.is_applicable(&discountable)?);
        assert_eq!(discount.calculate(&discountable)?, None);

        Ok(())
    }

    #[test]
    fn excluded_category_blocks_matching_user() -> TestResult {
        let user = User::new(UserType::Premium);
        let discountable =
            StubDiscountable::new(Some(&user), gbp(10_000), Some(Category::Groceries));
        let discount = premium_ten_percent(&[Category::Groceries])?;

        assert!(!discount.is_applicable(&discountable)?);
        assert_eq!(discount.calculate(&discountable)?, None);

        Ok(())
    }

    #[test]
    fn applies_when_category_is_unset() -> TestResult {
        let user = User::new(UserType::Premium);
        let discountable = StubDiscountable::new(Some(&user), gbp(10_000), None);
        let discount = premium_ten_percent(&[Category::Groceries])?;

        assert!(discount.is_applicable(&discountable)?);

        Ok(())
    }

    #[test]
    fn missing_user_is_invalid() -> TestResult {
        let discountable = StubDiscountable::new(None, gbp(10_000), Some(Category::Home));
        let discount = premium_ten_percent(&[])?;

        assert_eq!(
            discount.is_applicable(&discountable),
            Err(DiscountError::InvalidArgument("discountable has no user"))
        );
        assert_eq!(
            discount.calculate(&discountable),
            Err(DiscountError::InvalidArgument("discountable has no user"))
        );

        Ok(())
    }

    #[test]
    fn unclassified_user_is_invalid() -> TestResult {
        let user = User::unclassified();
        let discountable = StubDiscountable::new(Some(&user), gbp(10_000), Some(Category::Home));
        let discount = premium_ten_percent(&[])?;

        assert_eq!(
            discount.is_applicable(&discountable),
            Err(DiscountError::InvalidArgument(
                "discountable user has no user type"
            ))
        );

        Ok(())
    }

    #[test]
    fn zero_amount_is_present_not_absent() -> TestResult {
        let user = User::new(UserType::Employee);
        let discountable = StubDiscountable::new(Some(&user), gbp(10_000), None);
        let discount = UserTypeDiscount::builder(DiscountKey::default())
            .value(DiscountValue::AmountOff(Money::from_minor(0, GBP)))
            .user_type(UserType::Employee)
            .build()?;

        assert_eq!(discount.calculate(&discountable)?, Some(gbp(0)));

        Ok(())
    }
}
