//! Integration tests for applying discounts to bills.
//!
//! Covers the ordering rules between the two discount groups:
//!
//! 1. Mutually exclusive discounts are tried in order; the first that applies wins
//!    and nothing after it is evaluated.
//! 2. Always-applicable discounts are tried in order; each one that applies is
//!    taken off before the next is evaluated.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use decimal_percentage::Percentage;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use slotmap::SlotMap;
use testresult::TestResult;

use tally::prelude::*;

fn gbp(minor: i64) -> Money<'static, Currency> {
    Money::from_minor(minor, iso::GBP)
}

fn keys<const N: usize>() -> [DiscountKey; N] {
    let mut meta = SlotMap::<DiscountKey, DiscountMeta>::with_key();

    std::array::from_fn(|n| {
        meta.insert(DiscountMeta {
            name: format!("discount {n}"),
        })
    })
}

fn percent_off(
    key: DiscountKey,
    user_type: UserType,
    percent: f64,
) -> Result<SharedDiscount, DiscountError> {
    Ok(discount(
        UserTypeDiscount::builder(key)
            .value(DiscountValue::PercentageOff(Percentage::from(percent)))
            .user_type(user_type)
            .build()?,
    ))
}

fn store_wide(
    key: DiscountKey,
    value: DiscountValue,
    excluded: &[Category],
) -> Result<SharedDiscount, DiscountError> {
    Ok(discount(StoreWideDiscount::new(DiscountTerms::new(
        key,
        value,
        CategorySet::from_slice(excluded),
    )?)))
}

/// Counts how often it is asked whether it applies.
#[derive(Debug)]
struct Recording {
    terms: DiscountTerms,
    applies: bool,
    queries: AtomicUsize,
}

impl Recording {
    fn new(
        key: DiscountKey,
        amount: Money<'static, Currency>,
        applies: bool,
    ) -> Result<Arc<Self>, DiscountError> {
        Ok(Arc::new(Self {
            terms: DiscountTerms::new(key, DiscountValue::AmountOff(amount), CategorySet::empty())?,
            applies,
            queries: AtomicUsize::new(0),
        }))
    }

    fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Discount for Recording {
    fn terms(&self) -> &DiscountTerms {
        &self.terms
    }

    fn is_applicable(&self, _discountable: &dyn Discountable) -> Result<bool, DiscountError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        Ok(self.applies)
    }
}

#[test]
fn premium_groceries_then_fixed_amount() -> TestResult {
    let [premium, five_off] = keys();
    let user = User::new(UserType::Premium);

    let mut bill = Bill::builder()
        .user(&user)
        .net(gbp(10_000))
        .category(Category::Groceries)
        .build()?;

    bill.push_mutually_exclusive(percent_off(premium, UserType::Premium, 0.10)?);
    bill.push_always_applicable(store_wide(five_off, DiscountValue::AmountOff(gbp(500)), &[])?);

    assert_eq!(bill.apply_discounts()?, gbp(8_500));
    assert_eq!(bill.net_payable(), Some(gbp(8_500)));

    let amounts: Vec<_> = bill.applications().iter().map(|a| (a.key, a.amount)).collect();

    assert_eq!(amounts, vec![(premium, gbp(1_000)), (five_off, gbp(500))]);

    Ok(())
}

#[test]
fn first_applicable_exclusive_discount_short_circuits() -> TestResult {
    let [miss, hit, never] = keys();
    let user = User::new(UserType::Customer);

    let first = Recording::new(miss, gbp(100), false)?;
    let second = Recording::new(hit, gbp(200), true)?;
    let third = Recording::new(never, gbp(300), true)?;

    let mut bill = Bill::new(&user, gbp(1_000), None);

    bill.set_mutually_exclusive_discounts([
        Arc::clone(&first) as SharedDiscount,
        Arc::clone(&second) as SharedDiscount,
        Arc::clone(&third) as SharedDiscount,
    ]);

    assert_eq!(bill.apply_discounts()?, gbp(800));
    assert_eq!(first.queries(), 1);
    assert_eq!(second.queries(), 1);
    assert_eq!(third.queries(), 0, "discounts after the winner are never evaluated");

    Ok(())
}

#[test]
fn always_applicable_discounts_accumulate() -> TestResult {
    let [one, two, skipped, three] = keys();
    let user = User::new(UserType::Affiliate);

    let mut bill = Bill::new(&user, gbp(1_000), Some(Category::Home));

    bill.set_always_applicable_discounts([
        Recording::new(one, gbp(100), true)? as SharedDiscount,
        Recording::new(two, gbp(50), true)? as SharedDiscount,
        Recording::new(skipped, gbp(400), false)? as SharedDiscount,
        Recording::new(three, gbp(25), true)? as SharedDiscount,
    ]);

    assert_eq!(bill.apply_discounts()?, gbp(825));

    let applied: Vec<_> = bill.applications().iter().map(|a| a.key).collect();

    assert_eq!(applied, vec![one, two, three]);

    Ok(())
}

#[test]
fn excluded_category_blocks_every_discount_kind() -> TestResult {
    let [premium, store, threshold] = keys();
    let user = User::new(UserType::Premium);

    let mut bill = Bill::new(&user, gbp(20_000), Some(Category::Electronics));

    bill.push_mutually_exclusive(discount(
        UserTypeDiscount::builder(premium)
            .value(DiscountValue::PercentageOff(Percentage::from(0.5)))
            .excluded_categories(CategorySet::from_slice(&[Category::Electronics]))
            .user_type(UserType::Premium)
            .build()?,
    ));
    bill.push_always_applicable(store_wide(
        store,
        DiscountValue::AmountOff(gbp(1_000)),
        &[Category::Electronics],
    )?);
    bill.push_always_applicable(discount(SpendThresholdDiscount::new(
        threshold,
        gbp(10_000),
        gbp(500),
        CategorySet::from_slice(&[Category::Electronics]),
    )?));

    assert_eq!(bill.apply_discounts()?, gbp(20_000));
    assert!(bill.applications().is_empty());

    Ok(())
}

#[test]
fn payable_is_not_clamped_at_zero() -> TestResult {
    let [five_off] = keys();
    let user = User::new(UserType::Customer);

    let mut bill = Bill::new(&user, gbp(300), None);

    bill.push_always_applicable(store_wide(five_off, DiscountValue::AmountOff(gbp(500)), &[])?);

    assert_eq!(bill.apply_discounts()?, gbp(-200));

    Ok(())
}

#[test]
fn spend_threshold_sees_earlier_reductions() -> TestResult {
    let [ten_percent, threshold] = keys();
    let user = User::new(UserType::Customer);

    let ten_off = store_wide(
        ten_percent,
        DiscountValue::PercentageOff(Percentage::from(0.10)),
        &[],
    )?;
    let per_hundred = discount(SpendThresholdDiscount::new(
        threshold,
        gbp(10_000),
        gbp(500),
        CategorySet::empty(),
    )?);

    let mut bill = Bill::new(&user, gbp(20_000), None);

    // 200.00 - 20.00 = 180.00, which covers one threshold.
    bill.set_always_applicable_discounts([Arc::clone(&ten_off), Arc::clone(&per_hundred)]);

    assert_eq!(bill.apply_discounts()?, gbp(17_500));

    // Threshold first: 200.00 covers two thresholds, then 10% of the net.
    bill.set_always_applicable_discounts([per_hundred, ten_off]);

    assert_eq!(bill.apply_discounts()?, gbp(17_000));

    Ok(())
}

#[test]
fn reapplying_gives_the_same_result() -> TestResult {
    let [store] = keys();
    let user = User::new(UserType::Employee);

    let mut bill = Bill::new(&user, gbp(5_000), Some(Category::Toys));

    bill.push_always_applicable(store_wide(
        store,
        DiscountValue::PercentageOff(Percentage::from(0.25)),
        &[],
    )?);

    let first = bill.apply_discounts()?;
    let second = bill.apply_discounts()?;

    assert_eq!(first, gbp(3_750));
    assert_eq!(first, second);
    assert_eq!(bill.applications().len(), 1);

    Ok(())
}

#[test]
fn unclassified_user_fails_user_type_discounts() -> TestResult {
    let [premium, store] = keys();
    let user = User::unclassified();

    let mut bill = Bill::new(&user, gbp(1_000), None);

    bill.push_mutually_exclusive(percent_off(premium, UserType::Premium, 0.10)?);
    bill.push_always_applicable(store_wide(store, DiscountValue::AmountOff(gbp(100)), &[])?);

    assert_eq!(
        bill.apply_discounts(),
        Err(DiscountError::InvalidArgument(
            "discountable user has no user type"
        ))
    );
    assert_eq!(bill.net_payable(), None);
    assert!(bill.applications().is_empty());

    Ok(())
}

#[test]
fn missing_construction_inputs_are_rejected() {
    let [key] = keys();
    let user = User::new(UserType::Premium);

    assert_eq!(
        Bill::builder().net(gbp(100)).build().err(),
        Some(DiscountError::InvalidArgument("user is required"))
    );
    assert_eq!(
        Bill::builder().user(&user).build().err(),
        Some(DiscountError::InvalidArgument("net is required"))
    );
    assert_eq!(
        UserTypeDiscount::builder(key)
            .user_type(UserType::Premium)
            .build()
            .err(),
        Some(DiscountError::InvalidArgument("discount value is required"))
    );
    assert_eq!(
        UserTypeDiscount::builder(key)
            .value(DiscountValue::AmountOff(gbp(100)))
            .build()
            .err(),
        Some(DiscountError::InvalidArgument("user type is required"))
    );
}

#[test]
fn negative_discount_values_are_rejected() {
    let [store, premium, threshold] = keys();
    let negative = || Some(DiscountError::InvalidArgument("discount value must not be negative"));

    assert_eq!(
        store_wide(store, DiscountValue::AmountOff(gbp(-5_000)), &[]).err(),
        negative()
    );
    assert_eq!(
        percent_off(premium, UserType::Premium, -0.2).err(),
        negative()
    );
    assert_eq!(
        SpendThresholdDiscount::new(threshold, gbp(10_000), gbp(-500), CategorySet::empty())
            .err(),
        negative()
    );
}
