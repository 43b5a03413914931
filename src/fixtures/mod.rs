//! Fixtures
//!
//! Assemble users, discounts and bills from a YAML document.
//!
//! ```yaml
//! users:
//!   alice:
//!     type: premium
//!
//! discounts:
//!   premium_ten:
//!     type: user_type
//!     name: Premium members 10%
//!     user_type: premium
//!     discount:
//!       type: percentage
//!       value: 10%
//!     exclude: [groceries]
//!
//! bills:
//!   - name: weekly-shop
//!     user: alice
//!     net: 100.00 GBP
//!     category: clothing
//!     mutually_exclusive: [premium_ten]
//!     always_applicable: []
//! ```

use std::{fs, path::Path, sync::Arc};

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use slotmap::{SecondaryMap, SlotMap};
use thiserror::Error;

use crate::{
    bill::Bill,
    categories::{Category, CategorySet},
    discounts::{
        DiscountError, DiscountKey, DiscountMeta, DiscountTerms, DiscountType, DiscountValue,
        SharedDiscount, SpendThresholdDiscount, StoreWideDiscount, UserTypeDiscount, discount,
    },
    fixtures::discounts::{DiscountFixture, DiscountValueFixture},
    users::{User, UserType},
};

pub mod discounts;
pub mod prices;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between prices
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Discount not found
    #[error("Discount not found: {0}")]
    DiscountNotFound(String),

    /// Bill not found
    #[error("Bill not found: {0}")]
    BillNotFound(String),

    /// Discount or bill construction error
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Wrapper for a whole fixture document in YAML
#[derive(Debug, Deserialize)]
pub struct FixtureDocument {
    /// Map of user key -> user fixture
    #[serde(default)]
    pub users: FxHashMap<String, UserFixture>,

    /// Map of discount key -> discount fixture
    #[serde(default)]
    pub discounts: FxHashMap<String, DiscountFixture>,

    /// Bills, in the order they should be processed
    #[serde(default)]
    pub bills: Vec<BillFixture>,
}

/// User fixture from YAML
#[derive(Debug, Deserialize)]
pub struct UserFixture {
    /// User type; omitted for unclassified users
    #[serde(rename = "type", default)]
    pub user_type: Option<UserType>,
}

/// Bill fixture from YAML
#[derive(Debug, Deserialize)]
pub struct BillFixture {
    /// Bill name
    pub name: String,

    /// Key of the user the bill belongs to
    pub user: String,

    /// Net total (e.g., "100.00 GBP")
    pub net: String,

    /// Bill category
    #[serde(default)]
    pub category: Option<Category>,

    /// Keys of mutually exclusive discounts, in evaluation order
    #[serde(default)]
    pub mutually_exclusive: Vec<String>,

    /// Keys of always-applicable discounts, in evaluation order
    #[serde(default)]
    pub always_applicable: Vec<String>,
}

/// A bill definition with every reference resolved.
#[derive(Debug)]
struct ResolvedBill {
    name: String,
    user: String,
    net: Money<'static, Currency>,
    category: Option<Category>,
    mutually_exclusive: Vec<DiscountKey>,
    always_applicable: Vec<DiscountKey>,
}

/// Fixture
#[derive(Debug, Default)]
pub struct Fixture {
    users: FxHashMap<String, User>,

    discount_meta: SlotMap<DiscountKey, DiscountMeta>,
    discount_keys: FxHashMap<String, DiscountKey>,
    discounts: SecondaryMap<DiscountKey, SharedDiscount>,

    bills: Vec<ResolvedBill>,

    /// Currency shared by every price in the fixture
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Load a fixture from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Load a fixture from a YAML string
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed, a price or percentage is
    /// invalid, prices use different currencies, a reference cannot be resolved,
    /// or a discount cannot be constructed.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        let document: FixtureDocument = serde_norway::from_str(yaml)?;
        let mut fixture = Self::default();

        for (key, user) in document.users {
            let user = user.user_type.map_or_else(User::unclassified, User::new);

            fixture.users.insert(key, user);
        }

        for (key, discount_fixture) in document.discounts {
            fixture.load_discount(key, discount_fixture)?;
        }

        for bill in document.bills {
            fixture.load_bill(bill)?;
        }

        Ok(fixture)
    }

    fn load_discount(
        &mut self,
        key: String,
        fixture: DiscountFixture,
    ) -> Result<(), FixtureError> {
        let discount_key = self.discount_meta.insert(DiscountMeta {
            name: fixture.name().to_string(),
        });

        let loaded = match fixture {
            DiscountFixture::UserType {
                discount: value,
                exclude,
                user_type,
                ..
            } => {
                let mut builder = UserTypeDiscount::builder(discount_key)
                    .value(self.discount_value(&value)?)
                    .excluded_categories(exclude.into_iter().collect());

                if let Some(user_type) = user_type {
                    builder = builder.user_type(user_type);
                }

                discount(builder.build()?)
            }
            DiscountFixture::StoreWide {
                discount: value,
                exclude,
                ..
            } => discount(StoreWideDiscount::new(DiscountTerms::new(
                discount_key,
                self.discount_value(&value)?,
                exclude.into_iter().collect::<CategorySet>(),
            )?)),
            DiscountFixture::SpendThreshold {
                threshold,
                amount,
                exclude,
                ..
            } => discount(SpendThresholdDiscount::new(
                discount_key,
                self.money(&threshold)?,
                self.money(&amount)?,
                exclude.into_iter().collect(),
            )?),
        };

        self.discounts.insert(discount_key, loaded);
        self.discount_keys.insert(key, discount_key);

        Ok(())
    }

    fn load_bill(&mut self, fixture: BillFixture) -> Result<(), FixtureError> {
        if !self.users.contains_key(&fixture.user) {
            return Err(FixtureError::UserNotFound(fixture.user));
        }

        let net = self.money(&fixture.net)?;
        let mutually_exclusive = self.resolve_discounts(&fixture.mutually_exclusive)?;
        let always_applicable = self.resolve_discounts(&fixture.always_applicable)?;

        self.bills.push(ResolvedBill {
            name: fixture.name,
            user: fixture.user,
            net,
            category: fixture.category,
            mutually_exclusive,
            always_applicable,
        });

        Ok(())
    }

    fn resolve_discounts(&self, keys: &[String]) -> Result<Vec<DiscountKey>, FixtureError> {
        keys.iter()
            .map(|key| {
                self.discount_keys
                    .get(key)
                    .copied()
                    .ok_or_else(|| FixtureError::DiscountNotFound(key.clone()))
            })
            .collect()
    }

    fn discount_value(
        &mut self,
        fixture: &DiscountValueFixture,
    ) -> Result<DiscountValue, FixtureError> {
        match fixture.discount_type {
            DiscountType::Percentage => Ok(DiscountValue::PercentageOff(
                prices::parse_percentage(&fixture.value)?,
            )),
            DiscountType::FixedAmount => Ok(DiscountValue::AmountOff(self.money(&fixture.value)?)),
        }
    }

    /// Parse a price, checking it uses the same currency as the rest of the fixture.
    fn money(&mut self, price: &str) -> Result<Money<'static, Currency>, FixtureError> {
        let (minor_units, currency) = prices::parse_price(price)?;

        match self.currency {
            Some(existing) if existing != currency => {
                return Err(FixtureError::CurrencyMismatch(
                    existing.iso_alpha_code.to_string(),
                    currency.iso_alpha_code.to_string(),
                ));
            }
            Some(_) => {}
            None => self.currency = Some(currency),
        }

        Ok(Money::from_minor(minor_units, currency))
    }

    /// Names of the bills in the fixture, in document order
    pub fn bill_names(&self) -> impl Iterator<Item = &str> {
        self.bills.iter().map(|bill| bill.name.as_str())
    }

    /// Build the named bill with its discounts attached.
    ///
    /// The bill has not had its discounts applied yet.
    ///
    /// # Errors
    ///
    /// Returns an error if no bill with that name exists.
    pub fn bill(&self, name: &str) -> Result<Bill<'_>, FixtureError> {
        let resolved = self
            .bills
            .iter()
            .find(|bill| bill.name == name)
            .ok_or_else(|| FixtureError::BillNotFound(name.to_string()))?;

        let user = self
            .users
            .get(&resolved.user)
            .ok_or_else(|| FixtureError::UserNotFound(resolved.user.clone()))?;

        let mut bill = Bill::new(user, resolved.net, resolved.category);

        bill.set_mutually_exclusive_discounts(self.shared_discounts(&resolved.mutually_exclusive));
        bill.set_always_applicable_discounts(self.shared_discounts(&resolved.always_applicable));

        Ok(bill)
    }

    fn shared_discounts<'a>(
        &'a self,
        keys: &'a [DiscountKey],
    ) -> impl Iterator<Item = SharedDiscount> + 'a {
        keys.iter()
            .filter_map(|key| self.discounts.get(*key))
            .map(Arc::clone)
    }

    /// Look up a discount by its fixture key
    pub fn discount(&self, key: &str) -> Option<&SharedDiscount> {
        self.discount_keys
            .get(key)
            .and_then(|discount_key| self.discounts.get(*discount_key))
    }

    /// Discount metadata, for rendering receipts
    pub fn discount_meta(&self) -> &SlotMap<DiscountKey, DiscountMeta> {
        &self.discount_meta
    }

    /// Currency shared by every price in the fixture, if any were loaded
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }
}
