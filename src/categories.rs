//! Categories
//!
//! Bill categories and the ordered sets discounts use to exclude them.

use std::fmt;

use serde::Deserialize;
use smallvec::SmallVec;

/// Category of goods a bill was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Food and household consumables.
    Groceries,

    /// Apparel and footwear.
    Clothing,

    /// Consumer electronics.
    Electronics,

    /// Furniture, homeware and garden.
    Home,

    /// Pharmacy and personal care.
    Health,

    /// Toys and games.
    Toys,
}

impl Category {
    /// Lowercase display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Groceries => "groceries",
            Self::Clothing => "clothing",
            Self::Electronics => "electronics",
            Self::Home => "home",
            Self::Health => "health",
            Self::Toys => "toys",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A sorted, deduplicated set of categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    categories: SmallVec<[Category; 4]>,
}

impl CategorySet {
    /// Create a new category set, sorting and removing duplicates.
    #[must_use]
    pub fn new(categories: SmallVec<[Category; 4]>) -> Self {
        let mut set = Self { categories };

        set.categories.sort_unstable();
        set.categories.dedup();

        set
    }

    /// Create an empty category set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            categories: SmallVec::new(),
        }
    }

    /// Create a category set from a slice.
    #[must_use]
    pub fn from_slice(categories: &[Category]) -> Self {
        Self::new(SmallVec::from_slice(categories))
    }

    /// Check if the set contains a category.
    pub fn contains(&self, category: Category) -> bool {
        self.categories.binary_search(&category).is_ok()
    }

    /// Add a category, keeping the set sorted.
    pub fn insert(&mut self, category: Category) {
        if let Err(pos) = self.categories.binary_search(&category) {
            self.categories.insert(pos, category);
        }
    }

    /// Remove a category if present.
    pub fn remove(&mut self, category: Category) {
        if let Ok(pos) = self.categories.binary_search(&category) {
            self.categories.remove(pos);
        }
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of categories in the set.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Iterate the categories in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.iter().copied()
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
