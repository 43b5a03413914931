//! Users

use std::fmt;

use serde::Deserialize;

/// Classification of a user used by user-type discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Store employee.
    Employee,

    /// Affiliate of the store.
    Affiliate,

    /// Regular customer.
    Customer,

    /// Premium member.
    Premium,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Employee => "employee",
            Self::Affiliate => "affiliate",
            Self::Customer => "customer",
            Self::Premium => "premium",
        })
    }
}

/// A user a bill belongs to.
///
/// Users are owned by the caller; bills only borrow them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    user_type: Option<UserType>,
}

impl User {
    /// Create a user of the given type.
    pub fn new(user_type: UserType) -> Self {
        Self {
            user_type: Some(user_type),
        }
    }

    /// Create a user that has not been classified yet.
    pub fn unclassified() -> Self {
        Self { user_type: None }
    }

    /// Returns the user type, if the user has been classified.
    pub fn user_type(&self) -> Option<UserType> {
        self.user_type
    }
}
