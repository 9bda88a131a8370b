use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type AdminId = u32;

/// An admin account without an ID.
///
/// The password is stored and compared in plaintext. This is a known
/// weakness of the design, kept deliberately rather than silently changed;
/// see DESIGN.md. The password is never serialized through the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdmin {
    pub username: String,
    pub password: String,
}

/// A stored admin account, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    pub id: AdminId,
    pub admin: NewAdmin,
}

impl Admin {
    /// Check whether the given password is correct.
    pub fn verify_password(&self, password: &str) -> bool {
        self.admin.password == password
    }
}

impl Deref for Admin {
    type Target = NewAdmin;

    fn deref(&self) -> &Self::Target {
        &self.admin
    }
}

impl DerefMut for Admin {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.admin
    }
}

/// Raw login credentials, received from a user. Never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.username.is_empty() {
            errors.push("username must be a non-empty string".to_string());
        }
        if self.password.is_empty() {
            errors.push("password must be a non-empty string".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }
}

/// The public view of an admin: everything except the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSummary {
    pub id: AdminId,
    pub username: String,
}

impl From<Admin> for AdminSummary {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.admin.username,
        }
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl NewAdmin {
        pub fn example() -> Self {
            Self {
                username: "coordinator".to_string(),
                password: "coordinate4lyfe".to_string(),
            }
        }
    }

    impl AdminCredentials {
        pub fn example() -> Self {
            let NewAdmin { username, password } = NewAdmin::example();
            Self { username, password }
        }
    }
}
