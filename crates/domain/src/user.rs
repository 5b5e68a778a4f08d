//! User: the owner of a device fleet.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{HomewiseError, ValidationError};
use crate::id::UserId;
use crate::time::{Timestamp, now};

/// What a user is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Homeowner,
    Admin,
}

impl Role {
    /// Stable lowercase name, as stored and serialized.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Homeowner => "homeowner",
            Self::Admin => "admin",
        }
    }

    /// Parse the stored representation, falling back to [`Role::Homeowner`].
    #[must_use]
    pub fn from_str_lossy(raw: &str) -> Self {
        match raw {
            "admin" => Self::Admin,
            _ => Self::Homeowner,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub created_at: Timestamp,
}

impl User {
    /// Create a builder for constructing a [`User`].
    #[must_use]
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HomewiseError::Validation`] when `email` is empty or has no `@`.
    pub fn validate(&self) -> Result<(), HomewiseError> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ValidationError::InvalidEmail.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`User`].
#[derive(Debug, Default)]
pub struct UserBuilder {
    id: Option<UserId>,
    email: Option<String>,
    role: Option<Role>,
    created_at: Option<Timestamp>,
}

impl UserBuilder {
    #[must_use]
    pub fn id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    /// Emails are compared case-insensitively, so they are stored lower-cased.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into().trim().to_lowercase());
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn created_at(mut self, ts: Timestamp) -> Self {
        self.created_at = Some(ts);
        self
    }

    /// Consume the builder, validate, and return a [`User`].
    ///
    /// # Errors
    ///
    /// Returns [`HomewiseError::Validation`] if the email is missing or malformed.
    pub fn build(self) -> Result<User, HomewiseError> {
        let user = User {
            id: self.id.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            role: self.role.unwrap_or_default(),
            created_at: self.created_at.unwrap_or_else(now),
        };
        user.validate()?;
        Ok(user)
    }
}
