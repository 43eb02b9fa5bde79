//! Authenticated identity, bearer credentials and the registration form.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::foundation::{PhoneNumber, UserId, UserType, ValidationError};

/// The record served by `GET /api/users/me/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub user_type: UserType,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl User {
    pub fn is_buyer(&self) -> bool {
        self.user_type == UserType::Buyer
    }

    pub fn is_farmer(&self) -> bool {
        self.user_type == UserType::Farmer
    }
}

/// Access/refresh pair returned by `POST /api/auth/jwt/create/`.
///
/// Both values are opaque. They are never decoded on the client.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: SecretString,
    pub refresh: SecretString,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: SecretString::new(access.into()),
            refresh: SecretString::new(refresh.into()),
        }
    }

    /// Borrow of the access token for a bearer header.
    pub fn access_token(&self) -> &str {
        self.access.expose_secret()
    }
}

impl PartialEq for TokenPair {
    fn eq(&self, other: &Self) -> bool {
        self.access.expose_secret() == other.access.expose_secret()
            && self.refresh.expose_secret() == other.refresh.expose_secret()
    }
}

/// Body of the token exchange.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require("username", &self.username)?;
        ValidationError::require("password", &self.password)?;
        Ok(())
    }
}

/// Registration form for either portal (`POST /api/register/`).
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub re_password: String,
    pub phone_number: String,
    pub location: String,
    pub user_type: UserType,
}

impl Registration {
    /// Checks everything the backend would otherwise reject for obvious reasons.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require("username", &self.username)?;
        ValidationError::require("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing @ symbol"));
        }
        ValidationError::require("password", &self.password)?;
        if self.password != self.re_password {
            return Err(ValidationError::PasswordMismatch);
        }
        PhoneNumber::parse(&self.phone_number)?;
        ValidationError::require("location", &self.location)?;
        Ok(())
    }
}
