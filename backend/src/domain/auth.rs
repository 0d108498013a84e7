//! Registration and login primitives.
//!
//! Inbound payloads are validated here before a handler talks to the
//! authentication service. Plain-text passwords are wiped from memory when
//! dropped.

use serde::Serialize;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::validation::FieldError;
use super::{DisplayName, Email, User, UserId, Username};

const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 128;

/// A candidate password, zeroised on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a new password's length.
    pub fn new_secret(raw: &str) -> Result<Self, FieldError> {
        let length = raw.chars().count();
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&length) {
            return Err(FieldError::new(
                "password",
                "invalid_length",
                format!("password must be {PASSWORD_MIN}-{PASSWORD_MAX} characters"),
            ));
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Wrap a password presented at login. Only emptiness is checked.
    pub fn presented(raw: &str) -> Result<Self, FieldError> {
        if raw.is_empty() {
            return Err(FieldError::new(
                "password",
                "required",
                "password must not be empty",
            ));
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the secret for hashing or verification.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: Email,
    pub username: Username,
    pub display_name: DisplayName,
    pub password: Password,
}

impl Registration {
    /// Validate raw sign-up fields.
    ///
    /// # Examples
    /// ```
    /// use pawprint::domain::Registration;
    ///
    /// let registration =
    ///     Registration::try_from_parts("ada@example.com", "ada", "Ada", "correct horse").unwrap();
    /// assert_eq!(registration.username.as_ref(), "ada");
    /// ```
    pub fn try_from_parts(
        email: &str,
        username: &str,
        display_name: &str,
        password: &str,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            email: Email::parse(email)?,
            username: Username::parse(username)?,
            display_name: DisplayName::parse(display_name)?,
            password: Password::new_secret(password)?,
        })
    }
}

/// Validated login credentials.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub email: Email,
    pub password: Password,
}

impl LoginCredentials {
    /// Validate raw login fields.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, FieldError> {
        Ok(Self {
            email: Email::parse(email)?,
            password: Password::presented(password)?,
        })
    }
}

/// Claims carried by an issued access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Token plus the account it was issued for.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    /// The authenticated account.
    pub user: User,
}
