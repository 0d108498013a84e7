//! Port for issuing and verifying bearer tokens.

use chrono::{DateTime, Utc};

use crate::domain::{TokenClaims, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token could not be signed.
        Encoding { message: String } => "token encoding failed: {message}",
        /// The token is malformed, forged or expired.
        Invalid { message: String } => "token rejected: {message}",
    }
}

/// Signs access tokens for users and validates presented tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Issue a token for `user`, valid from `issued_at`.
    fn issue(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String, TokenError>;

    /// Validate signature and expiry and return the embedded claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
