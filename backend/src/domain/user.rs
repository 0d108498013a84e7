//! User accounts and profile values.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::UserId;
use super::validation::{FieldError, optional_text, optional_url};

const EMAIL_MAX: usize = 254;
const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 32;
const DISPLAY_NAME_MAX: usize = 64;
/// Maximum biography length in characters.
pub const BIO_MAX: usize = 500;

/// Normalised (trimmed, lower-cased) email address.
///
/// # Examples
/// ```
/// use pawprint::domain::Email;
///
/// let email = Email::parse("  Ada@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = "email")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let normalised = raw.trim().to_lowercase();
        let invalid = || FieldError::new("email", "invalid_email", "email must be a valid address");
        if normalised.chars().count() < 3 || normalised.chars().count() > EMAIL_MAX {
            return Err(invalid());
        }
        let mut parts = normalised.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        if local.is_empty() || domain.is_empty() || normalised.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique handle made of ASCII letters, digits and underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "ada_l")]
pub struct Username(String);

impl Username {
    /// Validate a username.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let trimmed = raw.trim();
        let length = trimmed.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
            return Err(FieldError::new(
                "username",
                "invalid_length",
                format!("username must be {USERNAME_MIN}-{USERNAME_MAX} characters"),
            ));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(FieldError::new(
                "username",
                "invalid_characters",
                "username may only contain letters, numbers, or underscores",
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name shown next to posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "Ada Lovelace")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate a display name.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FieldError::new(
                "displayName",
                "required",
                "displayName must not be empty",
            ));
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(FieldError::new(
                "displayName",
                "too_long",
                format!("displayName must be at most {DISPLAY_NAME_MAX} characters"),
            ));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(FieldError::new(
                "displayName",
                "invalid_characters",
                "displayName must not contain control characters",
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A registered account as seen by its owner and by administrators.
///
/// Serialises as the private profile; use [`PublicProfile`] for everyone else.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub username: Username,
    pub display_name: DisplayName,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub is_shop_owner: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public projection of this account.
    #[must_use]
    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            bio: self.bio.clone(),
            avatar_url: self.avatar_url.clone(),
            is_shop_owner: self.is_shop_owner,
            created_at: self.created_at,
        }
    }

    /// Compact author block embedded in feed items.
    #[must_use]
    pub fn author_summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }

    /// Apply a validated profile patch.
    pub fn apply(&mut self, patch: ProfilePatch, at: DateTime<Utc>) {
        if let Some(display_name) = patch.display_name {
            self.display_name = display_name;
        }
        if let Some(bio) = patch.bio {
            self.bio = bio;
        }
        if let Some(avatar_url) = patch.avatar_url {
            self.avatar_url = avatar_url;
        }
        self.updated_at = at;
    }
}

/// Profile fields visible to any caller.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: UserId,
    pub username: Username,
    pub display_name: DisplayName,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_shop_owner: bool,
    pub created_at: DateTime<Utc>,
}

/// Author block attached to posts, comments and replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: UserId,
    pub username: Username,
    pub display_name: DisplayName,
    pub avatar_url: Option<String>,
}

/// Validated profile update.
///
/// Outer `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub display_name: Option<DisplayName>,
    pub bio: Option<Option<String>>,
    pub avatar_url: Option<Option<String>>,
}

impl ProfilePatch {
    /// Validate raw update fields. Empty strings clear optional fields.
    pub fn try_from_parts(
        display_name: Option<&str>,
        bio: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            display_name: display_name.map(DisplayName::parse).transpose()?,
            bio: bio
                .map(|value| optional_text("bio", Some(value), BIO_MAX))
                .transpose()?,
            avatar_url: avatar_url
                .map(|value| optional_url("avatarUrl", Some(value)))
                .transpose()?,
        })
    }
}

/// Account row plus the stored password hash, used only for login.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("  ADA@Example.com  ", true)]
    #[case("ada.example.com", false)]
    #[case("@example.com", false)]
    #[case("ada@", false)]
    #[case("a@b@c", false)]
    #[case("ada @example.com", false)]
    fn email_rules(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(Email::parse(raw).is_ok(), valid);
    }

    #[rstest]
    #[case("ada", true)]
    #[case("ada_lovelace_1815", true)]
    #[case("ab", false)]
    #[case("ada lovelace", false)]
    #[case("ada-l", false)]
    #[case("a_very_long_username_that_exceeds", false)]
    fn username_rules(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(Username::parse(raw).is_ok(), valid);
    }

    #[rstest]
    fn display_name_rejects_control_characters() {
        let err = DisplayName::parse("Ada\u{0007}").expect_err("control char");
        assert_eq!(err.code(), "invalid_characters");
    }

    #[rstest]
    fn profile_patch_blank_bio_clears() {
        let patch = ProfilePatch::try_from_parts(None, Some(""), None).expect("valid patch");
        assert_eq!(patch.bio, Some(None));
        assert_eq!(patch.avatar_url, None);
    }

    #[rstest]
    fn profile_patch_rejects_bad_avatar() {
        let err = ProfilePatch::try_from_parts(None, None, Some("javascript:alert(1)"))
            .expect_err("bad url");
        assert_eq!(err.field(), "avatarUrl");
    }
}
