//! Shop applications, approved shops and their promotional posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{FieldError, optional_text, optional_url, required_text};
use super::{ApplicationId, PromotionId, ShopId, UserId};

const SHOP_NAME_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 1000;
const ADDRESS_MAX: usize = 200;
const PHONE_MAX: usize = 30;
const REVIEW_NOTE_MAX: usize = 500;
const PROMOTION_TITLE_MAX: usize = 100;
const PROMOTION_CONTENT_MAX: usize = 2000;

/// Review state of a shop application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Storage spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parse the storage spelling.
    #[must_use]
    pub fn from_storage(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Shop details shared by applications and shops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShopDetails {
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl ShopDetails {
    /// Validate optional contact fields.
    pub fn try_from_parts(
        description: Option<&str>,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            description: optional_text("description", description, DESCRIPTION_MAX)?,
            address: optional_text("address", address, ADDRESS_MAX)?,
            phone: optional_text("phone", phone, PHONE_MAX)?,
        })
    }
}

/// A user's request to open a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShopApplication {
    pub id: ApplicationId,
    pub applicant_id: UserId,
    pub shop_name: String,
    #[serde(flatten)]
    pub details: ShopDetails,
    pub status: ApplicationStatus,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl ShopApplication {
    /// Build the shop this application asks for.
    #[must_use]
    pub fn to_shop(&self, at: DateTime<Utc>) -> Shop {
        Shop {
            id: ShopId::random(),
            owner_id: self.applicant_id,
            name: self.shop_name.clone(),
            details: self.details.clone(),
            logo_url: None,
            created_at: at,
            updated_at: at,
        }
    }

    /// Whether the application still awaits review.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == ApplicationStatus::Pending
    }
}

/// Validated fields for a new application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopApplicationDraft {
    pub shop_name: String,
    pub details: ShopDetails,
}

impl ShopApplicationDraft {
    /// Validate raw application fields.
    pub fn try_from_parts(
        shop_name: &str,
        description: Option<&str>,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            shop_name: required_text("shopName", shop_name, SHOP_NAME_MAX)?,
            details: ShopDetails::try_from_parts(description, address, phone)?,
        })
    }

    /// Materialise a pending application for `applicant_id`.
    #[must_use]
    pub fn into_application(self, applicant_id: UserId, at: DateTime<Utc>) -> ShopApplication {
        ShopApplication {
            id: ApplicationId::random(),
            applicant_id,
            shop_name: self.shop_name,
            details: self.details,
            status: ApplicationStatus::Pending,
            review_note: None,
            created_at: at,
            reviewed_at: None,
        }
    }
}

/// Validate an optional reviewer note.
pub fn review_note(note: Option<&str>) -> Result<Option<String>, FieldError> {
    optional_text("note", note, REVIEW_NOTE_MAX)
}

/// An approved shop; each user owns at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: ShopId,
    pub owner_id: UserId,
    pub name: String,
    #[serde(flatten)]
    pub details: ShopDetails,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated shop update. Outer `None` keeps the current value; empty strings
/// clear optional fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub logo_url: Option<Option<String>>,
}

/// Raw shop update as submitted by a client.
#[derive(Debug, Clone, Default)]
pub struct ShopPatchInput<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub address: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub logo_url: Option<&'a str>,
}

impl ShopPatch {
    /// Validate a raw patch.
    pub fn try_new(input: ShopPatchInput<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            name: input
                .name
                .map(|value| required_text("name", value, SHOP_NAME_MAX))
                .transpose()?,
            description: input
                .description
                .map(|value| optional_text("description", Some(value), DESCRIPTION_MAX))
                .transpose()?,
            address: input
                .address
                .map(|value| optional_text("address", Some(value), ADDRESS_MAX))
                .transpose()?,
            phone: input
                .phone
                .map(|value| optional_text("phone", Some(value), PHONE_MAX))
                .transpose()?,
            logo_url: input
                .logo_url
                .map(|value| optional_url("logoUrl", Some(value)))
                .transpose()?,
        })
    }
}

impl Shop {
    /// Apply a validated patch.
    pub fn apply(&mut self, patch: ShopPatch, at: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.details.description = description;
        }
        if let Some(address) = patch.address {
            self.details.address = address;
        }
        if let Some(phone) = patch.phone {
            self.details.phone = phone;
        }
        if let Some(logo_url) = patch.logo_url {
            self.logo_url = logo_url;
        }
        self.updated_at = at;
    }
}

/// A promotion published by a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionalPost {
    pub id: PromotionId,
    pub shop_id: ShopId,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated fields for a new promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionDraft {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

impl PromotionDraft {
    /// Validate raw promotion fields.
    pub fn try_from_parts(
        title: &str,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            title: required_text("title", title, PROMOTION_TITLE_MAX)?,
            content: required_text("content", content, PROMOTION_CONTENT_MAX)?,
            image_url: optional_url("imageUrl", image_url)?,
        })
    }

    /// Materialise the promotion for `shop_id`.
    #[must_use]
    pub fn into_promotion(self, shop_id: ShopId, at: DateTime<Utc>) -> PromotionalPost {
        PromotionalPost {
            id: PromotionId::random(),
            shop_id,
            title: self.title,
            content: self.content,
            image_url: self.image_url,
            created_at: at,
        }
    }
}
