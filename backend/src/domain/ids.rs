//! Strongly typed entity identifiers.
//!
//! Every aggregate is keyed by a UUID v4. Wrapping each key in its own type
//! keeps a `PetId` from being passed where a `PostId` is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        #[schema(value_type = String, format = Uuid)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(
    /// Identifier of a registered user.
    UserId
);
define_id!(
    /// Identifier of a pet profile.
    PetId
);
define_id!(
    /// Identifier of a feed post.
    PostId
);
define_id!(
    /// Identifier of a comment on a post.
    CommentId
);
define_id!(
    /// Identifier of a reply to a comment.
    ReplyId
);
define_id!(
    /// Identifier of an approved shop.
    ShopId
);
define_id!(
    /// Identifier of a shop application.
    ApplicationId
);
define_id!(
    /// Identifier of a promotional post.
    PromotionId
);
define_id!(
    /// Identifier of a care task.
    TaskId
);
define_id!(
    /// Identifier of a medical or vaccination record.
    RecordId
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn ids_serialise_as_bare_uuid_strings() {
        let uuid = Uuid::nil();
        let value = serde_json::to_value(PetId::from_uuid(uuid)).expect("serialise id");
        assert_eq!(value, serde_json::json!("00000000-0000-0000-0000-000000000000"));
    }

    #[rstest]
    fn ids_parse_from_strings() {
        let id: UserId = "3fa85f64-5717-4562-b3fc-2c963f66afa6"
            .parse()
            .expect("valid uuid");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    fn random_ids_differ() {
        assert_ne!(PostId::random(), PostId::random());
    }
}
