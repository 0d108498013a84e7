//! Authorisation checks shared by the domain services.
//!
//! Decisions use the account row loaded for the request, never token
//! claims.

use serde_json::json;
use tracing::warn;

use super::{Error, User, UserId};

/// Fail with `forbidden` unless `actor` is an administrator.
pub(crate) fn require_admin(actor: &User) -> Result<(), Error> {
    if actor.is_admin {
        Ok(())
    } else {
        warn!(user_id = %actor.id, "admin access denied");
        Err(Error::forbidden("admin access required"))
    }
}

/// Fail with `forbidden` unless `actor` owns the resource.
pub(crate) fn require_owner(actor: &User, owner: &UserId, resource: &str) -> Result<(), Error> {
    if actor.id == *owner {
        Ok(())
    } else {
        warn!(user_id = %actor.id, resource, "owner access denied");
        Err(Error::forbidden(format!("only the owner can modify this {resource}")))
    }
}

/// Fail with `forbidden` unless `actor` owns the resource or is an admin.
pub(crate) fn require_owner_or_admin(
    actor: &User,
    owner: &UserId,
    resource: &str,
) -> Result<(), Error> {
    if actor.is_admin {
        return Ok(());
    }
    require_owner(actor, owner, resource)
}

/// Attach a machine-readable reason to an error.
pub(crate) fn with_reason(error: Error, reason: &str) -> Error {
    error.with_details(json!({ "code": reason }))
}
