//! Translation of driven port failures into API errors.
//!
//! Connection failures surface as `service_unavailable`, constraint
//! violations as `conflict`, and everything else as a redacted
//! `internal_error`.

use serde_json::json;
use tracing::error;

use super::Error;
use super::ports::{
    CredentialHashError, HealthRecordRepositoryError, PetRepositoryError, PostRepositoryError,
    ShopRepositoryError, TaskRepositoryError, UploadStoreError, UserRepositoryError,
};

macro_rules! map_basic_repository_error {
    ($error:ident, $label:literal) => {
        impl From<$error> for Error {
            fn from(error: $error) -> Self {
                match error {
                    $error::Connection { message } => Error::service_unavailable(format!(
                        concat!($label, " repository unavailable: {}"),
                        message
                    )),
                    $error::Query { message } => Error::internal(format!(
                        concat!($label, " repository error: {}"),
                        message
                    )),
                }
            }
        }
    };
}

map_basic_repository_error!(PetRepositoryError, "pet");
map_basic_repository_error!(HealthRecordRepositoryError, "health record");
map_basic_repository_error!(PostRepositoryError, "post");
map_basic_repository_error!(TaskRepositoryError, "task");

impl From<UserRepositoryError> for Error {
    fn from(error: UserRepositoryError) -> Self {
        match error {
            UserRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Self::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::Duplicate { field } => {
                Self::conflict(format!("{field} is already registered"))
                    .with_details(json!({ "field": field, "code": "duplicate" }))
            }
        }
    }
}

impl From<ShopRepositoryError> for Error {
    fn from(error: ShopRepositoryError) -> Self {
        match error {
            ShopRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("shop repository unavailable: {message}"))
            }
            ShopRepositoryError::Query { message } => {
                Self::internal(format!("shop repository error: {message}"))
            }
            ShopRepositoryError::Conflict { message } => Self::conflict(message),
        }
    }
}

impl From<CredentialHashError> for Error {
    fn from(error: CredentialHashError) -> Self {
        error!(%error, "password hashing failed");
        Self::internal(error.to_string())
    }
}

impl From<UploadStoreError> for Error {
    fn from(error: UploadStoreError) -> Self {
        error!(%error, "upload storage failed");
        Self::internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(PetRepositoryError::connection("refused").into(), ErrorCode::ServiceUnavailable)]
    #[case(PostRepositoryError::query("syntax").into(), ErrorCode::InternalError)]
    #[case(UserRepositoryError::duplicate("email").into(), ErrorCode::Conflict)]
    #[case(ShopRepositoryError::conflict("pending").into(), ErrorCode::Conflict)]
    #[case(UploadStoreError::io("disk full").into(), ErrorCode::InternalError)]
    fn repository_errors_map_to_api_codes(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[test]
    fn duplicate_user_names_the_field() {
        let error: Error = UserRepositoryError::duplicate("username").into();
        assert_eq!(
            error.details(),
            Some(&json!({ "field": "username", "code": "duplicate" }))
        );
    }
}
