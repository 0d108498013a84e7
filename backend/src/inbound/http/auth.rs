//! Bearer-token extractors.
//!
//! Handlers take [`CurrentUser`] when a token is mandatory and
//! [`OptionalUser`] when anonymous callers get a reduced view. Both resolve
//! the token through the authentication service, so flags come from the
//! stored account rather than the token claims.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, User};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Borrow the account.
    pub fn user(&self) -> &User {
        &self.0
    }
}

/// The caller when a valid token is presented, `None` for anonymous requests.
///
/// A present but invalid token is still rejected with `401`.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<User>);

impl OptionalUser {
    /// Borrow the account, if any.
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

/// Outcome of reading the `Authorization` header.
#[derive(Debug, PartialEq, Eq)]
enum BearerHeader {
    Absent,
    Malformed,
    Token(String),
}

fn bearer_header(req: &HttpRequest) -> BearerHeader {
    let Some(value) = req.headers().get(AUTHORIZATION) else {
        return BearerHeader::Absent;
    };
    let Ok(value) = value.to_str() else {
        return BearerHeader::Malformed;
    };
    match value.strip_prefix(BEARER_PREFIX).map(str::trim) {
        Some(token) if !token.is_empty() => BearerHeader::Token(token.to_owned()),
        _ => BearerHeader::Malformed,
    }
}

fn http_state(req: &HttpRequest) -> Result<web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))
}

fn missing_bearer() -> Error {
    Error::unauthorized("missing bearer token")
}

async fn resolve(state: web::Data<HttpState>, token: String) -> Result<User, Error> {
    state.auth.authenticate(&token).await
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = bearer_header(req);
        let state = http_state(req);
        Box::pin(async move {
            let token = match header {
                BearerHeader::Token(token) => token,
                BearerHeader::Absent | BearerHeader::Malformed => {
                    debug!("request without a usable bearer token");
                    return Err(missing_bearer());
                }
            };
            resolve(state?, token).await.map(CurrentUser)
        })
    }
}

impl FromRequest for OptionalUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = bearer_header(req);
        let state = http_state(req);
        Box::pin(async move {
            match header {
                BearerHeader::Absent => Ok(OptionalUser(None)),
                BearerHeader::Malformed => Err(missing_bearer()),
                BearerHeader::Token(token) => {
                    resolve(state?, token).await.map(|user| OptionalUser(Some(user)))
                }
            }
        })
    }
}
