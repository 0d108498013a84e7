//! Cross-origin request handling for browser and Expo web clients.
//!
//! Preflights from allowed origins are answered here without reaching a
//! handler; preflights from anywhere else get a JSON `403`. Actual requests
//! always reach the handler and only gain CORS headers when their origin is
//! allowed.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderMap, HeaderValue};
use actix_web::http::Method;
use actix_web::{Error, HttpResponse, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;
use url::Url;

use crate::domain::Error as ApiError;

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Authorization, Content-Type";
const MAX_AGE_SECONDS: &str = "3600";

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// `*`: any origin.
    Any,
    /// Exact `scheme://host[:port]` origins.
    List(Vec<String>),
}

/// Rejected `ALLOWED_ORIGINS` entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid origin '{origin}': expected scheme://host[:port]")]
pub struct InvalidOrigin {
    pub origin: String,
}

impl AllowedOrigins {
    /// Parse a comma-separated origin list. Blank entries are skipped.
    ///
    /// # Examples
    /// ```
    /// use pawprint::middleware::cors::AllowedOrigins;
    ///
    /// let origins = AllowedOrigins::parse("http://localhost:8081, https://pawprint.app")
    ///     .expect("valid origins");
    /// assert!(origins.allows("https://pawprint.app"));
    /// assert!(!origins.allows("https://evil.example"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`InvalidOrigin`] for entries carrying a path, query or
    /// unsupported scheme.
    pub fn parse(raw: &str) -> Result<Self, InvalidOrigin> {
        let entries: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect();
        if entries.contains(&"*") {
            return Ok(Self::Any);
        }
        entries
            .into_iter()
            .map(normalise_origin)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::List)
    }

    /// Whether `origin` may make cross-origin calls.
    #[must_use]
    pub fn allows(&self, origin: &str) -> bool {
        match self {
            Self::Any => true,
            Self::List(origins) => origins.iter().any(|allowed| allowed == origin),
        }
    }
}

fn normalise_origin(entry: &str) -> Result<String, InvalidOrigin> {
    let invalid = || InvalidOrigin {
        origin: entry.to_owned(),
    };
    let url = Url::parse(entry).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    let origin = url.origin().ascii_serialization();
    if entry.trim_end_matches('/') != origin {
        return Err(invalid());
    }
    Ok(origin)
}

/// CORS middleware.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use pawprint::middleware::cors::{AllowedOrigins, Cors};
///
/// let app = App::new().wrap(Cors::new(AllowedOrigins::Any));
/// ```
#[derive(Clone)]
pub struct Cors {
    origins: Rc<AllowedOrigins>,
}

impl Cors {
    #[must_use]
    pub fn new(origins: AllowedOrigins) -> Self {
        Self {
            origins: Rc::new(origins),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Cors
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsMiddleware {
            service,
            origins: Rc::clone(&self.origins),
        }))
    }
}

/// Service wrapper produced by [`Cors`].
pub struct CorsMiddleware<S> {
    service: S,
    origins: Rc<AllowedOrigins>,
}

fn request_origin(req: &ServiceRequest) -> Option<HeaderValue> {
    req.headers().get(header::ORIGIN).cloned()
}

fn is_preflight(req: &ServiceRequest) -> bool {
    req.method() == Method::OPTIONS
        && req
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

fn allow_origin(headers: &mut HeaderMap, origin: HeaderValue) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
}

fn preflight_response(origin: HeaderValue) -> HttpResponse {
    let mut response = HttpResponse::NoContent()
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
        .insert_header((header::ACCESS_CONTROL_MAX_AGE, MAX_AGE_SECONDS))
        .finish();
    allow_origin(response.headers_mut(), origin);
    response
}

impl<S, B> Service<ServiceRequest> for CorsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(origin) = request_origin(&req) else {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        };
        let allowed = origin
            .to_str()
            .is_ok_and(|value| self.origins.allows(value));

        if is_preflight(&req) {
            let response = if allowed {
                preflight_response(origin)
            } else {
                debug!(origin = ?origin, "preflight from disallowed origin");
                ApiError::forbidden("origin not allowed").error_response()
            };
            let res = req.into_response(response).map_into_right_body();
            return Box::pin(async move { Ok(res) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            if allowed {
                allow_origin(res.headers_mut(), origin);
            }
            Ok(res.map_into_left_body())
        })
    }
}
