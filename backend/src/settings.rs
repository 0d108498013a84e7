//! Environment-driven server settings.
//!
//! Every variable is read through [`mockable::Env`] so parsing can be tested
//! without touching the process environment. Debug builds fall back to
//! development defaults with a warning; release builds reject missing or
//! invalid values.

mod fingerprint;
mod parsing;

use std::net::SocketAddr;
use std::path::PathBuf;

use mockable::Env;
use rand::RngCore;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::Email;
use crate::middleware::cors::AllowedOrigins;

pub use fingerprint::secret_fingerprint;
use parsing::{debug_warn_or_error, parse_number_env};

pub(crate) const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub(crate) const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub(crate) const JWT_TTL_ENV: &str = "JWT_TTL_SECONDS";
pub(crate) const ALLOWED_ORIGINS_ENV: &str = "ALLOWED_ORIGINS";
pub(crate) const UPLOAD_DIR_ENV: &str = "UPLOAD_DIR";
pub(crate) const UPLOAD_MAX_BYTES_ENV: &str = "UPLOAD_MAX_BYTES";
pub(crate) const BIND_ADDR_ENV: &str = "BIND_ADDR";
pub(crate) const BOOTSTRAP_ADMIN_ENV: &str = "BOOTSTRAP_ADMIN_EMAIL";
pub(crate) const DB_POOL_MAX_SIZE_ENV: &str = "DB_POOL_MAX_SIZE";

/// Minimum HMAC secret length accepted in release builds.
pub const JWT_SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 64;
const DEFAULT_JWT_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;
/// Longest accepted token lifetime: ten years.
pub const MAX_JWT_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:8081,http://localhost:19006";
const DEFAULT_UPLOAD_DIR: &str = "./uploads";
const DEFAULT_UPLOAD_MAX_BYTES: u64 = 5 * 1024 * 1024;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_POOL_MAX_SIZE: u32 = 10;

/// Build mode for settings validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing values.
    Debug,
    /// Release builds require explicit, valid values.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pawprint::settings::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// HMAC signing secret, wiped from memory on drop.
pub struct JwtSecret(Zeroizing<Vec<u8>>);

impl JwtSecret {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn ephemeral() -> Self {
        let mut bytes = vec![0_u8; EPHEMERAL_SECRET_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(Zeroizing::new(bytes))
    }
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("JwtSecret")
            .field(&secret_fingerprint(self.as_bytes()))
            .finish()
    }
}

/// Validated settings for one server process.
#[derive(Debug)]
pub struct Settings {
    /// PostgreSQL URL; `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: JwtSecret,
    pub jwt_ttl: chrono::Duration,
    pub allowed_origins: AllowedOrigins,
    pub upload_dir: PathBuf,
    pub upload_max_bytes: u64,
    pub bind_addr: SocketAddr,
    /// Account promoted to admin when it registers.
    pub bootstrap_admin: Option<Email>,
    pub db_pool_max_size: u32,
}

/// Errors raised while validating settings.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The JWT secret is too short for release builds.
    #[error("JWT_SECRET too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
}

/// Build settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use pawprint::settings::{BuildMode, settings_from_env};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "DATABASE_URL" => Some("postgres://localhost/pawprint".to_owned()),
///     "JWT_SECRET" => Some("x".repeat(32)),
///     "ALLOWED_ORIGINS" => Some("https://pawprint.app".to_owned()),
///     _ => None,
/// });
///
/// let settings = settings_from_env(&env, BuildMode::Release)?;
/// assert_eq!(settings.upload_max_bytes, 5 * 1024 * 1024);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`SettingsError`] for release builds with missing or invalid
/// values, and for malformed values that have no safe fallback.
pub fn settings_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Settings, SettingsError> {
    Ok(Settings {
        database_url: database_url_from_env(env, mode)?,
        jwt_secret: jwt_secret_from_env(env, mode)?,
        jwt_ttl: jwt_ttl_from_env(env, mode)?,
        allowed_origins: allowed_origins_from_env(env, mode)?,
        upload_dir: env
            .string(UPLOAD_DIR_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR), PathBuf::from),
        upload_max_bytes: parse_number_env(
            env,
            mode,
            UPLOAD_MAX_BYTES_ENV,
            DEFAULT_UPLOAD_MAX_BYTES,
        )?,
        bind_addr: bind_addr_from_env(env)?,
        bootstrap_admin: bootstrap_admin_from_env(env)?,
        db_pool_max_size: parse_number_env(
            env,
            mode,
            DB_POOL_MAX_SIZE_ENV,
            DEFAULT_DB_POOL_MAX_SIZE,
        )?,
    })
}

fn database_url_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Option<String>, SettingsError> {
    match env.string(DATABASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
        Some(url) => Ok(Some(url)),
        None => debug_warn_or_error(
            mode,
            None,
            SettingsError::MissingEnv {
                name: DATABASE_URL_ENV,
            },
            || warn!("DATABASE_URL not set; using the in-memory store (dev only)"),
        ),
    }
}

fn jwt_secret_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<JwtSecret, SettingsError> {
    let Some(raw) = env.string(JWT_SECRET_ENV).map(Zeroizing::new) else {
        return debug_warn_or_error(
            mode,
            (),
            SettingsError::MissingEnv {
                name: JWT_SECRET_ENV,
            },
            || warn!("JWT_SECRET not set; using an ephemeral secret (dev only)"),
        )
        .map(|()| JwtSecret::ephemeral());
    };
    let length = raw.len();
    if length < JWT_SECRET_MIN_LEN {
        return debug_warn_or_error(
            mode,
            (),
            SettingsError::SecretTooShort {
                length,
                min_len: JWT_SECRET_MIN_LEN,
            },
            || warn!(length, "JWT_SECRET shorter than recommended (dev only)"),
        )
        .map(|()| JwtSecret(Zeroizing::new(raw.as_bytes().to_vec())));
    }
    Ok(JwtSecret(Zeroizing::new(raw.as_bytes().to_vec())))
}

fn jwt_ttl_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<chrono::Duration, SettingsError> {
    let seconds: u64 = parse_number_env(env, mode, JWT_TTL_ENV, DEFAULT_JWT_TTL_SECONDS)?;
    if seconds == 0 || seconds > MAX_JWT_TTL_SECONDS {
        return Err(SettingsError::InvalidEnv {
            name: JWT_TTL_ENV,
            value: seconds.to_string(),
            expected: "between 1 second and 10 years",
        });
    }
    i64::try_from(seconds)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .ok_or_else(|| SettingsError::InvalidEnv {
            name: JWT_TTL_ENV,
            value: seconds.to_string(),
            expected: "a representable number of seconds",
        })
}

fn allowed_origins_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<AllowedOrigins, SettingsError> {
    let raw = match env.string(ALLOWED_ORIGINS_ENV) {
        Some(raw) => raw,
        None => debug_warn_or_error(
            mode,
            DEFAULT_ALLOWED_ORIGINS.to_owned(),
            SettingsError::MissingEnv {
                name: ALLOWED_ORIGINS_ENV,
            },
            || warn!("ALLOWED_ORIGINS not set; allowing local Expo origins"),
        )?,
    };
    AllowedOrigins::parse(&raw).map_err(|_| SettingsError::InvalidEnv {
        name: ALLOWED_ORIGINS_ENV,
        value: raw,
        expected: "comma-separated scheme://host[:port] origins or *",
    })
}

fn bind_addr_from_env<E: Env>(env: &E) -> Result<SocketAddr, SettingsError> {
    let raw = env
        .string(BIND_ADDR_ENV)
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
    raw.parse().map_err(|_| SettingsError::InvalidEnv {
        name: BIND_ADDR_ENV,
        value: raw,
        expected: "host:port",
    })
}

fn bootstrap_admin_from_env<E: Env>(env: &E) -> Result<Option<Email>, SettingsError> {
    env.string(BOOTSTRAP_ADMIN_ENV)
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            Email::parse(&raw).map_err(|_| SettingsError::InvalidEnv {
                name: BOOTSTRAP_ADMIN_ENV,
                value: raw,
                expected: "an email address",
            })
        })
        .transpose()
}
