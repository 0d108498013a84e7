//! Environment parsing helpers shared by the settings loaders.

use std::str::FromStr;

use mockable::Env;
use tracing::warn;

use super::{BuildMode, SettingsError};

const NUMBER_EXPECTED: &str = "a non-negative integer";

/// Parse a numeric variable, falling back to `default` when it is unset.
///
/// Malformed values warn and fall back in debug builds and fail in release
/// builds.
pub(super) fn parse_number_env<E, T>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: T,
) -> Result<T, SettingsError>
where
    E: Env,
    T: FromStr + Copy + std::fmt::Display,
{
    let Some(value) = env.string(name) else {
        return Ok(default);
    };
    match value.trim().parse::<T>() {
        Ok(parsed) => Ok(parsed),
        Err(_) => debug_warn_or_error(
            mode,
            default,
            SettingsError::InvalidEnv {
                name,
                value: value.clone(),
                expected: NUMBER_EXPECTED,
            },
            || warn!(value = %value, %default, "invalid {name}; using default"),
        ),
    }
}

pub(super) fn debug_warn_or_error<T, F>(
    mode: BuildMode,
    fallback: T,
    error: SettingsError,
    warn_fn: F,
) -> Result<T, SettingsError>
where
    F: FnOnce(),
{
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}
