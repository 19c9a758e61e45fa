//! Raw `SESSION_*` value parsing and the debug/release fallback policy.

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SessionConfigError};

pub(super) const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
pub(super) const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Outcome of reading one toggle from the environment.
pub(super) enum Toggle<T> {
    Set(T),
    Unset,
    Invalid(String),
}

impl<T> Toggle<T> {
    fn read<E: Env>(env: &E, name: &str, parse: impl FnOnce(&str) -> Option<T>) -> Self {
        match env.string(name) {
            None => Self::Unset,
            Some(raw) => match parse(&raw) {
                Some(value) => Self::Set(value),
                None => Self::Invalid(raw),
            },
        }
    }

    /// Apply the build-mode policy: debug builds warn and use `fallback`,
    /// release builds reject absent or unparsable values.
    pub(super) fn resolve(
        self,
        name: &'static str,
        expected: &'static str,
        mode: BuildMode,
        fallback: T,
    ) -> Result<T, SessionConfigError> {
        let error = match self {
            Self::Set(value) => return Ok(value),
            Self::Unset => SessionConfigError::MissingEnv { name },
            Self::Invalid(value) => SessionConfigError::InvalidEnv {
                name,
                value,
                expected,
            },
        };
        if mode == BuildMode::Release {
            return Err(error);
        }
        warn!(%error, "using development default");
        Ok(fallback)
    }
}

pub(super) fn read_bool<E: Env>(env: &E, name: &str) -> Toggle<bool> {
    Toggle::read(env, name, parse_bool)
}

pub(super) fn read_same_site<E: Env>(env: &E, name: &str) -> Toggle<SameSite> {
    Toggle::read(env, name, parse_same_site)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_same_site(raw: &str) -> Option<SameSite> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}
