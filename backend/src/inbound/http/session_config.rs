//! Session cookie configuration read from `SESSION_*` environment variables.
//!
//! Debug builds fall back to permissive defaults with a warning. Release
//! builds insist on every toggle being present and valid, and refuse
//! ephemeral keys.

use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::{info, warn};
use zeroize::Zeroizing;

mod parsing;

use parsing::{BOOL_EXPECTED, SAMESITE_EXPECTED, read_bool, read_same_site};

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
// `Key::derive_from` panics below this length.
const SESSION_KEY_DERIVE_MIN_LEN: usize = 32;
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerate defaults and warn about missing toggles.
    Debug,
    /// Require explicit, valid toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn default_same_site(self) -> SameSite {
        match self {
            Self::Debug => SameSite::Lax,
            Self::Release => SameSite::Strict,
        }
    }
}

/// Validated session cookie settings.
pub struct SessionSettings {
    /// Key encrypting the session cookie.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A variable that release builds require was not set.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// A variable held an unrecognised value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Value as found.
        value: String,
        /// Accepted spellings.
        expected: &'static str,
    },
    /// The key file could not be read.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        /// Key file location.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The key file holds fewer bytes than required.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        /// Key file location.
        path: PathBuf,
        /// Bytes found.
        length: usize,
        /// Bytes required.
        min_len: usize,
    },
    /// Browsers drop `SameSite=None` cookies that are not `Secure`.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Release builds must load a persistent key.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build session settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use cities_backend::inbound::http::session_config::{
///     session_settings_from_env, BuildMode,
/// };
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_KEY_FILE" => Some("/nonexistent/session_key".to_owned()),
///     _ => None,
/// });
///
/// // Debug builds tolerate a missing key file with an ephemeral key.
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure =
        read_bool(env, COOKIE_SECURE_ENV).resolve(COOKIE_SECURE_ENV, BOOL_EXPECTED, mode, true)?;
    let same_site = read_same_site(env, SAMESITE_ENV).resolve(
        SAMESITE_ENV,
        SAMESITE_EXPECTED,
        mode,
        mode.default_same_site(),
    )?;
    if same_site == SameSite::None && !cookie_secure {
        if mode == BuildMode::Release {
            return Err(SessionConfigError::InsecureSameSiteNone);
        }
        warn!("SameSite=None without Secure; browsers may drop the session cookie");
    }

    let allow_ephemeral = read_bool(env, ALLOW_EPHEMERAL_ENV).resolve(
        ALLOW_EPHEMERAL_ENV,
        BOOL_EXPECTED,
        mode,
        false,
    )?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }

    let path = env
        .string(KEY_FILE_ENV)
        .map_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH), PathBuf::from);
    let key = load_key(&path, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn load_key(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => Zeroizing::new(bytes),
        Err(source) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %source,
                "session key unreadable; generating a temporary one"
            );
            return Ok(Key::generate());
        }
        Err(source) => {
            return Err(SessionConfigError::KeyRead {
                path: path.to_owned(),
                source,
            });
        }
    };

    let length = bytes.len();
    if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
        return Err(SessionConfigError::KeyTooShort {
            path: path.to_owned(),
            length,
            min_len: SESSION_KEY_MIN_LEN,
        });
    }
    if length < SESSION_KEY_DERIVE_MIN_LEN {
        warn!(
            path = %path.display(),
            length,
            "session key too short to derive from; generating a temporary one"
        );
        return Ok(Key::generate());
    }
    info!(path = %path.display(), "session key loaded");
    Ok(Key::derive_from(&bytes))
}
