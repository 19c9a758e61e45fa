//! Typed access to the session bag.
//!
//! Only [`SessionContext`] reads or writes session values, and only the
//! `userName` entry, so handlers never see untyped session state.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Username};

pub(crate) const USERNAME_KEY: &str = "userName";

/// Message returned whenever a protected route is hit without a login.
pub const LOGIN_REQUIRED_MESSAGE: &str = "please login";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap the request's session bag.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind `username` to the session under a freshly issued key.
    ///
    /// Renewal prevents a pre-login session key from being reused after
    /// authentication.
    pub fn persist_username(&self, username: &Username) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USERNAME_KEY, username.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the username bound to this session, if any.
    ///
    /// A stored value that no longer satisfies [`Username`] validation is
    /// treated as absent.
    pub fn username(&self) -> Result<Option<Username>, Error> {
        let raw = self
            .0
            .get::<String>(USERNAME_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|value| match Username::new(&value) {
            Ok(username) => Some(username),
            Err(error) => {
                warn!(%error, "invalid username in session state");
                None
            }
        }))
    }

    /// Require a bound username or fail with `403 Forbidden`.
    pub fn require_username(&self) -> Result<Username, Error> {
        self.username()?
            .ok_or_else(|| Error::forbidden(LOGIN_REQUIRED_MESSAGE))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
