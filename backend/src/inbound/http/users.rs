//! Account API handlers.
//!
//! ```text
//! POST /signup {"username":"alice","password":"pw1"}
//! POST /login {"username":"alice","password":"pw1"}
//! GET /whoami
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{CredentialsValidationError, Error, LoginCredentials, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth_gate::AuthenticatedUser;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Credentials body shared by `POST /signup` and `POST /login`.
///
/// Example JSON:
/// `{"username":"alice","password":"pw1"}`
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    /// Account name; surrounding whitespace is ignored.
    #[schema(example = "alice")]
    pub username: String,
    /// Plaintext password, used exactly as sent.
    #[schema(example = "pw1")]
    pub password: String,
}

impl TryFrom<CredentialsRequest> for LoginCredentials {
    type Error = CredentialsValidationError;

    fn try_from(value: CredentialsRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Identity response for `GET /whoami`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct WhoAmIResponse {
    /// Name the session was established for.
    pub username: Username,
}

pub(crate) fn map_credentials_validation_error(err: CredentialsValidationError) -> Error {
    match err {
        CredentialsValidationError::EmptyUsername => {
            Error::invalid_request("username must not be empty")
                .with_details(json!({ "field": "username", "code": "empty_username" }))
        }
        CredentialsValidationError::EmptyPassword => {
            Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password", "code": "empty_password" }))
        }
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(map_credentials_validation_error)?;
    state.signup.sign_up(&credentials).await?;
    Ok(HttpResponse::Created().finish())
}

/// Authenticate and establish a session.
///
/// The session key is renewed on success, so any key presented before login
/// stops being valid.
#[utoipa::path(
    post,
    path = "/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(map_credentials_validation_error)?;
    let username = state.login.log_in(&credentials).await?;
    session.persist_username(&username)?;
    info!(username = %username, "session established");
    Ok(HttpResponse::Ok().finish())
}

/// Return the identity bound to the current session.
#[utoipa::path(
    get,
    path = "/whoami",
    responses(
        (status = 200, description = "Current identity", body = WhoAmIResponse),
        (status = 403, description = "Not logged in", body = Error)
    ),
    tags = ["users"],
    operation_id = "whoami",
    security(("SessionCookie" = []))
)]
#[get("/whoami")]
pub async fn whoami(user: AuthenticatedUser) -> web::Json<WhoAmIResponse> {
    web::Json(WhoAmIResponse {
        username: user.into_inner(),
    })
}

#[cfg(test)]
mod tests;
