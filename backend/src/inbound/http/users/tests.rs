//! Tests for account API handlers.

use super::*;
use crate::domain::ports::{MockCityQuery, MockLoginService, MockSignupService};
use crate::domain::{ErrorCode, INVALID_CREDENTIALS_MESSAGE};
use crate::inbound::http::auth_gate::RequireLogin;
use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug)]
struct ValidationExpectation<'a> {
    message: &'a str,
    field: &'a str,
    code: &'a str,
}

fn state(login_service: MockLoginService, signup_service: MockSignupService) -> HttpState {
    HttpState::new(
        Arc::new(login_service),
        Arc::new(signup_service),
        Arc::new(MockCityQuery::new()),
    )
}

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(signup)
        .service(login)
        .service(web::scope("").wrap(RequireLogin).service(whoami))
}

fn credentials(username: &str, password: &str) -> CredentialsRequest {
    CredentialsRequest {
        username: username.into(),
        password: password.into(),
    }
}

fn accepting_login(expected: &'static str) -> MockLoginService {
    let mut login_service = MockLoginService::new();
    login_service
        .expect_log_in()
        .withf(move |creds| creds.username().as_ref() == expected)
        .returning(|creds| Ok(creds.username().clone()));
    login_service
}

async fn error_body(
    response: actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("error payload")
}

#[rstest]
#[case(
    "   ",
    "password",
    ValidationExpectation {
        message: "username must not be empty",
        field: "username",
        code: "empty_username",
    }
)]
#[case(
    "alice",
    "",
    ValidationExpectation {
        message: "password must not be empty",
        field: "password",
        code: "empty_password",
    }
)]
#[actix_web::test]
async fn signup_and_login_reject_blank_fields(
    #[case] username: &str,
    #[case] password: &str,
    #[case] expected: ValidationExpectation<'_>,
    #[values("/signup", "/login")] uri: &str,
) {
    // No expectations: the services must not be reached.
    let app = actix_test::init_service(test_app(state(
        MockLoginService::new(),
        MockSignupService::new(),
    )))
    .await;

    let request = actix_test::TestRequest::post()
        .uri(uri)
        .set_json(credentials(username, password))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = error_body(response).await;
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some(expected.message)
    );
    assert_eq!(
        value.get("code").and_then(Value::as_str),
        Some("invalid_request")
    );
    let details = value
        .get("details")
        .and_then(|v| v.as_object())
        .expect("details present");
    assert_eq!(
        details.get("field").and_then(Value::as_str),
        Some(expected.field)
    );
    assert_eq!(
        details.get("code").and_then(Value::as_str),
        Some(expected.code)
    );
}

#[actix_web::test]
async fn signup_returns_created_with_empty_body() {
    let mut signup_service = MockSignupService::new();
    signup_service
        .expect_sign_up()
        .withf(|creds| creds.username().as_ref() == "alice" && creds.password() == "pw1")
        .times(1)
        .returning(|_| Ok(()));
    let app =
        actix_test::init_service(test_app(state(MockLoginService::new(), signup_service))).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/signup")
            .set_json(credentials("alice", "pw1"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(session_cookie(&response).is_none());
    assert!(actix_test::read_body(response).await.is_empty());
}

#[actix_web::test]
async fn signup_conflict_is_reported() {
    let mut signup_service = MockSignupService::new();
    signup_service
        .expect_sign_up()
        .returning(|_| Err(Error::conflict("username already taken")));
    let app =
        actix_test::init_service(test_app(state(MockLoginService::new(), signup_service))).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/signup")
            .set_json(credentials("alice", "pw2"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let value = error_body(response).await;
    assert_eq!(value.get("code").and_then(Value::as_str), Some("conflict"));
}

#[actix_web::test]
async fn signup_internal_failure_is_redacted() {
    let mut signup_service = MockSignupService::new();
    signup_service
        .expect_sign_up()
        .returning(|_| Err(Error::internal("credential store unavailable: refused")));
    let app =
        actix_test::init_service(test_app(state(MockLoginService::new(), signup_service))).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/signup")
            .set_json(credentials("alice", "pw1"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let value = error_body(response).await;
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some("Internal server error")
    );
}

#[actix_web::test]
async fn login_rejects_wrong_credentials_with_forbidden_status() {
    let mut login_service = MockLoginService::new();
    login_service
        .expect_log_in()
        .returning(|_| Err(Error::forbidden(INVALID_CREDENTIALS_MESSAGE)));
    let app =
        actix_test::init_service(test_app(state(login_service, MockSignupService::new()))).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/login")
            .set_json(credentials("alice", "wrong"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(session_cookie(&response).is_none());
    let value = error_body(response).await;
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some(INVALID_CREDENTIALS_MESSAGE)
    );
    assert_eq!(value.get("code").and_then(Value::as_str), Some("forbidden"));
}

#[actix_web::test]
async fn login_sets_session_cookie_and_whoami_echoes_username() {
    let app = actix_test::init_service(test_app(state(
        accepting_login("alice"),
        MockSignupService::new(),
    )))
    .await;

    let login_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/login")
            .set_json(credentials(" alice ", "pw1"))
            .to_request(),
    )
    .await;
    assert_eq!(login_res.status(), StatusCode::OK);
    let cookie = session_cookie(&login_res).expect("session cookie");
    assert_eq!(cookie.http_only(), Some(true));

    let whoami_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/whoami")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(whoami_res.status(), StatusCode::OK);
    let value: Value = actix_test::read_body_json(whoami_res).await;
    assert_eq!(value, serde_json::json!({ "username": "alice" }));
}

#[actix_web::test]
async fn whoami_requires_login() {
    let app = actix_test::init_service(test_app(state(
        MockLoginService::new(),
        MockSignupService::new(),
    )))
    .await;

    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/whoami").to_request())
            .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let value = error_body(response).await;
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some("please login")
    );
}

#[rstest]
fn validation_errors_carry_field_details() {
    let err = map_credentials_validation_error(CredentialsValidationError::EmptyPassword);

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details()
            .and_then(|d| d.get("field"))
            .and_then(Value::as_str),
        Some("password")
    );
}
