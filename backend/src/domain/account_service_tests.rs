//! Tests for the account service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockCredentialRepository, MockPasswordHasher};

const STORED_HASH: &str = "$2b$04$storedhashstoredhashstoredhashstoredhashstoredhashst";

#[fixture]
fn credentials() -> LoginCredentials {
    LoginCredentials::try_from_parts("alice", "pw1").expect("valid credentials")
}

fn alice() -> Username {
    Username::new("alice").expect("valid username")
}

fn stored_account() -> UserAccount {
    UserAccount::new(alice(), HashedPassword::new(STORED_HASH))
}

fn hashing_hasher() -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .withf(|password| password == "pw1")
        .times(1)
        .returning(|_| Ok(HashedPassword::new(STORED_HASH)));
    hasher
}

fn verifying_hasher(result: Result<bool, PasswordHasherError>) -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .withf(|_, hash| hash.as_str() == STORED_HASH)
        .times(1)
        .return_once(move |_, _| result);
    hasher
}

fn service(
    repo: MockCredentialRepository,
    hasher: MockPasswordHasher,
) -> AccountService<MockCredentialRepository, MockPasswordHasher> {
    AccountService::new(Arc::new(repo), Arc::new(hasher))
}

#[rstest]
#[tokio::test]
async fn sign_up_stores_hashed_account(credentials: LoginCredentials) {
    let mut repo = MockCredentialRepository::new();
    repo.expect_exists()
        .with(eq(alice()))
        .times(1)
        .return_once(|_| Ok(false));
    repo.expect_insert()
        .withf(|account| {
            account.username().as_ref() == "alice"
                && account.hashed_password().as_str() == STORED_HASH
        })
        .times(1)
        .return_once(|_| Ok(()));

    service(repo, hashing_hasher())
        .sign_up(&credentials)
        .await
        .expect("signup succeeds");
}

#[rstest]
#[tokio::test]
async fn sign_up_rejects_taken_username_without_insert(credentials: LoginCredentials) {
    let mut repo = MockCredentialRepository::new();
    repo.expect_exists().times(1).return_once(|_| Ok(true));
    repo.expect_insert().times(0);

    let err = service(repo, hashing_hasher())
        .sign_up(&credentials)
        .await
        .expect_err("duplicate signup fails");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn sign_up_maps_insert_race_to_conflict(credentials: LoginCredentials) {
    let mut repo = MockCredentialRepository::new();
    repo.expect_exists().times(1).return_once(|_| Ok(false));
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(CredentialRepositoryError::duplicate("alice")));

    let err = service(repo, hashing_hasher())
        .sign_up(&credentials)
        .await
        .expect_err("racing signup fails");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(CredentialRepositoryError::connection("refused"))]
#[case(CredentialRepositoryError::query("syntax"))]
#[tokio::test]
async fn sign_up_maps_storage_failures_to_internal(
    credentials: LoginCredentials,
    #[case] failure: CredentialRepositoryError,
) {
    let mut repo = MockCredentialRepository::new();
    repo.expect_exists().times(1).return_once(move |_| Err(failure));
    repo.expect_insert().times(0);

    let err = service(repo, hashing_hasher())
        .sign_up(&credentials)
        .await
        .expect_err("storage failure surfaces");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn sign_up_stops_when_hashing_fails(credentials: LoginCredentials) {
    let mut repo = MockCredentialRepository::new();
    repo.expect_exists().times(0);
    repo.expect_insert().times(0);
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .returning(|_| Err(PasswordHasherError::hash("cost out of range")));

    let err = service(repo, hasher)
        .sign_up(&credentials)
        .await
        .expect_err("hash failure surfaces");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn log_in_returns_username_on_match(credentials: LoginCredentials) {
    let mut repo = MockCredentialRepository::new();
    repo.expect_find_by_username()
        .with(eq(alice()))
        .times(1)
        .return_once(|_| Ok(Some(stored_account())));

    let username = service(repo, verifying_hasher(Ok(true)))
        .log_in(&credentials)
        .await
        .expect("login succeeds");
    assert_eq!(username, alice());
}

#[rstest]
#[tokio::test]
async fn log_in_rejects_wrong_password(credentials: LoginCredentials) {
    let mut repo = MockCredentialRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(|_| Ok(Some(stored_account())));

    let err = service(repo, verifying_hasher(Ok(false)))
        .log_in(&credentials)
        .await
        .expect_err("mismatch fails");
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.message(), INVALID_CREDENTIALS_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn log_in_treats_unknown_user_like_wrong_password(credentials: LoginCredentials) {
    let mut repo = MockCredentialRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(|_| Ok(None));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().times(0);

    let err = service(repo, hasher)
        .log_in(&credentials)
        .await
        .expect_err("unknown user fails");
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.message(), INVALID_CREDENTIALS_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn log_in_maps_malformed_hash_to_internal(credentials: LoginCredentials) {
    let mut repo = MockCredentialRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(|_| Ok(Some(stored_account())));

    let err = service(
        repo,
        verifying_hasher(Err(PasswordHasherError::verify("invalid hash"))),
    )
    .log_in(&credentials)
    .await
    .expect_err("verifier failure surfaces");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn log_in_maps_lookup_failure_to_internal(credentials: LoginCredentials) {
    let mut repo = MockCredentialRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(|_| Err(CredentialRepositoryError::connection("pool exhausted")));

    let err = service(repo, MockPasswordHasher::new())
        .log_in(&credentials)
        .await
        .expect_err("lookup failure surfaces");
    assert_eq!(err.code(), ErrorCode::InternalError);
}
