//! Session verification precondition tests

mod common;

use comanda::auth::{SessionVerifier, StoreSessionVerifier};
use comanda::models::{USER_COLLECTION, User, UserToken};
use comanda::store::Client;
use comanda::utils::AppError;

async fn seed(store: &Client, status: u8, verified: u8, token: &str) -> String {
    let user = User {
        id: None,
        first_name: "Jose".into(),
        last_name: "Flores".into(),
        second_last_name: Some("Rojas".into()),
        email: "jose@example.com".into(),
        status,
        verified,
        tokens: vec![UserToken {
            access_token: token.into(),
        }],
    };
    let created: User = store.insert(USER_COLLECTION, user).await.expect("seed user");
    created.id.expect("generated id").to_string()
}

#[tokio::test]
async fn test_valid_session_resolves_the_user() {
    let store = common::memory_store().await;
    let user_id = seed(&store, 1, 1, "tok-1").await;

    let verifier = StoreSessionVerifier::new(store);
    let user = verifier.verify(&user_id, "tok-1").await.unwrap();
    assert_eq!(user.email, "jose@example.com");
}

#[tokio::test]
async fn test_empty_token_fails_before_any_lookup() {
    let store = common::memory_store().await;
    let verifier = StoreSessionVerifier::new(store);
    let err = verifier.verify("users:whatever", "").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidToken));
}

#[tokio::test]
async fn test_unknown_user() {
    let store = common::memory_store().await;
    let verifier = StoreSessionVerifier::new(store);

    let err = verifier.verify("users:ghost", "tok-1").await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound));

    // A reference into another collection never resolves to a user
    let err = verifier.verify("products:ghost", "tok-1").await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound));
}

#[tokio::test]
async fn test_token_mismatch() {
    let store = common::memory_store().await;
    let user_id = seed(&store, 1, 1, "tok-1").await;

    let verifier = StoreSessionVerifier::new(store);
    let err = verifier.verify(&user_id, "tok-2").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidToken));
}

#[tokio::test]
async fn test_token_is_checked_before_verified_and_enabled() {
    let store = common::memory_store().await;
    // Both the token and the account flags are wrong; the token error wins
    let user_id = seed(&store, 0, 0, "tok-1").await;

    let verifier = StoreSessionVerifier::new(store);
    let err = verifier.verify(&user_id, "tok-2").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidToken));
}

#[tokio::test]
async fn test_unverified_account() {
    let store = common::memory_store().await;
    let user_id = seed(&store, 1, 0, "tok-1").await;

    let verifier = StoreSessionVerifier::new(store);
    let err = verifier.verify(&user_id, "tok-1").await.unwrap_err();
    assert!(matches!(err, AppError::UserNotVerified));
}

#[tokio::test]
async fn test_disabled_account_is_checked_after_verification() {
    let store = common::memory_store().await;
    let user_id = seed(&store, 0, 1, "tok-1").await;

    let verifier = StoreSessionVerifier::new(store);
    let err = verifier.verify(&user_id, "tok-1").await.unwrap_err();
    assert!(matches!(err, AppError::UserNotEnabled));
}
