//! Session verification
//!
//! Order placement requires a client session that resolves to an existing,
//! token-matching, verified and enabled account. Token issuance (JWT,
//! hashing) is an external collaborator; this module only checks the
//! session artifacts against the stored user record.

mod extractor;

pub use extractor::Session;

use async_trait::async_trait;
use surrealdb::RecordId;

use crate::models::{USER_COLLECTION, User};
use crate::store;
use crate::utils::{AppError, AppResult};

#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Resolve the session to a verified user, or fail with the precise
    /// precondition that broke
    async fn verify(&self, user_id: &str, access_token: &str) -> AppResult<User>;
}

/// Verifier backed by the `users` collection
#[derive(Clone)]
pub struct StoreSessionVerifier {
    store: store::Client,
}

impl StoreSessionVerifier {
    pub fn new(store: store::Client) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SessionVerifier for StoreSessionVerifier {
    async fn verify(&self, user_id: &str, access_token: &str) -> AppResult<User> {
        if access_token.is_empty() {
            return Err(AppError::InvalidToken);
        }

        let reference: RecordId = user_id
            .parse()
            .map_err(|_| AppError::UserNotFound)?;
        if reference.table() != USER_COLLECTION {
            return Err(AppError::UserNotFound);
        }

        let user: User = self
            .store
            .get_by_id(&reference)
            .await?
            .ok_or(AppError::UserNotFound)?;

        // Precondition order matters: token, then verified, then enabled
        if user.tokens.is_empty() || !user.holds_token(access_token) {
            return Err(AppError::InvalidToken);
        }
        if !user.is_verified() {
            return Err(AppError::UserNotVerified);
        }
        if !user.is_enabled() {
            return Err(AppError::UserNotEnabled);
        }

        Ok(user)
    }
}
