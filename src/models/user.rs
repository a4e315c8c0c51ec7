//! User model
//!
//! Only the fields the order workflow preconditions read. Credential
//! issuance and password hashing live behind the session verifier boundary.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::{default_flag_on, flag_enabled, serde_helpers};
use crate::store::Identified;

pub const USER_COLLECTION: &str = "users";

/// Issued session token stored on the user record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserToken {
    pub access_token: String,
}

/// Customer account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub second_last_name: Option<String>,
    pub email: String,
    #[serde(default = "default_flag_on")]
    pub status: u8,
    #[serde(default)]
    pub verified: u8,
    #[serde(default)]
    pub tokens: Vec<UserToken>,
}

impl User {
    pub fn is_enabled(&self) -> bool {
        flag_enabled(self.status)
    }

    pub fn is_verified(&self) -> bool {
        flag_enabled(self.verified)
    }

    pub fn holds_token(&self, access_token: &str) -> bool {
        self.tokens
            .iter()
            .any(|token| token.access_token == access_token)
    }
}

impl Identified for User {
    fn record_id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

/// Public projection embedded in order views
///
/// Credential fields never reach this type, so a response cannot leak them.
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    #[serde(with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_last_name: Option<String>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            second_last_name: user.second_last_name,
        }
    }
}
