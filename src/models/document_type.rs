//! Document type model
//!
//! Dual-purpose records: identity-document definitions (with a validation
//! regex) and transactional numbering definitions (with a monotonic
//! `sequential` counter and a zero-pad width).

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::{default_flag_on, serde_helpers};
use crate::store::Identified;

pub const DOCUMENT_TYPE_COLLECTION: &str = "document_types";

/// What a document type is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Identity,
    Transaction,
}

/// Document type record
///
/// Invariant: `sequential` only increases. All counter writes go through
/// versioned conditional replacement, so two concurrent increments cannot
/// both persist the same value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentType {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub code: String,
    pub operation: Operation,
    /// Validates identity numbers (IDENTITY operation only)
    #[serde(default)]
    pub regex: Option<String>,
    /// Last issued value (TRANSACTION operation only)
    #[serde(default)]
    pub sequential: Option<i64>,
    /// Zero-pad width of generated serials
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default = "default_flag_on")]
    pub status: u8,
    /// Optimistic concurrency guard
    #[serde(default)]
    pub version: i64,
    pub created_date: DateTime<FixedOffset>,
    pub updated_date: DateTime<FixedOffset>,
}

impl Identified for DocumentType {
    fn record_id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

/// Create document type payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DocumentTypeCreate {
    #[validate(length(min = 1, max = 60, message = "Name must be 1-60 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 10, message = "Code must be 1-10 characters"))]
    pub code: String,
    pub operation: Operation,
    pub regex: Option<String>,
    #[validate(range(min = 1, max = 16, message = "Length must be between 1 and 16"))]
    pub length: Option<u32>,
}

/// Update document type payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DocumentTypeUpdate {
    #[validate(length(min = 1, max = 60, message = "Name must be 1-60 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 10, message = "Code must be 1-10 characters"))]
    pub code: Option<String>,
    pub regex: Option<String>,
    #[validate(range(min = 1, max = 16, message = "Length must be between 1 and 16"))]
    pub length: Option<u32>,
    #[validate(range(min = 0, max = 1, message = "Status must be 0 or 1"))]
    pub status: Option<u8>,
}
