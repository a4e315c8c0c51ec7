//! Reception model (a physical table / seating unit)

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::{default_flag_on, flag_enabled, serde_helpers};
use crate::store::Identified;

pub const RECEPTION_COLLECTION: &str = "receptions";

/// Seating unit
///
/// `available = 0` means reserved by exactly one non-terminal order.
/// Mutations to `available` go through versioned conditional writes; two
/// concurrent reservations cannot both win.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reception {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub number_table: String,
    /// Unique business key
    pub code: String,
    #[serde(default = "default_flag_on")]
    pub status: u8,
    #[serde(default = "default_flag_on")]
    pub available: u8,
    /// Set by customer-facing calls, cleared by the staff "attend" action
    #[serde(default)]
    pub requires_attention: u8,
    /// Optimistic concurrency guard
    #[serde(default)]
    pub version: i64,
    pub created_date: DateTime<FixedOffset>,
    pub updated_date: DateTime<FixedOffset>,
}

impl Reception {
    pub fn is_enabled(&self) -> bool {
        flag_enabled(self.status)
    }

    pub fn is_free(&self) -> bool {
        flag_enabled(self.available)
    }
}

impl Identified for Reception {
    fn record_id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

/// Public projection embedded in order views
#[derive(Debug, Clone, Serialize)]
pub struct ReceptionPublic {
    #[serde(with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub number_table: String,
    pub code: String,
}

impl From<Reception> for ReceptionPublic {
    fn from(reception: Reception) -> Self {
        Self {
            id: reception.id,
            number_table: reception.number_table,
            code: reception.code,
        }
    }
}

/// Create reception payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReceptionCreate {
    #[validate(length(min = 1, max = 10, message = "Table number must be 1-10 characters"))]
    pub number_table: String,
    #[validate(length(min = 1, max = 20, message = "Code must be 1-20 characters"))]
    pub code: String,
}

/// Update reception payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReceptionUpdate {
    #[validate(length(min = 1, max = 10, message = "Table number must be 1-10 characters"))]
    pub number_table: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Code must be 1-20 characters"))]
    pub code: Option<String>,
    #[validate(range(min = 0, max = 1, message = "Status must be 0 or 1"))]
    pub status: Option<u8>,
    #[validate(range(min = 0, max = 1, message = "Available must be 0 or 1"))]
    pub available: Option<u8>,
}
