//! Category model

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::{default_flag_on, serde_helpers};
use crate::store::Identified;

pub const CATEGORY_COLLECTION: &str = "categories";

/// Product category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_flag_on")]
    pub status: u8,
    pub created_date: DateTime<FixedOffset>,
    pub updated_date: DateTime<FixedOffset>,
}

impl Identified for Category {
    fn record_id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

/// Create category payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryCreate {
    #[validate(length(min = 1, max = 80, message = "Category name must be 1-80 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 300, message = "Description is limited to 300 characters"))]
    pub description: String,
}

/// Update category payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryUpdate {
    #[validate(length(min = 1, max = 80, message = "Category name must be 1-80 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 300, message = "Description is limited to 300 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, max = 1, message = "Status must be 0 or 1"))]
    pub status: Option<u8>,
}
