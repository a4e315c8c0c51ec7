//! Product model

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::{default_flag_on, flag_enabled, serde_helpers};
use crate::store::Identified;

pub const PRODUCT_COLLECTION: &str = "products";

/// Menu product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Category reference
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub category: Option<RecordId>,
    /// Enabled by an admin action
    #[serde(default = "default_flag_on")]
    pub status: u8,
    /// In stock right now
    #[serde(default = "default_flag_on")]
    pub available: u8,
    pub created_date: DateTime<FixedOffset>,
    pub updated_date: DateTime<FixedOffset>,
}

impl Product {
    /// Orderable: enabled and in stock
    pub fn is_orderable(&self) -> bool {
        flag_enabled(self.status) && flag_enabled(self.available)
    }
}

impl Identified for Product {
    fn record_id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

/// Public projection embedded in order detail views
#[derive(Debug, Clone, Serialize)]
pub struct ProductPublic {
    #[serde(with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub price: f64,
}

impl From<Product> for ProductPublic {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
        }
    }
}

/// Create product payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 120, message = "Product name must be 1-120 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Description is limited to 500 characters"))]
    pub description: String,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
    /// Category id string, e.g. `categories:abc`
    pub category: Option<String>,
}

/// Update product payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 120, message = "Product name must be 1-120 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description is limited to 500 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: Option<f64>,
    pub category: Option<String>,
    #[validate(range(min = 0, max = 1, message = "Status must be 0 or 1"))]
    pub status: Option<u8>,
    #[validate(range(min = 0, max = 1, message = "Available must be 0 or 1"))]
    pub available: Option<u8>,
}
