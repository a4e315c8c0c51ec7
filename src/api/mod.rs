//! API route modules
//!
//! - [`health`] - liveness probe
//! - [`categories`] - category management
//! - [`genders`] - read-only gender catalog
//! - [`products`] - product management
//! - [`receptions`] - table management and attention flow
//! - [`document_types`] - identity/numbering definitions
//! - [`orders`] - order placement and lifecycle

pub mod categories;
pub mod document_types;
pub mod genders;
pub mod health;
pub mod orders;
pub mod products;
pub mod receptions;

use axum::Router;
use surrealdb::RecordId;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Compose all resource routers
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(categories::router())
        .merge(genders::router())
        .merge(products::router())
        .merge(receptions::router())
        .merge(document_types::router())
        .merge(orders::router())
}

/// Run derive-based validation, flattening failures into the envelope's
/// `errors` array
pub fn validate_body(body: &impl Validate) -> AppResult<()> {
    body.validate().map_err(|errors| {
        let mut messages = Vec::new();
        collect_messages(&errors, &mut messages);
        if messages.is_empty() {
            messages.push("Invalid body fields".to_string());
        }
        AppError::Validation(messages)
    })
}

/// Parse a path id into a record reference for the given collection
///
/// Accepts both the full `collection:key` form and the bare key.
pub fn parse_ref(collection: &str, id: &str) -> AppResult<RecordId> {
    match id.parse::<RecordId>() {
        Ok(reference) if reference.table() == collection => Ok(reference),
        Ok(_) => Err(AppError::NotFound(format!("{collection}: {id}"))),
        Err(_) if !id.is_empty() && !id.contains(':') => {
            Ok(RecordId::from_table_key(collection, id))
        }
        Err(_) => Err(AppError::NotFound(format!("{collection}: {id}"))),
    }
}

fn collect_messages(errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    match &error.message {
                        Some(message) => out.push(message.to_string()),
                        None => out.push(format!("{field} is invalid")),
                    }
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(inner, out),
            ValidationErrorsKind::List(entries) => {
                for inner in entries.values() {
                    collect_messages(inner, out);
                }
            }
        }
    }
}
