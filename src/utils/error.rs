//! Unified error handling
//!
//! Provides the application error enum ([`AppError`]) and the response
//! envelope ([`ApiResponse`]) shared by every handler.
//!
//! Every response carries a stable `status_code` and either `data` or a
//! non-empty `errors` array, never both empty:
//!
//! ```json
//! {
//!   "status_code": 200,
//!   "data": { ... },
//!   "message": "Order O001-00000001 registered successfully",
//!   "errors": []
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Uniform API response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub errors: Vec<String>,
}

/// Application error enum
///
/// Each variant maps to a stable `error_code` string and an HTTP status.
/// Internal errors (`Store`, `Internal`) are logged server-side and
/// surfaced to clients as a generic unknown-error message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Session errors (401) ==========
    #[error("User does not exist")]
    UserNotFound,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Account not yet verified, please validate your account")]
    UserNotVerified,

    #[error("The user account is disabled")]
    UserNotEnabled,

    // ========== Not found (404) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Reception does not exist")]
    ReceptionNotFound,

    #[error("Product(s) do not exist")]
    ProductsNotFound,

    #[error("Order does not exist")]
    OrderNotFound,

    #[error("Document type '{0}' is not configured")]
    ConfigurationMissing(String),

    // ========== Conflict (409) ==========
    #[error("Resource already exists: {0}")]
    Duplicate(String),

    #[error("The reception is disabled")]
    ReceptionDisabled,

    #[error("The reception is already reserved")]
    ReceptionUnavailable,

    #[error("Product(s) not available")]
    ProductsUnavailable,

    #[error("The client already has an active order")]
    ConflictActiveOrder,

    #[error("The order is anulled")]
    OrderAnulled,

    #[error("The order is already in process")]
    OrderAlreadyInProcess,

    #[error("The order is already terminated")]
    OrderAlreadyTerminated,

    #[error("The order has not been taken yet")]
    OrderNotInProcess,

    #[error("Resource was modified concurrently: {0}")]
    Conflict(String),

    // ========== Validation (400) ==========
    #[error("Invalid body fields")]
    Validation(Vec<String>),

    // ========== Partial failure (500) ==========
    #[error("An error occurred while registering the order details")]
    ItemsNotRegistered,

    // ========== System errors (500) ==========
    #[error("Store unavailable: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for handlers and services
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Stable error code surfaced in the response envelope
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::UserNotVerified => "USER_NOT_VERIFIED",
            AppError::UserNotEnabled => "USER_NOT_ENABLED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ReceptionNotFound => "RECEPTION_NOT_FOUND",
            AppError::ProductsNotFound => "PRODUCTS_NOT_FOUND",
            AppError::OrderNotFound => "ORDER_NOT_FOUND",
            AppError::ConfigurationMissing(_) => "DOCUMENT_NOT_FOUND",
            AppError::Duplicate(_) => "DUPLICATE_RESOURCE",
            AppError::ReceptionDisabled => "RECEPTION_IS_DISABLED",
            AppError::ReceptionUnavailable => "RECEPTION_IS_UNAVAILABLE",
            AppError::ProductsUnavailable => "PRODUCTS_IS_UNAVAILABLE",
            AppError::ConflictActiveOrder => "CONFLICT_ACTIVE_ORDER",
            AppError::OrderAnulled => "ORDER_IS_ANULLED",
            AppError::OrderAlreadyInProcess => "ORDER_ALREADY_IN_PROCESS",
            AppError::OrderAlreadyTerminated => "ORDER_ALREADY_TERMINATED",
            AppError::OrderNotInProcess => "ORDER_NOT_IN_PROCESS",
            AppError::Conflict(_) => "CONFLICT_RESOURCE",
            AppError::Validation(_) => "INVALID_BODY_FIELDS",
            AppError::ItemsNotRegistered => "ITEMS_NOT_REGISTERED",
            AppError::Store(_) => "STORE_UNAVAILABLE",
            AppError::Internal(_) => "UNKNOWN_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UserNotFound
            | AppError::InvalidToken
            | AppError::UserNotVerified
            | AppError::UserNotEnabled => StatusCode::UNAUTHORIZED,

            AppError::NotFound(_)
            | AppError::ReceptionNotFound
            | AppError::ProductsNotFound
            | AppError::OrderNotFound
            | AppError::ConfigurationMissing(_) => StatusCode::NOT_FOUND,

            AppError::Duplicate(_)
            | AppError::ReceptionDisabled
            | AppError::ReceptionUnavailable
            | AppError::ProductsUnavailable
            | AppError::ConflictActiveOrder
            | AppError::OrderAnulled
            | AppError::OrderAlreadyInProcess
            | AppError::OrderAlreadyTerminated
            | AppError::OrderNotInProcess
            | AppError::Conflict(_) => StatusCode::CONFLICT,

            AppError::Validation(_) => StatusCode::BAD_REQUEST,

            AppError::ItemsNotRegistered | AppError::Store(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code().to_string();

        let errors = match &self {
            AppError::Validation(messages) => messages.clone(),
            // Internal detail is logged, never leaked to clients
            AppError::Store(detail) => {
                error!(target: "store", error = %detail, "Store error");
                vec!["An unknown error occurred".to_string()]
            }
            AppError::Internal(detail) => {
                error!(target: "internal", error = %detail, "Internal error");
                vec!["An unknown error occurred".to_string()]
            }
            other => vec![other.to_string()],
        };

        let body = Json(ApiResponse::<()> {
            status_code: status.as_u16(),
            error_code: Some(error_code),
            data: None,
            message: None,
            errors,
        });

        (status, body).into_response()
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        status_code: 200,
        error_code: None,
        data: Some(data),
        message: None,
        errors: Vec::new(),
    })
}

/// Create a successful response with a custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        status_code: 200,
        error_code: None,
        data: Some(data),
        message: Some(message.into()),
        errors: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AppError::ReceptionUnavailable.error_code(), "RECEPTION_IS_UNAVAILABLE");
        assert_eq!(AppError::ConflictActiveOrder.error_code(), "CONFLICT_ACTIVE_ORDER");
        assert_eq!(AppError::ItemsNotRegistered.error_code(), "ITEMS_NOT_REGISTERED");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::OrderNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::OrderAlreadyInProcess.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Store("timeout".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_success_envelope_never_carries_errors() {
        let response = ok_with_message(42, "done");
        assert_eq!(response.0.status_code, 200);
        assert!(response.0.errors.is_empty());
        assert_eq!(response.0.data, Some(42));
    }
}
