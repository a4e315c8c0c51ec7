//! Comanda - restaurant ordering backend
//!
//! An embedded-store HTTP service for placing and tracking restaurant
//! orders. Clients order against a seating unit ("reception"), orders get
//! a generated serial number and move through an explicit lifecycle, and
//! all catalog data (categories, products, genders, receptions, document
//! types) is managed over the same API.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/       # Config, server, shared state
//! ├── api/        # HTTP routes and handlers
//! ├── auth/       # Session extraction and verification
//! ├── store/      # Generic document-store access layer
//! ├── models/     # Typed collection documents
//! ├── orders/     # Order state machine, pricing, workflow
//! ├── numbering   # Serial generation
//! ├── notify/     # Order notifications
//! └── utils/      # Errors, envelope, logging, time
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod models;
pub mod notify;
pub mod numbering;
pub mod orders;
pub mod store;
pub mod utils;

// Re-export the types most callers need
pub use core::{Config, Server, ServerState};
pub use orders::{CreateOrderRequest, OrderOutcome, OrderService};
pub use utils::{ApiResponse, AppError, AppResult};
pub use utils::logger::{init_logger, init_logger_with_level};

/// Prepare the process environment: dotenv, then logging
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_level(level.as_deref());
}
