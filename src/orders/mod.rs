//! Order lifecycle
//!
//! - [`status`] - the explicit state machine
//! - [`pricing`] - decimal-safe amount computation
//! - [`workflow`] - the multi-step creation and transition service

pub mod pricing;
pub mod status;
pub mod workflow;

pub use status::{OrderAction, transition};
pub use workflow::{CreateOrderRequest, OrderLine, OrderOutcome, OrderService};
