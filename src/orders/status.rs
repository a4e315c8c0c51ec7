//! Order status state machine
//!
//! Transitions as an explicit table, unit-testable without storage:
//!
//! ```text
//! Pending --Take--> InProcess --Complete--> Terminated
//! ```
//!
//! `Anulled` is an absorbing state: no exposed action reaches it and no
//! action leaves it.

use crate::models::OrderStatus;
use crate::utils::AppError;

/// Staff actions that drive an order forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Kitchen takes the order (Pending -> InProcess)
    Take,
    /// Order delivered (InProcess -> Terminated)
    Complete,
}

/// Apply an action to a state; each invalid pairing has a distinct error
pub fn transition(status: OrderStatus, action: OrderAction) -> Result<OrderStatus, AppError> {
    match (status, action) {
        (OrderStatus::Pending, OrderAction::Take) => Ok(OrderStatus::InProcess),
        (OrderStatus::InProcess, OrderAction::Complete) => Ok(OrderStatus::Terminated),

        (OrderStatus::Anulled, _) => Err(AppError::OrderAnulled),
        (OrderStatus::InProcess, OrderAction::Take) => Err(AppError::OrderAlreadyInProcess),
        (OrderStatus::Terminated, _) => Err(AppError::OrderAlreadyTerminated),
        (OrderStatus::Pending, OrderAction::Complete) => Err(AppError::OrderNotInProcess),
    }
}
