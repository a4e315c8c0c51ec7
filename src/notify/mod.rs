//! Order notifications
//!
//! The workflow emits notifications through the [`Notifier`] trait and
//! treats delivery as best-effort: a failed send never rolls back the
//! order, it is surfaced as a partial success. SMTP delivery and template
//! rendering live behind an external collaborator; the default
//! implementation records the notification in the log.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

/// Notification payloads the workflow produces
#[derive(Debug, Clone, PartialEq)]
pub enum OrderNotification {
    /// Sent right after an order is created
    Received {
        order_number: String,
        client_name: String,
        email: String,
        total: f64,
    },
    /// Sent when an order is terminated
    Terminated {
        order_number: String,
        client_name: String,
        email: String,
        duration_minutes: i64,
    },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: OrderNotification) -> Result<(), NotifyError>;
}

/// Default notifier: writes the notification to the structured log
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: OrderNotification) -> Result<(), NotifyError> {
        match notification {
            OrderNotification::Received {
                order_number,
                client_name,
                email,
                total,
            } => {
                tracing::info!(
                    target: "notify",
                    order_number = %order_number,
                    client = %client_name,
                    email = %email,
                    total,
                    "Order received notification"
                );
            }
            OrderNotification::Terminated {
                order_number,
                client_name,
                email,
                duration_minutes,
            } => {
                tracing::info!(
                    target: "notify",
                    order_number = %order_number,
                    client = %client_name,
                    email = %email,
                    duration_minutes,
                    "Order terminated notification"
                );
            }
        }
        Ok(())
    }
}
