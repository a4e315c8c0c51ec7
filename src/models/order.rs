//! Order and order-detail models

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use super::{ProductPublic, ReceptionPublic, UserPublic};
use crate::store::Identified;

pub const ORDER_COLLECTION: &str = "orders";
pub const ORDER_DETAILS_COLLECTION: &str = "order_details";

/// Order lifecycle state, stored as its numeric code
///
/// Transitions are owned by `orders::status`; this type only knows the
/// wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OrderStatus {
    Anulled,
    Pending,
    InProcess,
    Terminated,
}

impl From<OrderStatus> for u8 {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Anulled => 0,
            OrderStatus::Pending => 1,
            OrderStatus::InProcess => 2,
            OrderStatus::Terminated => 3,
        }
    }
}

impl TryFrom<u8> for OrderStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(OrderStatus::Anulled),
            1 => Ok(OrderStatus::Pending),
            2 => Ok(OrderStatus::InProcess),
            3 => Ok(OrderStatus::Terminated),
            other => Err(format!("unknown order status code: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    InLocal,
    Takeaway,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Visa,
    Mastercard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderChannel {
    App,
    InPerson,
}

/// Order document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Generated serial, e.g. `O001-00000001`
    pub order_number: String,
    pub order_type: OrderType,
    pub status: OrderStatus,
    #[serde(with = "serde_helpers::record_id")]
    pub client: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub reception: RecordId,
    pub user_document_number: String,
    pub reception_date: DateTime<FixedOffset>,
    #[serde(default)]
    pub end_date: Option<DateTime<FixedOffset>>,
    pub payment_method: PaymentMethod,
    pub order_channel: OrderChannel,
    pub tax: f64,
    pub subtotal: f64,
    pub total: f64,
    /// Minutes, set when the order is taken
    #[serde(default)]
    pub estimated_time: Option<i64>,
    /// Detail line references
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub items: Vec<RecordId>,
}

impl Identified for Order {
    fn record_id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

/// Order line - immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub quantity: u32,
    /// Product price snapshotted at order time
    pub price_of_sale: f64,
}

impl Identified for OrderDetail {
    fn record_id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

/// Denormalized order view returned by the API
///
/// Client and reception references are resolved and projected to their
/// public fields; anything not listed here cannot leak.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPublic {
    #[serde(with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub order_number: String,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub client: Option<UserPublic>,
    pub reception: Option<ReceptionPublic>,
    pub user_document_number: String,
    pub reception_date: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<FixedOffset>>,
    pub payment_method: PaymentMethod,
    pub order_channel: OrderChannel,
    pub tax: f64,
    pub subtotal: f64,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<i64>,
    /// Resolved detail lines; omitted from creation responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderDetailPublic>>,
}

impl OrderPublic {
    pub fn from_order(
        order: Order,
        client: Option<UserPublic>,
        reception: Option<ReceptionPublic>,
        items: Option<Vec<OrderDetailPublic>>,
    ) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            order_type: order.order_type,
            status: order.status,
            client,
            reception,
            user_document_number: order.user_document_number,
            reception_date: order.reception_date,
            end_date: order.end_date,
            payment_method: order.payment_method,
            order_channel: order.order_channel,
            tax: order.tax,
            subtotal: order.subtotal,
            total: order.total,
            estimated_time: order.estimated_time,
            items,
        }
    }
}

/// Resolved order line view
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetailPublic {
    #[serde(with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub product: Option<ProductPublic>,
    pub quantity: u32,
    pub price_of_sale: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_as_code() {
        let json = serde_json::to_string(&OrderStatus::InProcess).unwrap();
        assert_eq!(json, "2");
        let back: OrderStatus = serde_json::from_str("3").unwrap();
        assert_eq!(back, OrderStatus::Terminated);
        assert!(serde_json::from_str::<OrderStatus>("7").is_err());
    }

    #[test]
    fn test_enum_wire_values() {
        assert_eq!(
            serde_json::to_string(&OrderType::InLocal).unwrap(),
            "\"IN_LOCAL\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Mastercard).unwrap(),
            "\"MASTERCARD\""
        );
        assert_eq!(
            serde_json::to_string(&OrderChannel::InPerson).unwrap(),
            "\"IN_PERSON\""
        );
    }
}
