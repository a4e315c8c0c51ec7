//! Order workflow
//!
//! The one genuinely multi-step sequence in the system: validate the
//! client, the reception and the products, generate the serial, reserve the
//! table, advance the counter, create the order and its detail lines, then
//! return the denormalized view.
//!
//! The store has no multi-document transactions, so the creation sequence
//! runs as a saga: the two contended writes (reception reservation, counter
//! advance) are versioned conditional replacements, and a failure after the
//! reservation compensates by deleting whatever was created and releasing
//! the reception. Counter gaps are acceptable and never rolled back.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use crate::models::{
    DOCUMENT_TYPE_COLLECTION, DocumentType, ORDER_COLLECTION, ORDER_DETAILS_COLLECTION, Order,
    OrderChannel, OrderDetail, OrderDetailPublic, OrderPublic, OrderStatus, OrderType,
    PRODUCT_COLLECTION, PaymentMethod, Product, RECEPTION_COLLECTION, Reception, ReceptionPublic,
    User, UserPublic,
};
use crate::notify::{Notifier, OrderNotification};
use crate::numbering;
use crate::orders::pricing::{self, PricedLine};
use crate::orders::status::{OrderAction, transition};
use crate::store::{self, Filter, FilterValue, Op, Page, PageRequest, Sort};
use crate::utils::time::{business_now, minutes_between};
use crate::utils::{AppError, AppResult};

/// Document type that issues order serials
const ORDER_DOCUMENT_TYPE: &str = "Orden";

/// Attempts at the counter compare-and-swap before giving up
const COUNTER_CAS_ATTEMPTS: usize = 3;

/// One requested order line
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderLine {
    /// Product id string, e.g. `products:abc`
    #[validate(length(min = 1, message = "The product id is required"))]
    pub product: String,
    #[validate(range(min = 1, max = 10, message = "Quantity must be between 1 and 10"))]
    pub quantity: u32,
}

/// Validated order creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderRequest {
    /// Reception id string, e.g. `receptions:abc`
    #[validate(length(min = 1, message = "The reception id is required"))]
    pub reception: String,
    #[validate(length(min = 1, max = 20, message = "The document number is required"))]
    pub user_document_number: String,
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub order_channel: OrderChannel,
    #[validate(length(min = 1, max = 10, message = "Items must contain 1 to 10 entries"))]
    #[validate(nested)]
    pub items: Vec<OrderLine>,
}

/// Workflow result: the order plus the notification outcome
///
/// A failed notification never rolls back the order; the caller reports it
/// as a partial success.
#[derive(Debug)]
pub struct OrderOutcome {
    pub order: OrderPublic,
    pub notification_error: Option<String>,
}

/// Order workflow service
#[derive(Clone)]
pub struct OrderService {
    store: store::Client,
    notifier: Arc<dyn Notifier>,
}

impl OrderService {
    pub fn new(store: store::Client, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Place a new order for a verified client
    ///
    /// Preconditions are checked in a fixed order, each with its own error;
    /// nothing is written before they all pass.
    pub async fn create(&self, client: &User, request: CreateOrderRequest) -> AppResult<OrderOutcome> {
        let client_ref = client
            .id
            .clone()
            .ok_or_else(|| AppError::Internal("verified user has no id".into()))?;

        // One active order per client
        let active_filter = Filter::field_eq("client", client_ref.clone()).and(
            "status",
            Op::In,
            FilterValue::List(vec![
                FilterValue::Int(u8::from(OrderStatus::Pending) as i64),
                FilterValue::Int(u8::from(OrderStatus::InProcess) as i64),
            ]),
        );
        if self
            .store
            .get_one::<Order>(ORDER_COLLECTION, &active_filter)
            .await?
            .is_some()
        {
            return Err(AppError::ConflictActiveOrder);
        }

        // Reception must exist, be enabled and free
        let reception_ref: RecordId = request
            .reception
            .parse()
            .map_err(|_| AppError::ReceptionNotFound)?;
        if reception_ref.table() != RECEPTION_COLLECTION {
            return Err(AppError::ReceptionNotFound);
        }
        let reception: Reception = self
            .store
            .get_by_id(&reception_ref)
            .await?
            .ok_or(AppError::ReceptionNotFound)?;
        if !reception.is_enabled() {
            return Err(AppError::ReceptionDisabled);
        }
        if !reception.is_free() {
            return Err(AppError::ReceptionUnavailable);
        }

        // Every product must resolve, be enabled and in stock
        let mut line_refs: Vec<(RecordId, u32)> = Vec::with_capacity(request.items.len());
        let mut product_refs: Vec<RecordId> = Vec::new();
        for line in &request.items {
            let reference: RecordId = line
                .product
                .parse()
                .map_err(|_| AppError::ProductsNotFound)?;
            if reference.table() != PRODUCT_COLLECTION {
                return Err(AppError::ProductsNotFound);
            }
            if !product_refs.contains(&reference) {
                product_refs.push(reference.clone());
            }
            line_refs.push((reference, line.quantity));
        }
        let resolved = self.store.resolve_many::<Product>(&product_refs).await?;
        let mut products: Vec<Product> = Vec::with_capacity(resolved.len());
        for slot in resolved {
            products.push(slot.ok_or(AppError::ProductsNotFound)?);
        }
        if products.iter().any(|product| !product.is_orderable()) {
            return Err(AppError::ProductsUnavailable);
        }

        // The transactional numbering record must be configured
        let numbering_filter = Filter::field_eq("name", ORDER_DOCUMENT_TYPE)
            .and("operation", Op::Eq, "TRANSACTION");
        let document_type: DocumentType = self
            .store
            .get_one(DOCUMENT_TYPE_COLLECTION, &numbering_filter)
            .await?
            .ok_or_else(|| AppError::ConfigurationMissing(ORDER_DOCUMENT_TYPE.to_string()))?;

        // Price the lines against the resolved products
        let unit_price = |reference: &RecordId| {
            products
                .iter()
                .find(|product| product.id.as_ref() == Some(reference))
                .map(|product| product.price)
                .unwrap_or(0.0)
        };
        let priced: Vec<PricedLine> = line_refs
            .iter()
            .map(|(reference, quantity)| PricedLine {
                unit_price: unit_price(reference),
                quantity: *quantity,
            })
            .collect();
        let totals = pricing::compute_totals(&priced);

        // Reserve the reception: conditional write, losers of the race get
        // the same error as a plainly occupied table
        let mut reserved = reception.clone();
        reserved.available = 0;
        reserved.version = reception.version + 1;
        reserved.updated_date = business_now();
        self.store
            .replace_if_version::<Reception, _>(&reception_ref, reserved, reception.version)
            .await?
            .ok_or(AppError::ReceptionUnavailable)?;

        // Advance the counter (compensate the reservation if it will not go)
        let serial = match self.advance_counter(document_type).await {
            Ok(serial) => serial,
            Err(err) => {
                self.release_reception(&reception_ref).await;
                return Err(err);
            }
        };

        // Create the order shell, then its detail lines
        let order = Order {
            id: None,
            order_number: serial.clone(),
            order_type: request.order_type,
            status: OrderStatus::Pending,
            client: client_ref.clone(),
            reception: reception_ref.clone(),
            user_document_number: request.user_document_number.clone(),
            reception_date: business_now(),
            end_date: None,
            payment_method: request.payment_method,
            order_channel: request.order_channel,
            tax: totals.tax,
            subtotal: totals.subtotal,
            total: totals.total,
            estimated_time: None,
            items: Vec::new(),
        };
        let created: Order = match self.store.insert(ORDER_COLLECTION, order).await {
            Ok(created) => created,
            Err(err) => {
                self.release_reception(&reception_ref).await;
                return Err(err.into());
            }
        };
        let order_ref = created
            .id
            .clone()
            .ok_or_else(|| AppError::Internal("created order has no id".into()))?;

        let mut detail_refs: Vec<RecordId> = Vec::with_capacity(line_refs.len());
        for (product_ref, quantity) in &line_refs {
            let detail = OrderDetail {
                id: None,
                order: order_ref.clone(),
                product: product_ref.clone(),
                quantity: *quantity,
                price_of_sale: unit_price(product_ref),
            };
            match self
                .store
                .insert::<OrderDetail, _>(ORDER_DETAILS_COLLECTION, detail)
                .await
            {
                Ok(created_detail) => {
                    if let Some(id) = created_detail.id {
                        detail_refs.push(id);
                    }
                }
                Err(err) => {
                    tracing::warn!(order = %serial, error = %err, "Detail insertion failed, compensating");
                    self.compensate_creation(&order_ref, &detail_refs, &reception_ref)
                        .await;
                    return Err(AppError::ItemsNotRegistered);
                }
            }
        }

        // Attach the detail references to the order
        let mut with_items = created.clone();
        with_items.items = detail_refs.clone();
        let updated = self
            .store
            .replace::<Order, _>(&order_ref, with_items)
            .await;
        let order = match updated {
            Ok(Some(order)) => order,
            Ok(None) | Err(_) => {
                self.compensate_creation(&order_ref, &detail_refs, &reception_ref)
                    .await;
                return Err(AppError::ItemsNotRegistered);
            }
        };

        let view = self.public_view(order, false).await?;
        let notification_error = self
            .send_notification(OrderNotification::Received {
                order_number: serial,
                client_name: format!("{} {}", client.first_name, client.last_name),
                email: client.email.clone(),
                total: totals.total,
            })
            .await;

        Ok(OrderOutcome {
            order: view,
            notification_error,
        })
    }

    /// Take a pending order into preparation
    pub async fn mark_in_process(&self, order_id: &str, estimated_time: i64) -> AppResult<OrderPublic> {
        let (order_ref, order) = self.load_order(order_id).await?;
        let next = transition(order.status, OrderAction::Take)?;

        let mut taken = order;
        taken.status = next;
        taken.estimated_time = Some(estimated_time);
        let updated: Order = self
            .store
            .replace(&order_ref, taken)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        self.public_view(updated, false).await
    }

    /// Terminate an in-process order
    ///
    /// Sets `end_date` and notifies the client with the computed duration.
    /// The reception deliberately stays reserved; freeing it is a separate
    /// staff action.
    pub async fn terminate(&self, order_id: &str) -> AppResult<OrderOutcome> {
        let (order_ref, order) = self.load_order(order_id).await?;
        let next = transition(order.status, OrderAction::Complete)?;

        let end_date = business_now();
        let mut terminated = order;
        terminated.status = next;
        terminated.end_date = Some(end_date);
        let updated: Order = self
            .store
            .replace(&order_ref, terminated)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        let duration_minutes = minutes_between(updated.reception_date, end_date);
        let order_number = updated.order_number.clone();
        let client: Option<User> = self.store.resolve(&updated.client).await?;
        let view = self.public_view(updated, false).await?;

        let notification_error = match client {
            Some(client) => {
                self.send_notification(OrderNotification::Terminated {
                    order_number,
                    client_name: format!("{} {}", client.first_name, client.last_name),
                    email: client.email,
                    duration_minutes,
                })
                .await
            }
            None => Some("client reference no longer resolves".to_string()),
        };

        Ok(OrderOutcome {
            order: view,
            notification_error,
        })
    }

    /// Fetch one order with its detail lines resolved
    pub async fn get(&self, order_id: &str) -> AppResult<OrderPublic> {
        let (_, order) = self.load_order(order_id).await?;
        self.public_view(order, true).await
    }

    /// Staff-facing order listing, newest first
    pub async fn list(&self, status: Option<u8>, page: PageRequest) -> AppResult<Page<OrderPublic>> {
        let filter = match status {
            Some(code) => Filter::field_eq("status", code),
            None => Filter::new(),
        };
        let sort = Sort::desc("reception_date");
        let mut orders: Page<Order> = self
            .store
            .get_page(ORDER_COLLECTION, &filter, Some(&sort), page)
            .await?;

        let mut views = Vec::with_capacity(orders.docs.len());
        for order in std::mem::take(&mut orders.docs) {
            views.push(self.public_view(order, false).await?);
        }
        Ok(Page {
            docs: views,
            total_docs: orders.total_docs,
            limit: orders.limit,
            total_pages: orders.total_pages,
            current_page: orders.current_page,
            has_prev_page: orders.has_prev_page,
            has_next_page: orders.has_next_page,
        })
    }

    // ========== Internals ==========

    async fn load_order(&self, order_id: &str) -> AppResult<(RecordId, Order)> {
        let order_ref: RecordId = order_id.parse().map_err(|_| AppError::OrderNotFound)?;
        let order: Order = self
            .store
            .get_by_id(&order_ref)
            .await?
            .ok_or(AppError::OrderNotFound)?;
        Ok((order_ref, order))
    }

    /// Advance the numbering counter with a bounded compare-and-swap loop
    ///
    /// Re-reads the record on every conflict, so a retry never reissues a
    /// serial another request already won.
    async fn advance_counter(&self, mut document_type: DocumentType) -> AppResult<String> {
        for _ in 0..COUNTER_CAS_ATTEMPTS {
            let reference = document_type
                .id
                .clone()
                .ok_or_else(|| AppError::Internal("document type has no id".into()))?;
            let serial = numbering::next_serial_for(&document_type);

            let mut advanced = document_type.clone();
            advanced.sequential = Some(serial.next_sequential);
            advanced.version = document_type.version + 1;
            advanced.updated_date = business_now();

            if self
                .store
                .replace_if_version::<DocumentType, _>(&reference, advanced, document_type.version)
                .await?
                .is_some()
            {
                return Ok(serial.value);
            }

            document_type = self
                .store
                .get_by_id(&reference)
                .await?
                .ok_or_else(|| AppError::ConfigurationMissing(ORDER_DOCUMENT_TYPE.to_string()))?;
        }
        Err(AppError::Store("order counter is contended".into()))
    }

    /// Undo the creation side effects after a mid-sequence failure
    ///
    /// Counter gaps are left as-is. Compensation is best-effort: a failed
    /// undo is logged, not propagated over the original error.
    async fn compensate_creation(
        &self,
        order_ref: &RecordId,
        detail_refs: &[RecordId],
        reception_ref: &RecordId,
    ) {
        for detail_ref in detail_refs {
            if let Err(err) = self.store.delete(detail_ref).await {
                tracing::error!(detail = %detail_ref, error = %err, "Compensation: detail delete failed");
            }
        }
        if let Err(err) = self.store.delete(order_ref).await {
            tracing::error!(order = %order_ref, error = %err, "Compensation: order delete failed");
        }
        self.release_reception(reception_ref).await;
    }

    async fn release_reception(&self, reception_ref: &RecordId) {
        let reception: Result<Option<Reception>, _> = self.store.get_by_id(reception_ref).await;
        let Ok(Some(reception)) = reception else {
            tracing::error!(reception = %reception_ref, "Compensation: reception no longer readable");
            return;
        };
        let version = reception.version;
        let mut released = reception;
        released.available = 1;
        released.version = version + 1;
        released.updated_date = business_now();
        match self
            .store
            .replace_if_version::<Reception, _>(reception_ref, released, version)
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::error!(reception = %reception_ref, "Compensation: reception version moved, left reserved")
            }
            Err(err) => {
                tracing::error!(reception = %reception_ref, error = %err, "Compensation: reception release failed")
            }
        }
    }

    async fn send_notification(&self, notification: OrderNotification) -> Option<String> {
        match self.notifier.send(notification).await {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(error = %err, "Notification delivery failed");
                Some(err.to_string())
            }
        }
    }

    /// Resolve references and project the order to its public shape
    async fn public_view(&self, order: Order, with_items: bool) -> AppResult<OrderPublic> {
        let client: Option<UserPublic> = self
            .store
            .resolve::<User>(&order.client)
            .await?
            .map(UserPublic::from);
        let reception: Option<ReceptionPublic> = self
            .store
            .resolve::<Reception>(&order.reception)
            .await?
            .map(ReceptionPublic::from);

        let items = if with_items {
            let details = self
                .store
                .resolve_many::<OrderDetail>(&order.items)
                .await?;
            let details: Vec<OrderDetail> = details.into_iter().flatten().collect();

            let product_refs: Vec<RecordId> =
                details.iter().map(|detail| detail.product.clone()).collect();
            let products = self.store.resolve_many::<Product>(&product_refs).await?;

            Some(
                details
                    .into_iter()
                    .zip(products)
                    .map(|(detail, product)| OrderDetailPublic {
                        id: detail.id,
                        product: product.map(Into::into),
                        quantity: detail.quantity,
                        price_of_sale: detail.price_of_sale,
                    })
                    .collect(),
            )
        } else {
            None
        };

        Ok(OrderPublic::from_order(order, client, reception, items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(items: Vec<OrderLine>) -> CreateOrderRequest {
        CreateOrderRequest {
            reception: "receptions:r1".into(),
            user_document_number: "12345678".into(),
            order_type: OrderType::InLocal,
            payment_method: PaymentMethod::Cash,
            order_channel: OrderChannel::InPerson,
            items,
        }
    }

    fn line(product: &str, quantity: u32) -> OrderLine {
        OrderLine {
            product: product.into(),
            quantity,
        }
    }

    #[test]
    fn test_request_with_valid_items_passes_validation() {
        let request = request(vec![line("products:p1", 1), line("products:p2", 10)]);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_rejects_empty_items() {
        let request = request(vec![]);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_request_rejects_more_than_ten_items() {
        let items = (0..11).map(|n| line(&format!("products:p{n}"), 1)).collect();
        let request = request(items);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_request_rejects_out_of_range_quantity() {
        let errors = request(vec![line("products:p1", 11)])
            .validate()
            .unwrap_err();
        assert!(errors.to_string().contains("Quantity must be between 1 and 10"));
    }
}
