//! Order API handlers
//!
//! Order placement is the only authenticated route group member: the
//! session artifacts travel in headers and are verified against the user
//! record before the workflow runs. The lifecycle routes (`in-process`,
//! `terminate`) are staff-facing.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::api::{parse_ref, validate_body};
use crate::auth::{Session, SessionVerifier, StoreSessionVerifier};
use crate::core::ServerState;
use crate::models::{ORDER_COLLECTION, OrderPublic};
use crate::orders::workflow::{CreateOrderRequest, OrderOutcome, OrderService};
use crate::store::{Page, PageRequest};
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub status: Option<u8>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct InProcessRequest {
    #[validate(range(min = 1, max = 60, message = "Estimated time must be between 1 and 60 minutes"))]
    pub estimated_time: i64,
}

/// POST /api/orders
pub async fn create(
    State(state): State<ServerState>,
    session: Session,
    Json(body): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderPublic>>> {
    validate_body(&body)?;

    let verifier = StoreSessionVerifier::new(state.store.clone());
    let client = verifier.verify(&session.user_id, &session.access_token).await?;

    let service = OrderService::new(state.store.clone(), state.notifier.clone());
    let outcome = service.create(&client, body).await?;
    Ok(respond(outcome, "registered"))
}

/// GET /api/orders
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<OrderPublic>>>> {
    let service = OrderService::new(state.store.clone(), state.notifier.clone());
    let page = PageRequest::new(query.limit.unwrap_or(10), query.offset.unwrap_or(0));
    let orders = service.list(query.status, page).await?;
    Ok(ok(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderPublic>>> {
    let reference = parse_ref(ORDER_COLLECTION, &id)?;
    let service = OrderService::new(state.store.clone(), state.notifier.clone());
    let order = service.get(&reference.to_string()).await?;
    Ok(ok(order))
}

/// PUT /api/orders/{id}/in-process
pub async fn mark_in_process(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<InProcessRequest>,
) -> AppResult<Json<ApiResponse<OrderPublic>>> {
    validate_body(&body)?;

    let reference = parse_ref(ORDER_COLLECTION, &id)?;
    let service = OrderService::new(state.store.clone(), state.notifier.clone());
    let order = service
        .mark_in_process(&reference.to_string(), body.estimated_time)
        .await?;
    let message = format!("Order {} is now in process", order.order_number);
    Ok(ok_with_message(order, message))
}

/// PUT /api/orders/{id}/terminate
pub async fn terminate(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderPublic>>> {
    let reference = parse_ref(ORDER_COLLECTION, &id)?;
    let service = OrderService::new(state.store.clone(), state.notifier.clone());
    let outcome = service.terminate(&reference.to_string()).await?;
    Ok(respond(outcome, "terminated"))
}

/// Success envelope, flagging a failed notification as partial success
fn respond(outcome: OrderOutcome, verb: &str) -> Json<ApiResponse<OrderPublic>> {
    let message = match &outcome.notification_error {
        None => format!("Order {} {verb} successfully", outcome.order.order_number),
        Some(_) => format!(
            "Order {} {verb} successfully, but the notification could not be delivered",
            outcome.order.order_number
        ),
    };
    ok_with_message(outcome.order, message)
}
