//! End-to-end order workflow tests against an in-memory store

mod common;

use std::sync::Arc;

use comanda::models::{
    DOCUMENT_TYPE_COLLECTION, DocumentType, ORDER_COLLECTION, OrderChannel, OrderStatus, OrderType,
    PaymentMethod, Reception,
};
use comanda::notify::LogNotifier;
use comanda::orders::workflow::{CreateOrderRequest, OrderLine, OrderService};
use comanda::store::{Client, Filter, PageRequest};
use comanda::utils::AppError;

fn service(store: &Client) -> OrderService {
    OrderService::new(store.clone(), Arc::new(LogNotifier))
}

fn request(reception: &Reception, items: Vec<OrderLine>) -> CreateOrderRequest {
    CreateOrderRequest {
        reception: reception.id.clone().expect("seeded reception id").to_string(),
        user_document_number: "12345678".into(),
        order_type: OrderType::InLocal,
        payment_method: PaymentMethod::Cash,
        order_channel: OrderChannel::App,
        items,
    }
}

fn line(product: &comanda::models::Product, quantity: u32) -> OrderLine {
    OrderLine {
        product: product.id.clone().expect("seeded product id").to_string(),
        quantity,
    }
}

// ========== Creation ==========

#[tokio::test]
async fn test_create_order_prices_and_numbers() {
    let store = common::memory_store().await;
    common::seed_order_numbering(&store).await;
    let user = common::seed_user(&store, "maria@example.com", "tok-1").await;
    let reception = common::seed_reception(&store, "T1", "MESA-01").await;
    let ceviche = common::seed_product(&store, "Ceviche", 50.0, 1).await;
    let chicha = common::seed_product(&store, "Chicha", 30.0, 1).await;

    let outcome = service(&store)
        .create(&user, request(&reception, vec![line(&ceviche, 2), line(&chicha, 1)]))
        .await
        .expect("order created");

    let order = outcome.order;
    assert_eq!(order.order_number, "O001-00000001");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.subtotal, 130.0);
    assert_eq!(order.tax, 0.18);
    assert_eq!(order.total, 153.4);
    assert!(outcome.notification_error.is_none());

    // The reception is now reserved and the counter advanced
    let reception: Reception = store
        .get_by_id(&reception.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reception.available, 0);

    let numbering: DocumentType = store
        .get_one(DOCUMENT_TYPE_COLLECTION, &Filter::field_eq("code", "O001"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(numbering.sequential, Some(1));
}

#[tokio::test]
async fn test_serials_are_monotonic_across_orders() {
    let store = common::memory_store().await;
    common::seed_order_numbering(&store).await;
    let product = common::seed_product(&store, "Lomo saltado", 42.0, 1).await;

    let first_user = common::seed_user(&store, "a@example.com", "tok-a").await;
    let first_reception = common::seed_reception(&store, "T1", "MESA-01").await;
    let first = service(&store)
        .create(&first_user, request(&first_reception, vec![line(&product, 1)]))
        .await
        .unwrap();

    let second_user = common::seed_user(&store, "b@example.com", "tok-b").await;
    let second_reception = common::seed_reception(&store, "T2", "MESA-02").await;
    let second = service(&store)
        .create(&second_user, request(&second_reception, vec![line(&product, 1)]))
        .await
        .unwrap();

    assert_eq!(first.order.order_number, "O001-00000001");
    assert_eq!(second.order.order_number, "O001-00000002");
}

// ========== Preconditions ==========

#[tokio::test]
async fn test_one_active_order_per_client() {
    let store = common::memory_store().await;
    common::seed_order_numbering(&store).await;
    let user = common::seed_user(&store, "maria@example.com", "tok-1").await;
    let product = common::seed_product(&store, "Ceviche", 50.0, 1).await;
    let first_reception = common::seed_reception(&store, "T1", "MESA-01").await;
    let second_reception = common::seed_reception(&store, "T2", "MESA-02").await;

    service(&store)
        .create(&user, request(&first_reception, vec![line(&product, 1)]))
        .await
        .unwrap();

    let err = service(&store)
        .create(&user, request(&second_reception, vec![line(&product, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ConflictActiveOrder));
}

#[tokio::test]
async fn test_reserved_reception_rejects_other_clients() {
    let store = common::memory_store().await;
    common::seed_order_numbering(&store).await;
    let product = common::seed_product(&store, "Ceviche", 50.0, 1).await;
    let reception = common::seed_reception(&store, "T1", "MESA-01").await;

    let first = common::seed_user(&store, "a@example.com", "tok-a").await;
    service(&store)
        .create(&first, request(&reception, vec![line(&product, 1)]))
        .await
        .unwrap();

    let second = common::seed_user(&store, "b@example.com", "tok-b").await;
    let err = service(&store)
        .create(&second, request(&reception, vec![line(&product, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ReceptionUnavailable));
}

#[tokio::test]
async fn test_unavailable_product_blocks_creation_without_writes() {
    let store = common::memory_store().await;
    common::seed_order_numbering(&store).await;
    let user = common::seed_user(&store, "maria@example.com", "tok-1").await;
    let reception = common::seed_reception(&store, "T1", "MESA-01").await;
    let sold_out = common::seed_product(&store, "Ceviche", 50.0, 0).await;

    let err = service(&store)
        .create(&user, request(&reception, vec![line(&sold_out, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ProductsUnavailable));

    // Nothing was written and the reception stayed free
    assert_eq!(store.count(ORDER_COLLECTION, &Filter::new()).await.unwrap(), 0);
    let reception: Reception = store
        .get_by_id(&reception.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reception.available, 1);
}

#[tokio::test]
async fn test_dangling_product_reference_is_not_found() {
    let store = common::memory_store().await;
    common::seed_order_numbering(&store).await;
    let user = common::seed_user(&store, "maria@example.com", "tok-1").await;
    let reception = common::seed_reception(&store, "T1", "MESA-01").await;

    let err = service(&store)
        .create(
            &user,
            request(
                &reception,
                vec![OrderLine {
                    product: "products:doesnotexist".into(),
                    quantity: 1,
                }],
            ),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ProductsNotFound));
}

#[tokio::test]
async fn test_product_reference_into_other_collection_is_not_found() {
    let store = common::memory_store().await;
    common::seed_order_numbering(&store).await;
    let user = common::seed_user(&store, "maria@example.com", "tok-1").await;
    let reception = common::seed_reception(&store, "T1", "MESA-01").await;

    // A well-formed id pointing at a different collection must read as a
    // missing product, not as a store failure
    let foreign = user.id.clone().expect("seeded user id").to_string();
    let err = service(&store)
        .create(
            &user,
            request(
                &reception,
                vec![OrderLine {
                    product: foreign,
                    quantity: 1,
                }],
            ),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ProductsNotFound));
}

#[tokio::test]
async fn test_reception_reference_into_other_collection_is_not_found() {
    let store = common::memory_store().await;
    common::seed_order_numbering(&store).await;
    let user = common::seed_user(&store, "maria@example.com", "tok-1").await;
    let product = common::seed_product(&store, "Ceviche", 50.0, 1).await;

    let mut body = CreateOrderRequest {
        reception: product.id.clone().expect("seeded product id").to_string(),
        user_document_number: "12345678".into(),
        order_type: OrderType::InLocal,
        payment_method: PaymentMethod::Cash,
        order_channel: OrderChannel::App,
        items: vec![line(&product, 1)],
    };

    let err = service(&store).create(&user, body.clone()).await.unwrap_err();
    assert!(matches!(err, AppError::ReceptionNotFound));

    // Same taxonomy for an id that does not parse as a reference at all
    body.reception = "not a reference".into();
    let err = service(&store).create(&user, body).await.unwrap_err();
    assert!(matches!(err, AppError::ReceptionNotFound));
}

#[tokio::test]
async fn test_missing_numbering_configuration() {
    let store = common::memory_store().await;
    let user = common::seed_user(&store, "maria@example.com", "tok-1").await;
    let reception = common::seed_reception(&store, "T1", "MESA-01").await;
    let product = common::seed_product(&store, "Ceviche", 50.0, 1).await;

    let err = service(&store)
        .create(&user, request(&reception, vec![line(&product, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ConfigurationMissing(_)));
    assert_eq!(err.error_code(), "DOCUMENT_NOT_FOUND");

    // The lookup fails before the reservation, so the table stays free
    let reception: Reception = store
        .get_by_id(&reception.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reception.available, 1);
}

// ========== Lifecycle ==========

#[tokio::test]
async fn test_take_then_terminate() {
    let store = common::memory_store().await;
    common::seed_order_numbering(&store).await;
    let user = common::seed_user(&store, "maria@example.com", "tok-1").await;
    let reception = common::seed_reception(&store, "T1", "MESA-01").await;
    let product = common::seed_product(&store, "Ceviche", 50.0, 1).await;

    let created = service(&store)
        .create(&user, request(&reception, vec![line(&product, 1)]))
        .await
        .unwrap();
    let order_id = created.order.id.clone().unwrap().to_string();

    let taken = service(&store).mark_in_process(&order_id, 25).await.unwrap();
    assert_eq!(taken.status, OrderStatus::InProcess);
    assert_eq!(taken.estimated_time, Some(25));

    let outcome = service(&store).terminate(&order_id).await.unwrap();
    assert_eq!(outcome.order.status, OrderStatus::Terminated);
    assert!(outcome.order.end_date.is_some());
    assert!(outcome.notification_error.is_none());

    // Termination does not free the table; that is a separate staff action
    let reception: Reception = store
        .get_by_id(&reception.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reception.available, 0);
}

#[tokio::test]
async fn test_invalid_transitions_are_rejected() {
    let store = common::memory_store().await;
    common::seed_order_numbering(&store).await;
    let user = common::seed_user(&store, "maria@example.com", "tok-1").await;
    let reception = common::seed_reception(&store, "T1", "MESA-01").await;
    let product = common::seed_product(&store, "Ceviche", 50.0, 1).await;

    let created = service(&store)
        .create(&user, request(&reception, vec![line(&product, 1)]))
        .await
        .unwrap();
    let order_id = created.order.id.clone().unwrap().to_string();

    // Cannot terminate a pending order
    let err = service(&store).terminate(&order_id).await.unwrap_err();
    assert!(matches!(err, AppError::OrderNotInProcess));

    service(&store).mark_in_process(&order_id, 10).await.unwrap();

    // Cannot take it twice
    let err = service(&store).mark_in_process(&order_id, 10).await.unwrap_err();
    assert!(matches!(err, AppError::OrderAlreadyInProcess));

    service(&store).terminate(&order_id).await.unwrap();

    // Terminal state rejects everything
    let err = service(&store).mark_in_process(&order_id, 10).await.unwrap_err();
    assert!(matches!(err, AppError::OrderAlreadyTerminated));
    let err = service(&store).terminate(&order_id).await.unwrap_err();
    assert!(matches!(err, AppError::OrderAlreadyTerminated));
}

// ========== Views ==========

#[tokio::test]
async fn test_get_resolves_detail_lines() {
    let store = common::memory_store().await;
    common::seed_order_numbering(&store).await;
    let user = common::seed_user(&store, "maria@example.com", "tok-1").await;
    let reception = common::seed_reception(&store, "T1", "MESA-01").await;
    let ceviche = common::seed_product(&store, "Ceviche", 50.0, 1).await;
    let chicha = common::seed_product(&store, "Chicha", 30.0, 1).await;

    let created = service(&store)
        .create(&user, request(&reception, vec![line(&ceviche, 2), line(&chicha, 1)]))
        .await
        .unwrap();
    assert!(created.order.items.is_none());

    let order_id = created.order.id.clone().unwrap().to_string();
    let view = service(&store).get(&order_id).await.unwrap();

    let items = view.items.expect("detail lines resolved");
    assert_eq!(items.len(), 2);
    let total_units: u32 = items.iter().map(|item| item.quantity).sum();
    assert_eq!(total_units, 3);
    assert!(items.iter().all(|item| item.product.is_some()));

    let client = view.client.expect("client projected");
    assert_eq!(client.first_name, "Maria");
    let reception_view = view.reception.expect("reception projected");
    assert_eq!(reception_view.code, "MESA-01");
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let store = common::memory_store().await;
    common::seed_order_numbering(&store).await;
    let product = common::seed_product(&store, "Ceviche", 50.0, 1).await;

    let first_user = common::seed_user(&store, "a@example.com", "tok-a").await;
    let first_reception = common::seed_reception(&store, "T1", "MESA-01").await;
    let first = service(&store)
        .create(&first_user, request(&first_reception, vec![line(&product, 1)]))
        .await
        .unwrap();
    let first_id = first.order.id.clone().unwrap().to_string();
    service(&store).mark_in_process(&first_id, 15).await.unwrap();

    let second_user = common::seed_user(&store, "b@example.com", "tok-b").await;
    let second_reception = common::seed_reception(&store, "T2", "MESA-02").await;
    service(&store)
        .create(&second_user, request(&second_reception, vec![line(&product, 1)]))
        .await
        .unwrap();

    let pending = service(&store)
        .list(Some(1), PageRequest::new(10, 0))
        .await
        .unwrap();
    assert_eq!(pending.total_docs, 1);
    assert_eq!(pending.docs[0].status, OrderStatus::Pending);

    let all = service(&store).list(None, PageRequest::new(10, 0)).await.unwrap();
    assert_eq!(all.total_docs, 2);
    assert_eq!(all.total_pages, 1);
}

// ========== Reception cleanup after lifecycle ==========

#[tokio::test]
async fn test_released_reception_can_be_ordered_again() {
    let store = common::memory_store().await;
    common::seed_order_numbering(&store).await;
    let product = common::seed_product(&store, "Ceviche", 50.0, 1).await;
    let user = common::seed_user(&store, "a@example.com", "tok-a").await;
    let reception = common::seed_reception(&store, "T1", "MESA-01").await;

    let created = service(&store)
        .create(&user, request(&reception, vec![line(&product, 1)]))
        .await
        .unwrap();
    let order_id = created.order.id.clone().unwrap().to_string();
    service(&store).mark_in_process(&order_id, 10).await.unwrap();
    service(&store).terminate(&order_id).await.unwrap();

    // Staff frees the table
    let reception_ref = reception.id.clone().unwrap();
    let current: Reception = store.get_by_id(&reception_ref).await.unwrap().unwrap();
    let version = current.version;
    let mut freed = current;
    freed.available = 1;
    freed.version = version + 1;
    store
        .replace_if_version::<Reception, _>(&reception_ref, freed, version)
        .await
        .unwrap()
        .expect("free the table");

    let next_user = common::seed_user(&store, "b@example.com", "tok-b").await;
    let next = service(&store)
        .create(&next_user, request(&reception, vec![line(&product, 1)]))
        .await
        .unwrap();
    assert_eq!(next.order.order_number, "O001-00000002");
}
