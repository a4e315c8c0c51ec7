//! Shared fixtures for integration tests
#![allow(dead_code)]

use comanda::models::{
    DOCUMENT_TYPE_COLLECTION, DocumentType, Operation, PRODUCT_COLLECTION, Product,
    RECEPTION_COLLECTION, Reception, USER_COLLECTION, User, UserToken,
};
use comanda::store::Client;
use comanda::utils::time::business_now;

pub async fn memory_store() -> Client {
    Client::memory().await.expect("in-memory store")
}

pub async fn seed_user(store: &Client, email: &str, token: &str) -> User {
    let user = User {
        id: None,
        first_name: "Maria".into(),
        last_name: "Quispe".into(),
        second_last_name: None,
        email: email.into(),
        status: 1,
        verified: 1,
        tokens: vec![UserToken {
            access_token: token.into(),
        }],
    };
    store.insert(USER_COLLECTION, user).await.expect("seed user")
}

pub async fn seed_reception(store: &Client, number_table: &str, code: &str) -> Reception {
    let now = business_now();
    let reception = Reception {
        id: None,
        number_table: number_table.into(),
        code: code.into(),
        status: 1,
        available: 1,
        requires_attention: 0,
        version: 0,
        created_date: now,
        updated_date: now,
    };
    store
        .insert(RECEPTION_COLLECTION, reception)
        .await
        .expect("seed reception")
}

pub async fn seed_product(store: &Client, name: &str, price: f64, available: u8) -> Product {
    let now = business_now();
    let product = Product {
        id: None,
        name: name.into(),
        description: String::new(),
        price,
        category: None,
        status: 1,
        available,
        created_date: now,
        updated_date: now,
    };
    store
        .insert(PRODUCT_COLLECTION, product)
        .await
        .expect("seed product")
}

/// The transactional numbering record orders draw their serials from
pub async fn seed_order_numbering(store: &Client) -> DocumentType {
    let now = business_now();
    let document_type = DocumentType {
        id: None,
        name: "Orden".into(),
        code: "O001".into(),
        operation: Operation::Transaction,
        regex: None,
        sequential: Some(0),
        length: Some(8),
        status: 1,
        version: 0,
        created_date: now,
        updated_date: now,
    };
    store
        .insert(DOCUMENT_TYPE_COLLECTION, document_type)
        .await
        .expect("seed numbering")
}
