//! Product API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use surrealdb::RecordId;

use crate::api::{parse_ref, validate_body};
use crate::core::ServerState;
use crate::models::{
    CATEGORY_COLLECTION, Category, PRODUCT_COLLECTION, Product, ProductCreate, ProductUpdate,
};
use crate::store::{Filter, Page, PageRequest, Sort};
use crate::utils::time::business_now;
use crate::utils::{ApiResponse, AppError, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub status: Option<u8>,
    pub available: Option<u8>,
    /// Category id string
    pub category: Option<String>,
}

/// GET /api/products
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<Product>>>> {
    let mut filter = Filter::new();
    if let Some(status) = query.status {
        filter = filter.and("status", crate::store::Op::Eq, status);
    }
    if let Some(available) = query.available {
        filter = filter.and("available", crate::store::Op::Eq, available);
    }
    if let Some(category) = &query.category {
        let reference = parse_ref(CATEGORY_COLLECTION, category)?;
        filter = filter.and("category", crate::store::Op::Eq, reference);
    }

    let page = PageRequest::new(query.limit.unwrap_or(10), query.offset.unwrap_or(0));
    let products = state
        .store
        .get_page(PRODUCT_COLLECTION, &filter, Some(&Sort::asc("name")), page)
        .await?;
    Ok(ok(products))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let reference = parse_ref(PRODUCT_COLLECTION, &id)?;
    let product: Product = state
        .store
        .get_by_id(&reference)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(ok(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Json(body): Json<ProductCreate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    validate_body(&body)?;

    let duplicate: Option<Product> = state
        .store
        .get_one(PRODUCT_COLLECTION, &Filter::field_eq("name", body.name.clone()))
        .await?;
    if duplicate.is_some() {
        return Err(AppError::Duplicate(format!("product '{}'", body.name)));
    }

    let category = match &body.category {
        Some(category) => Some(resolve_category(&state, category).await?),
        None => None,
    };

    let now = business_now();
    let product = Product {
        id: None,
        name: body.name,
        description: body.description,
        price: body.price,
        category,
        status: 1,
        available: 1,
        created_date: now,
        updated_date: now,
    };
    let created: Product = state.store.insert(PRODUCT_COLLECTION, product).await?;
    Ok(ok_with_message(created, "Product registered successfully"))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<ProductUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    validate_body(&body)?;

    let reference = parse_ref(PRODUCT_COLLECTION, &id)?;
    let existing: Product = state
        .store
        .get_by_id(&reference)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    if let Some(name) = &body.name
        && *name != existing.name
    {
        let duplicate: Option<Product> = state
            .store
            .get_one(PRODUCT_COLLECTION, &Filter::field_eq("name", name.clone()))
            .await?;
        if duplicate.is_some() {
            return Err(AppError::Duplicate(format!("product '{name}'")));
        }
    }

    let category = match &body.category {
        Some(category) => Some(resolve_category(&state, category).await?),
        None => existing.category.clone(),
    };

    let updated = Product {
        id: existing.id.clone(),
        name: body.name.unwrap_or(existing.name),
        description: body.description.unwrap_or(existing.description),
        price: body.price.unwrap_or(existing.price),
        category,
        status: body.status.unwrap_or(existing.status),
        available: body.available.unwrap_or(existing.available),
        created_date: existing.created_date,
        updated_date: business_now(),
    };
    let updated: Product = state
        .store
        .replace(&reference, updated)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(ok_with_message(updated, "Product updated successfully"))
}

/// A product's category must point at an existing record
async fn resolve_category(state: &ServerState, id: &str) -> AppResult<RecordId> {
    let reference = parse_ref(CATEGORY_COLLECTION, id)?;
    state
        .store
        .get_by_id::<Category>(&reference)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;
    Ok(reference)
}
