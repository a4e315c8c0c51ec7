//! Category API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::{parse_ref, validate_body};
use crate::core::ServerState;
use crate::models::{CATEGORY_COLLECTION, Category, CategoryCreate, CategoryUpdate};
use crate::store::{Filter, Page, PageRequest, Sort};
use crate::utils::time::business_now;
use crate::utils::{ApiResponse, AppError, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub status: Option<u8>,
}

/// GET /api/categories
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<Category>>>> {
    let filter = match query.status {
        Some(status) => Filter::field_eq("status", status),
        None => Filter::new(),
    };
    let page = PageRequest::new(query.limit.unwrap_or(10), query.offset.unwrap_or(0));
    let categories = state
        .store
        .get_page(CATEGORY_COLLECTION, &filter, Some(&Sort::asc("name")), page)
        .await?;
    Ok(ok(categories))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let reference = parse_ref(CATEGORY_COLLECTION, &id)?;
    let category: Category = state
        .store
        .get_by_id(&reference)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;
    Ok(ok(category))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    Json(body): Json<CategoryCreate>,
) -> AppResult<Json<ApiResponse<Category>>> {
    validate_body(&body)?;

    let duplicate: Option<Category> = state
        .store
        .get_one(CATEGORY_COLLECTION, &Filter::field_eq("name", body.name.clone()))
        .await?;
    if duplicate.is_some() {
        return Err(AppError::Duplicate(format!("category '{}'", body.name)));
    }

    let now = business_now();
    let category = Category {
        id: None,
        name: body.name,
        description: body.description,
        status: 1,
        created_date: now,
        updated_date: now,
    };
    let created: Category = state.store.insert(CATEGORY_COLLECTION, category).await?;
    Ok(ok_with_message(created, "Category registered successfully"))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<CategoryUpdate>,
) -> AppResult<Json<ApiResponse<Category>>> {
    validate_body(&body)?;

    let reference = parse_ref(CATEGORY_COLLECTION, &id)?;
    let existing: Category = state
        .store
        .get_by_id(&reference)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;

    if let Some(name) = &body.name
        && *name != existing.name
    {
        let duplicate: Option<Category> = state
            .store
            .get_one(CATEGORY_COLLECTION, &Filter::field_eq("name", name.clone()))
            .await?;
        if duplicate.is_some() {
            return Err(AppError::Duplicate(format!("category '{name}'")));
        }
    }

    let updated = Category {
        id: existing.id.clone(),
        name: body.name.unwrap_or(existing.name),
        description: body.description.unwrap_or(existing.description),
        status: body.status.unwrap_or(existing.status),
        created_date: existing.created_date,
        updated_date: business_now(),
    };
    let updated: Category = state
        .store
        .replace(&reference, updated)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;
    Ok(ok_with_message(updated, "Category updated successfully"))
}
