//! Reception API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::{parse_ref, validate_body};
use crate::core::ServerState;
use crate::models::{RECEPTION_COLLECTION, Reception, ReceptionCreate, ReceptionUpdate};
use crate::store::{Filter, Page, PageRequest, Sort};
use crate::utils::time::business_now;
use crate::utils::{ApiResponse, AppError, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub status: Option<u8>,
    pub available: Option<u8>,
    pub requires_attention: Option<u8>,
}

/// GET /api/receptions
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<Reception>>>> {
    let mut filter = Filter::new();
    if let Some(status) = query.status {
        filter = filter.and("status", crate::store::Op::Eq, status);
    }
    if let Some(available) = query.available {
        filter = filter.and("available", crate::store::Op::Eq, available);
    }
    if let Some(requires_attention) = query.requires_attention {
        filter = filter.and("requires_attention", crate::store::Op::Eq, requires_attention);
    }

    let page = PageRequest::new(query.limit.unwrap_or(10), query.offset.unwrap_or(0));
    let receptions = state
        .store
        .get_page(
            RECEPTION_COLLECTION,
            &filter,
            Some(&Sort::asc("number_table")),
            page,
        )
        .await?;
    Ok(ok(receptions))
}

/// GET /api/receptions/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Reception>>> {
    let reference = parse_ref(RECEPTION_COLLECTION, &id)?;
    let reception: Reception = state
        .store
        .get_by_id(&reference)
        .await?
        .ok_or(AppError::ReceptionNotFound)?;
    Ok(ok(reception))
}

/// POST /api/receptions
pub async fn create(
    State(state): State<ServerState>,
    Json(body): Json<ReceptionCreate>,
) -> AppResult<Json<ApiResponse<Reception>>> {
    validate_body(&body)?;

    ensure_number_table_free(&state, &body.number_table).await?;
    ensure_code_free(&state, &body.code).await?;

    let now = business_now();
    let reception = Reception {
        id: None,
        number_table: body.number_table,
        code: body.code,
        status: 1,
        available: 1,
        requires_attention: 0,
        version: 0,
        created_date: now,
        updated_date: now,
    };
    let created: Reception = state.store.insert(RECEPTION_COLLECTION, reception).await?;
    Ok(ok_with_message(created, "Reception registered successfully"))
}

/// PUT /api/receptions/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<ReceptionUpdate>,
) -> AppResult<Json<ApiResponse<Reception>>> {
    validate_body(&body)?;

    let reference = parse_ref(RECEPTION_COLLECTION, &id)?;
    let existing: Reception = state
        .store
        .get_by_id(&reference)
        .await?
        .ok_or(AppError::ReceptionNotFound)?;

    if let Some(number_table) = &body.number_table
        && *number_table != existing.number_table
    {
        ensure_number_table_free(&state, number_table).await?;
    }
    if let Some(code) = &body.code
        && *code != existing.code
    {
        ensure_code_free(&state, code).await?;
    }

    let updated = Reception {
        id: existing.id.clone(),
        number_table: body.number_table.unwrap_or(existing.number_table),
        code: body.code.unwrap_or(existing.code),
        status: body.status.unwrap_or(existing.status),
        available: body.available.unwrap_or(existing.available),
        requires_attention: existing.requires_attention,
        version: existing.version + 1,
        created_date: existing.created_date,
        updated_date: business_now(),
    };
    // Versioned write: a concurrent reservation wins over a stale admin edit
    let updated: Reception = state
        .store
        .replace_if_version(&reference, updated, existing.version)
        .await?
        .ok_or(AppError::ReceptionUnavailable)?;
    Ok(ok_with_message(updated, "Reception updated successfully"))
}

/// PUT /api/receptions/{id}/call
pub async fn call_attention(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Reception>>> {
    set_attention(&state, &id, 1, "Attention requested").await
}

/// PUT /api/receptions/{id}/attend
pub async fn attend(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Reception>>> {
    set_attention(&state, &id, 0, "Reception attended").await
}

async fn set_attention(
    state: &ServerState,
    id: &str,
    requires_attention: u8,
    message: &str,
) -> AppResult<Json<ApiResponse<Reception>>> {
    let reference = parse_ref(RECEPTION_COLLECTION, id)?;
    let existing: Reception = state
        .store
        .get_by_id(&reference)
        .await?
        .ok_or(AppError::ReceptionNotFound)?;
    if !existing.is_enabled() {
        return Err(AppError::ReceptionDisabled);
    }

    let updated = Reception {
        requires_attention,
        version: existing.version + 1,
        updated_date: business_now(),
        ..existing.clone()
    };
    let updated: Reception = state
        .store
        .replace_if_version(&reference, updated, existing.version)
        .await?
        .ok_or(AppError::ReceptionUnavailable)?;
    Ok(ok_with_message(updated, message))
}

async fn ensure_number_table_free(state: &ServerState, number_table: &str) -> AppResult<()> {
    let duplicate: Option<Reception> = state
        .store
        .get_one(
            RECEPTION_COLLECTION,
            &Filter::field_eq("number_table", number_table.to_string()),
        )
        .await?;
    if duplicate.is_some() {
        return Err(AppError::Duplicate(format!("reception table '{number_table}'")));
    }
    Ok(())
}

async fn ensure_code_free(state: &ServerState, code: &str) -> AppResult<()> {
    let duplicate: Option<Reception> = state
        .store
        .get_one(
            RECEPTION_COLLECTION,
            &Filter::field_eq("code", code.to_string()),
        )
        .await?;
    if duplicate.is_some() {
        return Err(AppError::Duplicate(format!("reception code '{code}'")));
    }
    Ok(())
}
