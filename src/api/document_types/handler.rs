//! Document type API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::{parse_ref, validate_body};
use crate::core::ServerState;
use crate::models::{
    DOCUMENT_TYPE_COLLECTION, DocumentType, DocumentTypeCreate, DocumentTypeUpdate, Operation,
};
use crate::store::{Filter, Page, PageRequest, Sort};
use crate::utils::time::business_now;
use crate::utils::{ApiResponse, AppError, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub status: Option<u8>,
    pub operation: Option<Operation>,
}

/// GET /api/document-types
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<DocumentType>>>> {
    let mut filter = Filter::new();
    if let Some(status) = query.status {
        filter = filter.and("status", crate::store::Op::Eq, status);
    }
    if let Some(operation) = query.operation {
        let tag = match operation {
            Operation::Identity => "IDENTITY",
            Operation::Transaction => "TRANSACTION",
        };
        filter = filter.and("operation", crate::store::Op::Eq, tag);
    }

    let page = PageRequest::new(query.limit.unwrap_or(10), query.offset.unwrap_or(0));
    let document_types = state
        .store
        .get_page(
            DOCUMENT_TYPE_COLLECTION,
            &filter,
            Some(&Sort::asc("name")),
            page,
        )
        .await?;
    Ok(ok(document_types))
}

/// GET /api/document-types/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DocumentType>>> {
    let reference = parse_ref(DOCUMENT_TYPE_COLLECTION, &id)?;
    let document_type: DocumentType = state
        .store
        .get_by_id(&reference)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("document type {id}")))?;
    Ok(ok(document_type))
}

/// POST /api/document-types
pub async fn create(
    State(state): State<ServerState>,
    Json(body): Json<DocumentTypeCreate>,
) -> AppResult<Json<ApiResponse<DocumentType>>> {
    validate_body(&body)?;

    let duplicate: Option<DocumentType> = state
        .store
        .get_one(
            DOCUMENT_TYPE_COLLECTION,
            &Filter::field_eq("code", body.code.clone()),
        )
        .await?;
    if duplicate.is_some() {
        return Err(AppError::Duplicate(format!("document type '{}'", body.code)));
    }

    // Transactional types start their counter at zero; identity types
    // carry no counter at all
    let sequential = match body.operation {
        Operation::Transaction => Some(0),
        Operation::Identity => None,
    };

    let now = business_now();
    let document_type = DocumentType {
        id: None,
        name: body.name,
        code: body.code,
        operation: body.operation,
        regex: body.regex,
        sequential,
        length: body.length,
        status: 1,
        version: 0,
        created_date: now,
        updated_date: now,
    };
    let created: DocumentType = state
        .store
        .insert(DOCUMENT_TYPE_COLLECTION, document_type)
        .await?;
    Ok(ok_with_message(created, "Document type registered successfully"))
}

/// PUT /api/document-types/{id}
///
/// The `sequential` counter is never writable here; it only moves through
/// the numbering path.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<DocumentTypeUpdate>,
) -> AppResult<Json<ApiResponse<DocumentType>>> {
    validate_body(&body)?;

    let reference = parse_ref(DOCUMENT_TYPE_COLLECTION, &id)?;
    let existing: DocumentType = state
        .store
        .get_by_id(&reference)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("document type {id}")))?;

    if let Some(code) = &body.code
        && *code != existing.code
    {
        let duplicate: Option<DocumentType> = state
            .store
            .get_one(
                DOCUMENT_TYPE_COLLECTION,
                &Filter::field_eq("code", code.clone()),
            )
            .await?;
        if duplicate.is_some() {
            return Err(AppError::Duplicate(format!("document type '{code}'")));
        }
    }

    let updated = DocumentType {
        id: existing.id.clone(),
        name: body.name.unwrap_or(existing.name),
        code: body.code.unwrap_or(existing.code),
        operation: existing.operation,
        regex: body.regex.or(existing.regex),
        sequential: existing.sequential,
        length: body.length.or(existing.length),
        status: body.status.unwrap_or(existing.status),
        version: existing.version + 1,
        created_date: existing.created_date,
        updated_date: business_now(),
    };
    // Versioned write so an admin edit cannot clobber a concurrent
    // counter increment
    let updated: DocumentType = state
        .store
        .replace_if_version(&reference, updated, existing.version)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("document type {id}")))?;
    Ok(ok_with_message(updated, "Document type updated successfully"))
}
