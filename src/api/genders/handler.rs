//! Gender API handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::models::{GENDER_COLLECTION, Gender, GenderPublic};
use crate::store::{Filter, Sort};
use crate::utils::{ApiResponse, AppResult, ok};

/// GET /api/genders
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Gender>>>> {
    let genders = state
        .store
        .get_many(GENDER_COLLECTION, &Filter::new(), Some(&Sort::asc("name")))
        .await?;
    Ok(ok(genders))
}

/// GET /api/genders/public
///
/// Enabled entries only, projected down to id and name.
pub async fn public_list(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<GenderPublic>>>> {
    let genders: Vec<Gender> = state
        .store
        .get_many(
            GENDER_COLLECTION,
            &Filter::field_eq("status", 1u8),
            Some(&Sort::asc("name")),
        )
        .await?;
    Ok(ok(genders.into_iter().map(GenderPublic::from).collect()))
}
