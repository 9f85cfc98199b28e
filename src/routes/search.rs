use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{AccountSummary, Combo, Salon, Service},
    populate,
    response::ApiResponse,
    routes::params::SearchQuery,
    state::AppState,
};

/// One salon's name-matched services, combos and staff.
#[derive(Debug, Serialize, ToSchema)]
pub struct SalonSearchResult {
    pub id: Uuid,
    pub name: String,
    pub logo: Option<String>,
    pub services: Vec<Service>,
    pub combos: Vec<Combo>,
    pub staffs: Vec<AccountSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResults {
    pub items: Vec<SalonSearchResult>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_all))
        .route("/{salon_id}", get(search_salon))
}

fn required_query(query: SearchQuery) -> AppResult<String> {
    match query.query {
        Some(q) if !q.trim().is_empty() => Ok(q.trim().to_lowercase()),
        _ => Err(AppError::BadRequest("Query is required".into())),
    }
}

async fn result_for(state: &AppState, salon: Salon, needle: &str) -> AppResult<SalonSearchResult> {
    let services = populate::services_by_ids(&state.pool, &salon.services)
        .await?
        .into_iter()
        .filter(|s| s.name.to_lowercase().contains(needle))
        .collect();
    let combos = populate::combos_by_ids(&state.pool, &salon.combos)
        .await?
        .into_iter()
        .filter(|c| c.name.to_lowercase().contains(needle))
        .collect();
    let staffs = populate::account_summaries(&state.pool, &salon.staffs)
        .await?
        .into_iter()
        .filter(|a| a.name.to_lowercase().contains(needle))
        .collect();

    Ok(SalonSearchResult {
        id: salon.id,
        name: salon.name,
        logo: salon.logo,
        services,
        combos,
        staffs,
    })
}

#[utoipa::path(
    get,
    path = "/api/search",
    params(
        ("query" = String, Query, description = "Case-insensitive name substring")
    ),
    responses(
        (status = 200, description = "Matches across all salons", body = ApiResponse<SearchResults>),
        (status = 400, description = "Query is required"),
    ),
    tag = "Search"
)]
pub async fn search_all(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<SearchResults>>> {
    let needle = required_query(query)?;

    let salons = sqlx::query_as::<_, Salon>("SELECT * FROM salons ORDER BY created_at DESC")
        .fetch_all(&state.pool)
        .await?;

    let mut items = Vec::with_capacity(salons.len());
    for salon in salons {
        items.push(result_for(&state, salon, &needle).await?);
    }

    Ok(Json(ApiResponse::success(
        "Search results",
        SearchResults { items },
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/search/{salon_id}",
    params(
        ("salon_id" = Uuid, Path, description = "Salon ID"),
        ("query" = String, Query, description = "Case-insensitive name substring"),
    ),
    responses(
        (status = 200, description = "Matches within one salon", body = ApiResponse<SalonSearchResult>),
        (status = 404, description = "Salon not found"),
    ),
    tag = "Search"
)]
pub async fn search_salon(
    State(state): State<AppState>,
    Path(salon_id): Path<Uuid>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<SalonSearchResult>>> {
    let needle = required_query(query)?;

    let salon = populate::salon_by_id(&state.pool, salon_id)
        .await?
        .ok_or_else(|| AppError::not_found("Salon not found"))?;

    let result = result_for(&state, salon, &needle).await?;
    Ok(Json(ApiResponse::success("Search results", result, None)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_required() {
        assert!(required_query(SearchQuery { query: None }).is_err());
        assert!(required_query(SearchQuery {
            query: Some("  ".into())
        })
        .is_err());
        assert_eq!(
            required_query(SearchQuery {
                query: Some("  CUT ".into())
            })
            .unwrap(),
            "cut"
        );
    }
}
