use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, FieldError},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Combo, ComboDetail},
    populate,
    response::ApiResponse,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateComboRequest {
    pub name: String,
    pub price: i64,
    pub services: Vec<Uuid>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateComboRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub services: Option<Vec<Uuid>>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
    pub status: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComboList {
    pub items: Vec<ComboDetail>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_combos).post(create_combo))
        .route(
            "/{id}",
            get(get_combo).put(update_combo).delete(delete_combo),
        )
}

#[utoipa::path(
    get,
    path = "/api/combos",
    responses(
        (status = 200, description = "List combos", body = ApiResponse<ComboList>),
    ),
    tag = "Combos"
)]
pub async fn list_combos(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ComboList>>> {
    let ids: Vec<(Uuid,)> = sqlx::query_as("SELECT id FROM combos ORDER BY created_at DESC")
        .fetch_all(&state.pool)
        .await?;
    let ids: Vec<Uuid> = ids.into_iter().map(|r| r.0).collect();

    let items = populate::combo_details(&state.pool, &ids).await?;
    Ok(Json(ApiResponse::success(
        "Combos",
        ComboList { items },
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/combos/{id}",
    params(
        ("id" = Uuid, Path, description = "Combo ID")
    ),
    responses(
        (status = 200, description = "Combo", body = ApiResponse<ComboDetail>),
        (status = 404, description = "Combo not found"),
    ),
    tag = "Combos"
)]
pub async fn get_combo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ComboDetail>>> {
    let combo = populate::combo_details(&state.pool, &[id])
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("Combo not found"))?;

    Ok(Json(ApiResponse::success("Combo", combo, None)))
}

#[utoipa::path(
    post,
    path = "/api/combos",
    request_body = CreateComboRequest,
    responses(
        (status = 200, description = "Created combo", body = ApiResponse<Combo>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Combos"
)]
pub async fn create_combo(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateComboRequest>,
) -> AppResult<Json<ApiResponse<Combo>>> {
    ensure_admin(&user)?;

    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if payload.price < 0 {
        errors.push(FieldError::new("price", "Price must not be negative"));
    }
    if payload.services.is_empty() {
        errors.push(FieldError::new(
            "services",
            "Combo requires at least one service",
        ));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let combo = sqlx::query_as::<_, Combo>(
        r#"
        INSERT INTO combos (id, name, price, images, services, description)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.trim())
    .bind(payload.price)
    .bind(payload.images.unwrap_or_default())
    .bind(payload.services)
    .bind(payload.description)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success("Combo created", combo, None)))
}

#[utoipa::path(
    put,
    path = "/api/combos/{id}",
    params(
        ("id" = Uuid, Path, description = "Combo ID")
    ),
    request_body = UpdateComboRequest,
    responses(
        (status = 200, description = "Updated combo", body = ApiResponse<Combo>),
        (status = 404, description = "Combo not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Combos"
)]
pub async fn update_combo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateComboRequest>,
) -> AppResult<Json<ApiResponse<Combo>>> {
    ensure_admin(&user)?;
    if let Some(services) = payload.services.as_ref() {
        if services.is_empty() {
            return Err(AppError::Validation(vec![FieldError::new(
                "services",
                "Combo requires at least one service",
            )]));
        }
    }

    let combo = sqlx::query_as::<_, Combo>(
        r#"
        UPDATE combos SET
            name = COALESCE($2, name),
            price = COALESCE($3, price),
            services = COALESCE($4, services),
            images = COALESCE($5, images),
            description = COALESCE($6, description),
            status = COALESCE($7, status),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.name)
    .bind(payload.price)
    .bind(payload.services)
    .bind(payload.images)
    .bind(payload.description)
    .bind(payload.status)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::not_found("Combo not found"))?;

    Ok(Json(ApiResponse::success("Combo updated", combo, None)))
}

#[utoipa::path(
    delete,
    path = "/api/combos/{id}",
    params(
        ("id" = Uuid, Path, description = "Combo ID")
    ),
    responses(
        (status = 200, description = "Combo removed"),
        (status = 404, description = "Combo not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Combos"
)]
pub async fn delete_combo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_admin(&user)?;
    let result = sqlx::query("DELETE FROM combos WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Combo not found"));
    }
    Ok(Json(ApiResponse::message("Combo removed")))
}
