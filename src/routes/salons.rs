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
    models::{Salon, SalonDetail},
    populate,
    response::ApiResponse,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSalonRequest {
    pub name: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub location: Uuid,
    pub staffs: Option<Vec<Uuid>>,
    pub services: Option<Vec<Uuid>>,
    pub combos: Option<Vec<Uuid>>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSalonRequest {
    pub name: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub location: Option<Uuid>,
    pub staffs: Option<Vec<Uuid>>,
    pub services: Option<Vec<Uuid>>,
    pub combos: Option<Vec<Uuid>>,
    pub reviews: Option<Vec<Uuid>>,
    pub images: Option<Vec<String>>,
    pub status: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SalonList {
    pub items: Vec<SalonDetail>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_salons).post(create_salon))
        .route(
            "/{id}",
            get(get_salon).put(update_salon).delete(delete_salon),
        )
}

async fn require_location(state: &AppState, id: Uuid) -> AppResult<()> {
    if populate::location_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::not_found("Location not found"));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/salons",
    responses(
        (status = 200, description = "List salons", body = ApiResponse<SalonList>),
    ),
    tag = "Salons"
)]
pub async fn list_salons(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<SalonList>>> {
    let salons = sqlx::query_as::<_, Salon>("SELECT * FROM salons ORDER BY created_at DESC")
        .fetch_all(&state.pool)
        .await?;

    let mut items = Vec::with_capacity(salons.len());
    for salon in salons {
        items.push(populate::salon_detail(&state.pool, salon).await?);
    }

    Ok(Json(ApiResponse::success(
        "Salons",
        SalonList { items },
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/salons/{id}",
    params(
        ("id" = Uuid, Path, description = "Salon ID")
    ),
    responses(
        (status = 200, description = "Salon", body = ApiResponse<SalonDetail>),
        (status = 404, description = "Salon not found"),
    ),
    tag = "Salons"
)]
pub async fn get_salon(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<SalonDetail>>> {
    let salon = populate::salon_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Salon not found"))?;

    let detail = populate::salon_detail(&state.pool, salon).await?;
    Ok(Json(ApiResponse::success("Salon", detail, None)))
}

#[utoipa::path(
    post,
    path = "/api/salons",
    request_body = CreateSalonRequest,
    responses(
        (status = 200, description = "Created salon", body = ApiResponse<Salon>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Location not found"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Salons"
)]
pub async fn create_salon(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateSalonRequest>,
) -> AppResult<Json<ApiResponse<Salon>>> {
    ensure_admin(&user)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation(vec![FieldError::new(
            "name",
            "Name is required",
        )]));
    }
    require_location(&state, payload.location).await?;

    let salon = sqlx::query_as::<_, Salon>(
        r#"
        INSERT INTO salons (id, name, logo, description, location_id, staffs, services, combos, images)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.trim())
    .bind(payload.logo)
    .bind(payload.description)
    .bind(payload.location)
    .bind(payload.staffs.unwrap_or_default())
    .bind(payload.services.unwrap_or_default())
    .bind(payload.combos.unwrap_or_default())
    .bind(payload.images.unwrap_or_default())
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success("Salon created", salon, None)))
}

#[utoipa::path(
    put,
    path = "/api/salons/{id}",
    params(
        ("id" = Uuid, Path, description = "Salon ID")
    ),
    request_body = UpdateSalonRequest,
    responses(
        (status = 200, description = "Updated salon", body = ApiResponse<Salon>),
        (status = 404, description = "Salon not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Salons"
)]
pub async fn update_salon(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSalonRequest>,
) -> AppResult<Json<ApiResponse<Salon>>> {
    ensure_admin(&user)?;
    if let Some(location) = payload.location {
        require_location(&state, location).await?;
    }

    let salon = sqlx::query_as::<_, Salon>(
        r#"
        UPDATE salons SET
            name = COALESCE($2, name),
            logo = COALESCE($3, logo),
            description = COALESCE($4, description),
            location_id = COALESCE($5, location_id),
            staffs = COALESCE($6, staffs),
            services = COALESCE($7, services),
            combos = COALESCE($8, combos),
            reviews = COALESCE($9, reviews),
            images = COALESCE($10, images),
            status = COALESCE($11, status),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.name)
    .bind(payload.logo)
    .bind(payload.description)
    .bind(payload.location)
    .bind(payload.staffs)
    .bind(payload.services)
    .bind(payload.combos)
    .bind(payload.reviews)
    .bind(payload.images)
    .bind(payload.status)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::not_found("Salon not found"))?;

    Ok(Json(ApiResponse::success("Salon updated", salon, None)))
}

#[utoipa::path(
    delete,
    path = "/api/salons/{id}",
    params(
        ("id" = Uuid, Path, description = "Salon ID")
    ),
    responses(
        (status = 200, description = "Salon removed"),
        (status = 404, description = "Salon not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Salons"
)]
pub async fn delete_salon(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_admin(&user)?;
    let result = sqlx::query("DELETE FROM salons WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Salon not found"));
    }
    Ok(Json(ApiResponse::message("Salon removed")))
}
