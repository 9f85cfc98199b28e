use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, FieldError},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Review, ReviewDetail, Service},
    populate,
    response::ApiResponse,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateServiceRequest {
    pub name: String,
    pub price: i64,
    /// Duration in minutes.
    pub duration: i32,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub duration: Option<i32>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
    pub reviews: Option<Vec<Uuid>>,
    pub status: Option<bool>,
}

/// Service with its review references resolved.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceWithReviews {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub duration: i32,
    pub images: Vec<String>,
    pub description: Option<String>,
    pub reviews: Vec<Review>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Single-service view: reviews carry the reviewing customer as well.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceWithReviewDetails {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub duration: i32,
    pub images: Vec<String>,
    pub description: Option<String>,
    pub reviews: Vec<ReviewDetail>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceList {
    pub items: Vec<ServiceWithReviews>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route(
            "/{id}",
            get(get_service).put(update_service).delete(delete_service),
        )
}

#[utoipa::path(
    get,
    path = "/api/services",
    responses(
        (status = 200, description = "List services", body = ApiResponse<ServiceList>),
    ),
    tag = "Services"
)]
pub async fn list_services(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ServiceList>>> {
    let services =
        sqlx::query_as::<_, Service>("SELECT * FROM services ORDER BY created_at DESC")
            .fetch_all(&state.pool)
            .await?;

    let mut review_ids: Vec<Uuid> = services.iter().flat_map(|s| s.reviews.clone()).collect();
    review_ids.sort();
    review_ids.dedup();

    let reviews = populate::reviews_by_ids(&state.pool, &review_ids).await?;
    let mut by_id: HashMap<Uuid, Review> = reviews.into_iter().map(|r| (r.id, r)).collect();

    let items = services
        .into_iter()
        .map(|service| ServiceWithReviews {
            id: service.id,
            name: service.name,
            price: service.price,
            duration: service.duration,
            images: service.images,
            description: service.description,
            reviews: service
                .reviews
                .iter()
                .filter_map(|id| by_id.remove(id))
                .collect(),
            status: service.status,
            created_at: service.created_at,
            updated_at: service.updated_at,
        })
        .collect();

    Ok(Json(ApiResponse::success(
        "Services",
        ServiceList { items },
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/services/{id}",
    params(
        ("id" = Uuid, Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "Service", body = ApiResponse<ServiceWithReviewDetails>),
        (status = 404, description = "Service not found"),
    ),
    tag = "Services"
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ServiceWithReviewDetails>>> {
    let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Service not found"))?;

    let reviews = populate::review_details(&state.pool, &service.reviews).await?;
    let data = ServiceWithReviewDetails {
        id: service.id,
        name: service.name,
        price: service.price,
        duration: service.duration,
        images: service.images,
        description: service.description,
        reviews,
        status: service.status,
        created_at: service.created_at,
        updated_at: service.updated_at,
    };

    Ok(Json(ApiResponse::success("Service", data, None)))
}

#[utoipa::path(
    post,
    path = "/api/services",
    request_body = CreateServiceRequest,
    responses(
        (status = 200, description = "Created service", body = ApiResponse<Service>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
pub async fn create_service(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateServiceRequest>,
) -> AppResult<Json<ApiResponse<Service>>> {
    ensure_admin(&user)?;

    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if payload.price < 0 {
        errors.push(FieldError::new("price", "Price must not be negative"));
    }
    if payload.duration <= 0 {
        errors.push(FieldError::new("duration", "Duration must be positive"));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let service = sqlx::query_as::<_, Service>(
        r#"
        INSERT INTO services (id, name, price, duration, images, description)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.trim())
    .bind(payload.price)
    .bind(payload.duration)
    .bind(payload.images.unwrap_or_default())
    .bind(payload.description)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success("Service created", service, None)))
}

#[utoipa::path(
    put,
    path = "/api/services/{id}",
    params(
        ("id" = Uuid, Path, description = "Service ID")
    ),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Updated service", body = ApiResponse<Service>),
        (status = 404, description = "Service not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
pub async fn update_service(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateServiceRequest>,
) -> AppResult<Json<ApiResponse<Service>>> {
    ensure_admin(&user)?;

    let service = sqlx::query_as::<_, Service>(
        r#"
        UPDATE services SET
            name = COALESCE($2, name),
            price = COALESCE($3, price),
            duration = COALESCE($4, duration),
            images = COALESCE($5, images),
            description = COALESCE($6, description),
            reviews = COALESCE($7, reviews),
            status = COALESCE($8, status),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.name)
    .bind(payload.price)
    .bind(payload.duration)
    .bind(payload.images)
    .bind(payload.description)
    .bind(payload.reviews)
    .bind(payload.status)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::not_found("Service not found"))?;

    Ok(Json(ApiResponse::success("Service updated", service, None)))
}

#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    params(
        ("id" = Uuid, Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "Service removed"),
        (status = 404, description = "Service not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
pub async fn delete_service(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_admin(&user)?;
    let result = sqlx::query("DELETE FROM services WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Service not found"));
    }
    Ok(Json(ApiResponse::message("Service removed")))
}
