use std::collections::HashMap;

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
    models::{Category, CategoryDetail, Service},
    populate,
    response::ApiResponse,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub category: String,
    pub description: Option<String>,
    pub services: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub category: Option<String>,
    pub description: Option<String>,
    pub services: Option<Vec<Uuid>>,
    pub status: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<CategoryDetail>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

fn detail_from(category: Category, by_id: &HashMap<Uuid, Service>) -> CategoryDetail {
    CategoryDetail {
        id: category.id,
        category: category.category,
        description: category.description,
        services: category
            .services
            .iter()
            .filter_map(|id| by_id.get(id).cloned())
            .collect(),
        status: category.status,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List categories", body = ApiResponse<CategoryList>),
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let categories =
        sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY created_at DESC")
            .fetch_all(&state.pool)
            .await?;

    let mut service_ids: Vec<Uuid> = categories
        .iter()
        .flat_map(|c| c.services.clone())
        .collect();
    service_ids.sort();
    service_ids.dedup();

    let services = populate::services_by_ids(&state.pool, &service_ids).await?;
    let by_id: HashMap<Uuid, Service> = services.into_iter().map(|s| (s.id, s)).collect();

    let items = categories
        .into_iter()
        .map(|category| detail_from(category, &by_id))
        .collect();

    Ok(Json(ApiResponse::success(
        "Categories",
        CategoryList { items },
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category", body = ApiResponse<CategoryDetail>),
        (status = 404, description = "Category not found"),
    ),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CategoryDetail>>> {
    let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))?;

    let services = populate::services_by_ids(&state.pool, &category.services).await?;
    let by_id: HashMap<Uuid, Service> = services.into_iter().map(|s| (s.id, s)).collect();

    Ok(Json(ApiResponse::success(
        "Category",
        detail_from(category, &by_id),
        None,
    )))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Created category", body = ApiResponse<Category>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    ensure_admin(&user)?;
    if payload.category.trim().is_empty() {
        return Err(AppError::Validation(vec![FieldError::new(
            "category",
            "Category is required",
        )]));
    }

    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (id, category, description, services)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.category.trim())
    .bind(payload.description)
    .bind(payload.services.unwrap_or_default())
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success(
        "Category created",
        category,
        None,
    )))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Updated category", body = ApiResponse<Category>),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    ensure_admin(&user)?;

    let category = sqlx::query_as::<_, Category>(
        r#"
        UPDATE categories SET
            category = COALESCE($2, category),
            description = COALESCE($3, description),
            services = COALESCE($4, services),
            status = COALESCE($5, status),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.category)
    .bind(payload.description)
    .bind(payload.services)
    .bind(payload.status)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::not_found("Category not found"))?;

    Ok(Json(ApiResponse::success(
        "Category updated",
        category,
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category removed"),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_admin(&user)?;
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Category not found"));
    }
    Ok(Json(ApiResponse::message("Category removed")))
}
