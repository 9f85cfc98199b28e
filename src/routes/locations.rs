use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::locations::{
        ActiveModel as LocationActive, Column as LocationCol, Entity as Locations,
        Model as LocationModel,
    },
    error::{AppError, AppResult, FieldError},
    middleware::auth::{AuthUser, ensure_admin},
    models::Location,
    response::ApiResponse,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLocationRequest {
    pub number: String,
    pub street: String,
    pub ward: String,
    pub district: String,
    pub city: String,
    pub map: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLocationRequest {
    pub number: Option<String>,
    pub street: Option<String>,
    pub ward: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub map: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationList {
    pub items: Vec<Location>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_locations).post(create_location))
        .route(
            "/{id}",
            get(get_location).put(update_location).delete(delete_location),
        )
}

fn location_from_entity(model: LocationModel) -> Location {
    Location {
        id: model.id,
        number: model.number,
        street: model.street,
        ward: model.ward,
        district: model.district,
        city: model.city,
        map: model.map,
        description: model.description,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn validate_location(payload: &CreateLocationRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let required = [
        ("number", &payload.number),
        ("street", &payload.street),
        ("ward", &payload.ward),
        ("district", &payload.district),
        ("city", &payload.city),
        ("map", &payload.map),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(FieldError::new(field, format!("{field} is required")));
        }
    }
    errors
}

#[utoipa::path(
    get,
    path = "/api/locations",
    responses(
        (status = 200, description = "List locations", body = ApiResponse<LocationList>),
    ),
    tag = "Locations"
)]
pub async fn list_locations(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<LocationList>>> {
    let items = Locations::find()
        .order_by_desc(LocationCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(location_from_entity)
        .collect();

    Ok(Json(ApiResponse::success(
        "Locations",
        LocationList { items },
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/locations/{id}",
    params(
        ("id" = Uuid, Path, description = "Location ID")
    ),
    responses(
        (status = 200, description = "Location", body = ApiResponse<Location>),
        (status = 404, description = "Location not found"),
    ),
    tag = "Locations"
)]
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Location>>> {
    let location = Locations::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Location not found"))?;

    Ok(Json(ApiResponse::success(
        "Location",
        location_from_entity(location),
        None,
    )))
}

#[utoipa::path(
    post,
    path = "/api/locations",
    request_body = CreateLocationRequest,
    responses(
        (status = 200, description = "Created location", body = ApiResponse<Location>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn create_location(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateLocationRequest>,
) -> AppResult<Json<ApiResponse<Location>>> {
    ensure_admin(&user)?;
    let errors = validate_location(&payload);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let location = LocationActive {
        id: Set(Uuid::new_v4()),
        number: Set(payload.number.trim().to_string()),
        street: Set(payload.street.trim().to_string()),
        ward: Set(payload.ward.trim().to_string()),
        district: Set(payload.district.trim().to_string()),
        city: Set(payload.city.trim().to_string()),
        map: Set(Some(payload.map.trim().to_string())),
        description: Set(payload.description),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    Ok(Json(ApiResponse::success(
        "Location created",
        location_from_entity(location),
        None,
    )))
}

#[utoipa::path(
    put,
    path = "/api/locations/{id}",
    params(
        ("id" = Uuid, Path, description = "Location ID")
    ),
    request_body = UpdateLocationRequest,
    responses(
        (status = 200, description = "Updated location", body = ApiResponse<Location>),
        (status = 404, description = "Location not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn update_location(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationRequest>,
) -> AppResult<Json<ApiResponse<Location>>> {
    ensure_admin(&user)?;

    let mut active = LocationActive {
        id: Set(id),
        ..Default::default()
    };
    if let Some(number) = payload.number {
        active.number = Set(number);
    }
    if let Some(street) = payload.street {
        active.street = Set(street);
    }
    if let Some(ward) = payload.ward {
        active.ward = Set(ward);
    }
    if let Some(district) = payload.district {
        active.district = Set(district);
    }
    if let Some(city) = payload.city {
        active.city = Set(city);
    }
    if let Some(map) = payload.map {
        active.map = Set(Some(map));
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    active.updated_at = Set(Utc::now().into());

    let location = match active.update(&state.orm).await {
        Ok(model) => model,
        Err(DbErr::RecordNotUpdated) => return Err(AppError::not_found("Location not found")),
        Err(err) => return Err(err.into()),
    };

    Ok(Json(ApiResponse::success(
        "Location updated",
        location_from_entity(location),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/locations/{id}",
    params(
        ("id" = Uuid, Path, description = "Location ID")
    ),
    responses(
        (status = 200, description = "Location removed"),
        (status = 404, description = "Location not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn delete_location(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_admin(&user)?;
    let result = Locations::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Location not found"));
    }
    Ok(Json(ApiResponse::message("Location removed")))
}
