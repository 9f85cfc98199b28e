use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::show_times::{
        ActiveModel as ShowTimeActive, Column as ShowTimeCol, Entity as ShowTimes,
        Model as ShowTimeModel,
    },
    error::{AppError, AppResult, FieldError},
    middleware::auth::{AuthUser, ensure_admin},
    models::{ShowTime, ShowTimeDetail},
    populate,
    response::ApiResponse,
    routes::params::ShowTimeQuery,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShowTimeRequest {
    pub date: NaiveDate,
    pub time_start: String,
    pub time_end: String,
    pub staff: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateShowTimeRequest {
    pub date: Option<NaiveDate>,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub staff: Option<Uuid>,
    pub status: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShowTimeList {
    pub items: Vec<ShowTimeDetail>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_show_times).post(create_show_time))
        .route(
            "/{id}",
            get(get_show_time)
                .put(update_show_time)
                .delete(delete_show_time),
        )
}

fn show_time_from_entity(model: ShowTimeModel) -> ShowTime {
    ShowTime {
        id: model.id,
        date: model.date,
        time_start: model.time_start,
        time_end: model.time_end,
        staff_id: model.staff_id,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

async fn detail_for(state: &AppState, show_time: ShowTime) -> AppResult<ShowTimeDetail> {
    let staff = populate::account_summary(&state.pool, show_time.staff_id).await?;
    Ok(ShowTimeDetail {
        id: show_time.id,
        date: show_time.date,
        time_start: show_time.time_start,
        time_end: show_time.time_end,
        staff,
        status: show_time.status,
        created_at: show_time.created_at,
        updated_at: show_time.updated_at,
    })
}

#[utoipa::path(
    get,
    path = "/api/show-times",
    params(
        ("date" = Option<NaiveDate>, Query, description = "Restrict to show-times on this day")
    ),
    responses(
        (status = 200, description = "List show-times", body = ApiResponse<ShowTimeList>),
    ),
    tag = "ShowTimes"
)]
pub async fn list_show_times(
    State(state): State<AppState>,
    Query(query): Query<ShowTimeQuery>,
) -> AppResult<Json<ApiResponse<ShowTimeList>>> {
    let mut finder = ShowTimes::find().order_by_asc(ShowTimeCol::Date);
    if let Some(date) = query.date {
        finder = finder.filter(ShowTimeCol::Date.eq(date));
    }

    let show_times: Vec<ShowTime> = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(show_time_from_entity)
        .collect();

    let mut items = Vec::with_capacity(show_times.len());
    for show_time in show_times {
        items.push(detail_for(&state, show_time).await?);
    }

    Ok(Json(ApiResponse::success(
        "Show times",
        ShowTimeList { items },
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/show-times/{id}",
    params(
        ("id" = Uuid, Path, description = "Show-time ID")
    ),
    responses(
        (status = 200, description = "Show-time", body = ApiResponse<ShowTimeDetail>),
        (status = 404, description = "Show time not found"),
    ),
    tag = "ShowTimes"
)]
pub async fn get_show_time(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ShowTimeDetail>>> {
    let show_time = ShowTimes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Show time not found"))?;

    let detail = detail_for(&state, show_time_from_entity(show_time)).await?;
    Ok(Json(ApiResponse::success("Show time", detail, None)))
}

#[utoipa::path(
    post,
    path = "/api/show-times",
    request_body = CreateShowTimeRequest,
    responses(
        (status = 200, description = "Created show-time", body = ApiResponse<ShowTime>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "ShowTimes"
)]
pub async fn create_show_time(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateShowTimeRequest>,
) -> AppResult<Json<ApiResponse<ShowTime>>> {
    ensure_admin(&user)?;

    let mut errors = Vec::new();
    if payload.time_start.trim().is_empty() {
        errors.push(FieldError::new("time_start", "time_start is required"));
    }
    if payload.time_end.trim().is_empty() {
        errors.push(FieldError::new("time_end", "time_end is required"));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let staff = populate::account_summary(&state.pool, payload.staff).await?;
    if staff.is_none() {
        return Err(AppError::not_found("Staff not found"));
    }

    let show_time = ShowTimeActive {
        id: Set(Uuid::new_v4()),
        date: Set(payload.date),
        time_start: Set(payload.time_start.trim().to_string()),
        time_end: Set(payload.time_end.trim().to_string()),
        staff_id: Set(payload.staff),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    Ok(Json(ApiResponse::success(
        "Show time created",
        show_time_from_entity(show_time),
        None,
    )))
}

#[utoipa::path(
    put,
    path = "/api/show-times/{id}",
    params(
        ("id" = Uuid, Path, description = "Show-time ID")
    ),
    request_body = UpdateShowTimeRequest,
    responses(
        (status = 200, description = "Updated show-time", body = ApiResponse<ShowTime>),
        (status = 404, description = "Show time not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "ShowTimes"
)]
pub async fn update_show_time(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateShowTimeRequest>,
) -> AppResult<Json<ApiResponse<ShowTime>>> {
    ensure_admin(&user)?;

    let mut active = ShowTimeActive {
        id: Set(id),
        ..Default::default()
    };
    if let Some(date) = payload.date {
        active.date = Set(date);
    }
    if let Some(time_start) = payload.time_start {
        active.time_start = Set(time_start);
    }
    if let Some(time_end) = payload.time_end {
        active.time_end = Set(time_end);
    }
    if let Some(staff) = payload.staff {
        active.staff_id = Set(staff);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now().into());

    let show_time = match active.update(&state.orm).await {
        Ok(model) => model,
        Err(DbErr::RecordNotUpdated) => return Err(AppError::not_found("Show time not found")),
        Err(err) => return Err(err.into()),
    };

    Ok(Json(ApiResponse::success(
        "Show time updated",
        show_time_from_entity(show_time),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/show-times/{id}",
    params(
        ("id" = Uuid, Path, description = "Show-time ID")
    ),
    responses(
        (status = 200, description = "Show time removed"),
        (status = 404, description = "Show time not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "ShowTimes"
)]
pub async fn delete_show_time(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_admin(&user)?;
    let result = ShowTimes::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Show time not found"));
    }
    Ok(Json(ApiResponse::message("Show time removed")))
}
