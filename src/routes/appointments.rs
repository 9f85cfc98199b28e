use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::appointments::{
        AppointmentList, CreateAppointmentRequest, UpdateAppointmentRequest,
        UpdateAppointmentStatusRequest,
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::AppointmentDetail,
    response::ApiResponse,
    services::appointment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments).post(create_appointment))
        .route("/by-account/{id}", get(list_by_account))
        .route("/{id}/status", put(update_appointment_status))
        .route(
            "/{id}",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 200, description = "Created appointment", body = ApiResponse<AppointmentDetail>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Payment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateAppointmentRequest>,
) -> AppResult<Json<ApiResponse<AppointmentDetail>>> {
    let resp = appointment_service::create_appointment(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/appointments",
    responses(
        (status = 200, description = "List appointments", body = ApiResponse<AppointmentList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AppointmentList>>> {
    let resp = appointment_service::list_appointments(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    params(
        ("id" = Uuid, Path, description = "Appointment ID")
    ),
    responses(
        (status = 200, description = "Appointment", body = ApiResponse<AppointmentDetail>),
        (status = 404, description = "Appointment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<AppointmentDetail>>> {
    let resp = appointment_service::get_appointment(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/appointments/by-account/{id}",
    params(
        ("id" = Uuid, Path, description = "Customer account ID")
    ),
    responses(
        (status = 200, description = "Appointments for the account", body = ApiResponse<AppointmentList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn list_by_account(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<AppointmentList>>> {
    let resp = appointment_service::list_by_account(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/appointments/{id}",
    params(
        ("id" = Uuid, Path, description = "Appointment ID")
    ),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Updated appointment", body = ApiResponse<AppointmentDetail>),
        (status = 400, description = "Invalid Status"),
        (status = 404, description = "Appointment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentRequest>,
) -> AppResult<Json<ApiResponse<AppointmentDetail>>> {
    let resp = appointment_service::update_appointment(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/appointments/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Appointment ID")
    ),
    request_body = UpdateAppointmentStatusRequest,
    responses(
        (status = 200, description = "Updated appointment", body = ApiResponse<AppointmentDetail>),
        (status = 400, description = "Invalid Status"),
        (status = 404, description = "Appointment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn update_appointment_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentStatusRequest>,
) -> AppResult<Json<ApiResponse<AppointmentDetail>>> {
    let resp = appointment_service::update_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    params(
        ("id" = Uuid, Path, description = "Appointment ID")
    ),
    responses(
        (status = 200, description = "Appointment removed"),
        (status = 404, description = "Appointment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn delete_appointment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_admin(&user)?;
    let resp = appointment_service::delete_appointment(&state, id).await?;
    Ok(Json(resp))
}
