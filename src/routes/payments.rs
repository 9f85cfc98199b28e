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
    entity::payments::{
        ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments,
        Model as PaymentModel,
    },
    error::{AppError, AppResult, FieldError},
    middleware::auth::{AuthUser, ensure_admin},
    models::Payment,
    response::ApiResponse,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePaymentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentList {
    pub items: Vec<Payment>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payments).post(create_payment))
        .route(
            "/{id}",
            get(get_payment).put(update_payment).delete(delete_payment),
        )
}

pub fn payment_from_entity(model: PaymentModel) -> Payment {
    Payment {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        description: model.description,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 200, description = "Created payment", body = ApiResponse<Payment>),
        (status = 400, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn create_payment(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if payload.email.trim().is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    }
    if payload.phone.trim().is_empty() {
        errors.push(FieldError::new("phone", "Phone is required"));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let payment = PaymentActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        email: Set(payload.email.trim().to_string()),
        phone: Set(payload.phone.trim().to_string()),
        description: Set(payload.description),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    Ok(Json(ApiResponse::success(
        "Payment created",
        payment_from_entity(payment),
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/payments",
    responses(
        (status = 200, description = "List payments", body = ApiResponse<PaymentList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PaymentList>>> {
    ensure_admin(&user)?;
    let items = Payments::find()
        .order_by_desc(PaymentCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(payment_from_entity)
        .collect();

    Ok(Json(ApiResponse::success(
        "Payments",
        PaymentList { items },
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    params(
        ("id" = Uuid, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Payment", body = ApiResponse<Payment>),
        (status = 404, description = "Payment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn get_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    ensure_admin(&user)?;
    let payment = Payments::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Payment not found"))?;

    Ok(Json(ApiResponse::success(
        "Payment",
        payment_from_entity(payment),
        None,
    )))
}

#[utoipa::path(
    put,
    path = "/api/payments/{id}",
    params(
        ("id" = Uuid, Path, description = "Payment ID")
    ),
    request_body = UpdatePaymentRequest,
    responses(
        (status = 200, description = "Updated payment", body = ApiResponse<Payment>),
        (status = 404, description = "Payment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn update_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePaymentRequest>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    ensure_admin(&user)?;

    let mut active = PaymentActive {
        id: Set(id),
        ..Default::default()
    };
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(phone);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    active.updated_at = Set(Utc::now().into());

    let payment = match active.update(&state.orm).await {
        Ok(model) => model,
        Err(DbErr::RecordNotUpdated) => return Err(AppError::not_found("Payment not found")),
        Err(err) => return Err(err.into()),
    };

    Ok(Json(ApiResponse::success(
        "Payment updated",
        payment_from_entity(payment),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/payments/{id}",
    params(
        ("id" = Uuid, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Payment removed"),
        (status = 404, description = "Payment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn delete_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_admin(&user)?;
    let result = Payments::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Payment not found"));
    }
    Ok(Json(ApiResponse::message("Payment removed")))
}
