use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::appointments::{
        AppointmentList, CreateAppointmentRequest, PaymentInfoField, UpdateAppointmentRequest,
        UpdateAppointmentStatusRequest,
    },
    error::{AppError, AppResult, FieldError},
    middleware::auth::{AuthUser, ensure_staff_or_admin},
    models::{Appointment, AppointmentDetail},
    populate,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const APPOINTMENT_STATUSES: [&str; 4] = ["Pending", "Confirmed", "Completed", "Cancelled"];
pub const PAYMENT_STATUSES: [&str; 3] = ["Pending", "Paid", "Failed"];

pub fn validate_appointment_status(status: &str) -> Result<(), AppError> {
    if APPOINTMENT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid Status".into()))
    }
}

pub fn validate_payment_status(status: &str) -> Result<(), AppError> {
    if PAYMENT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid Payment Status".into()))
    }
}

fn validate_booking(payload: &CreateAppointmentRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if payload.time_start.trim().is_empty() {
        errors.push(FieldError::new("time_start", "Start time is required"));
    }
    if payload.time_end.trim().is_empty() {
        errors.push(FieldError::new("time_end", "End time is required"));
    }
    if payload.payment_method.trim().is_empty() {
        errors.push(FieldError::new(
            "payment_method",
            "Payment method is required",
        ));
    }
    if let Some(status) = payload.payment_status.as_deref() {
        if !PAYMENT_STATUSES.contains(&status) {
            errors.push(FieldError::new("payment_status", "Invalid Payment Status"));
        }
    }
    errors
}

/// Resolve every reference on an appointment before it is returned.
async fn to_detail(pool: &DbPool, appointment: Appointment) -> AppResult<AppointmentDetail> {
    let salon = populate::salon_by_id(pool, appointment.salon_id).await?;
    let customer = populate::account_summary(pool, appointment.customer_id).await?;
    let staff = populate::account_summary(pool, appointment.staff_id).await?;
    let services = populate::services_by_ids(pool, &appointment.services).await?;
    let combos = populate::combo_details(pool, &appointment.combos).await?;
    let payment_info = match appointment.payment_info {
        Some(id) => populate::payment_by_id(pool, id).await?,
        None => None,
    };

    Ok(AppointmentDetail {
        id: appointment.id,
        date: appointment.date,
        time_start: appointment.time_start,
        time_end: appointment.time_end,
        total_price: appointment.total_price,
        actual_payment: appointment.actual_payment,
        salon,
        customer,
        staff,
        services,
        combos,
        status: appointment.status,
        payment_status: appointment.payment_status,
        payment_method: appointment.payment_method,
        payment_info,
        created_at: appointment.created_at,
        updated_at: appointment.updated_at,
    })
}

/// Book an appointment. An inline payment object is persisted and linked
/// in the same transaction, so a failing second write leaves no orphan.
pub async fn create_appointment(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAppointmentRequest,
) -> AppResult<ApiResponse<AppointmentDetail>> {
    let errors = validate_booking(&payload);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let mut txn = state.pool.begin().await?;

    let payment_info = match payload.payment_info {
        None => None,
        Some(PaymentInfoField::Existing(id)) => {
            let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM payments WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *txn)
                .await?;
            if exists.is_none() {
                return Err(AppError::not_found("Payment not found"));
            }
            Some(id)
        }
        Some(PaymentInfoField::Inline(input)) => {
            let payment_id = Uuid::new_v4();
            sqlx::query(
                "INSERT INTO payments (id, name, email, phone, description) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(payment_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.description)
            .execute(&mut *txn)
            .await?;
            Some(payment_id)
        }
    };

    let appointment: Appointment = sqlx::query_as(
        r#"
        INSERT INTO appointments
            (id, date, time_start, time_end, total_price, actual_payment,
             salon_id, customer_id, staff_id, services, combos,
             payment_status, payment_method, payment_info)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                COALESCE($12, 'Pending'), $13, $14)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.date)
    .bind(payload.time_start.trim())
    .bind(payload.time_end.trim())
    .bind(payload.total_price)
    .bind(payload.actual_payment.unwrap_or(0))
    .bind(payload.salon)
    .bind(payload.customer)
    .bind(payload.staff)
    .bind(payload.services.unwrap_or_default())
    .bind(payload.combos.unwrap_or_default())
    .bind(payload.payment_status.as_deref())
    .bind(payload.payment_method.trim())
    .bind(payment_info)
    .fetch_one(&mut *txn)
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.account_id),
        "appointment_create",
        Some("appointments"),
        Some(serde_json::json!({ "appointment_id": appointment.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let detail = to_detail(&state.pool, appointment).await?;
    Ok(ApiResponse::success(
        "Appointment created",
        detail,
        Some(Meta::empty()),
    ))
}

pub async fn list_appointments(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AppointmentList>> {
    ensure_staff_or_admin(user)?;
    let appointments =
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments ORDER BY created_at DESC")
            .fetch_all(&state.pool)
            .await?;

    let total = appointments.len() as i64;
    let mut items = Vec::with_capacity(appointments.len());
    for appointment in appointments {
        items.push(to_detail(&state.pool, appointment).await?);
    }

    Ok(ApiResponse::success(
        "Appointments",
        AppointmentList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn get_appointment(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<AppointmentDetail>> {
    let appointment =
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.pool)
            .await?;
    let appointment = match appointment {
        Some(a) => a,
        None => return Err(AppError::not_found("Appointment not found")),
    };

    let detail = to_detail(&state.pool, appointment).await?;
    Ok(ApiResponse::success("Appointment", detail, None))
}

pub async fn list_by_account(
    state: &AppState,
    customer_id: Uuid,
) -> AppResult<ApiResponse<AppointmentList>> {
    let appointments = sqlx::query_as::<_, Appointment>(
        "SELECT * FROM appointments WHERE customer_id = $1 ORDER BY created_at DESC",
    )
    .bind(customer_id)
    .fetch_all(&state.pool)
    .await?;

    let total = appointments.len() as i64;
    let mut items = Vec::with_capacity(appointments.len());
    for appointment in appointments {
        items.push(to_detail(&state.pool, appointment).await?);
    }

    Ok(ApiResponse::success(
        "Appointments",
        AppointmentList { items },
        Some(Meta::new(1, total, total)),
    ))
}

/// Partial update; absent fields keep their stored values. A single
/// conditional UPDATE avoids the lost-update window of load-mutate-save.
pub async fn update_appointment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateAppointmentRequest,
) -> AppResult<ApiResponse<AppointmentDetail>> {
    ensure_staff_or_admin(user)?;
    if let Some(status) = payload.status.as_deref() {
        validate_appointment_status(status)?;
    }
    if let Some(status) = payload.payment_status.as_deref() {
        validate_payment_status(status)?;
    }

    let appointment: Option<Appointment> = sqlx::query_as(
        r#"
        UPDATE appointments SET
            date = COALESCE($2, date),
            time_start = COALESCE($3, time_start),
            time_end = COALESCE($4, time_end),
            total_price = COALESCE($5, total_price),
            actual_payment = COALESCE($6, actual_payment),
            salon_id = COALESCE($7, salon_id),
            customer_id = COALESCE($8, customer_id),
            staff_id = COALESCE($9, staff_id),
            services = COALESCE($10, services),
            combos = COALESCE($11, combos),
            status = COALESCE($12, status),
            payment_status = COALESCE($13, payment_status),
            payment_method = COALESCE($14, payment_method),
            payment_info = COALESCE($15, payment_info),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.date)
    .bind(payload.time_start)
    .bind(payload.time_end)
    .bind(payload.total_price)
    .bind(payload.actual_payment)
    .bind(payload.salon)
    .bind(payload.customer)
    .bind(payload.staff)
    .bind(payload.services)
    .bind(payload.combos)
    .bind(payload.status)
    .bind(payload.payment_status)
    .bind(payload.payment_method)
    .bind(payload.payment_info)
    .fetch_optional(&state.pool)
    .await?;

    let appointment = match appointment {
        Some(a) => a,
        None => return Err(AppError::not_found("Appointment not found")),
    };

    let detail = to_detail(&state.pool, appointment).await?;
    Ok(ApiResponse::success(
        "Appointment updated",
        detail,
        Some(Meta::empty()),
    ))
}

/// Status workflow: Pending -> Confirmed -> Completed, Cancelled from any
/// non-terminal state; the stored value is always one of the four statuses.
pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateAppointmentStatusRequest,
) -> AppResult<ApiResponse<AppointmentDetail>> {
    ensure_staff_or_admin(user)?;
    validate_appointment_status(&payload.status)?;

    let appointment: Option<Appointment> = sqlx::query_as(
        "UPDATE appointments SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&payload.status)
    .fetch_optional(&state.pool)
    .await?;
    let appointment = match appointment {
        Some(a) => a,
        None => return Err(AppError::not_found("Appointment not found")),
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.account_id),
        "appointment_status_update",
        Some("appointments"),
        Some(serde_json::json!({ "appointment_id": appointment.id, "status": appointment.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let detail = to_detail(&state.pool, appointment).await?;
    Ok(ApiResponse::success(
        "Appointment updated",
        detail,
        Some(Meta::empty()),
    ))
}

pub async fn delete_appointment(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Appointment not found"));
    }
    Ok(ApiResponse::message("Appointment removed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exactly_the_four_statuses() {
        for status in APPOINTMENT_STATUSES {
            assert!(validate_appointment_status(status).is_ok());
        }
        assert!(validate_appointment_status("Done").is_err());
        assert!(validate_appointment_status("pending").is_err());
        assert!(validate_appointment_status("").is_err());
    }

    #[test]
    fn payment_statuses_are_an_independent_axis() {
        for status in PAYMENT_STATUSES {
            assert!(validate_payment_status(status).is_ok());
        }
        assert!(validate_payment_status("Confirmed").is_err());
    }

    #[test]
    fn booking_validation_reports_missing_fields() {
        let payload = CreateAppointmentRequest {
            date: chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            time_start: "".into(),
            time_end: "10:30".into(),
            total_price: 5000,
            actual_payment: None,
            salon: Uuid::new_v4(),
            customer: Uuid::new_v4(),
            staff: Uuid::new_v4(),
            services: None,
            combos: None,
            payment_status: Some("Settled".into()),
            payment_method: "cash".into(),
            payment_info: None,
        };
        let errors = validate_booking(&payload);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["time_start", "payment_status"]);
    }
}
