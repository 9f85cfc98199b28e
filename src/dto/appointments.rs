use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::AppointmentDetail;

/// Payment details supplied inline when booking. A matching payment row
/// is created and linked in the same transaction as the appointment.
#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct PaymentInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub description: Option<String>,
}

/// `payment_info` on a booking is either the id of an existing payment
/// or an inline payment object.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PaymentInfoField {
    Existing(Uuid),
    Inline(PaymentInput),
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAppointmentRequest {
    pub date: NaiveDate,
    pub time_start: String,
    pub time_end: String,
    pub total_price: i64,
    pub actual_payment: Option<i64>,
    pub salon: Uuid,
    pub customer: Uuid,
    pub staff: Uuid,
    pub services: Option<Vec<Uuid>>,
    pub combos: Option<Vec<Uuid>>,
    pub payment_status: Option<String>,
    pub payment_method: String,
    pub payment_info: Option<PaymentInfoField>,
}

/// Partial update: absent fields keep their stored values.
#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct UpdateAppointmentRequest {
    pub date: Option<NaiveDate>,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub total_price: Option<i64>,
    pub actual_payment: Option<i64>,
    pub salon: Option<Uuid>,
    pub customer: Option<Uuid>,
    pub staff: Option<Uuid>,
    pub services: Option<Vec<Uuid>>,
    pub combos: Option<Vec<Uuid>>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub payment_info: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAppointmentStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentList {
    pub items: Vec<AppointmentDetail>,
}
