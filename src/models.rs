use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Account as exposed by the API. Password hash and refresh token
/// never leave the persistence layer.
#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub role: String,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The short account projection attached to populated references
/// (customer, staff) instead of the full record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct AccountSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Location {
    pub id: Uuid,
    pub number: String,
    pub street: String,
    pub ward: String,
    pub district: String,
    pub city: String,
    pub map: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    /// Duration in minutes.
    pub duration: i32,
    pub images: Vec<String>,
    pub description: Option<String>,
    pub reviews: Vec<Uuid>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Combo {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub images: Vec<String>,
    pub services: Vec<Uuid>,
    pub description: Option<String>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Combo with its service references resolved.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComboDetail {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub images: Vec<String>,
    pub services: Vec<Service>,
    pub description: Option<String>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub category: String,
    pub description: Option<String>,
    pub services: Vec<Uuid>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryDetail {
    pub id: Uuid,
    pub category: String,
    pub description: Option<String>,
    pub services: Vec<Service>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Salon {
    pub id: Uuid,
    pub name: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub location_id: Uuid,
    pub staffs: Vec<Uuid>,
    pub services: Vec<Uuid>,
    pub combos: Vec<Uuid>,
    pub reviews: Vec<Uuid>,
    pub images: Vec<String>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Salon with every reference list resolved.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SalonDetail {
    pub id: Uuid,
    pub name: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub location: Option<Location>,
    pub staffs: Vec<AccountSummary>,
    pub services: Vec<Service>,
    pub combos: Vec<Combo>,
    pub reviews: Vec<ReviewDetail>,
    pub images: Vec<String>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time_start: String,
    pub time_end: String,
    pub total_price: i64,
    pub actual_payment: i64,
    pub salon_id: Uuid,
    pub customer_id: Uuid,
    pub staff_id: Uuid,
    pub services: Vec<Uuid>,
    pub combos: Vec<Uuid>,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub payment_info: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Appointment with salon, customer, staff, services, combos and the
/// linked payment resolved before returning to the caller.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentDetail {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time_start: String,
    pub time_end: String,
    pub total_price: i64,
    pub actual_payment: i64,
    pub salon: Option<Salon>,
    pub customer: Option<AccountSummary>,
    pub staff: Option<AccountSummary>,
    pub services: Vec<Service>,
    pub combos: Vec<ComboDetail>,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub payment_info: Option<Payment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub customer_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewDetail {
    pub id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub customer: Option<AccountSummary>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct ShowTime {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time_start: String,
    pub time_end: String,
    pub staff_id: Uuid,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShowTimeDetail {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time_start: String,
    pub time_end: String,
    pub staff: Option<AccountSummary>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub question: String,
    pub answer: Option<String>,
    pub customer_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactDetail {
    pub id: Uuid,
    pub question: String,
    pub answer: Option<String>,
    pub customer: Option<AccountSummary>,
    pub staff: Option<AccountSummary>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
