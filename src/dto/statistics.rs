use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Appointment, Service};

#[derive(Debug, Deserialize, ToSchema)]
pub struct DateRangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevenueReport {
    pub total_revenue: i64,
    pub actual_revenue: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfitReport {
    pub total_profit: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FinancialReport {
    pub total_revenue: i64,
    pub total_profit: i64,
    pub appointments: Vec<Appointment>,
}

/// One (year, month) bucket of paid appointments.
#[derive(Debug, Serialize, PartialEq, Eq, ToSchema)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub total_revenue: i64,
    pub actual_revenue: i64,
    pub appointments: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FinancialStats {
    pub months: Vec<MonthlyBucket>,
}

#[derive(Debug, Serialize, PartialEq, Eq, ToSchema)]
pub struct RegistrationBucket {
    pub year: i32,
    pub month: u32,
    pub registrations: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationStats {
    pub months: Vec<RegistrationBucket>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceCount {
    pub service: Service,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MostSelectedServices {
    pub items: Vec<ServiceCount>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AverageRevenue {
    pub average_total_price: f64,
    pub average_actual_payment: f64,
}
