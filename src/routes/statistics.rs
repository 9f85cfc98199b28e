use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::statistics::{
        AverageRevenue, DateRangeQuery, FinancialReport, FinancialStats, MostSelectedServices,
        ProfitReport, RegistrationStats, RevenueReport,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::statistic_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/revenue", get(revenue))
        .route("/revenue/{salon_id}", get(revenue_by_salon))
        .route("/profit", get(profit))
        .route("/profit/{salon_id}", get(profit_by_salon))
        .route("/financial-report", get(financial_report))
        .route("/financial-report/{salon_id}", get(financial_report_by_salon))
        .route("/financial-stats", get(financial_stats))
        .route("/registration-stats", get(registration_stats))
        .route("/most-service", get(most_service))
        .route(
            "/average-revenue-per-appointment",
            get(average_revenue_per_appointment),
        )
}

#[utoipa::path(
    get,
    path = "/api/statistics/revenue",
    params(
        ("start_date" = String, Query, description = "Range start (YYYY-MM-DD)"),
        ("end_date" = String, Query, description = "Range end (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Revenue over paid appointments", body = ApiResponse<RevenueReport>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn revenue(
    State(state): State<AppState>,
    user: AuthUser,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<RevenueReport>>> {
    let resp = statistic_service::revenue_report(&state, &user, range, None).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/statistics/revenue/{salon_id}",
    params(
        ("salon_id" = Uuid, Path, description = "Salon ID"),
        ("start_date" = String, Query, description = "Range start (YYYY-MM-DD)"),
        ("end_date" = String, Query, description = "Range end (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Revenue for one salon", body = ApiResponse<RevenueReport>),
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn revenue_by_salon(
    State(state): State<AppState>,
    user: AuthUser,
    Path(salon_id): Path<Uuid>,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<RevenueReport>>> {
    let resp = statistic_service::revenue_report(&state, &user, range, Some(salon_id)).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/statistics/profit",
    params(
        ("start_date" = String, Query, description = "Range start (YYYY-MM-DD)"),
        ("end_date" = String, Query, description = "Range end (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Profit over paid appointments", body = ApiResponse<ProfitReport>),
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn profit(
    State(state): State<AppState>,
    user: AuthUser,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<ProfitReport>>> {
    let resp = statistic_service::profit_report(&state, &user, range, None).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/statistics/profit/{salon_id}",
    params(
        ("salon_id" = Uuid, Path, description = "Salon ID"),
        ("start_date" = String, Query, description = "Range start (YYYY-MM-DD)"),
        ("end_date" = String, Query, description = "Range end (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Profit for one salon", body = ApiResponse<ProfitReport>),
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn profit_by_salon(
    State(state): State<AppState>,
    user: AuthUser,
    Path(salon_id): Path<Uuid>,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<ProfitReport>>> {
    let resp = statistic_service::profit_report(&state, &user, range, Some(salon_id)).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/statistics/financial-report",
    params(
        ("start_date" = String, Query, description = "Range start (YYYY-MM-DD)"),
        ("end_date" = String, Query, description = "Range end (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Totals plus matching appointments", body = ApiResponse<FinancialReport>),
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn financial_report(
    State(state): State<AppState>,
    user: AuthUser,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<FinancialReport>>> {
    let resp = statistic_service::financial_report(&state, &user, range, None).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/statistics/financial-report/{salon_id}",
    params(
        ("salon_id" = Uuid, Path, description = "Salon ID"),
        ("start_date" = String, Query, description = "Range start (YYYY-MM-DD)"),
        ("end_date" = String, Query, description = "Range end (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Totals plus matching appointments for one salon", body = ApiResponse<FinancialReport>),
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn financial_report_by_salon(
    State(state): State<AppState>,
    user: AuthUser,
    Path(salon_id): Path<Uuid>,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<FinancialReport>>> {
    let resp = statistic_service::financial_report(&state, &user, range, Some(salon_id)).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/statistics/financial-stats",
    params(
        ("start_date" = String, Query, description = "Range start (YYYY-MM-DD)"),
        ("end_date" = String, Query, description = "Range end (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Monthly revenue buckets", body = ApiResponse<FinancialStats>),
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn financial_stats(
    State(state): State<AppState>,
    user: AuthUser,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<FinancialStats>>> {
    let resp = statistic_service::financial_stats(&state, &user, range).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/statistics/registration-stats",
    responses(
        (status = 200, description = "Monthly registration buckets", body = ApiResponse<RegistrationStats>),
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn registration_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<RegistrationStats>>> {
    let resp = statistic_service::registration_stats(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/statistics/most-service",
    params(
        ("start_date" = String, Query, description = "Range start (YYYY-MM-DD)"),
        ("end_date" = String, Query, description = "Range end (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Services ranked by selection count", body = ApiResponse<MostSelectedServices>),
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn most_service(
    State(state): State<AppState>,
    user: AuthUser,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<MostSelectedServices>>> {
    let resp = statistic_service::most_selected_service(&state, &user, range).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/statistics/average-revenue-per-appointment",
    params(
        ("start_date" = String, Query, description = "Range start (YYYY-MM-DD)"),
        ("end_date" = String, Query, description = "Range end (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Mean revenue per paid appointment", body = ApiResponse<AverageRevenue>),
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn average_revenue_per_appointment(
    State(state): State<AppState>,
    user: AuthUser,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<AverageRevenue>>> {
    let resp = statistic_service::average_revenue_per_appointment(&state, &user, range).await?;
    Ok(Json(resp))
}
