use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

use crate::{
    dto::statistics::{
        AverageRevenue, DateRangeQuery, FinancialReport, FinancialStats, MonthlyBucket,
        MostSelectedServices, ProfitReport, RegistrationBucket, RegistrationStats, RevenueReport,
        ServiceCount,
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_staff_or_admin},
    models::Appointment,
    populate,
    response::ApiResponse,
    state::AppState,
};

/// The slice of a paid appointment the reports aggregate over.
#[derive(Debug, sqlx::FromRow)]
pub struct PaidAppointmentRow {
    pub total_price: i64,
    pub actual_payment: i64,
    pub created_at: DateTime<Utc>,
    pub services: Vec<Uuid>,
}

async fn fetch_paid_rows(
    state: &AppState,
    range: &DateRangeQuery,
    salon_id: Option<Uuid>,
) -> AppResult<Vec<PaidAppointmentRow>> {
    let rows = sqlx::query_as::<_, PaidAppointmentRow>(
        r#"
        SELECT total_price, actual_payment, created_at, services
        FROM appointments
        WHERE date >= $1 AND date <= $2
          AND payment_status = 'Paid'
          AND ($3::uuid IS NULL OR salon_id = $3)
        "#,
    )
    .bind(range.start_date)
    .bind(range.end_date)
    .bind(salon_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(rows)
}

async fn fetch_paid_appointments(
    state: &AppState,
    range: &DateRangeQuery,
    salon_id: Option<Uuid>,
) -> AppResult<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, Appointment>(
        r#"
        SELECT *
        FROM appointments
        WHERE date >= $1 AND date <= $2
          AND payment_status = 'Paid'
          AND ($3::uuid IS NULL OR salon_id = $3)
        "#,
    )
    .bind(range.start_date)
    .bind(range.end_date)
    .bind(salon_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(rows)
}

fn revenue_totals(rows: &[PaidAppointmentRow]) -> (i64, i64) {
    let total_revenue = rows.iter().map(|r| r.total_price).sum();
    let actual_revenue = rows.iter().map(|r| r.actual_payment).sum();
    (total_revenue, actual_revenue)
}

/// Profit keeps the source convention: actual payment minus total price.
fn total_profit(rows: &[PaidAppointmentRow]) -> i64 {
    let (total_revenue, actual_revenue) = revenue_totals(rows);
    actual_revenue - total_revenue
}

/// Group paid appointments by (year, month) of their creation time,
/// chronologically sorted.
fn monthly_buckets(rows: &[PaidAppointmentRow]) -> Vec<MonthlyBucket> {
    let mut buckets: BTreeMap<(i32, u32), (i64, i64, i64)> = BTreeMap::new();
    for row in rows {
        let key = (row.created_at.year(), row.created_at.month());
        let entry = buckets.entry(key).or_default();
        entry.0 += row.total_price;
        entry.1 += row.actual_payment;
        entry.2 += 1;
    }
    buckets
        .into_iter()
        .map(
            |((year, month), (total_revenue, actual_revenue, appointments))| MonthlyBucket {
                year,
                month,
                total_revenue,
                actual_revenue,
                appointments,
            },
        )
        .collect()
}

fn registration_buckets(timestamps: &[DateTime<Utc>]) -> Vec<RegistrationBucket> {
    let mut buckets: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for created_at in timestamps {
        *buckets.entry((created_at.year(), created_at.month())).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|((year, month), registrations)| RegistrationBucket {
            year,
            month,
            registrations,
        })
        .collect()
}

/// Occurrence count per service id across the paid set, ranked descending.
/// The relative order of tied services is unspecified.
fn rank_service_counts(rows: &[PaidAppointmentRow]) -> Vec<(Uuid, i64)> {
    let mut counts: HashMap<Uuid, i64> = HashMap::new();
    for row in rows {
        for service_id in &row.services {
            *counts.entry(*service_id).or_default() += 1;
        }
    }
    let mut ranked: Vec<(Uuid, i64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

fn average_revenue(rows: &[PaidAppointmentRow]) -> AverageRevenue {
    if rows.is_empty() {
        return AverageRevenue {
            average_total_price: 0.0,
            average_actual_payment: 0.0,
        };
    }
    let (total_revenue, actual_revenue) = revenue_totals(rows);
    let n = rows.len() as f64;
    AverageRevenue {
        average_total_price: total_revenue as f64 / n,
        average_actual_payment: actual_revenue as f64 / n,
    }
}

pub async fn revenue_report(
    state: &AppState,
    user: &AuthUser,
    range: DateRangeQuery,
    salon_id: Option<Uuid>,
) -> AppResult<ApiResponse<RevenueReport>> {
    ensure_staff_or_admin(user)?;
    let rows = fetch_paid_rows(state, &range, salon_id).await?;
    let (total_revenue, actual_revenue) = revenue_totals(&rows);
    Ok(ApiResponse::success(
        "Revenue",
        RevenueReport {
            total_revenue,
            actual_revenue,
        },
        None,
    ))
}

pub async fn profit_report(
    state: &AppState,
    user: &AuthUser,
    range: DateRangeQuery,
    salon_id: Option<Uuid>,
) -> AppResult<ApiResponse<ProfitReport>> {
    ensure_staff_or_admin(user)?;
    let rows = fetch_paid_rows(state, &range, salon_id).await?;
    Ok(ApiResponse::success(
        "Profit",
        ProfitReport {
            total_profit: total_profit(&rows),
        },
        None,
    ))
}

pub async fn financial_report(
    state: &AppState,
    user: &AuthUser,
    range: DateRangeQuery,
    salon_id: Option<Uuid>,
) -> AppResult<ApiResponse<FinancialReport>> {
    ensure_staff_or_admin(user)?;
    let appointments = fetch_paid_appointments(state, &range, salon_id).await?;
    let total_revenue = appointments.iter().map(|a| a.total_price).sum::<i64>();
    let actual_revenue = appointments.iter().map(|a| a.actual_payment).sum::<i64>();
    Ok(ApiResponse::success(
        "Financial report",
        FinancialReport {
            total_revenue,
            total_profit: actual_revenue - total_revenue,
            appointments,
        },
        None,
    ))
}

pub async fn financial_stats(
    state: &AppState,
    user: &AuthUser,
    range: DateRangeQuery,
) -> AppResult<ApiResponse<FinancialStats>> {
    ensure_staff_or_admin(user)?;
    let rows = fetch_paid_rows(state, &range, None).await?;
    Ok(ApiResponse::success(
        "Financial stats",
        FinancialStats {
            months: monthly_buckets(&rows),
        },
        None,
    ))
}

pub async fn registration_stats(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<RegistrationStats>> {
    ensure_staff_or_admin(user)?;
    let timestamps: Vec<(DateTime<Utc>,)> =
        sqlx::query_as("SELECT created_at FROM accounts")
            .fetch_all(&state.pool)
            .await?;
    let timestamps: Vec<DateTime<Utc>> = timestamps.into_iter().map(|t| t.0).collect();
    Ok(ApiResponse::success(
        "Registration stats",
        RegistrationStats {
            months: registration_buckets(&timestamps),
        },
        None,
    ))
}

pub async fn most_selected_service(
    state: &AppState,
    user: &AuthUser,
    range: DateRangeQuery,
) -> AppResult<ApiResponse<MostSelectedServices>> {
    ensure_staff_or_admin(user)?;
    let rows = fetch_paid_rows(state, &range, None).await?;
    let ranked = rank_service_counts(&rows);

    let ids: Vec<Uuid> = ranked.iter().map(|(id, _)| *id).collect();
    let services = populate::services_by_ids(&state.pool, &ids).await?;
    let mut by_id: HashMap<Uuid, crate::models::Service> =
        services.into_iter().map(|s| (s.id, s)).collect();

    let items = ranked
        .into_iter()
        .filter_map(|(id, count)| by_id.remove(&id).map(|service| ServiceCount { service, count }))
        .collect();

    Ok(ApiResponse::success(
        "Most selected services",
        MostSelectedServices { items },
        None,
    ))
}

pub async fn average_revenue_per_appointment(
    state: &AppState,
    user: &AuthUser,
    range: DateRangeQuery,
) -> AppResult<ApiResponse<AverageRevenue>> {
    ensure_staff_or_admin(user)?;
    let rows = fetch_paid_rows(state, &range, None).await?;
    Ok(ApiResponse::success(
        "Average revenue per appointment",
        average_revenue(&rows),
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(total: i64, actual: i64, when: &str, services: Vec<Uuid>) -> PaidAppointmentRow {
        PaidAppointmentRow {
            total_price: total,
            actual_payment: actual,
            created_at: when.parse().unwrap(),
            services,
        }
    }

    #[test]
    fn empty_set_sums_to_zero() {
        assert_eq!(revenue_totals(&[]), (0, 0));
        assert_eq!(total_profit(&[]), 0);
    }

    #[test]
    fn profit_keeps_source_sign_convention() {
        let rows = vec![
            row(1000, 1200, "2025-01-10T09:00:00Z", vec![]),
            row(500, 400, "2025-01-12T09:00:00Z", vec![]),
        ];
        // (1200 + 400) - (1000 + 500)
        assert_eq!(total_profit(&rows), 100);
    }

    #[test]
    fn monthly_buckets_are_chronological() {
        let rows = vec![
            row(100, 100, "2025-03-01T00:00:00Z", vec![]),
            row(200, 250, "2025-01-15T00:00:00Z", vec![]),
            row(300, 300, "2025-01-20T00:00:00Z", vec![]),
            row(400, 400, "2024-12-31T00:00:00Z", vec![]),
        ];
        let buckets = monthly_buckets(&rows);
        assert_eq!(
            buckets,
            vec![
                MonthlyBucket {
                    year: 2024,
                    month: 12,
                    total_revenue: 400,
                    actual_revenue: 400,
                    appointments: 1,
                },
                MonthlyBucket {
                    year: 2025,
                    month: 1,
                    total_revenue: 500,
                    actual_revenue: 550,
                    appointments: 2,
                },
                MonthlyBucket {
                    year: 2025,
                    month: 3,
                    total_revenue: 100,
                    actual_revenue: 100,
                    appointments: 1,
                },
            ]
        );
    }

    #[test]
    fn registration_buckets_count_per_month() {
        let timestamps = vec![
            Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 2, 14, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 4, 2, 8, 0, 0).unwrap(),
        ];
        let buckets = registration_buckets(&timestamps);
        assert_eq!(
            buckets,
            vec![
                RegistrationBucket {
                    year: 2025,
                    month: 2,
                    registrations: 2,
                },
                RegistrationBucket {
                    year: 2025,
                    month: 4,
                    registrations: 1,
                },
            ]
        );
    }

    #[test]
    fn service_ranking_is_descending_by_count() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let rows = vec![
            row(0, 0, "2025-01-01T00:00:00Z", vec![a, b]),
            row(0, 0, "2025-01-02T00:00:00Z", vec![b]),
            row(0, 0, "2025-01-03T00:00:00Z", vec![b, c, a]),
        ];
        let ranked = rank_service_counts(&rows);
        assert_eq!(ranked[0], (b, 3));
        // a and c follow; ties between equal counts are unordered.
        let counts: Vec<i64> = ranked.iter().map(|(_, n)| *n).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn average_over_empty_set_is_zero() {
        let avg = average_revenue(&[]);
        assert_eq!(avg.average_total_price, 0.0);
        assert_eq!(avg.average_actual_payment, 0.0);
    }

    #[test]
    fn average_is_the_mean_of_the_paid_set() {
        let rows = vec![
            row(1000, 900, "2025-01-01T00:00:00Z", vec![]),
            row(2000, 2100, "2025-01-02T00:00:00Z", vec![]),
        ];
        let avg = average_revenue(&rows);
        assert_eq!(avg.average_total_price, 1500.0);
        assert_eq!(avg.average_actual_payment, 1500.0);
    }
}
