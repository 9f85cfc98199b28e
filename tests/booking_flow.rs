use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Statement};
use uuid::Uuid;

use stylecuts_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        appointments::{
            CreateAppointmentRequest, PaymentInfoField, PaymentInput,
            UpdateAppointmentStatusRequest,
        },
        auth::RegisterRequest,
        statistics::DateRangeQuery,
    },
    error::AppError,
    middleware::auth::AuthUser,
    services::{appointment_service, auth_service, statistic_service},
    state::AppState,
};

// Integration flow: register accounts -> seed catalog -> book with an inline
// payment -> walk the status machine -> check the revenue report.
#[tokio::test]
async fn booking_and_revenue_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    // Register a customer; the same email again must be rejected.
    let customer = auth_service::register_account(
        &state,
        RegisterRequest {
            name: "Casey Customer".into(),
            email: "casey@example.com".into(),
            password: "secret123".into(),
            phone: Some("0900000001".into()),
            role: None,
        },
    )
    .await?
    .data
    .expect("registered customer");

    let duplicate = auth_service::register_account(
        &state,
        RegisterRequest {
            name: "Casey Again".into(),
            email: "casey@example.com".into(),
            password: "secret123".into(),
            phone: None,
            role: None,
        },
    )
    .await;
    match duplicate {
        Err(AppError::BadRequest(message)) => assert_eq!(message, "This Email registered!"),
        other => panic!("expected duplicate email rejection, got {other:?}"),
    }

    let staff = auth_service::register_account(
        &state,
        RegisterRequest {
            name: "Sam Staff".into(),
            email: "sam@example.com".into(),
            password: "secret123".into(),
            phone: Some("0900000002".into()),
            role: Some("Staff".into()),
        },
    )
    .await?
    .data
    .expect("registered staff");

    // Seed a location, salon and service directly.
    let location_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO locations (id, number, street, ward, district, city, map)
         VALUES ($1, '1', 'Main St', 'Central', 'D1', 'Springfield', 'map')",
    )
    .bind(location_id)
    .execute(&state.pool)
    .await?;

    let salon_id = Uuid::new_v4();
    sqlx::query("INSERT INTO salons (id, name, location_id) VALUES ($1, 'Test Salon', $2)")
        .bind(salon_id)
        .bind(location_id)
        .execute(&state.pool)
        .await?;

    let service_id = Uuid::new_v4();
    sqlx::query("INSERT INTO services (id, name, price, duration) VALUES ($1, 'Haircut', 50000, 30)")
        .bind(service_id)
        .execute(&state.pool)
        .await?;

    let auth_customer = AuthUser {
        account_id: customer.id,
        role: "Customer".into(),
    };
    let auth_admin = AuthUser {
        account_id: staff.id,
        role: "Admin".into(),
    };

    // Book with an inline payment; the payment row is created and linked.
    let booking_date = NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date");
    let created = appointment_service::create_appointment(
        &state,
        &auth_customer,
        CreateAppointmentRequest {
            date: booking_date,
            time_start: "09:00".into(),
            time_end: "09:30".into(),
            total_price: 50_000,
            actual_payment: Some(52_000),
            salon: salon_id,
            customer: customer.id,
            staff: staff.id,
            services: Some(vec![service_id]),
            combos: None,
            payment_status: Some("Paid".into()),
            payment_method: "cash".into(),
            payment_info: Some(PaymentInfoField::Inline(PaymentInput {
                name: "Casey Customer".into(),
                email: "casey@example.com".into(),
                phone: "0900000001".into(),
                description: None,
            })),
        },
    )
    .await?
    .data
    .expect("created appointment");

    assert_eq!(created.status, "Pending");
    assert_eq!(created.services.len(), 1);
    assert_eq!(created.services[0].id, service_id);
    let payment = created.payment_info.expect("linked payment");
    assert_eq!(payment.name, "Casey Customer");
    assert_eq!(payment.email, "casey@example.com");

    // Valid transition persists; an unknown status is rejected.
    let confirmed = appointment_service::update_status(
        &state,
        &auth_admin,
        created.id,
        UpdateAppointmentStatusRequest {
            status: "Confirmed".into(),
        },
    )
    .await?
    .data
    .expect("confirmed appointment");
    assert_eq!(confirmed.status, "Confirmed");

    let rejected = appointment_service::update_status(
        &state,
        &auth_admin,
        created.id,
        UpdateAppointmentStatusRequest {
            status: "Archived".into(),
        },
    )
    .await;
    match rejected {
        Err(AppError::BadRequest(message)) => assert_eq!(message, "Invalid Status"),
        other => panic!("expected invalid status rejection, got {other:?}"),
    }

    // The paid booking shows up in the revenue report for its month.
    let range = DateRangeQuery {
        start_date: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date"),
    };
    let revenue = statistic_service::revenue_report(&state, &auth_admin, range, None)
        .await?
        .data
        .expect("revenue report");
    assert_eq!(revenue.total_revenue, 50_000);
    assert_eq!(revenue.actual_revenue, 52_000);

    let range = DateRangeQuery {
        start_date: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date"),
    };
    let most = statistic_service::most_selected_service(&state, &auth_admin, range)
        .await?
        .data
        .expect("most selected services");
    assert_eq!(most.items.len(), 1);
    assert_eq!(most.items[0].service.id, service_id);
    assert_eq!(most.items[0].count, 1);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;
    let pool = create_pool(database_url).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE audit_logs, appointments, payments, reviews, show_times, contacts, \
         salons, combos, categories, services, locations, accounts RESTART IDENTITY CASCADE",
    ))
    .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        jwt_refresh_secret: "test-refresh-secret".into(),
        client_url: "http://localhost:3000".into(),
        upload_dir: "public/images".into(),
    };

    Ok(AppState { pool, orm, config })
}
