use uuid::Uuid;

use stylecuts_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    services::auth_service,
};

/// Seed an admin account plus a sample location and salon for local development.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let pool = create_pool(&config.database_url).await?;

    let password_hash = auth_service::hash_password("admin123")?;
    let admin: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO accounts (id, name, email, password_hash, role)
        VALUES ($1, 'Administrator', 'admin@stylecuts.local', $2, 'Admin')
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(password_hash)
    .fetch_optional(&pool)
    .await?;

    match admin {
        Some((id,)) => println!("Admin account created: {id}"),
        None => println!("Admin account already present"),
    }

    let location_id = Uuid::new_v4();
    let location: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO locations (id, number, street, ward, district, city, map)
        SELECT $1, '12', 'High Street', 'Central', 'District 1', 'Springfield', 'https://maps.example/12-high-street'
        WHERE NOT EXISTS (SELECT 1 FROM locations)
        RETURNING id
        "#,
    )
    .bind(location_id)
    .fetch_optional(&pool)
    .await?;

    if let Some((location_id,)) = location {
        sqlx::query(
            r#"
            INSERT INTO salons (id, name, description, location_id)
            VALUES ($1, 'StyleCuts Downtown', 'Sample salon for local development', $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(location_id)
        .execute(&pool)
        .await?;
        println!("Sample location and salon created");
    } else {
        println!("Locations already present, skipping sample data");
    }

    Ok(())
}
