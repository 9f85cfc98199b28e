//! Reference resolution ("populate"): stored ids are expanded into the
//! referenced records before a response leaves a handler.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppResult,
    models::{
        AccountSummary, Combo, ComboDetail, Location, Payment, Review, ReviewDetail, Salon,
        SalonDetail, Service,
    },
};

pub async fn account_summary(pool: &DbPool, id: Uuid) -> AppResult<Option<AccountSummary>> {
    let summary = sqlx::query_as::<_, AccountSummary>(
        "SELECT id, name, email, phone, avatar FROM accounts WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(summary)
}

pub async fn account_summaries(pool: &DbPool, ids: &[Uuid]) -> AppResult<Vec<AccountSummary>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let summaries = sqlx::query_as::<_, AccountSummary>(
        "SELECT id, name, email, phone, avatar FROM accounts WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;
    Ok(summaries)
}

pub async fn services_by_ids(pool: &DbPool, ids: &[Uuid]) -> AppResult<Vec<Service>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let services = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;
    Ok(services)
}

pub async fn combos_by_ids(pool: &DbPool, ids: &[Uuid]) -> AppResult<Vec<Combo>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let combos = sqlx::query_as::<_, Combo>("SELECT * FROM combos WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;
    Ok(combos)
}

/// Combos with their own service lists resolved as well.
pub async fn combo_details(pool: &DbPool, ids: &[Uuid]) -> AppResult<Vec<ComboDetail>> {
    let combos = combos_by_ids(pool, ids).await?;

    let mut service_ids: Vec<Uuid> = combos.iter().flat_map(|c| c.services.clone()).collect();
    service_ids.sort();
    service_ids.dedup();

    let services = services_by_ids(pool, &service_ids).await?;
    let by_id: HashMap<Uuid, Service> = services.into_iter().map(|s| (s.id, s)).collect();

    Ok(combos
        .into_iter()
        .map(|combo| ComboDetail {
            id: combo.id,
            name: combo.name,
            price: combo.price,
            images: combo.images,
            services: combo
                .services
                .iter()
                .filter_map(|id| by_id.get(id).cloned())
                .collect(),
            description: combo.description,
            status: combo.status,
            created_at: combo.created_at,
            updated_at: combo.updated_at,
        })
        .collect())
}

pub async fn reviews_by_ids(pool: &DbPool, ids: &[Uuid]) -> AppResult<Vec<Review>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let reviews = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;
    Ok(reviews)
}

pub async fn review_details(pool: &DbPool, ids: &[Uuid]) -> AppResult<Vec<ReviewDetail>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let reviews = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;

    let mut customer_ids: Vec<Uuid> = reviews.iter().map(|r| r.customer_id).collect();
    customer_ids.sort();
    customer_ids.dedup();

    let customers = account_summaries(pool, &customer_ids).await?;
    let by_id: HashMap<Uuid, AccountSummary> = customers.into_iter().map(|c| (c.id, c)).collect();

    Ok(reviews
        .into_iter()
        .map(|review| ReviewDetail {
            id: review.id,
            rating: review.rating,
            comment: review.comment,
            customer: by_id.get(&review.customer_id).cloned(),
            status: review.status,
            created_at: review.created_at,
            updated_at: review.updated_at,
        })
        .collect())
}

pub async fn location_by_id(pool: &DbPool, id: Uuid) -> AppResult<Option<Location>> {
    let location = sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(location)
}

pub async fn salon_by_id(pool: &DbPool, id: Uuid) -> AppResult<Option<Salon>> {
    let salon = sqlx::query_as::<_, Salon>("SELECT * FROM salons WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(salon)
}

/// Salon with every reference list resolved.
pub async fn salon_detail(pool: &DbPool, salon: Salon) -> AppResult<SalonDetail> {
    let location = location_by_id(pool, salon.location_id).await?;
    let staffs = account_summaries(pool, &salon.staffs).await?;
    let services = services_by_ids(pool, &salon.services).await?;
    let combos = combos_by_ids(pool, &salon.combos).await?;
    let reviews = review_details(pool, &salon.reviews).await?;

    Ok(SalonDetail {
        id: salon.id,
        name: salon.name,
        logo: salon.logo,
        description: salon.description,
        location,
        staffs,
        services,
        combos,
        reviews,
        images: salon.images,
        status: salon.status,
        created_at: salon.created_at,
        updated_at: salon.updated_at,
    })
}

pub async fn payment_by_id(pool: &DbPool, id: Uuid) -> AppResult<Option<Payment>> {
    let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(payment)
}
