use axum::Router;

use crate::state::AppState;

pub mod accounts;
pub mod appointments;
pub mod auth;
pub mod categories;
pub mod combos;
pub mod contacts;
pub mod doc;
pub mod health;
pub mod images;
pub mod locations;
pub mod params;
pub mod payments;
pub mod reviews;
pub mod salons;
pub mod search;
pub mod services;
pub mod show_times;
pub mod statistics;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/accounts", accounts::router())
        .nest("/locations", locations::router())
        .nest("/salons", salons::router())
        .nest("/services", services::router())
        .nest("/combos", combos::router())
        .nest("/categories", categories::router())
        .nest("/payments", payments::router())
        .nest("/appointments", appointments::router())
        .nest("/reviews", reviews::router())
        .nest("/show-times", show_times::router())
        .nest("/contacts", contacts::router())
        .nest("/statistics", statistics::router())
        .nest("/search", search::router())
        .nest("/images", images::router())
}
