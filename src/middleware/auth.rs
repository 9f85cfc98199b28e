use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError, state::AppState};

pub const ROLE_CUSTOMER: &str = "Customer";
pub const ROLE_STAFF: &str = "Staff";
pub const ROLE_ADMIN: &str = "Admin";

/// The authenticated account acting on a request. Built by decoding the
/// bearer access token and loading the account it points at.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: Uuid,
    pub role: String,
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    if user.role != ROLE_ADMIN {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Gate for routes open to any of the given roles.
pub fn ensure_any_of(user: &AuthUser, roles: &[&str]) -> Result<(), AppError> {
    if !roles.contains(&user.role.as_str()) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_staff_or_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_any_of(user, &[ROLE_STAFF, ROLE_ADMIN])
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::Unauthorized("Invalid Authorization scheme".into()));
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized("Not authorized, token failed".into()))?;

        if decoded.claims.typ != "access" {
            return Err(AppError::BadRequest("Invalid token type".into()));
        }

        let account_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid account id in token".into()))?;

        let row: Option<(String, bool)> =
            sqlx::query_as("SELECT role, status FROM accounts WHERE id = $1")
                .bind(account_id)
                .fetch_optional(&state.pool)
                .await?;

        let (role, status) = match row {
            Some(r) => r,
            None => return Err(AppError::Unauthorized("Not authorized, token failed".into())),
        };
        if !status {
            return Err(AppError::Unauthorized("Account is disabled".into()));
        }

        Ok(AuthUser { account_id, role })
    }
}
