use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::{
        AuthResponse, Claims, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest,
        LogoutRequest, RefreshTokenRequest, RegisterRequest, ResetPasswordRequest,
        TokenPairResponse,
    },
    error::{AppError, AppResult, FieldError},
    middleware::auth::{ROLE_ADMIN, ROLE_CUSTOMER, ROLE_STAFF},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";
pub const TOKEN_TYPE_FORGET_PASSWORD: &str = "forget-password";

const ACCESS_TOKEN_DAYS: i64 = 30;
const REFRESH_TOKEN_DAYS: i64 = 7;
const FORGET_TOKEN_HOURS: i64 = 24;

/// Private row carrying the credential columns that never leave this module.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    password_hash: String,
    role: String,
    refresh_token: Option<String>,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

pub fn sign_token(
    account_id: Uuid,
    token_type: &str,
    secret: &str,
    ttl: Duration,
) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: account_id.to_string(),
        typ: token_type.to_string(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    Ok(token)
}

pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;
    Ok(decoded.claims)
}

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Access token (30d) + refresh token (7d). Storing the refresh token
/// invalidates the previous one: one active session per account.
pub fn issue_token_pair(state: &AppState, account_id: Uuid) -> AppResult<TokenPair> {
    let access_token = sign_token(
        account_id,
        TOKEN_TYPE_ACCESS,
        &state.config.jwt_secret,
        Duration::days(ACCESS_TOKEN_DAYS),
    )?;
    let refresh_token = sign_token(
        account_id,
        TOKEN_TYPE_REFRESH,
        &state.config.jwt_refresh_secret,
        Duration::days(REFRESH_TOKEN_DAYS),
    )?;
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

async fn store_refresh_token(state: &AppState, account_id: Uuid, token: &str) -> AppResult<()> {
    sqlx::query("UPDATE accounts SET refresh_token = $2, updated_at = now() WHERE id = $1")
        .bind(account_id)
        .bind(token)
        .execute(&state.pool)
        .await?;
    Ok(())
}

fn validate_registration(payload: &RegisterRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if !payload.email.contains('@') {
        errors.push(FieldError::new("email", "Please enter a valid email"));
    }
    if payload.password.trim().len() < 6 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters long",
        ));
    }
    if let Some(role) = payload.role.as_deref() {
        if ![ROLE_CUSTOMER, ROLE_STAFF, ROLE_ADMIN].contains(&role) {
            errors.push(FieldError::new("role", "Invalid user role"));
        }
    }
    errors
}

pub async fn register_account(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    let errors = validate_registration(&payload);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM accounts WHERE email = $1")
        .bind(payload.email.trim())
        .fetch_optional(&state.pool)
        .await?;
    if exists.is_some() {
        return Err(AppError::BadRequest("This Email registered!".into()));
    }

    if let Some(phone) = payload.phone.as_deref() {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM accounts WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&state.pool)
            .await?;
        if exists.is_some() {
            return Err(AppError::BadRequest("This Phone registered!".into()));
        }
    }

    let password_hash = hash_password(payload.password.trim())?;
    let id = Uuid::new_v4();
    let role = payload.role.unwrap_or_else(|| ROLE_CUSTOMER.to_string());

    let account: AccountRow = sqlx::query_as(
        r#"
        INSERT INTO accounts (id, name, email, phone, password_hash, role)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, email, phone, password_hash, role, refresh_token, created_at
        "#,
    )
    .bind(id)
    .bind(payload.name.trim())
    .bind(payload.email.trim())
    .bind(payload.phone.as_deref())
    .bind(password_hash)
    .bind(role)
    .fetch_one(&state.pool)
    .await?;

    let tokens = issue_token_pair(state, account.id)?;
    store_refresh_token(state, account.id, &tokens.refresh_token).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(account.id),
        "account_register",
        Some("accounts"),
        Some(serde_json::json!({ "account_id": account.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let resp = AuthResponse {
        id: account.id,
        name: account.name,
        email: account.email,
        phone: account.phone,
        role: account.role,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    };
    Ok(ApiResponse::success("User created", resp, None))
}

pub async fn login(state: &AppState, payload: LoginRequest) -> AppResult<ApiResponse<AuthResponse>> {
    let account: Option<AccountRow> = sqlx::query_as(
        "SELECT id, name, email, phone, password_hash, role, refresh_token, created_at \
         FROM accounts WHERE email = $1",
    )
    .bind(payload.email.trim())
    .fetch_optional(&state.pool)
    .await?;

    let account = match account {
        Some(a) if verify_password(&payload.password, &a.password_hash) => a,
        _ => return Err(AppError::Unauthorized("Invalid email or password".into())),
    };

    let tokens = issue_token_pair(state, account.id)?;
    store_refresh_token(state, account.id, &tokens.refresh_token).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(account.id),
        "account_login",
        Some("accounts"),
        Some(serde_json::json!({ "account_id": account.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let resp = AuthResponse {
        id: account.id,
        name: account.name,
        email: account.email,
        phone: account.phone,
        role: account.role,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    };
    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

pub async fn refresh_token(
    state: &AppState,
    payload: RefreshTokenRequest,
) -> AppResult<ApiResponse<TokenPairResponse>> {
    let claims = decode_token(&payload.refresh_token, &state.config.jwt_refresh_secret)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".into()))?;
    if claims.typ != TOKEN_TYPE_REFRESH {
        return Err(AppError::Unauthorized("Invalid token type".into()));
    }
    let account_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".into()))?;

    let stored: Option<(Option<String>,)> =
        sqlx::query_as("SELECT refresh_token FROM accounts WHERE id = $1")
            .bind(account_id)
            .fetch_optional(&state.pool)
            .await?;
    match stored {
        Some((Some(token),)) if token == payload.refresh_token => {}
        _ => return Err(AppError::Unauthorized("Invalid refresh token".into())),
    }

    let tokens = issue_token_pair(state, account_id)?;
    store_refresh_token(state, account_id, &tokens.refresh_token).await?;

    let resp = TokenPairResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    };
    Ok(ApiResponse::success("Token refreshed", resp, None))
}

pub async fn forgot_password(
    state: &AppState,
    payload: ForgotPasswordRequest,
) -> AppResult<ApiResponse<ForgotPasswordResponse>> {
    let account: Option<(Uuid, String)> =
        sqlx::query_as("SELECT id, email FROM accounts WHERE email = $1")
            .bind(payload.email.trim())
            .fetch_optional(&state.pool)
            .await?;
    let (account_id, email) = match account {
        Some(a) => a,
        None => return Err(AppError::not_found("User not found")),
    };

    let token = sign_token(
        account_id,
        TOKEN_TYPE_FORGET_PASSWORD,
        &state.config.jwt_secret,
        Duration::hours(FORGET_TOKEN_HOURS),
    )?;
    let reset_url = format!(
        "{}/forgotpasscode?forgetToken={}",
        state.config.client_url, token
    );

    tracing::info!(email = %email, reset_url = %reset_url, "password reset link issued");

    Ok(ApiResponse::success(
        "Password reset link issued",
        ForgotPasswordResponse { reset_url },
        None,
    ))
}

pub async fn reset_password(
    state: &AppState,
    token: &str,
    payload: ResetPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if payload.password.trim().len() < 6 {
        return Err(AppError::Validation(vec![FieldError::new(
            "password",
            "Password must be at least 6 characters long",
        )]));
    }

    let claims = decode_token(token, &state.config.jwt_secret)
        .map_err(|_| AppError::BadRequest("Invalid token".into()))?;
    if claims.typ != TOKEN_TYPE_FORGET_PASSWORD {
        return Err(AppError::BadRequest("Invalid token type".into()));
    }
    let account_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::BadRequest("Invalid token".into()))?;

    let password_hash = hash_password(payload.password.trim())?;
    let result =
        sqlx::query("UPDATE accounts SET password_hash = $2, updated_at = now() WHERE id = $1")
            .bind(account_id)
            .bind(password_hash)
            .execute(&state.pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::BadRequest("Invalid token".into()));
    }

    Ok(ApiResponse::message("Password updated successfully"))
}

pub async fn logout(
    state: &AppState,
    payload: LogoutRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let claims = decode_token(&payload.refresh_token, &state.config.jwt_refresh_secret)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".into()))?;
    if claims.typ != TOKEN_TYPE_REFRESH {
        return Err(AppError::Unauthorized("Invalid token type".into()));
    }
    let account_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".into()))?;

    let result =
        sqlx::query("UPDATE accounts SET refresh_token = NULL, updated_at = now() WHERE id = $1")
            .bind(account_id)
            .execute(&state.pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::Unauthorized("Invalid refresh token".into()));
    }

    Ok(ApiResponse::message("Logged out successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("hunter42").unwrap();
        assert!(verify_password("hunter42", &hash));
        assert!(!verify_password("hunter43", &hash));
    }

    #[test]
    fn token_roundtrip_carries_type() {
        let id = Uuid::new_v4();
        let token = sign_token(id, TOKEN_TYPE_ACCESS, "secret", Duration::hours(1)).unwrap();
        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.typ, TOKEN_TYPE_ACCESS);
    }

    #[test]
    fn token_rejects_wrong_secret() {
        let id = Uuid::new_v4();
        let token = sign_token(id, TOKEN_TYPE_REFRESH, "secret-a", Duration::hours(1)).unwrap();
        assert!(decode_token(&token, "secret-b").is_err());
    }

    #[test]
    fn registration_validation_collects_field_errors() {
        let payload = RegisterRequest {
            name: " ".into(),
            email: "not-an-email".into(),
            password: "123".into(),
            phone: None,
            role: Some("Owner".into()),
        };
        let errors = validate_registration(&payload);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "password", "role"]);
    }
}
