use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, FieldError},
    middleware::auth::{AuthUser, ROLE_ADMIN, ROLE_CUSTOMER, ROLE_STAFF, ensure_admin, ensure_staff_or_admin},
    models::Account,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::auth_service,
    state::AppState,
};

const ACCOUNT_COLUMNS: &str = "id, name, email, phone, avatar, role, status, created_at, updated_at";

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAccountRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<String>,
    pub status: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountList {
    pub items: Vec<Account>,
}

fn validate_role(role: &str) -> Result<(), AppError> {
    if [ROLE_CUSTOMER, ROLE_STAFF, ROLE_ADMIN].contains(&role) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid Role".into()))
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/change-password", put(change_password))
        .route("/", get(list_accounts).post(create_account))
        .route(
            "/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
}

async fn account_by_id(state: &AppState, id: Uuid) -> AppResult<Account> {
    let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");
    let account = sqlx::query_as::<_, Account>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    account.ok_or_else(|| AppError::not_found("User not found"))
}

/// Duplicate email/phone check, ignoring the account being updated.
async fn check_unique_contact(
    state: &AppState,
    email: Option<&str>,
    phone: Option<&str>,
    exclude: Option<Uuid>,
) -> AppResult<()> {
    if let Some(email) = email {
        let taken: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM accounts WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2)")
                .bind(email.trim())
                .bind(exclude)
                .fetch_optional(&state.pool)
                .await?;
        if taken.is_some() {
            return Err(AppError::BadRequest("This Email registered!".into()));
        }
    }
    if let Some(phone) = phone {
        let taken: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM accounts WHERE phone = $1 AND ($2::uuid IS NULL OR id <> $2)")
                .bind(phone.trim())
                .bind(exclude)
                .fetch_optional(&state.pool)
                .await?;
        if taken.is_some() {
            return Err(AppError::BadRequest("This Phone registered!".into()));
        }
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/accounts/profile",
    responses(
        (status = 200, description = "Current account", body = ApiResponse<Account>),
        (status = 401, description = "Not authorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Account>>> {
    let account = account_by_id(&state, user.account_id).await?;
    Ok(Json(ApiResponse::success("Profile", account, None)))
}

#[utoipa::path(
    put,
    path = "/api/accounts/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ApiResponse<Account>),
        (status = 400, description = "Email or phone already registered"),
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<Account>>> {
    check_unique_contact(
        &state,
        payload.email.as_deref(),
        payload.phone.as_deref(),
        Some(user.account_id),
    )
    .await?;

    let password_hash = match payload.password.as_deref() {
        Some(password) => {
            if password.trim().len() < 6 {
                return Err(AppError::Validation(vec![FieldError::new(
                    "password",
                    "Password must be at least 6 characters long",
                )]));
            }
            Some(auth_service::hash_password(password)?)
        }
        None => None,
    };

    let sql = format!(
        r#"
        UPDATE accounts SET
            name = COALESCE($2, name),
            email = COALESCE($3, email),
            phone = COALESCE($4, phone),
            avatar = COALESCE($5, avatar),
            password_hash = COALESCE($6, password_hash),
            updated_at = now()
        WHERE id = $1
        RETURNING {ACCOUNT_COLUMNS}
        "#
    );
    let account = sqlx::query_as::<_, Account>(&sql)
        .bind(user.account_id)
        .bind(payload.name)
        .bind(payload.email)
        .bind(payload.phone)
        .bind(payload.avatar)
        .bind(password_hash)
        .fetch_one(&state.pool)
        .await?;

    Ok(Json(ApiResponse::success("Profile updated", account, None)))
}

#[utoipa::path(
    put,
    path = "/api/accounts/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated successfully"),
        (status = 400, description = "Old password is incorrect"),
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    if payload.new_password.trim().len() < 6 {
        return Err(AppError::Validation(vec![FieldError::new(
            "new_password",
            "Password must be at least 6 characters long",
        )]));
    }

    let stored: Option<(String,)> = sqlx::query_as("SELECT password_hash FROM accounts WHERE id = $1")
        .bind(user.account_id)
        .fetch_optional(&state.pool)
        .await?;
    let (stored_hash,) = stored.ok_or_else(|| AppError::not_found("User not found"))?;

    if !auth_service::verify_password(&payload.old_password, &stored_hash) {
        return Err(AppError::BadRequest("Old password is incorrect".into()));
    }

    let new_hash = auth_service::hash_password(&payload.new_password)?;
    sqlx::query("UPDATE accounts SET password_hash = $2, updated_at = now() WHERE id = $1")
        .bind(user.account_id)
        .bind(new_hash)
        .execute(&state.pool)
        .await?;

    Ok(Json(ApiResponse::message("Password updated successfully")))
}

#[utoipa::path(
    get,
    path = "/api/accounts",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List accounts", body = ApiResponse<AccountList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<AccountList>>> {
    ensure_staff_or_admin(&user)?;
    let (page, per_page, offset) = pagination.normalize();

    let sql = format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at DESC LIMIT $1 OFFSET $2"
    );
    let items = sqlx::query_as::<_, Account>(&sql)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?;

    let total: (i64,) = sqlx::query_as("SELECT count(*) FROM accounts")
        .fetch_one(&state.pool)
        .await?;

    let meta = Meta::new(page, per_page, total.0);
    Ok(Json(ApiResponse::success(
        "Accounts",
        AccountList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    post,
    path = "/api/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 200, description = "Created account", body = ApiResponse<Account>),
        (status = 400, description = "Validation failed or email/phone already registered"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn create_account(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateAccountRequest>,
) -> AppResult<Json<ApiResponse<Account>>> {
    ensure_admin(&user)?;

    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        errors.push(FieldError::new("email", "A valid email is required"));
    }
    if payload.password.trim().len() < 6 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters long",
        ));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let role = payload.role.unwrap_or_else(|| ROLE_CUSTOMER.to_string());
    validate_role(&role)?;

    check_unique_contact(&state, Some(&payload.email), payload.phone.as_deref(), None).await?;

    let password_hash = auth_service::hash_password(&payload.password)?;
    let sql = format!(
        r#"
        INSERT INTO accounts (id, name, email, phone, password_hash, role)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {ACCOUNT_COLUMNS}
        "#
    );
    let account = sqlx::query_as::<_, Account>(&sql)
        .bind(Uuid::new_v4())
        .bind(payload.name.trim())
        .bind(payload.email.trim())
        .bind(payload.phone.as_deref().map(str::trim))
        .bind(password_hash)
        .bind(role)
        .fetch_one(&state.pool)
        .await?;

    Ok(Json(ApiResponse::success("User created", account, None)))
}

#[utoipa::path(
    get,
    path = "/api/accounts/{id}",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account", body = ApiResponse<Account>),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn get_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Account>>> {
    ensure_staff_or_admin(&user)?;
    let account = account_by_id(&state, id).await?;
    Ok(Json(ApiResponse::success("Account", account, None)))
}

#[utoipa::path(
    put,
    path = "/api/accounts/{id}",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Updated account", body = ApiResponse<Account>),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn update_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> AppResult<Json<ApiResponse<Account>>> {
    ensure_admin(&user)?;
    if let Some(role) = payload.role.as_deref() {
        validate_role(role)?;
    }
    check_unique_contact(
        &state,
        payload.email.as_deref(),
        payload.phone.as_deref(),
        Some(id),
    )
    .await?;

    let sql = format!(
        r#"
        UPDATE accounts SET
            name = COALESCE($2, name),
            email = COALESCE($3, email),
            phone = COALESCE($4, phone),
            avatar = COALESCE($5, avatar),
            role = COALESCE($6, role),
            status = COALESCE($7, status),
            updated_at = now()
        WHERE id = $1
        RETURNING {ACCOUNT_COLUMNS}
        "#
    );
    let account = sqlx::query_as::<_, Account>(&sql)
        .bind(id)
        .bind(payload.name)
        .bind(payload.email)
        .bind(payload.phone)
        .bind(payload.avatar)
        .bind(payload.role)
        .bind(payload.status)
        .fetch_optional(&state.pool)
        .await?;
    let account = account.ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(ApiResponse::success("User updated", account, None)))
}

#[utoipa::path(
    delete,
    path = "/api/accounts/{id}",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "User removed"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn delete_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_admin(&user)?;
    let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("User not found"));
    }
    Ok(Json(ApiResponse::message("User removed")))
}
