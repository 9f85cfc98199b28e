use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::contacts::{
        ActiveModel as ContactActive, Column as ContactCol, Entity as Contacts,
        Model as ContactModel,
    },
    error::{AppError, AppResult, FieldError},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Contact, ContactDetail},
    populate,
    response::ApiResponse,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateContactRequest {
    pub question: String,
}

/// Answering a contact also records the staff member who answered.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateContactRequest {
    pub answer: Option<String>,
    pub status: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactList {
    pub items: Vec<ContactDetail>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contacts).post(create_contact))
        .route(
            "/{id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
}

fn contact_from_entity(model: ContactModel) -> Contact {
    Contact {
        id: model.id,
        question: model.question,
        answer: model.answer,
        customer_id: model.customer_id,
        staff_id: model.staff_id,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

async fn detail_for(state: &AppState, contact: Contact) -> AppResult<ContactDetail> {
    let customer = populate::account_summary(&state.pool, contact.customer_id).await?;
    let staff = match contact.staff_id {
        Some(id) => populate::account_summary(&state.pool, id).await?,
        None => None,
    };
    Ok(ContactDetail {
        id: contact.id,
        question: contact.question,
        answer: contact.answer,
        customer,
        staff,
        status: contact.status,
        created_at: contact.created_at,
        updated_at: contact.updated_at,
    })
}

#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = CreateContactRequest,
    responses(
        (status = 200, description = "Created contact", body = ApiResponse<Contact>),
        (status = 400, description = "Question is required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Contacts"
)]
pub async fn create_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateContactRequest>,
) -> AppResult<Json<ApiResponse<Contact>>> {
    if payload.question.trim().is_empty() {
        return Err(AppError::Validation(vec![FieldError::new(
            "question",
            "Question is required",
        )]));
    }

    let contact = ContactActive {
        id: Set(Uuid::new_v4()),
        question: Set(payload.question.trim().to_string()),
        customer_id: Set(user.account_id),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    Ok(Json(ApiResponse::success(
        "Contact created",
        contact_from_entity(contact),
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/contacts",
    responses(
        (status = 200, description = "List contacts", body = ApiResponse<ContactList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Contacts"
)]
pub async fn list_contacts(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ContactList>>> {
    ensure_admin(&user)?;
    let contacts: Vec<Contact> = Contacts::find()
        .order_by_desc(ContactCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(contact_from_entity)
        .collect();

    let mut items = Vec::with_capacity(contacts.len());
    for contact in contacts {
        items.push(detail_for(&state, contact).await?);
    }

    Ok(Json(ApiResponse::success(
        "Contacts",
        ContactList { items },
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    params(
        ("id" = Uuid, Path, description = "Contact ID")
    ),
    responses(
        (status = 200, description = "Contact", body = ApiResponse<ContactDetail>),
        (status = 404, description = "Contact not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Contacts"
)]
pub async fn get_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ContactDetail>>> {
    ensure_admin(&user)?;
    let contact = Contacts::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Contact not found"))?;

    let detail = detail_for(&state, contact_from_entity(contact)).await?;
    Ok(Json(ApiResponse::success("Contact", detail, None)))
}

#[utoipa::path(
    put,
    path = "/api/contacts/{id}",
    params(
        ("id" = Uuid, Path, description = "Contact ID")
    ),
    request_body = UpdateContactRequest,
    responses(
        (status = 200, description = "Updated contact", body = ApiResponse<Contact>),
        (status = 404, description = "Contact not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Contacts"
)]
pub async fn update_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateContactRequest>,
) -> AppResult<Json<ApiResponse<Contact>>> {
    ensure_admin(&user)?;

    let mut active = ContactActive {
        id: Set(id),
        ..Default::default()
    };
    if let Some(answer) = payload.answer {
        active.answer = Set(Some(answer));
        active.staff_id = Set(Some(user.account_id));
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now().into());

    let contact = match active.update(&state.orm).await {
        Ok(model) => model,
        Err(DbErr::RecordNotUpdated) => return Err(AppError::not_found("Contact not found")),
        Err(err) => return Err(err.into()),
    };

    Ok(Json(ApiResponse::success(
        "Contact updated",
        contact_from_entity(contact),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    params(
        ("id" = Uuid, Path, description = "Contact ID")
    ),
    responses(
        (status = 200, description = "Contact removed"),
        (status = 404, description = "Contact not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Contacts"
)]
pub async fn delete_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_admin(&user)?;
    let result = Contacts::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Contact not found"));
    }
    Ok(Json(ApiResponse::message("Contact removed")))
}
