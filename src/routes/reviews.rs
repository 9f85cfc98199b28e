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
    entity::reviews::{
        ActiveModel as ReviewActive, Column as ReviewCol, Entity as Reviews, Model as ReviewModel,
    },
    error::{AppError, AppResult, FieldError},
    middleware::auth::AuthUser,
    models::{Review, ReviewDetail},
    populate,
    response::ApiResponse,
    state::AppState,
};

pub const REVIEW_STATUSES: [&str; 3] = ["pending", "approved", "rejected"];

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub rating: i32,
    pub comment: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReviewRequest {
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewList {
    pub items: Vec<ReviewDetail>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route(
            "/{id}",
            get(get_review).put(update_review).delete(delete_review),
        )
}

fn review_from_entity(model: ReviewModel) -> Review {
    Review {
        id: model.id,
        rating: model.rating,
        comment: model.comment,
        customer_id: model.customer_id,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn validate_rating(rating: i32) -> Result<(), AppError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(AppError::Validation(vec![FieldError::new(
            "rating",
            "Rating must be between 1 and 5",
        )]))
    }
}

fn validate_review_status(status: &str) -> Result<(), AppError> {
    if REVIEW_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid Review Status".into()))
    }
}

async fn detail_for(state: &AppState, review: Review) -> AppResult<ReviewDetail> {
    let customer = populate::account_summary(&state.pool, review.customer_id).await?;
    Ok(ReviewDetail {
        id: review.id,
        rating: review.rating,
        comment: review.comment,
        customer,
        status: review.status,
        created_at: review.created_at,
        updated_at: review.updated_at,
    })
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 200, description = "Created review", body = ApiResponse<Review>),
        (status = 400, description = "Rating out of range"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    validate_rating(payload.rating)?;
    if payload.comment.trim().is_empty() {
        return Err(AppError::Validation(vec![FieldError::new(
            "comment",
            "Comment is required",
        )]));
    }

    let review = ReviewActive {
        id: Set(Uuid::new_v4()),
        rating: Set(payload.rating),
        comment: Set(payload.comment.trim().to_string()),
        customer_id: Set(user.account_id),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    Ok(Json(ApiResponse::success(
        "Review created",
        review_from_entity(review),
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/reviews",
    responses(
        (status = 200, description = "List reviews", body = ApiResponse<ReviewList>),
    ),
    tag = "Reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let reviews: Vec<Review> = Reviews::find()
        .order_by_desc(ReviewCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(review_from_entity)
        .collect();

    let mut items = Vec::with_capacity(reviews.len());
    for review in reviews {
        items.push(detail_for(&state, review).await?);
    }

    Ok(Json(ApiResponse::success(
        "Reviews",
        ReviewList { items },
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/reviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review", body = ApiResponse<ReviewDetail>),
        (status = 404, description = "Review not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn get_review(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReviewDetail>>> {
    let review = Reviews::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Review not found"))?;

    let detail = detail_for(&state, review_from_entity(review)).await?;
    Ok(Json(ApiResponse::success("Review", detail, None)))
}

#[utoipa::path(
    put,
    path = "/api/reviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Updated review", body = ApiResponse<Review>),
        (status = 404, description = "Review not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn update_review(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReviewRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    if let Some(rating) = payload.rating {
        validate_rating(rating)?;
    }
    if let Some(status) = payload.status.as_deref() {
        validate_review_status(status)?;
    }

    let mut active = ReviewActive {
        id: Set(id),
        ..Default::default()
    };
    if let Some(rating) = payload.rating {
        active.rating = Set(rating);
    }
    if let Some(comment) = payload.comment {
        active.comment = Set(comment);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now().into());

    let review = match active.update(&state.orm).await {
        Ok(model) => model,
        Err(DbErr::RecordNotUpdated) => return Err(AppError::not_found("Review not found")),
        Err(err) => return Err(err.into()),
    };

    Ok(Json(ApiResponse::success(
        "Review updated",
        review_from_entity(review),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review removed"),
        (status = 404, description = "Review not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let result = Reviews::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Review not found"));
    }
    Ok(Json(ApiResponse::message("Review removed")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_enforced() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn review_status_enum() {
        for status in REVIEW_STATUSES {
            assert!(validate_review_status(status).is_ok());
        }
        assert!(validate_review_status("Approved").is_err());
    }
}
