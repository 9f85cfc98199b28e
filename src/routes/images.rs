use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    response::ApiResponse,
    state::AppState,
    upload,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadedImage {
    pub filename: String,
    pub url: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(upload_image)).route(
        "/{name}",
        get(display_image).put(replace_image).delete(delete_image),
    )
}

/// Pull the `image` field out of the multipart body and validate it.
async fn read_image_field(multipart: &mut Multipart) -> AppResult<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Invalid multipart body".into()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let ext = upload::allowed_extension(&filename)
            .ok_or_else(|| AppError::BadRequest("Images Only!".into()))?;
        if let Some(content_type) = field.content_type() {
            if !upload::allowed_mime(content_type) {
                return Err(AppError::BadRequest("Images Only!".into()));
            }
        }

        let data = field
            .bytes()
            .await
            .map_err(|_| AppError::BadRequest("Failed to read upload".into()))?;
        if data.len() > upload::MAX_IMAGE_BYTES {
            return Err(AppError::BadRequest("Image exceeds the 10MB limit".into()));
        }

        return Ok((upload::generated_name(&ext), data.to_vec()));
    }

    Err(AppError::BadRequest("Image file is required".into()))
}

fn uploaded(filename: String) -> UploadedImage {
    let url = format!("/api/images/{filename}");
    UploadedImage { filename, url }
}

#[utoipa::path(
    post,
    path = "/api/images",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored image", body = ApiResponse<UploadedImage>),
        (status = 400, description = "Images Only!"),
    ),
    tag = "Images"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadedImage>>> {
    let (name, data) = read_image_field(&mut multipart).await?;
    upload::save_file(&state.config.upload_dir, &name, &data).await?;

    Ok(Json(ApiResponse::success(
        "Image uploaded",
        uploaded(name),
        None,
    )))
}

#[utoipa::path(
    put,
    path = "/api/images/{name}",
    params(
        ("name" = String, Path, description = "Stored image name")
    ),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Replacement stored", body = ApiResponse<UploadedImage>),
        (status = 404, description = "Old image not found!"),
    ),
    tag = "Images"
)]
pub async fn replace_image(
    State(state): State<AppState>,
    Path(name): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadedImage>>> {
    let old_name = upload::sanitize_name(&name)?;
    let old_path = upload::stored_path(&state.config.upload_dir, old_name);
    if !upload::file_exists(&old_path).await {
        return Err(AppError::not_found("Old image not found!"));
    }

    let (new_name, data) = read_image_field(&mut multipart).await?;
    upload::save_file(&state.config.upload_dir, &new_name, &data).await?;
    upload::remove_file(&old_path).await?;

    Ok(Json(ApiResponse::success(
        "Image updated",
        uploaded(new_name),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/images/{name}",
    params(
        ("name" = String, Path, description = "Stored image name")
    ),
    responses(
        (status = 200, description = "Image removed"),
        (status = 404, description = "Image not found"),
    ),
    tag = "Images"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let name = upload::sanitize_name(&name)?;
    let path = upload::stored_path(&state.config.upload_dir, name);
    if !upload::file_exists(&path).await {
        return Err(AppError::not_found("Image not found"));
    }
    upload::remove_file(&path).await?;

    Ok(Json(ApiResponse::message("Image removed")))
}

#[utoipa::path(
    get,
    path = "/api/images/{name}",
    params(
        ("name" = String, Path, description = "Stored image name")
    ),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 404, description = "Image not found"),
    ),
    tag = "Images"
)]
pub async fn display_image(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let name = upload::sanitize_name(&name)?;
    let path = upload::stored_path(&state.config.upload_dir, name);

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::not_found("Image not found"))?;

    let content_type = upload::content_type_for(name);
    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}
