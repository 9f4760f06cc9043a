use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{error::ApiError, state::AppState};

use super::dto::{parse_number, MessageResponse, UpdateItemRequest};
use super::repo::{self, Item};
use super::service::{
    age_years_from_days, next_item_id, presign_item_image, remove_item_image, store_item_image,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items))
        .route("/items/:id", get(get_item))
        .route("/items/:id/image", get(get_item_image))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/items", post(create_item))
        .route("/items/:id", put(update_item).delete(delete_item))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB, covers the image part
}

#[instrument(skip(state))]
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
    let items = repo::list_all(&state.db).await?;
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let item = repo::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".into()))?;
    Ok(Json(item))
}

/// POST /items (multipart form). Text parts carry the item fields; an
/// optional binary part named "file" carries the image.
#[instrument(skip(state, multipart))]
pub async fn create_item(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let mut name = None;
    let mut description = None;
    let mut category = None;
    let mut condition = None;
    let mut zipcode = None;
    let mut image = None;
    let mut comments = None;
    let mut age_days_raw: Option<String> = None;
    let mut age_years_raw: Option<String> = None;
    let mut stored_image_key = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        let field_name = field.name().map(|s| s.to_string());
        match field_name.as_deref() {
            Some("file") => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("invalid file part: {e}")))?;
                stored_image_key = Some(store_item_image(&state, data, &content_type).await?);
            }
            Some(text_field) => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("invalid form field: {e}")))?;
                match text_field {
                    "name" => name = Some(value),
                    "description" => description = Some(value),
                    "category" => category = Some(value),
                    "condition" => condition = Some(value),
                    "zipcode" => zipcode = Some(value),
                    "image" => image = Some(value),
                    "comments" => comments = Some(value),
                    "age_days" => age_days_raw = Some(value),
                    "age_years" => age_years_raw = Some(value),
                    _ => {}
                }
            }
            None => {}
        }
    }

    let age_days = age_days_raw.as_deref().and_then(parse_number);
    // Derived whenever age_days is usable; a client-sent age_years only
    // survives when there is no age_days to derive from.
    let age_years = match age_days {
        Some(days) => Some(age_years_from_days(days)),
        None => age_years_raw.as_deref().and_then(parse_number),
    };

    let id = next_item_id(repo::max_numeric_id(&state.db).await?);

    let item = Item {
        id,
        name,
        description,
        category,
        condition,
        zipcode,
        image: stored_image_key.or(image),
        comments,
        age_days,
        age_years,
        date_added: OffsetDateTime::now_utc().unix_timestamp(),
        updated_at: None,
    };

    let created = repo::insert(&state.db, &item).await?;
    info!(id = %created.id, "item created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, payload))]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let mut item = repo::find_by_id(&state.db, &id).await?.ok_or_else(|| {
        warn!(%id, "Item not found");
        ApiError::NotFound("Item not found".into())
    })?;

    // Partial update: only fields present in the request are applied.
    if let Some(age_days) = payload.age_days {
        item.age_days = Some(age_days);
    }
    if let Some(condition) = payload.condition {
        item.condition = Some(condition);
    }
    if let Some(description) = payload.description {
        item.description = Some(description);
    }
    if let Some(category) = payload.category {
        item.category = Some(category);
    }
    if let Some(name) = payload.name {
        item.name = Some(name);
    }
    if let Some(zipcode) = payload.zipcode {
        item.zipcode = Some(zipcode);
    }
    if let Some(image) = payload.image {
        item.image = Some(image);
    }
    if let Some(comments) = payload.comments {
        item.comments = Some(comments);
    }

    // Recomputed from the current age_days on every update, whether or not
    // this request changed it.
    if let Some(days) = item.age_days {
        item.age_years = Some(age_years_from_days(days));
    }
    item.updated_at = Some(OffsetDateTime::now_utc());

    let updated = repo::replace_by_id(&state.db, &item).await?;
    if updated == 0 {
        warn!(%id, "item update touched no document");
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse::new("Upload failed")),
        ));
    }

    info!(%id, "item updated");
    Ok((StatusCode::OK, Json(MessageResponse::new("Successful upload"))))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let item = repo::find_by_id(&state.db, &id).await?.ok_or_else(|| {
        warn!(%id, "Item not found");
        ApiError::NotFound("Item not found".into())
    })?;

    repo::delete_by_id(&state.db, &id).await?;

    if let Some(key) = &item.image {
        remove_item_image(&state, key).await;
    }

    info!(%id, "item deleted");
    Ok(Json(MessageResponse::new("Deletion successful")))
}

/// 302 to a short-lived URL for the item's stored image.
#[instrument(skip(state))]
pub async fn get_item_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, ApiError> {
    let item = repo::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".into()))?;

    let key = item
        .image
        .ok_or_else(|| ApiError::NotFound("Image not found".into()))?;

    let url = presign_item_image(&state, &key).await?;
    Ok(Redirect::temporary(&url))
}
