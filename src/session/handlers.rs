use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use super::auth::TransportAuth;
use super::dto::{Reply, TextMessage};
use super::services::{handle_photo, handle_text};
use crate::{error::AppError, estimation::MealImage, state::AppState};

pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat/:user_id/text", post(post_text))
        .route(
            "/chat/:user_id/photo",
            post(post_photo).layer(DefaultBodyLimit::max(20 * 1024 * 1024)), // 20MB
        )
}

#[instrument(skip(state, _auth, body))]
pub async fn post_text(
    State(state): State<AppState>,
    _auth: TransportAuth,
    Path(user_id): Path<i64>,
    Json(body): Json<TextMessage>,
) -> Result<Json<Reply>, AppError> {
    Ok(Json(handle_text(&state, user_id, &body.text).await?))
}

/// Multipart fields: `photo` (file, required) and `caption` (text, optional).
#[instrument(skip(state, _auth, mp))]
pub async fn post_photo(
    State(state): State<AppState>,
    _auth: TransportAuth,
    Path(user_id): Path<i64>,
    mut mp: Multipart,
) -> Result<Json<Reply>, AppError> {
    let mut image = None;
    let mut caption = None;
    loop {
        let field = match mp.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "malformed multipart body");
                return Err(AppError::validation(format!("malformed upload: {e}")));
            }
        };
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("photo") => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "image/jpeg".into());
                let body = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("unreadable photo: {e}")))?;
                image = Some(MealImage { body, content_type });
            }
            Some("caption") => {
                caption = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::validation(format!("unreadable caption: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| AppError::validation("photo is required"))?;
    Ok(Json(handle_photo(&state, user_id, image, caption).await?))
}
