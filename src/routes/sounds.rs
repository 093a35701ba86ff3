use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::docs::{DeletedBody, SoundUploadForm};
use super::form::SoundForm;
use crate::error::{AppError, ErrorBody};
use crate::models::sound::Sound;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/sounds",
    tag = "sounds",
    responses(
        (status = 200, description = "Every stored sound", body = Vec<Sound>),
        (status = 500, description = "Store unavailable", body = ErrorBody),
    )
)]
pub async fn list_sounds(state: State<AppState>) -> Result<Json<Vec<Sound>>, AppError> {
    let sounds = state.sounds.list().await?;
    Ok(Json(sounds))
}

#[utoipa::path(
    get,
    path = "/sounds/{sound_id}",
    tag = "sounds",
    params(("sound_id" = String, Path, description = "Sound uuid")),
    responses(
        (status = 200, description = "The sound", body = Sound),
        (status = 404, description = "Unknown sound", body = ErrorBody),
    )
)]
pub async fn get_sound(
    state: State<AppState>,
    Path(sound_id): Path<String>,
) -> Result<Json<Sound>, AppError> {
    let sound = state.sounds.get(&sound_id).await?;
    Ok(Json(sound))
}

/// Also accepts `application/json` with the audio as a base64 data URI in
/// `audio` and an optional `filename`.
#[utoipa::path(
    post,
    path = "/sounds",
    tag = "sounds",
    request_body(content = SoundUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Sound created", body = Sound),
        (status = 400, description = "Missing or invalid fields", body = ErrorBody),
        (status = 409, description = "Name already taken", body = ErrorBody),
        (status = 413, description = "Audio too large", body = ErrorBody),
        (status = 415, description = "Unsupported request body", body = ErrorBody),
        (status = 500, description = "Blob or record store failed", body = ErrorBody),
    )
)]
pub async fn create_sound(
    state: State<AppState>,
    form: SoundForm,
) -> Result<(StatusCode, Json<Sound>), AppError> {
    let sound = state.sounds.create(form.into_new_sound()).await?;
    Ok((StatusCode::CREATED, Json(sound)))
}

/// Partial update: absent or empty fields keep their stored values.
#[utoipa::path(
    put,
    path = "/sounds/{sound_id}",
    tag = "sounds",
    params(("sound_id" = String, Path, description = "Sound uuid")),
    request_body(content = SoundUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated sound", body = Sound),
        (status = 400, description = "Invalid fields", body = ErrorBody),
        (status = 404, description = "Unknown sound", body = ErrorBody),
        (status = 409, description = "Name already taken", body = ErrorBody),
        (status = 500, description = "Blob or record store failed", body = ErrorBody),
    )
)]
pub async fn update_sound(
    state: State<AppState>,
    Path(sound_id): Path<String>,
    form: SoundForm,
) -> Result<Json<Sound>, AppError> {
    let sound = state.sounds.update(&sound_id, form.into_update()).await?;
    Ok(Json(sound))
}

#[utoipa::path(
    delete,
    path = "/sounds/{sound_id}",
    tag = "sounds",
    params(("sound_id" = String, Path, description = "Sound uuid")),
    responses(
        (status = 200, description = "Sound and its audio removed", body = DeletedBody),
        (status = 404, description = "Unknown sound", body = ErrorBody),
        (status = 500, description = "Blob or record store failed", body = ErrorBody),
    )
)]
pub async fn delete_sound(
    state: State<AppState>,
    Path(sound_id): Path<String>,
) -> Result<Json<DeletedBody>, AppError> {
    state.sounds.delete(&sound_id).await?;
    Ok(Json(DeletedBody {
        message: "sound deleted".to_string(),
    }))
}
