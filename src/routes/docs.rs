use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use super::{health, sounds};
use crate::error::ErrorBody;
use crate::models::sound::{Sound, SoundKind, SoundTier};

/// Where the generated OpenAPI document is served; the UI lives at `/swagger`.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "soundserver", description = "Background and session sound library"),
    paths(
        health::health,
        health::version,
        sounds::list_sounds,
        sounds::get_sound,
        sounds::create_sound,
        sounds::update_sound,
        sounds::delete_sound,
    ),
    components(schemas(Sound, SoundKind, SoundTier, SoundUploadForm, DeletedBody, ErrorBody)),
    tags(
        (name = "sounds", description = "Sound records and their audio"),
        (name = "health", description = "Liveness and build info"),
    )
)]
pub struct ApiDoc;

/// `multipart/form-data` fields accepted by create and update.
/// Every field except `clear_description` is required on create.
#[derive(Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct SoundUploadForm {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<SoundKind>,
    tier: Option<SoundTier>,
    /// Length in seconds, greater than zero.
    duration: Option<i64>,
    description: Option<String>,
    /// `true` removes the stored description on update.
    clear_description: Option<bool>,
    /// `audio/*` or `application/octet-stream`, at most 10 MB.
    #[schema(value_type = Option<String>, format = Binary)]
    file: Option<Vec<u8>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedBody {
    pub message: String,
}
