use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Deserializer};

use crate::error::AppError;
use crate::models::sound::{AudioUpload, NewSound, UpdateSound};
use crate::storage::{self, MAX_SOUND_SIZE};

/// Sound fields as submitted, either as `multipart/form-data` or as JSON
/// with the audio inlined as a base64 data URI.
///
/// A field is `None` when the client did not send it at all.
/// `clear_description` is set by a JSON `"description": null` or by a
/// truthy `clear_description` form field.
#[derive(Debug, Default)]
pub struct SoundForm {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub tier: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub clear_description: bool,
    pub audio: Option<AudioUpload>,
}

impl SoundForm {
    pub fn into_new_sound(self) -> NewSound {
        NewSound {
            name: self.name,
            kind: self.kind,
            tier: self.tier,
            duration: self.duration,
            description: self.description,
            audio: self.audio,
        }
    }

    /// Fields sent empty are treated as not sent.
    pub fn into_update(self) -> UpdateSound {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        UpdateSound {
            name: non_empty(self.name),
            kind: non_empty(self.kind),
            tier: non_empty(self.tier),
            duration: non_empty(self.duration),
            description: non_empty(self.description),
            clear_description: self.clear_description,
            audio: self.audio,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonSoundBody {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    tier: Option<String>,
    duration: Option<serde_json::Value>,
    /// Outer `None`: absent. `Some(None)`: explicit `null`.
    #[serde(default, deserialize_with = "present_or_null")]
    description: Option<Option<String>>,
    /// `data:<mime>;base64,<data>`
    audio: Option<String>,
    filename: Option<String>,
}

impl SoundForm {
    fn from_json(body: JsonSoundBody) -> Result<Self, AppError> {
        let duration = match body.duration {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        };

        let audio = match body.audio {
            Some(data) => {
                let (bytes, content_type) =
                    storage::decode_audio_data_uri(&data).map_err(AppError::BadRequest)?;
                check_size(bytes.len())?;
                let filename = body
                    .filename
                    .unwrap_or_else(|| format!("audio.{}", storage::mime_to_ext(&content_type)));
                Some(AudioUpload {
                    filename,
                    content_type: Some(content_type),
                    bytes,
                })
            }
            None => None,
        };

        Ok(SoundForm {
            name: body.name,
            kind: body.kind,
            tier: body.tier,
            duration,
            clear_description: matches!(body.description, Some(None)),
            description: body.description.flatten(),
            audio,
        })
    }
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl<S> FromRequest<S> for SoundForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            read_multipart(multipart).await
        } else if content_type.starts_with("application/json") {
            let Json(body) = Json::<JsonSoundBody>::from_request(req, state)
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            SoundForm::from_json(body)
        } else {
            Err(AppError::UnsupportedMediaType(
                "expected multipart/form-data or application/json".to_string(),
            ))
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<SoundForm, AppError> {
    let mut form = SoundForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };

        if field_name == "file" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;
            // Browsers send an empty, unnamed part when no file was chosen.
            if bytes.is_empty() && filename.is_empty() {
                continue;
            }
            check_size(bytes.len())?;
            form.audio = Some(AudioUpload {
                filename,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        if field_name == "clear_description" {
            let value = field.text().await.map_err(multipart_error)?;
            form.clear_description = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "on" | "yes"
            );
            continue;
        }

        let slot = match field_name.as_str() {
            "name" => &mut form.name,
            "type" => &mut form.kind,
            "tier" => &mut form.tier,
            "duration" => &mut form.duration,
            "description" => &mut form.description,
            other => {
                tracing::debug!("ignoring unknown form field {other}");
                continue;
            }
        };
        *slot = Some(field.text().await.map_err(multipart_error)?);
    }

    Ok(form)
}

fn check_size(len: usize) -> Result<(), AppError> {
    if len > MAX_SOUND_SIZE {
        return Err(AppError::PayloadTooLarge(format!(
            "audio exceeds maximum size of {} MB",
            MAX_SOUND_SIZE / (1024 * 1024)
        )));
    }
    Ok(())
}

fn multipart_error(e: MultipartError) -> AppError {
    rejection(e.status(), e.body_text())
}

fn rejection(status: StatusCode, text: String) -> AppError {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(text),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => AppError::UnsupportedMediaType(text),
        _ => AppError::BadRequest(text),
    }
}
