pub mod local;
pub mod s3;

use std::fmt;

use async_trait::async_trait;

use crate::models::sound::{AudioUpload, SoundKind};

pub use local::LocalBlobStore;
pub use s3::S3BlobStore;

pub const MAX_SOUND_SIZE: usize = 10 * 1024 * 1024; // 10 MB

/// Generic binary type some clients send for any file.
pub const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug)]
pub enum BlobError {
    /// The URL does not point into this store.
    MalformedUrl(String),
    Backend(String),
}

impl fmt::Display for BlobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobError::MalformedUrl(url) => write!(f, "invalid blob URL format: {url}"),
            BlobError::Backend(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for BlobError {}

/// Object storage for audio payloads.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `audio` under the directory of `kind` and returns its public URL.
    async fn upload(
        &self,
        kind: SoundKind,
        key: &str,
        audio: &AudioUpload,
    ) -> Result<String, BlobError>;

    /// Removes the object a previous `upload` returned `url` for.
    async fn delete(&self, url: &str) -> Result<(), BlobError>;
}

/// Full object key for an upload: `<directory>/<key>`.
pub fn object_key(kind: SoundKind, key: &str) -> String {
    format!("{}/{}", kind.directory(), key)
}

/// Blob key for a sound's audio, unique per sound.
pub fn audio_key(sound_id: &str, filename: &str) -> String {
    format!("{sound_id}-{}", sanitize_filename(filename))
}

/// Sanitize a filename for use in an object key and a public URL.
///
/// Anything outside `[A-Za-z0-9._-]` becomes `_`, so the key never needs
/// percent-encoding and cannot escape its directory.
pub fn sanitize_filename(name: &str) -> String {
    let name: String = name
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect();
    let name = name.trim_start_matches('.');
    if name.is_empty() {
        "audio".to_string()
    } else {
        name.to_string()
    }
}

/// Whether a declared content type is acceptable for audio uploads:
/// any `audio/*` subtype, or `application/octet-stream`.
pub fn is_allowed_audio_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match mime.split_once('/') {
        Some(("audio", subtype)) => !subtype.is_empty(),
        _ => mime == OCTET_STREAM,
    }
}

/// Parse a `data:<mime>;base64,<data>` URI for audio.
/// Returns `(decoded_bytes, content_type)`.
pub fn decode_audio_data_uri(data: &str) -> Result<(Vec<u8>, String), String> {
    let rest = data
        .strip_prefix("data:")
        .ok_or_else(|| "audio must be a data URI".to_string())?;
    let (mime, b64) = rest
        .split_once(";base64,")
        .ok_or_else(|| "audio must be a base64 data URI".to_string())?;

    let clean: String = b64.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = data_encoding::BASE64
        .decode(clean.as_bytes())
        .map_err(|_| "invalid base64 data".to_string())?;

    Ok((bytes, mime.to_string()))
}

/// Default file extension for an audio content type.
pub fn mime_to_ext(content_type: &str) -> &'static str {
    match content_type {
        "audio/ogg" => "ogg",
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/flac" => "flac",
        "audio/aac" => "aac",
        "audio/mp4" | "audio/x-m4a" => "m4a",
        "audio/opus" => "opus",
        "audio/webm" => "webm",
        _ => "bin",
    }
}
