use std::sync::Arc;

use crate::db::SoundStore;
use crate::error::SoundError;
use crate::models::sound::{AudioUpload, NewSound, Sound, SoundKind, SoundTier, UpdateSound};
use crate::storage::{self, BlobStore};

/// Sound lifecycle: validation, uniqueness and the ordered writes across
/// the record store and the blob store.
///
/// Create uploads before inserting, so a record never points at a missing
/// blob. Delete removes the blob before the record, so a failed blob
/// deletion leaves the record in place for a retry.
#[derive(Clone)]
pub struct SoundService {
    store: Arc<dyn SoundStore>,
    blobs: Arc<dyn BlobStore>,
}

impl SoundService {
    pub fn new(store: Arc<dyn SoundStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    pub async fn create(&self, input: NewSound) -> Result<Sound, SoundError> {
        let name = present(input.name);
        let kind = present(input.kind);
        let tier = present(input.tier);
        let duration = present(input.duration);

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push("name");
        }
        if kind.is_none() {
            missing.push("type");
        }
        if tier.is_none() {
            missing.push("tier");
        }
        if duration.is_none() {
            missing.push("duration");
        }
        if input.audio.is_none() {
            missing.push("file");
        }

        let (Some(name), Some(kind), Some(tier), Some(duration), Some(audio)) =
            (name, kind, tier, duration, input.audio)
        else {
            return Err(SoundError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        };

        let kind = parse_kind(&kind)?;
        let tier = parse_tier(&tier)?;
        let duration = parse_duration(&duration)?;
        check_audio(&audio)?;

        if self.store.find_by_name(&name).await?.is_some() {
            return Err(SoundError::Conflict(format!("name already exists: {name}")));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let key = storage::audio_key(&id, &audio.filename);
        tracing::debug!("uploading audio for sound {id} as {key}");
        let url = self.blobs.upload(kind, &key, &audio).await?;

        let sound = Sound {
            id,
            name,
            kind,
            tier,
            duration,
            description: input.description.filter(|d| !d.is_empty()),
            url,
        };

        if let Err(e) = self.store.insert(&sound).await {
            tracing::warn!(
                "insert of sound {} failed after upload, orphaned blob {}",
                sound.id,
                sound.url
            );
            return Err(e.into());
        }

        tracing::info!("created sound {} ({})", sound.id, sound.name);
        Ok(sound)
    }

    pub async fn get(&self, id: &str) -> Result<Sound, SoundError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| SoundError::NotFound("unknown_sound".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Sound>, SoundError> {
        Ok(self.store.list().await?)
    }

    pub async fn update(&self, id: &str, input: UpdateSound) -> Result<Sound, SoundError> {
        let mut sound = self.get(id).await?;

        // Validate everything supplied before touching any backend state.
        let kind = input.kind.as_deref().map(parse_kind).transpose()?;
        let tier = input.tier.as_deref().map(parse_tier).transpose()?;
        let duration = input.duration.as_deref().map(parse_duration).transpose()?;
        let name = match input.name {
            Some(name) if name.trim().is_empty() => {
                return Err(SoundError::Validation("name must not be empty".to_string()))
            }
            other => other.map(|name| name.trim().to_string()),
        };
        if let Some(ref audio) = input.audio {
            check_audio(audio)?;
        }

        if let Some(ref name) = name {
            if *name != sound.name {
                if let Some(other) = self.store.find_by_name(name).await? {
                    if other.id != sound.id {
                        return Err(SoundError::Conflict(format!(
                            "name already exists: {name}"
                        )));
                    }
                }
            }
        }

        if let Some(name) = name {
            sound.name = name;
        }
        if let Some(kind) = kind {
            sound.kind = kind;
        }
        if let Some(tier) = tier {
            sound.tier = tier;
        }
        if let Some(duration) = duration {
            sound.duration = duration;
        }
        match input.description.filter(|d| !d.is_empty()) {
            Some(description) => sound.description = Some(description),
            None if input.clear_description => sound.description = None,
            None => {}
        }

        let mut replaced = None;
        if let Some(ref audio) = input.audio {
            let key = storage::audio_key(&sound.id, &audio.filename);
            tracing::debug!("uploading replacement audio for sound {} as {key}", sound.id);
            let url = self.blobs.upload(sound.kind, &key, audio).await?;
            if url != sound.url {
                replaced = Some(std::mem::replace(&mut sound.url, url));
            }
        }

        if let Err(e) = self.store.update(&sound).await {
            if replaced.is_some() {
                tracing::warn!(
                    "update of sound {} failed after upload, orphaned blob {}",
                    sound.id,
                    sound.url
                );
            }
            return Err(e.into());
        }

        if let Some(old_url) = replaced {
            tracing::warn!(
                "sound {} now points at {}, previous blob {old_url} was left in place",
                sound.id,
                sound.url
            );
        }
        tracing::info!("updated sound {}", sound.id);
        Ok(sound)
    }

    pub async fn delete(&self, id: &str) -> Result<(), SoundError> {
        let sound = self.get(id).await?;

        self.blobs.delete(&sound.url).await?;
        self.store.delete(&sound.id).await?;

        tracing::info!("deleted sound {} ({})", sound.id, sound.name);
        Ok(())
    }
}

/// Trimmed value, or `None` when absent or blank.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_kind(value: &str) -> Result<SoundKind, SoundError> {
    value.trim().parse().map_err(SoundError::Validation)
}

fn parse_tier(value: &str) -> Result<SoundTier, SoundError> {
    value.trim().parse().map_err(SoundError::Validation)
}

fn parse_duration(value: &str) -> Result<i64, SoundError> {
    match value.trim().parse::<i64>() {
        Ok(duration) if duration > 0 => Ok(duration),
        _ => Err(SoundError::Validation(format!(
            "invalid duration: {value}. must be a positive number of seconds"
        ))),
    }
}

fn check_audio(audio: &AudioUpload) -> Result<(), SoundError> {
    if audio.bytes.is_empty() {
        return Err(SoundError::Validation("file must not be empty".to_string()));
    }
    if let Some(ref content_type) = audio.content_type {
        if !storage::is_allowed_audio_type(content_type) {
            return Err(SoundError::Validation(format!(
                "unsupported audio type: {content_type}"
            )));
        }
    }
    Ok(())
}
