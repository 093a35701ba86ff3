use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which library a sound belongs to. Decides the blob directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SoundKind {
    Background,
    Session,
}

impl SoundKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundKind::Background => "background",
            SoundKind::Session => "session",
        }
    }

    /// Object-store directory that holds audio of this kind.
    pub fn directory(&self) -> &'static str {
        match self {
            SoundKind::Background => "background-audios",
            SoundKind::Session => "session-audios",
        }
    }
}

impl FromStr for SoundKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "background" => Ok(SoundKind::Background),
            "session" => Ok(SoundKind::Session),
            other => Err(format!(
                "invalid type: {other}. allowed: background, session"
            )),
        }
    }
}

impl fmt::Display for SoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SoundTier {
    Free,
    Premium,
}

impl SoundTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundTier::Free => "free",
            SoundTier::Premium => "premium",
        }
    }
}

impl FromStr for SoundTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(SoundTier::Free),
            "premium" => Ok(SoundTier::Premium),
            other => Err(format!("invalid tier: {other}. allowed: free, premium")),
        }
    }
}

impl fmt::Display for SoundTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Sound {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SoundKind,
    pub tier: SoundTier,
    pub duration: i64,
    pub description: Option<String>,
    /// Public URL of the audio blob.
    pub url: String,
}

/// Raw audio payload received from a client.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Creation request as received. Text fields stay unparsed so that
/// validation can report every problem at once.
#[derive(Debug, Default)]
pub struct NewSound {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub tier: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub audio: Option<AudioUpload>,
}

/// Partial update. `None` or an empty value leaves the stored value alone.
///
/// Removing the description takes the explicit `clear_description` flag;
/// a non-empty `description` in the same request takes precedence.
#[derive(Debug, Default)]
pub struct UpdateSound {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub tier: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub clear_description: bool,
    pub audio: Option<AudioUpload>,
}
