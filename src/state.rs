use std::path::PathBuf;

use crate::service::SoundService;

#[derive(Clone)]
pub struct AppState {
    pub sounds: SoundService,
    /// Directory served under `/cdn` when blobs live on local disk.
    pub cdn_root: Option<PathBuf>,
}
