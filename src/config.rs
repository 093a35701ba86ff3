#[derive(Debug, Clone, PartialEq)]
pub enum BlobBackend {
    Local,
    S3,
}

#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    /// Overrides the `https://<bucket>.s3.<region>.amazonaws.com` URL prefix.
    pub public_url: Option<String>,
}

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub blob_backend: BlobBackend,
    pub storage_path: std::path::PathBuf,
    pub s3: Option<S3Config>,
}

impl Config {
    pub fn from_env() -> Self {
        let blob_backend = match std::env::var("SOUNDS_BLOB_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .to_lowercase()
            .as_str()
        {
            "s3" => BlobBackend::S3,
            _ => BlobBackend::Local,
        };

        let s3 = if blob_backend == BlobBackend::S3 {
            let bucket = std::env::var("AWS_BUCKET_NAME")
                .expect("AWS_BUCKET_NAME is required when SOUNDS_BLOB_BACKEND=s3");
            let public_url = std::env::var("SOUNDS_S3_PUBLIC_URL")
                .ok()
                .filter(|v| !v.is_empty());
            Some(S3Config { bucket, public_url })
        } else {
            None
        };

        let storage_path = std::env::var("SOUNDS_STORAGE_PATH")
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|_| std::path::PathBuf::from("./cdn"));

        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:sounds.db?mode=rwc".to_string()),
            blob_backend,
            storage_path,
            s3,
        }
    }
}
