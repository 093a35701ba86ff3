use std::sync::Arc;

use tokio::net::TcpListener;

use soundserver::config::{BlobBackend, Config};
use soundserver::db::SqliteSoundStore;
use soundserver::service::SoundService;
use soundserver::state::AppState;
use soundserver::storage::{BlobStore, LocalBlobStore, S3BlobStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soundserver=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env();
    print_banner(&config);

    let pool = soundserver::db::create_pool(&config.database_url)
        .await
        .expect("failed to create database pool");
    tracing::info!("database connected");
    let store = Arc::new(SqliteSoundStore::new(pool));

    let (blobs, cdn_root) = match config.blob_backend {
        BlobBackend::S3 => {
            let s3 = config
                .s3
                .as_ref()
                .expect("S3 config is required when the blob backend is s3");
            let blobs = S3BlobStore::connect(&s3.bucket, s3.public_url.as_deref()).await;
            blobs.check_bucket().await;
            (Arc::new(blobs) as Arc<dyn BlobStore>, None)
        }
        BlobBackend::Local => {
            let blobs = LocalBlobStore::new(config.storage_path.clone());
            if let Err(e) = blobs.prepare().await {
                tracing::error!(
                    "failed to create storage directory {:?}: {:?}",
                    config.storage_path,
                    e
                );
            }
            (
                Arc::new(blobs) as Arc<dyn BlobStore>,
                Some(config.storage_path.clone()),
            )
        }
    };

    let state = AppState {
        sounds: SoundService::new(store, blobs),
        cdn_root,
    };

    let app = soundserver::routes::router(state);

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("failed to bind");

    let actual_port = listener
        .local_addr()
        .expect("failed to get local address")
        .port();
    eprintln!("  \x1b[32m→ listening on 0.0.0.0:{actual_port}\x1b[0m");
    eprintln!();

    axum::serve(listener, app).await.expect("server error");
}

fn print_banner(config: &Config) {
    let version = env!("CARGO_PKG_VERSION");
    let blobs = match (&config.blob_backend, &config.s3) {
        (BlobBackend::S3, Some(s3)) => format!("s3 ({})", s3.bucket),
        _ => format!("local ({})", config.storage_path.display()),
    };

    eprintln!();
    eprintln!("  \x1b[1;36msoundserver\x1b[0m \x1b[2mv{version}\x1b[0m");
    eprintln!();
    eprintln!("  \x1b[2mport\x1b[0m         {}", config.port);
    eprintln!("  \x1b[2mdatabase\x1b[0m     {}", config.database_url);
    eprintln!("  \x1b[2mblobs\x1b[0m        {blobs}");
    eprintln!();
}
