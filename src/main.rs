use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vodpack::adapters::local::{router, AppState, FfmpegRunner, FsStore};
use vodpack::application::catalog::CatalogService;
use vodpack::application::ingest::IngestService;
use vodpack::application::packager::PackagerService;
use vodpack::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 1. Storage roots
    let roots = config.storage_roots();
    roots.ensure().await?;

    // 2. Adapters
    let runner = FfmpegRunner::new(&config.ffmpeg_bin, config.transcode_timeout);

    // 3. Application services
    let packager =
        PackagerService::new(Arc::new(runner)).with_parallel_formats(config.parallel_formats);
    let ingest = IngestService::new(
        roots.clone(),
        config.upload_policy(),
        FsStore::new(),
        packager,
    );

    let state = AppState {
        ingest: Arc::new(ingest),
        catalog: CatalogService::new(&roots.output_root),
        output_root: roots.output_root.clone(),
        max_upload_bytes: config.max_upload_bytes,
    };

    // 4. HTTP layer
    let static_dir = config.static_dir.is_dir().then(|| config.static_dir.clone());
    let app = router(state, static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(
        addr = %config.bind_addr(),
        uploads = %roots.upload_root.display(),
        streams = %roots.output_root.display(),
        "Listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
