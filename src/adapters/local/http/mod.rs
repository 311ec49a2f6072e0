//! HTTP inbound adapter.
//!
//! Routes:
//! - `GET /` landing page with the upload form
//! - `POST /upload` multipart upload (field `file`), packaged before replying
//! - `GET /stream/:id/:format/*path` files of the HLS/DASH trees
//! - `GET /player/:id` playback page
//! - `GET /videos` JSON listing of packaged videos

mod error;
mod pages;
mod stream;
mod upload;
mod videos;

use crate::application::catalog::CatalogService;
use crate::application::ingest::IngestService;
use crate::domain::format::StreamFormat;
use crate::domain::identity::VideoId;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub ingest: Arc<IngestService>,
    pub catalog: CatalogService,
    pub output_root: PathBuf,
    pub max_upload_bytes: usize,
}

pub fn router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(pages::index))
        .route(
            "/upload",
            post(upload::handle).layer(DefaultBodyLimit::max(state.max_upload_bytes)),
        )
        .route("/stream/:video_id/:format/*path", get(stream::handle))
        .route("/player/:video_id", get(pages::player))
        .route("/videos", get(videos::handle));

    if let Some(dir) = static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub(crate) fn stream_url(id: &VideoId, format: StreamFormat) -> String {
    format!("/stream/{}/{}/{}", id, format.dir_name(), format.entry_file())
}

pub(crate) fn player_url(id: &VideoId) -> String {
    format!("/player/{}", id)
}
