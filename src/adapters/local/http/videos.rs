use super::{player_url, stream_url, AppState};
use crate::application::catalog::CatalogEntry;
use crate::domain::format::StreamFormat;
use crate::domain::identity::VideoId;
use crate::error::Error;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(super) struct VideoSummary {
    id: VideoId,
    player_url: String,
    hls_url: Option<String>,
    dash_url: Option<String>,
}

impl From<CatalogEntry> for VideoSummary {
    fn from(entry: CatalogEntry) -> Self {
        let url = |format| entry.is_available(format).then(|| stream_url(&entry.id, format));
        Self {
            id: entry.id,
            player_url: player_url(&entry.id),
            hls_url: url(StreamFormat::Hls),
            dash_url: url(StreamFormat::Dash),
        }
    }
}

pub(super) async fn handle(State(state): State<AppState>) -> Result<Json<Vec<VideoSummary>>, Error> {
    let entries = state.catalog.list_available().await?;
    Ok(Json(entries.into_iter().map(VideoSummary::from).collect()))
}
