use super::error::{classify_upload_error, multipart_error};
use super::{player_url, stream_url, AppState};
use crate::domain::format::StreamFormat;
use crate::domain::identity::VideoId;
use crate::error::Error;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub(super) struct UploadResponse {
    id: VideoId,
    status: &'static str,
    hls_url: String,
    dash_url: String,
    player_url: String,
}

impl UploadResponse {
    fn new(id: VideoId) -> Self {
        Self {
            id,
            status: "success",
            hls_url: stream_url(&id, StreamFormat::Hls),
            dash_url: stream_url(&id, StreamFormat::Dash),
            player_url: player_url(&id),
        }
    }
}

/// Streams the `file` field to disk, then packages it before answering.
pub(super) async fn handle(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, Error> {
    let limit = state.max_upload_bytes;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(Error::MissingFile),
            Err(err) => return Err(multipart_error(&err, limit)),
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let record = state
            .ingest
            .ingest(&filename, field)
            .await
            .map_err(|err| classify_upload_error(err, limit))?;

        return Ok(Json(UploadResponse::new(record.id)));
    }
}
