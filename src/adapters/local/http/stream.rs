use super::AppState;
use crate::domain::format::StreamFormat;
use crate::domain::identity::VideoId;
use crate::error::Error;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use std::io::ErrorKind;
use std::path::{Component, PathBuf};
use tokio_util::io::ReaderStream;

/// Serves a file from a video's HLS or DASH tree, bytes unchanged.
pub(super) async fn handle(
    State(state): State<AppState>,
    Path((video_id, format, path)): Path<(String, String, String)>,
) -> Result<Response, Error> {
    let not_found = || Error::not_found(format!("/stream/{video_id}/{format}/{path}"));

    let id: VideoId = video_id.parse().map_err(|_| not_found())?;
    let format = StreamFormat::from_dir_name(&format).ok_or_else(not_found)?;
    let relative = contained_path(&path).ok_or_else(not_found)?;

    let file_path = state
        .output_root
        .join(id.to_string())
        .join(format.dir_name())
        .join(relative);

    let file = tokio::fs::File::open(&file_path)
        .await
        .map_err(|err| read_error(err, not_found))?;
    let metadata = file.metadata().await.map_err(Error::Read)?;
    if !metadata.is_file() {
        return Err(not_found());
    }

    let content_type = mime_guess::from_path(&file_path)
        .first_or_octet_stream()
        .to_string();

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_LENGTH, metadata.len().to_string()),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}

fn read_error(err: std::io::Error, not_found: impl FnOnce() -> Error) -> Error {
    if err.kind() == ErrorKind::NotFound {
        not_found()
    } else {
        Error::Read(err)
    }
}

/// `path` as a relative path that cannot leave the directory it is joined to.
fn contained_path(path: &str) -> Option<PathBuf> {
    let path = path.trim_start_matches('/');
    if path.is_empty() || path.contains('\\') || path.contains('\0') {
        return None;
    }

    let mut relative = PathBuf::new();
    for component in std::path::Path::new(path).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            _ => return None,
        }
    }
    Some(relative)
}
