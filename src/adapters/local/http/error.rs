use crate::error::Error;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        }

        let body = match &self {
            Error::Conversion { id, report } => json!({
                "error": "Conversion failed",
                "code": self.code(),
                "id": id,
                "formats": {
                    "hls": report.hls.status,
                    "dash": report.dash.status,
                },
            }),
            _ => json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Map a multipart decoding failure, keeping body-limit overruns distinct.
pub(super) fn multipart_error(err: &MultipartError, limit: usize) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge { limit }
    } else {
        Error::Multipart(err.body_text())
    }
}

/// Recover multipart failures that surfaced while the body was streamed to
/// disk, so an oversized body answers 413 rather than a storage error.
pub(super) fn classify_upload_error(err: Error, limit: usize) -> Error {
    let recovered = match &err {
        Error::Storage(io) => io
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<MultipartError>())
            .map(|multipart| multipart_error(multipart, limit)),
        _ => None,
    };
    recovered.unwrap_or(err)
}
