//! Unified error type for the packaging service.
//!
//! Every layer funnels its failures into [`Error`]; the HTTP adapter derives
//! the response status from [`Error::http_status`] and the machine-readable
//! reason from [`Error::code`].

use crate::domain::format::PackagingReport;
use crate::domain::identity::VideoId;
use std::time::Duration;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The multipart body has no `file` field.
    #[error("No file part")]
    MissingFile,

    /// The `file` field carries an empty filename.
    #[error("No selected file")]
    EmptyFilename,

    /// The `file` field carries no content.
    #[error("Uploaded file is empty")]
    EmptyUpload,

    #[error("File type not allowed: {0}")]
    DisallowedExtension(String),

    /// The multipart body could not be decoded.
    #[error("Invalid multipart body: {0}")]
    Multipart(String),

    #[error("Upload exceeds the maximum size of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Creating a directory or writing the uploaded file failed.
    #[error("Failed to save file: {0}")]
    Storage(#[from] std::io::Error),

    /// At least one format failed to package.
    #[error("Conversion failed for video {id}")]
    Conversion { id: VideoId, report: PackagingReport },

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The child started but collecting its exit status or output failed.
    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {timeout:?}")]
    TimedOut { program: String, timeout: Duration },

    #[error("{0} not found")]
    NotFound(String),

    /// Opening or reading a served file failed for a reason other than absence.
    #[error("Failed to read file: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to read videos directory: {0}")]
    Catalog(#[source] std::io::Error),
}

impl Error {
    /// Map this error to an HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::MissingFile
            | Error::EmptyFilename
            | Error::EmptyUpload
            | Error::DisallowedExtension(_)
            | Error::Multipart(_) => 400,
            Error::PayloadTooLarge { .. } => 413,
            Error::NotFound(_) => 404,
            Error::Storage(_)
            | Error::Conversion { .. }
            | Error::Spawn { .. }
            | Error::Wait { .. }
            | Error::TimedOut { .. }
            | Error::Read(_)
            | Error::Catalog(_) => 500,
        }
    }

    /// Short machine-readable reason for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            Error::MissingFile => "missing_file",
            Error::EmptyFilename => "empty_filename",
            Error::EmptyUpload => "empty_upload",
            Error::DisallowedExtension(_) => "disallowed_extension",
            Error::Multipart(_) => "invalid_multipart",
            Error::PayloadTooLarge { .. } => "payload_too_large",
            Error::Storage(_) => "storage_error",
            Error::Conversion { .. } => "conversion_failed",
            Error::Spawn { .. } => "spawn_failed",
            Error::Wait { .. } => "wait_failed",
            Error::TimedOut { .. } => "timed_out",
            Error::NotFound(_) => "not_found",
            Error::Read(_) => "read_failed",
            Error::Catalog(_) => "catalog_unreadable",
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound(what.into())
    }
}
