//! vodpack - upload a video, get it back as HLS and DASH.
//!
//! Hexagonal Architecture:
//! - domain/: Pure logic (identity and layout, upload validation, formats)
//! - ports/: Trait definitions (the transcoder process)
//! - adapters/: Concrete implementations (ffmpeg runner, filesystem, HTTP)
//! - application/: Services (packager, catalog, ingest pipeline)
//! - config: Environment configuration
//!
//! The filesystem is the only state: `uploads/{id}/{file}` holds the raw
//! upload and `streams/{id}/{hls,dash}/` the packaged trees. A format is
//! available exactly when its entry file exists.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

pub use config::ServerConfig;
pub use error::{Error, Result};
