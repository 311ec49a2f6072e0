//! Configuration loaded from the environment.

use crate::domain::identity::StorageRoots;
use crate::domain::upload::UploadPolicy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// 100 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;
pub const DEFAULT_TRANSCODE_TIMEOUT_SECS: u64 = 60 * 60;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    /// Where raw uploads are stored, one directory per video
    pub upload_dir: PathBuf,
    /// Where HLS and DASH trees are written, one directory per video
    pub output_dir: PathBuf,
    /// Served as-is under `/static`
    pub static_dir: PathBuf,
    /// Transcoder executable
    pub ffmpeg_bin: PathBuf,
    /// Per-invocation limit; `None` waits forever
    pub transcode_timeout: Option<Duration>,
    pub max_upload_bytes: usize,
    /// Run the two conversions of an upload concurrently
    pub parallel_formats: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: String::from("127.0.0.1"),
            port: String::from("5000"),
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("streams"),
            static_dir: PathBuf::from("static"),
            ffmpeg_bin: PathBuf::from("ffmpeg"),
            transcode_timeout: Some(Duration::from_secs(DEFAULT_TRANSCODE_TIMEOUT_SECS)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            parallel_formats: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables (and `.env`).
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let timeout_secs = parsed(&lookup, "TRANSCODE_TIMEOUT_SECS", DEFAULT_TRANSCODE_TIMEOUT_SECS);

        Self {
            addr: lookup("ADDR").unwrap_or(defaults.addr),
            port: lookup("PORT").unwrap_or(defaults.port),
            upload_dir: lookup("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir),
            output_dir: lookup("OUTPUT_DIR").map(PathBuf::from).unwrap_or(defaults.output_dir),
            static_dir: lookup("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            ffmpeg_bin: lookup("FFMPEG_BIN").map(PathBuf::from).unwrap_or(defaults.ffmpeg_bin),
            transcode_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            max_upload_bytes: parsed(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            parallel_formats: parsed(&lookup, "PARALLEL_FORMATS", false),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }

    pub fn storage_roots(&self) -> StorageRoots {
        StorageRoots::new(&self.upload_dir, &self.output_dir)
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy::default()
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparseable setting");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]);
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.output_dir, PathBuf::from("streams"));
        assert_eq!(config.max_upload_bytes, 104_857_600);
        assert_eq!(config.transcode_timeout, Some(Duration::from_secs(3600)));
        assert!(!config.parallel_formats);
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("PORT", "8080"),
            ("UPLOAD_DIR", "/data/in"),
            ("OUTPUT_DIR", "/data/out"),
            ("FFMPEG_BIN", "/opt/ffmpeg/bin/ffmpeg"),
            ("TRANSCODE_TIMEOUT_SECS", "0"),
            ("PARALLEL_FORMATS", "true"),
        ]);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.storage_roots().upload_root, PathBuf::from("/data/in"));
        assert_eq!(config.storage_roots().output_root, PathBuf::from("/data/out"));
        assert_eq!(config.ffmpeg_bin, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.transcode_timeout, None);
        assert!(config.parallel_formats);
    }

    #[test]
    fn unparseable_values_fall_back() {
        let config = config(&[("MAX_UPLOAD_BYTES", "lots"), ("PARALLEL_FORMATS", "yes")]);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(!config.parallel_formats);
    }
}
