//! Video identity and the directory layout derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque 128-bit identifier minted once per upload.
///
/// It is the only join key between the upload directory, the output
/// directory and the public URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(Uuid);

impl VideoId {
    /// Mint a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for VideoId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// The two configured roots every layout hangs off.
#[derive(Clone, Debug)]
pub struct StorageRoots {
    pub upload_root: PathBuf,
    pub output_root: PathBuf,
}

/// Canonical directories for one video.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoLayout {
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub hls_dir: PathBuf,
    pub dash_dir: PathBuf,
}

impl StorageRoots {
    pub fn new(upload_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            upload_root: upload_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Derive the layout for `id`. Pure: touches no filesystem state.
    pub fn layout_for(&self, id: &VideoId) -> VideoLayout {
        let key = id.to_string();
        let output_dir = self.output_root.join(&key);
        VideoLayout {
            upload_dir: self.upload_root.join(&key),
            hls_dir: output_dir.join("hls"),
            dash_dir: output_dir.join("dash"),
            output_dir,
        }
    }

    /// Create both roots; existing directories are fine.
    pub async fn ensure(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.upload_root).await?;
        tokio::fs::create_dir_all(&self.output_root).await
    }
}

impl VideoLayout {
    pub fn upload_path(&self, sanitized_name: &str) -> PathBuf {
        self.upload_dir.join(sanitized_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn minted_ids_do_not_collide() {
        let ids: HashSet<VideoId> = (0..10_000).map(|_| VideoId::new()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn id_round_trips_through_text() {
        let id = VideoId::new();
        let parsed: VideoId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("../etc".parse::<VideoId>().is_err());
    }

    #[test]
    fn layout_is_a_pure_function_of_id_and_roots() {
        let roots = StorageRoots::new("/srv/uploads", "/srv/streams");
        let id: VideoId = "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();

        let layout = roots.layout_for(&id);
        assert_eq!(layout, roots.layout_for(&id));
        assert_eq!(
            layout.upload_dir,
            PathBuf::from("/srv/uploads/67e55044-10b1-426f-9247-bb680e5fe0c8")
        );
        assert_eq!(
            layout.hls_dir,
            PathBuf::from("/srv/streams/67e55044-10b1-426f-9247-bb680e5fe0c8/hls")
        );
        assert_eq!(
            layout.dash_dir,
            PathBuf::from("/srv/streams/67e55044-10b1-426f-9247-bb680e5fe0c8/dash")
        );
        assert!(!layout.upload_dir.exists());
    }

    #[tokio::test]
    async fn ensure_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let roots = StorageRoots::new(temp.path().join("uploads"), temp.path().join("streams"));
        roots.ensure().await.unwrap();
        roots.ensure().await.unwrap();
        assert!(roots.upload_root.is_dir());
        assert!(roots.output_root.is_dir());
    }
}
