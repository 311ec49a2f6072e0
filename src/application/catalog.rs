use crate::domain::format::StreamFormat;
use crate::domain::identity::VideoId;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: VideoId,
    pub hls_available: bool,
    pub dash_available: bool,
}

impl CatalogEntry {
    pub fn is_available(&self, format: StreamFormat) -> bool {
        match format {
            StreamFormat::Hls => self.hls_available,
            StreamFormat::Dash => self.dash_available,
        }
    }
}

/// Discovers packaged videos by scanning the output root.
///
/// The filesystem is the only status record, so every call rescans.
#[derive(Clone, Debug)]
pub struct CatalogService {
    output_root: PathBuf,
}

impl CatalogService {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// Every video with at least one available format, ordered by id text.
    pub async fn list_available(&self) -> Result<Vec<CatalogEntry>> {
        let mut dir = tokio::fs::read_dir(&self.output_root)
            .await
            .map_err(Error::Catalog)?;

        let mut found = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(Error::Catalog)? {
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            if !is_dir {
                continue;
            }

            let name = entry.file_name();
            let Some(id) = name.to_str().and_then(|n| n.parse::<VideoId>().ok()) else {
                debug!(dir = ?name, "Skipping directory that is not a video id");
                continue;
            };

            let video_dir = entry.path();
            let hls_available = format_available(&video_dir, StreamFormat::Hls).await;
            let dash_available = format_available(&video_dir, StreamFormat::Dash).await;

            if hls_available || dash_available {
                found.push((
                    name,
                    CatalogEntry {
                        id,
                        hls_available,
                        dash_available,
                    },
                ));
            }
        }

        found.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(found.into_iter().map(|(_, entry)| entry).collect())
    }
}

async fn format_available(video_dir: &Path, format: StreamFormat) -> bool {
    let entry = video_dir.join(format.dir_name()).join(format.entry_file());
    tokio::fs::metadata(entry)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
