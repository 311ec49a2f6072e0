use crate::adapters::local::fs::FsStore;
use crate::application::packager::PackagerService;
use crate::domain::identity::{StorageRoots, VideoId};
use crate::domain::upload::{sanitize, UploadPolicy, UploadRecord};
use crate::error::{Error, Result};
use axum::body::Bytes;
use axum::BoxError;
use futures::{stream, Stream, StreamExt};
use std::io;
use tracing::{info, info_span, Instrument};

/// The upload pipeline: validate, mint an identity, store, package.
///
/// One call is one blocking unit of work; the caller waits until both
/// conversions have finished or one of them failed.
#[derive(Clone)]
pub struct IngestService {
    roots: StorageRoots,
    policy: UploadPolicy,
    store: FsStore,
    packager: PackagerService,
}

impl IngestService {
    pub fn new(
        roots: StorageRoots,
        policy: UploadPolicy,
        store: FsStore,
        packager: PackagerService,
    ) -> Self {
        Self {
            roots,
            policy,
            store,
            packager,
        }
    }

    pub fn roots(&self) -> &StorageRoots {
        &self.roots
    }

    /// Request-shape checks on the client-supplied filename.
    pub fn validate(&self, filename: &str) -> Result<()> {
        if filename.is_empty() {
            return Err(Error::EmptyFilename);
        }
        if !self.policy.is_allowed(filename) {
            let ext = filename.rsplit_once('.').map_or("", |(_, ext)| ext);
            return Err(Error::DisallowedExtension(ext.to_string()));
        }
        Ok(())
    }

    /// Run the whole pipeline for one upload.
    ///
    /// Request-shape errors are returned before anything touches the disk.
    /// On [`Error::Conversion`] the raw upload and whatever the successful
    /// format produced stay on disk.
    pub async fn ingest<S, E>(&self, filename: &str, body: S) -> Result<UploadRecord>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<BoxError>,
    {
        self.validate(filename)?;

        let mut body = Box::pin(body);
        // Some clients send zero-length chunks ahead of the data.
        let first = loop {
            match body.next().await {
                Some(Ok(chunk)) if chunk.is_empty() => continue,
                Some(Ok(chunk)) => break chunk,
                Some(Err(err)) => return Err(body_error(err)),
                None => return Err(Error::EmptyUpload),
            }
        };
        let body = stream::once(async move { Ok::<_, E>(first) }).chain(body);

        let id = VideoId::new();
        let span = info_span!("ingest", video_id = %id);
        self.store_and_package(id, filename, body)
            .instrument(span)
            .await
    }

    async fn store_and_package<S, E>(
        &self,
        id: VideoId,
        filename: &str,
        body: S,
    ) -> Result<UploadRecord>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<BoxError>,
    {
        let layout = self.roots.layout_for(&id);
        let sanitized = sanitize(filename);
        let path = layout.upload_path(&sanitized);

        let written = self.store.save(body, &path).await?;
        info!(path = %path.display(), bytes = written, "File uploaded");

        let report = self.packager.package_all(&path, &layout).await;
        if !report.is_success() {
            return Err(Error::Conversion { id, report });
        }

        Ok(UploadRecord {
            id,
            original_filename: filename.to_string(),
            sanitized_filename: sanitized,
            path,
        })
    }
}

fn body_error<E: Into<BoxError>>(err: E) -> Error {
    Error::Storage(io::Error::new(io::ErrorKind::Other, err))
}
