use axum::BoxError;
use axum::body::Bytes;
use futures::{Stream, TryStreamExt};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::io::StreamReader;

/// Persists uploaded byte streams on the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsStore;

impl FsStore {
    pub fn new() -> Self {
        Self
    }

    /// Copy `stream` to `dest`, creating parent directories as needed.
    ///
    /// Bytes land in a hidden `.partial` sibling first and are renamed onto
    /// `dest` only once the whole stream was written, so `dest` never
    /// resolves to a truncated file. Returns the number of bytes written.
    pub async fn save<S, E>(&self, stream: S, dest: &Path) -> io::Result<u64>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<BoxError>,
    {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let partial = partial_path(dest)?;
        let saved = match write_stream(stream, &partial).await {
            Ok(written) => tokio::fs::rename(&partial, dest).await.map(|()| written),
            Err(err) => Err(err),
        };
        if saved.is_err() {
            let _ = tokio::fs::remove_file(&partial).await;
        }
        saved
    }
}

fn partial_path(dest: &Path) -> io::Result<PathBuf> {
    let name = dest.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "destination has no file name")
    })?;
    let mut partial = std::ffi::OsString::from(".");
    partial.push(name);
    partial.push(".partial");
    Ok(dest.with_file_name(partial))
}

async fn write_stream<S, E>(stream: S, path: &Path) -> io::Result<u64>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<BoxError>,
{
    let body_with_io_error = stream.map_err(|err| io::Error::new(io::ErrorKind::Other, err));
    let body_reader = StreamReader::new(body_with_io_error);
    futures::pin_mut!(body_reader);

    let mut file = BufWriter::new(File::create(path).await?);
    let written = tokio::io::copy(&mut body_reader, &mut file).await?;
    file.flush().await?;
    file.get_ref().sync_all().await?;
    Ok(written)
}
