#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use vodpack::adapters::local::{router, AppState, FsStore};
use vodpack::application::catalog::CatalogService;
use vodpack::application::ingest::IngestService;
use vodpack::application::packager::PackagerService;
use vodpack::domain::identity::StorageRoots;
use vodpack::domain::upload::UploadPolicy;
use vodpack::ports::process::{ProcessOutput, ProcessRunner};

pub const BOUNDARY: &str = "vodpack-test-boundary";

/// Stands in for ffmpeg: writes the entry file named by the last argument
/// (its content names the input) plus one segment next to it.
pub struct StubTranscoder {
    pub fail: bool,
}

#[async_trait]
impl ProcessRunner for StubTranscoder {
    async fn run(&self, args: &[OsString], _cwd: &Path) -> vodpack::Result<ProcessOutput> {
        if self.fail {
            return Ok(ProcessOutput {
                success: false,
                code: Some(1),
                combined_output: "stub transcoder refused".into(),
            });
        }

        let input_pos = args
            .iter()
            .position(|a| a.as_os_str() == "-i")
            .expect("input flag");
        let input = args[input_pos + 1].to_string_lossy().into_owned();
        let entry = PathBuf::from(args.last().expect("entry argument"));

        let segment = if entry.extension().is_some_and(|ext| ext == "m3u8") {
            "playlist0.ts"
        } else {
            "chunk-0-00001.m4s"
        };
        tokio::fs::write(entry.with_file_name(segment), b"segment").await?;
        tokio::fs::write(&entry, format!("stub output for {input}\n")).await?;

        Ok(ProcessOutput {
            success: true,
            code: Some(0),
            combined_output: String::new(),
        })
    }

    fn program(&self) -> String {
        "stub".into()
    }
}

pub struct TestApp {
    pub temp: TempDir,
    pub roots: StorageRoots,
    pub router: Router,
}

impl TestApp {
    pub async fn new(fail: bool) -> Self {
        Self::with_limit(fail, 100 * 1024 * 1024).await
    }

    pub async fn with_limit(fail: bool, max_upload_bytes: usize) -> Self {
        let temp = tempfile::tempdir().unwrap();
        let roots = StorageRoots::new(temp.path().join("uploads"), temp.path().join("streams"));
        roots.ensure().await.unwrap();

        let packager = PackagerService::new(Arc::new(StubTranscoder { fail }));
        let ingest = IngestService::new(
            roots.clone(),
            UploadPolicy::default(),
            FsStore::new(),
            packager,
        );
        let state = AppState {
            ingest: Arc::new(ingest),
            catalog: CatalogService::new(&roots.output_root),
            output_root: roots.output_root.clone(),
            max_upload_bytes,
        };

        Self {
            router: router(state, None),
            roots,
            temp,
        }
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn upload(&self, filename: &str, content: &[u8]) -> Response<Body> {
        self.router
            .clone()
            .oneshot(upload_request("file", filename, content))
            .await
            .unwrap()
    }
}

pub fn upload_request(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// File names directly inside `dir`, sorted.
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
