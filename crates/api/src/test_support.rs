//! Shared fixtures for router tests.

use std::path::PathBuf;
use std::sync::Arc;

use audioqr_core::storage::{BlobStore, StorageConfig, StorageProvider, from_config};
use axum::{
    Router,
    body::Body,
    http::{Request, header::CONTENT_TYPE},
    response::Response,
};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{AppState, AssetDirs, create_router};

pub(crate) const BASE_URL: &str = "http://localhost:3000";
pub(crate) const INDEX_HTML: &str = "<html><body>upload form</body></html>";
pub(crate) const AUDIO_HTML: &str = "<html><body>player</body></html>";
pub(crate) const ADMIN_HTML: &str = "<html><body>admin</body></html>";

const BOUNDARY: &str = "audioqr-test-boundary";

/// A router over a temporary directory with public, admin and upload dirs.
pub(crate) struct TestApp {
    _dir: TempDir,
    pub upload_dir: PathBuf,
    router: Router,
}

impl TestApp {
    /// Local storage with the default size limit.
    pub fn local() -> Self {
        Self::local_with_limit(StorageConfig::DEFAULT_MAX_FILE_SIZE)
    }

    /// Local storage with a custom size limit.
    pub fn local_with_limit(max_upload_bytes: u64) -> Self {
        Self::build(max_upload_bytes, |upload_dir| {
            from_config(
                StorageConfig::new(StorageProvider::local_fs(upload_dir))
                    .with_max_file_size(max_upload_bytes),
            )
            .expect("local store")
        })
    }

    /// Any store, e.g. a cloud store or a failing double.
    pub fn with_store(store: Arc<dyn BlobStore>) -> Self {
        Self::build(StorageConfig::DEFAULT_MAX_FILE_SIZE, |_| store)
    }

    fn build(
        max_upload_bytes: u64,
        make_store: impl FnOnce(&std::path::Path) -> Arc<dyn BlobStore>,
    ) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let public_dir = dir.path().join("public");
        let admin_dir = dir.path().join("admin");
        let upload_dir = dir.path().join("uploads");
        std::fs::create_dir_all(&public_dir).expect("public dir");
        std::fs::create_dir_all(&admin_dir).expect("admin dir");
        std::fs::write(public_dir.join("index.html"), INDEX_HTML).expect("index.html");
        std::fs::write(public_dir.join("audio.html"), AUDIO_HTML).expect("audio.html");
        std::fs::write(admin_dir.join("admin.html"), ADMIN_HTML).expect("admin.html");

        let store = make_store(&upload_dir);
        let state = AppState::new(
            store,
            BASE_URL,
            AssetDirs {
                public_dir,
                admin_dir,
            },
            max_upload_bytes,
        );

        Self {
            _dir: dir,
            upload_dir,
            router: create_router(state),
        }
    }

    /// Number of files currently in the upload directory.
    pub fn uploaded_files(&self) -> usize {
        std::fs::read_dir(&self.upload_dir).map_or(0, Iterator::count)
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// POST `/upload` with a single file part.
    pub async fn upload(&self, field: &str, filename: &str, data: &[u8]) -> Response {
        self.upload_parts(&[(field, filename, data)]).await
    }

    /// POST `/upload` with one file part per `(field, filename, data)`.
    pub async fn upload_parts(&self, parts: &[(&str, &str, &[u8])]) -> Response {
        let mut body = Vec::new();
        for &(field, filename, data) in parts {
            body.extend_from_slice(part_header(field, Some(filename)).as_bytes());
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.send(multipart_request(body)).await
    }

    /// POST `/upload` with only a text field.
    pub async fn upload_text_only(&self, field: &str, value: &str) -> Response {
        let body = format!("{}{value}\r\n--{BOUNDARY}--\r\n", part_header(field, None));
        self.send(multipart_request(body.into_bytes())).await
    }
}

fn part_header(field: &str, filename: Option<&str>) -> String {
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
        None => format!("form-data; name=\"{field}\""),
    };
    let content_type = if filename.is_some() {
        "Content-Type: application/octet-stream\r\n"
    } else {
        ""
    };
    format!("--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\n{content_type}\r\n")
}

fn multipart_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub(crate) async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub(crate) async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// A 1 KiB WAV-looking payload.
pub(crate) fn wav_bytes() -> Vec<u8> {
    let mut data = b"RIFF\x24\x04\x00\x00WAVEfmt ".to_vec();
    data.resize(1024, 0);
    data
}
