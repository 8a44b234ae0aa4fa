mod binary;
mod manifest;

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Uri};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use fota_core::ServiceError;

use crate::resolver::Resolver;
use crate::responder::ManifestConfig;

/// Everything a request handler needs.
pub struct FotaState {
    pub resolver: Resolver,
    pub manifest: ManifestConfig,
}

pub type AppState = Arc<FotaState>;

/// Build the OTA router.
///
/// Routes:
/// - `GET /{type}.json[?id={device}]` — manifest for the latest firmware
/// - `GET /{type}.{id}.bin`           — firmware image
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/{file}", get(serve_file))
        .with_state(state)
}

/// What a request path names.
#[derive(Debug, PartialEq, Eq)]
enum FileRequest<'a> {
    Manifest { firmware_type: &'a str },
    Binary { id: &'a str },
}

fn classify(file: &str) -> Option<FileRequest<'_>> {
    if let Some(firmware_type) = file.strip_suffix(".json") {
        return Some(FileRequest::Manifest { firmware_type });
    }
    // The type segment of a binary path is informational; lookup is by id.
    let stem = file.strip_suffix(".bin")?;
    let (_firmware_type, id) = stem.rsplit_once('.')?;
    Some(FileRequest::Binary { id })
}

#[derive(Debug, Default, Deserialize)]
struct FileQuery {
    /// Device id for manifest lookups.
    #[serde(default)]
    id: Option<String>,
}

async fn serve_file(
    State(state): State<AppState>,
    Path(file): Path<String>,
    Query(query): Query<FileQuery>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, ServiceError> {
    match classify(&file) {
        Some(FileRequest::Manifest { firmware_type }) => {
            manifest::serve(&state, firmware_type, query.id.as_deref(), &uri, &headers)
        }
        Some(FileRequest::Binary { id }) => binary::serve(&state, id),
        None => Err(ServiceError::NotFound(format!("no such file: {file}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::fixtures;
    use crate::responder::Manifest;
    use crate::store::FirmwareStore;

    fn app_over(store: Arc<dyn FirmwareStore>, manifest: ManifestConfig) -> Router {
        router(Arc::new(FotaState {
            resolver: Resolver::new(store),
            manifest,
        }))
    }

    fn app_with(manifest: ManifestConfig) -> (Arc<dyn fota_sql::SQLStore>, Router) {
        let (db, store) = fixtures::sensor_a();
        (db, app_over(store, manifest))
    }

    fn app() -> (Arc<dyn fota_sql::SQLStore>, Router) {
        app_with(ManifestConfig::default())
    }

    async fn get(router: &Router, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::HOST, "fw.example.com:8080")
            .body(Body::empty())
            .unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = axum::body::to_bytes(resp.into_body(), 16 * 1024 * 1024)
            .await
            .unwrap();
        (status, headers, bytes.to_vec())
    }

    fn error_code(body: &[u8]) -> String {
        let json: serde_json::Value = serde_json::from_slice(body).unwrap();
        json["code"].as_str().unwrap().to_string()
    }

    #[test]
    fn classify_paths() {
        assert_eq!(
            classify("sensorA.json"),
            Some(FileRequest::Manifest { firmware_type: "sensorA" })
        );
        assert_eq!(classify("sensorA.6.bin"), Some(FileRequest::Binary { id: "6" }));
        assert_eq!(classify("a.b.6.bin"), Some(FileRequest::Binary { id: "6" }));
        assert_eq!(classify("sensorA.x.bin"), Some(FileRequest::Binary { id: "x" }));
        assert_eq!(classify("firmware.bin"), None);
        assert_eq!(classify("index.html"), None);
    }

    #[tokio::test]
    async fn manifest_public_latest() {
        let (_db, app) = app();
        let (status, headers, body) = get(&app, "/sensorA.json").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        let manifest: Manifest = serde_json::from_slice(&body).unwrap();
        assert_eq!(manifest.firmware_type, "sensorA");
        assert_eq!(manifest.version, "5");
        assert_eq!(manifest.host, "fw.example.com");
        assert_eq!(manifest.port, "80");
        assert_eq!(manifest.bin, "/sensorA.6.bin");
        assert!(!String::from_utf8(body).unwrap().contains(r"\/"));
    }

    #[tokio::test]
    async fn manifest_for_pinned_device() {
        let (_db, app) = app();
        let (status, _, body) = get(&app, "/sensorA.json?id=dev1").await;

        assert_eq!(status, StatusCode::OK);
        let manifest: Manifest = serde_json::from_slice(&body).unwrap();
        assert_eq!(manifest.version, "3");
        assert_eq!(manifest.bin, "/sensorA.5.bin");
    }

    #[tokio::test]
    async fn manifest_dangling_binding_and_empty_id_fall_back() {
        let (_db, app) = app();
        for uri in ["/sensorA.json?id=dev2", "/sensorA.json?id=", "/sensorA.json?id=unknown"] {
            let (status, _, body) = get(&app, uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            let manifest: Manifest = serde_json::from_slice(&body).unwrap();
            assert_eq!(manifest.bin, "/sensorA.6.bin", "{uri}");
        }
    }

    #[tokio::test]
    async fn manifest_unknown_type_is_404() {
        let (_db, app) = app();
        let (status, _, body) = get(&app, "/sensorZ.json").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "NOT_FOUND");
    }

    #[tokio::test]
    async fn manifest_rejects_unsafe_input() {
        let (_db, app) = app();
        let (status, _, body) = get(&app, "/sensorA.json?id=x%27%3Bdrop").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_FAILED");

        let (status, _, _) = get(&app, "/%3Cscript%3E.json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = get(&app, "/.json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn manifest_host_override() {
        let (_db, app) = app_with(ManifestConfig {
            port: "8080".into(),
            host: Some("ota.example.net".into()),
        });
        let (_, _, body) = get(&app, "/sensorA.json").await;
        let manifest: Manifest = serde_json::from_slice(&body).unwrap();
        assert_eq!(manifest.host, "ota.example.net");
        assert_eq!(manifest.port, "8080");
    }

    #[tokio::test]
    async fn manifest_without_host_is_400() {
        let (_db, app) = app();
        let req = Request::builder()
            .uri("/sensorA.json")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn manifest_host_from_absolute_uri() {
        let (_db, app) = app();
        let req = Request::builder()
            .uri("http://ota.local:8080/sensorA.json")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let manifest: Manifest = serde_json::from_slice(&body).unwrap();
        assert_eq!(manifest.host, "ota.local");
        assert_eq!(manifest.bin, "/sensorA.6.bin");
    }

    #[tokio::test]
    async fn storage_failure_is_503() {
        let app = app_over(Arc::new(fixtures::Unavailable), ManifestConfig::default());
        for uri in ["/sensorA.json", "/sensorA.json?id=dev1", "/sensorA.6.bin"] {
            let (status, _, body) = get(&app, uri).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{uri}");
            assert_eq!(error_code(&body), "STORAGE_UNAVAILABLE", "{uri}");
        }
    }

    #[tokio::test]
    async fn binary_download() {
        let (_db, app) = app();
        let (status, headers, body) = get(&app, "/sensorA.6.bin").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"sensorA build 6");
        assert_eq!(headers[header::CONTENT_TYPE], "application/octet-stream");
        assert_eq!(headers[header::CONTENT_LENGTH], body.len().to_string().as_str());
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"sensorA.6.bin\""
        );
        assert_eq!(headers[header::CACHE_CONTROL], "must-revalidate, post-check=0, pre-check=0");
    }

    #[tokio::test]
    async fn binary_large_payload_is_byte_exact() {
        let (db, app) = app();
        let payload: Vec<u8> = (0..1_000_000u32).map(|i| (i ^ (i >> 8)) as u8).collect();
        fixtures::publish(&db, 42, "camera", "2.0.0", true, &payload);

        let (status, headers, body) = get(&app, "/camera.42.bin").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_LENGTH], "1000000");
        assert_eq!(body, payload);
    }

    #[tokio::test]
    async fn binary_non_numeric_id_is_400() {
        let (_db, app) = app();
        let (status, _, body) = get(&app, "/sensorA.abc.bin").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "INVALID_IDENTIFIER");
    }

    #[tokio::test]
    async fn binary_unknown_id_is_404() {
        let (_db, app) = app();
        let (status, _, body) = get(&app, "/sensorA.0.bin").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "NOT_FOUND");
    }

    #[tokio::test]
    async fn unknown_file_is_404() {
        let (_db, app) = app();
        let (status, _, _) = get(&app, "/index.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
