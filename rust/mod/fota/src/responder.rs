//! Output formats for a resolved firmware: the JSON manifest a device polls,
//! and the raw image it downloads afterwards.

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use fota_core::ServiceError;

use crate::model::{FirmwareBinary, FirmwareId, FirmwareRecord};

fn default_port() -> String {
    "80".to_string()
}

/// Manifest settings from the server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestConfig {
    /// Port advertised in every manifest. A static value, not the port the
    /// server actually listens on.
    #[serde(default = "default_port")]
    pub port: String,

    /// Host advertised in every manifest. When unset, the request's `Host`
    /// header (without port) is echoed back.
    #[serde(default)]
    pub host: Option<String>,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: None,
        }
    }
}

/// The JSON document an OTA client fetches from `/<type>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "type")]
    pub firmware_type: String,
    pub version: String,
    pub host: String,
    pub port: String,
    pub bin: String,
}

/// Serialize the manifest for `record`.
///
/// serde_json never escapes `/`, so `bin` appears as `"/sensorA.6.bin"` in
/// the raw bytes.
pub fn render_manifest(
    record: &FirmwareRecord,
    host: &str,
    port: &str,
) -> Result<Vec<u8>, ServiceError> {
    let manifest = Manifest {
        firmware_type: record.firmware_type.clone(),
        version: record.version.as_str().to_string(),
        host: host.to_string(),
        port: port.to_string(),
        bin: record.bin_path(),
    };
    serde_json::to_vec(&manifest).map_err(|e| ServiceError::Internal(format!("manifest encode: {e}")))
}

/// Parse the `<id>` part of `/<type>.<id>.bin`.
///
/// Only ASCII digits are accepted. Empty, signed or non-numeric input is
/// rejected instead of being read as zero.
pub fn parse_binary_id(raw: &str) -> Result<FirmwareId, ServiceError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ServiceError::InvalidIdentifier(format!(
            "firmware id {raw:?} is not a number"
        )));
    }
    raw.parse::<u64>()
        .map(FirmwareId)
        .map_err(|_| ServiceError::InvalidIdentifier(format!("firmware id {raw:?} out of range")))
}

/// A firmware image ready to be sent as an attachment.
#[derive(Debug)]
pub struct BinaryDownload {
    file_name: String,
    payload: Vec<u8>,
}

/// Frame a firmware image for download. The payload is passed through untouched.
pub fn render_binary(binary: FirmwareBinary) -> BinaryDownload {
    BinaryDownload {
        file_name: binary.bin_file_name(),
        payload: binary.payload,
    }
}

impl BinaryDownload {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Headers for the download: attachment framing plus cache-disabling directives.
    pub fn headers(&self) -> Result<HeaderMap, ServiceError> {
        let disposition = format!(
            "attachment; filename=\"{}\"",
            self.file_name.replace('\\', "\\\\").replace('"', "\\\"")
        );
        let disposition = HeaderValue::from_str(&disposition).map_err(|_| {
            ServiceError::Internal(format!("firmware file name {:?} is not a valid header", self.file_name))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert("content-description", HeaderValue::from_static("File Transfer"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(self.payload.len()));
        headers.insert(header::CONTENT_DISPOSITION, disposition);
        headers.insert("content-transfer-encoding", HeaderValue::from_static("binary"));
        headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("must-revalidate, post-check=0, pre-check=0"),
        );
        headers.insert(header::PRAGMA, HeaderValue::from_static("public"));
        Ok(headers)
    }
}

impl IntoResponse for BinaryDownload {
    fn into_response(self) -> Response {
        match self.headers() {
            Ok(headers) => (headers, self.payload).into_response(),
            Err(e) => e.into_response(),
        }
    }
}
