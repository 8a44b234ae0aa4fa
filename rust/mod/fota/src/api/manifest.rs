use axum::http::{HeaderMap, HeaderValue, Uri, header};
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

use fota_core::ServiceError;

use super::FotaState;
use crate::resolver::Resolution;
use crate::responder::render_manifest;
use crate::sanitize::{DeviceId, FirmwareType};

// ---------------------------------------------------------------------------
// GET /{type}.json
// ---------------------------------------------------------------------------

pub(super) fn serve(
    state: &FotaState,
    firmware_type: &str,
    device_id: Option<&str>,
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<Response, ServiceError> {
    let firmware_type = FirmwareType::parse(firmware_type)?;
    let device_id = DeviceId::parse(device_id.unwrap_or_default())?;

    let record = match state.resolver.resolve(device_id.as_ref(), &firmware_type)? {
        Resolution::Found(record) => record,
        Resolution::NotFound => {
            warn!(firmware_type = %firmware_type, device = ?device_id, "no firmware to offer");
            return Err(ServiceError::NotFound(format!(
                "no firmware for type '{firmware_type}'"
            )));
        }
    };

    let host = advertised_host(state, uri, headers)?;
    let body = render_manifest(&record, &host, &state.manifest.port)?;
    info!(
        firmware_type = %firmware_type,
        device = ?device_id,
        firmware_id = %record.firmware_id,
        version = %record.version,
        "manifest served"
    );

    Ok((
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response())
}

/// Configured host, else the `Host` header, else the request URI's authority
/// (HTTP/2 and absolute-form requests), with any port stripped.
fn advertised_host(
    state: &FotaState,
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<String, ServiceError> {
    if let Some(host) = &state.manifest.host {
        return Ok(host.clone());
    }
    let raw = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServiceError::Validation("missing Host header".into()))?;
    Ok(strip_port(raw).to_string())
}

fn strip_port(authority: &str) -> &str {
    if authority.starts_with('[') {
        // [::1]:8080
        return match authority.find(']') {
            Some(end) => &authority[..=end],
            None => authority,
        };
    }
    authority.split(':').next().unwrap_or(authority)
}
