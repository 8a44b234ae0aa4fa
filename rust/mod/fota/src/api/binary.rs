use axum::response::{IntoResponse, Response};
use tracing::info;

use fota_core::ServiceError;

use super::FotaState;
use crate::responder::{parse_binary_id, render_binary};

// ---------------------------------------------------------------------------
// GET /{type}.{id}.bin
// ---------------------------------------------------------------------------

pub(super) fn serve(state: &FotaState, raw_id: &str) -> Result<Response, ServiceError> {
    let id = parse_binary_id(raw_id)?;
    let binary = state.resolver.fetch_binary(id)?;
    info!(
        firmware_id = %id,
        firmware_type = %binary.firmware_type,
        size = binary.size(),
        "firmware binary served"
    );
    Ok(render_binary(binary).into_response())
}
