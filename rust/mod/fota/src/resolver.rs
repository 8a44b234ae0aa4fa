//! Firmware version resolution.
//!
//! A lookup names a firmware type and optionally a device. A device binding
//! wins over everything else, private builds included. Without a binding
//! (or without a device) the answer is the highest-version public build of
//! the requested type.

use std::sync::Arc;

use fota_core::ServiceError;
use tracing::debug;

use crate::model::{FirmwareBinary, FirmwareId, FirmwareRecord};
use crate::sanitize::{DeviceId, FirmwareType};
use crate::store::FirmwareStore;

/// Outcome of a lookup that reached storage successfully.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(FirmwareRecord),
    NotFound,
}

impl Resolution {
    pub fn found(self) -> Option<FirmwareRecord> {
        match self {
            Resolution::Found(record) => Some(record),
            Resolution::NotFound => None,
        }
    }
}

pub struct Resolver {
    store: Arc<dyn FirmwareStore>,
}

impl Resolver {
    pub fn new(store: Arc<dyn FirmwareStore>) -> Self {
        Self { store }
    }

    /// Resolve the firmware a device (or an anonymous client) should run.
    ///
    /// The fallback after an unbound device filters on `firmware_type`, the
    /// type the client asked for, not on anything derived from the device.
    pub fn resolve(
        &self,
        device_id: Option<&DeviceId>,
        firmware_type: &FirmwareType,
    ) -> Result<Resolution, ServiceError> {
        if let Some(device) = device_id {
            let rows = self.store.query_latest_by_device(device)?;
            if let Some(record) = latest(rows) {
                debug!(device = %device, firmware_id = %record.firmware_id, "resolved pinned firmware");
                return Ok(Resolution::Found(record));
            }
            debug!(device = %device, "no binding for device, falling back to public latest");
        }

        let rows = self.store.query_latest_public_by_type(firmware_type)?;
        Ok(match latest(rows) {
            Some(record) => {
                debug!(firmware_type = %firmware_type, firmware_id = %record.firmware_id, "resolved public latest");
                Resolution::Found(record)
            }
            None => Resolution::NotFound,
        })
    }

    /// Load a build with its payload for download.
    pub fn fetch_binary(&self, id: FirmwareId) -> Result<FirmwareBinary, ServiceError> {
        self.store
            .get_binary(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("firmware {id} not found")))
    }
}

/// Highest version wins; among equal versions the earliest row is kept.
fn latest(rows: Vec<FirmwareRecord>) -> Option<FirmwareRecord> {
    rows.into_iter()
        .reduce(|best, row| if row.version > best.version { row } else { best })
}
