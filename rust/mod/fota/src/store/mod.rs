pub mod schema;
pub mod sql;

use fota_core::ServiceError;

use crate::model::{FirmwareBinary, FirmwareId, FirmwareRecord};
use crate::sanitize::{DeviceId, FirmwareType};

pub use sql::SqlFirmwareStore;

/// Read-only view of the firmware and device tables.
///
/// The resolver only ever reads through this trait; publishing new builds
/// and binding devices is done by a separate process.
pub trait FirmwareStore: Send + Sync {
    /// All non-private firmware of the given type, highest stored version first.
    fn query_latest_public_by_type(
        &self,
        firmware_type: &FirmwareType,
    ) -> Result<Vec<FirmwareRecord>, ServiceError>;

    /// Firmware the device is bound to, highest stored version first.
    /// Private builds are included.
    fn query_latest_by_device(&self, device_id: &DeviceId)
    -> Result<Vec<FirmwareRecord>, ServiceError>;

    /// One firmware row with its payload, or `None` if the id is unknown.
    fn get_binary(&self, id: FirmwareId) -> Result<Option<FirmwareBinary>, ServiceError>;
}
