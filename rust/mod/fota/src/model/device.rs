use super::FirmwareId;

/// Pins one physical device to a specific firmware build.
///
/// The referenced firmware may be private: pinned devices are allowed to
/// receive builds that are hidden from type-based lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceBinding {
    pub device_id: String,
    pub firmware_id: FirmwareId,
}
