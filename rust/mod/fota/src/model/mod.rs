pub mod device;
pub mod firmware;
pub mod version;

pub use device::DeviceBinding;
pub use firmware::{FirmwareBinary, FirmwareId, FirmwareRecord};
pub use version::FirmwareVersion;
