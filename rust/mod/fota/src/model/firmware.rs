use std::fmt;

use super::FirmwareVersion;

/// Numeric firmware identifier, as used in `/<type>.<id>.bin` paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FirmwareId(pub u64);

impl fmt::Display for FirmwareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Firmware metadata as seen by the resolver. The payload is not loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct FirmwareRecord {
    pub firmware_id: FirmwareId,
    pub version: FirmwareVersion,
    /// Hidden from public (type-based) lookup; still reachable through a device binding.
    pub private: bool,
    pub firmware_type: String,
}

impl FirmwareRecord {
    /// Path a device uses to download this build: `/<type>.<id>.bin`.
    pub fn bin_path(&self) -> String {
        format!("/{}", self.bin_file_name())
    }

    /// File name of the binary: `<type>.<id>.bin`.
    pub fn bin_file_name(&self) -> String {
        bin_file_name(&self.firmware_type, self.firmware_id)
    }
}

/// A firmware row including its image, as served by the binary endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct FirmwareBinary {
    pub firmware_id: FirmwareId,
    pub firmware_type: String,
    pub version: FirmwareVersion,
    pub payload: Vec<u8>,
}

impl FirmwareBinary {
    /// Byte length of the image.
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    pub fn bin_file_name(&self) -> String {
        bin_file_name(&self.firmware_type, self.firmware_id)
    }
}

fn bin_file_name(firmware_type: &str, id: FirmwareId) -> String {
    format!("{}.{}.bin", firmware_type, id)
}
