//! Boundary validation for values taken from the request URL.
//!
//! Both the firmware type and the device id end up as bound parameters in
//! storage queries. They are never spliced into SQL, but they are still
//! rejected here if they carry markup/shell metacharacters or control bytes,
//! so the resolver only ever sees clean identifiers.

use std::fmt;

use fota_core::ServiceError;

/// Longest accepted firmware type or device id, in bytes.
pub const MAX_INPUT_LEN: usize = 128;

const FORBIDDEN: &[char] = &['<', '>', ';', '|', '&', '\'', '"', '(', ')'];

fn check(kind: &str, raw: &str) -> Result<(), ServiceError> {
    if raw.len() > MAX_INPUT_LEN {
        return Err(ServiceError::Validation(format!(
            "{kind} longer than {MAX_INPUT_LEN} bytes"
        )));
    }
    if let Some(c) = raw.chars().find(|c| c.is_control() || FORBIDDEN.contains(c)) {
        return Err(ServiceError::Validation(format!(
            "{kind} contains forbidden character {c:?}"
        )));
    }
    Ok(())
}

/// A firmware type classifier, e.g. a hardware model name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FirmwareType(String);

impl FirmwareType {
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        if raw.is_empty() {
            return Err(ServiceError::Validation("firmware type is empty".into()));
        }
        check("firmware type", raw)?;
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FirmwareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A physical device identifier, from the `id` query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    /// An empty id means "no device": the lookup goes straight to the
    /// public-latest path.
    pub fn parse(raw: &str) -> Result<Option<Self>, ServiceError> {
        if raw.is_empty() {
            return Ok(None);
        }
        check("device id", raw)?;
        Ok(Some(Self(raw.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
