//! Firmware version ordering.
//!
//! Versions are stored as free-form text by the publisher. Comparing them as
//! strings puts `"10"` before `"9"`, so they are compared by semantic-version
//! precedence instead:
//!
//! - `"1.2.3"`, `"v1.2.3"`, `"1.2.3-rc.1"` parse as semver.
//! - Bare numbers and short forms are padded: `"5"` is `5.0.0`, `"1.2"` is `1.2.0`.
//!   Leading zeros are accepted here (`"0010"` is `10.0.0`).
//! - Anything else is unparseable. Unparseable versions sort below every
//!   parseable one and compare as plain strings among themselves.

use std::cmp::Ordering;
use std::fmt;

use semver::Version;

#[derive(Debug, Clone)]
pub struct FirmwareVersion {
    raw: String,
    parsed: Option<Version>,
}

impl FirmwareVersion {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_lenient(&raw);
        Self { raw, parsed }
    }

    /// The version exactly as stored.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The semantic version this text was read as, if any.
    pub fn semver(&self) -> Option<&Version> {
        self.parsed.as_ref()
    }
}

fn parse_lenient(raw: &str) -> Option<Version> {
    let s = raw.trim();
    let s = s.strip_prefix(['v', 'V']).unwrap_or(s);
    if let Ok(v) = Version::parse(s) {
        return Some(v);
    }

    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() > 3 {
        return None;
    }
    let mut nums = [0u64; 3];
    for (slot, part) in nums.iter_mut().zip(&parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }
    Some(Version::new(nums[0], nums[1], nums[2]))
}

impl Ord for FirmwareVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.parsed, &other.parsed) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => self.raw.cmp(&other.raw),
        }
    }
}

impl PartialOrd for FirmwareVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FirmwareVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FirmwareVersion {}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
