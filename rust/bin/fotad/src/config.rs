//! Server configuration file (`/etc/fota/<name>.toml`).
//!
//! ```toml
//! [server]
//! listen = "0.0.0.0:8080"
//!
//! [storage]
//! data_dir = "/var/lib/fota"
//! # sqlite_path = "/var/lib/fota/fota.sqlite"
//!
//! [manifest]
//! port = "80"
//! # host = "ota.example.com"
//! ```

use std::path::{Path, PathBuf};

use fota::responder::ManifestConfig;
use serde::Deserialize;

/// Directory searched for context names given to `-c`.
const CONFIG_DIR: &str = "/etc/fota";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    pub storage: StorageSection,
    #[serde(default)]
    pub manifest: ManifestConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSection {
    pub data_dir: String,
    #[serde(default)]
    pub sqlite_path: Option<String>,
}

impl ServerConfig {
    /// A bare name maps to `/etc/fota/<name>.toml`; anything containing
    /// `/` or `.` is taken as a path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            Path::new(CONFIG_DIR).join(format!("{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Refuse to start on settings that would produce broken manifests or
    /// an unusable database location.
    pub fn verify(&self) -> anyhow::Result<()> {
        if self.storage.data_dir.is_empty() {
            anyhow::bail!("storage.data_dir is empty in configuration.");
        }
        if self.manifest.port.is_empty() {
            anyhow::bail!("manifest.port is empty in configuration.");
        }
        if let Some(host) = &self.manifest.host {
            if host.is_empty() {
                anyhow::bail!("manifest.host is set but empty; remove it to echo the Host header.");
            }
        }
        Ok(())
    }

    pub fn service_config(&self, listen: Option<&str>) -> fota_core::ServiceConfig {
        fota_core::ServiceConfig {
            data_dir: Some(PathBuf::from(&self.storage.data_dir)),
            sqlite_path: self.storage.sqlite_path.as_ref().map(PathBuf::from),
            listen: listen.unwrap_or(&self.server.listen).to_string(),
        }
    }
}
