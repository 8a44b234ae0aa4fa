//! Firmware-over-the-air lookup and download.
//!
//! Devices poll `/<type>.json` (optionally with `?id=<device>`) for a
//! manifest describing the firmware they should run, then fetch the image
//! from the `bin` path it names.

pub mod api;
pub mod model;
pub mod resolver;
pub mod responder;
pub mod sanitize;
pub mod store;

#[cfg(test)]
mod fixtures;

use std::sync::Arc;

use axum::Router;
use fota_core::{Module, ServiceError};
use fota_sql::SQLStore;

use api::FotaState;
use resolver::Resolver;
use responder::ManifestConfig;
use store::{FirmwareStore, SqlFirmwareStore};

/// The OTA module: manifest lookup plus binary download.
pub struct FotaModule {
    state: Arc<FotaState>,
}

impl FotaModule {
    /// Create the module over a SQL database, initialising the firmware tables.
    pub fn new(db: Arc<dyn SQLStore>, manifest: ManifestConfig) -> Result<Self, ServiceError> {
        let store = Arc::new(SqlFirmwareStore::new(db)?);
        Ok(Self::with_store(store, manifest))
    }

    /// Create the module over any firmware store.
    pub fn with_store(store: Arc<dyn FirmwareStore>, manifest: ManifestConfig) -> Self {
        Self {
            state: Arc::new(FotaState {
                resolver: Resolver::new(store),
                manifest,
            }),
        }
    }
}

impl Module for FotaModule {
    fn name(&self) -> &str {
        "fota"
    }

    fn routes(&self) -> Router {
        api::router(Arc::clone(&self.state))
    }
}
