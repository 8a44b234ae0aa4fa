use axum::Router;

/// A service module that contributes HTTP routes.
///
/// The server binary collects every module and merges its routes into
/// a single Router. OTA clients request absolute paths such as
/// `/sensorA.json`, so module routes are mounted at the root.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Return the module's routes.
    fn routes(&self) -> Router;
}
