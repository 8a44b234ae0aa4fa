//! Test helpers that play the role of the firmware publisher.

use std::sync::Arc;

use fota_core::ServiceError;
use fota_sql::{SQLStore, SqliteStore, Value};

use crate::model::{DeviceBinding, FirmwareBinary, FirmwareId, FirmwareRecord};
use crate::sanitize::{DeviceId, FirmwareType};
use crate::store::{FirmwareStore, SqlFirmwareStore};

/// An in-memory database with the firmware schema, plus a store over it.
pub(crate) fn store() -> (Arc<dyn SQLStore>, Arc<SqlFirmwareStore>) {
    let db: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
    let store = Arc::new(SqlFirmwareStore::new(Arc::clone(&db)).unwrap());
    (db, store)
}

pub(crate) fn publish(
    db: &Arc<dyn SQLStore>,
    id: i64,
    firmware_type: &str,
    version: &str,
    private: bool,
    payload: &[u8],
) {
    db.exec(
        "INSERT INTO firmware (firmware_id, version, private, firmware_type, payload) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        &[
            Value::Integer(id),
            Value::Text(version.to_string()),
            Value::Integer(private as i64),
            Value::Text(firmware_type.to_string()),
            Value::Blob(payload.to_vec()),
        ],
    )
    .unwrap();
}

pub(crate) fn bind(db: &Arc<dyn SQLStore>, device_id: &str, firmware_id: u64) {
    let binding = DeviceBinding {
        device_id: device_id.to_string(),
        firmware_id: FirmwareId(firmware_id),
    };
    db.exec(
        "INSERT INTO devices (device_id, firmware_id) VALUES (?1, ?2)",
        &[
            Value::Text(binding.device_id),
            Value::Integer(binding.firmware_id.0 as i64),
        ],
    )
    .unwrap();
}

/// Two public `sensorA` builds (id 5 at version 3, id 6 at version 5),
/// `dev1` pinned to id 5 and `dev2` pinned to a build that does not exist.
pub(crate) fn sensor_a() -> (Arc<dyn SQLStore>, Arc<SqlFirmwareStore>) {
    let (db, store) = store();
    publish(&db, 5, "sensorA", "3", false, b"sensorA build 5");
    publish(&db, 6, "sensorA", "5", false, b"sensorA build 6");
    bind(&db, "dev1", 5);
    bind(&db, "dev2", 404);
    (db, store)
}

/// Storage that always fails, to check errors are not swallowed on the way out.
pub(crate) struct Unavailable;

impl FirmwareStore for Unavailable {
    fn query_latest_public_by_type(
        &self,
        _: &FirmwareType,
    ) -> Result<Vec<FirmwareRecord>, ServiceError> {
        Err(ServiceError::StorageUnavailable("down".into()))
    }

    fn query_latest_by_device(&self, _: &DeviceId) -> Result<Vec<FirmwareRecord>, ServiceError> {
        Err(ServiceError::StorageUnavailable("down".into()))
    }

    fn get_binary(&self, _: FirmwareId) -> Result<Option<FirmwareBinary>, ServiceError> {
        Err(ServiceError::StorageUnavailable("down".into()))
    }
}
