use std::sync::Arc;

use fota_core::ServiceError;
use fota_sql::{Row, SQLError, SQLStore, Value};

use super::FirmwareStore;
use super::schema::SCHEMA;
use crate::model::{FirmwareBinary, FirmwareId, FirmwareRecord, FirmwareVersion};
use crate::sanitize::{DeviceId, FirmwareType};

const PUBLIC_BY_TYPE: &str = "
SELECT firmware_id, version, private, firmware_type
FROM firmware
WHERE private = 0 AND firmware_type = ?1
ORDER BY version DESC";

const BY_DEVICE: &str = "
SELECT devices.firmware_id AS firmware_id,
       firmware.version AS version,
       firmware.private AS private,
       firmware.firmware_type AS firmware_type
FROM devices
JOIN firmware USING (firmware_id)
WHERE devices.device_id = ?1
ORDER BY firmware.version DESC";

const BINARY_BY_ID: &str = "
SELECT firmware_id, version, firmware_type, CAST(payload AS BLOB) AS payload
FROM firmware
WHERE firmware_id = ?1";

/// FirmwareStore backed by the shared SQLStore (SQLite).
pub struct SqlFirmwareStore {
    db: Arc<dyn SQLStore>,
}

impl SqlFirmwareStore {
    /// Wrap a database handle, creating the tables if they do not exist yet.
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        db.exec_batch(SCHEMA)
            .map_err(|e| ServiceError::StorageUnavailable(format!("firmware schema init: {e}")))?;
        Ok(Self { db })
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, ServiceError> {
        self.db.query(sql, params).map_err(storage_error)
    }
}

fn storage_error(e: SQLError) -> ServiceError {
    ServiceError::StorageUnavailable(format!("firmware store: {e}"))
}

fn row_firmware_id(row: &Row) -> Result<FirmwareId, ServiceError> {
    row.get_i64("firmware_id")
        .and_then(|id| u64::try_from(id).ok())
        .map(FirmwareId)
        .ok_or_else(|| ServiceError::Internal("firmware row without a valid firmware_id".into()))
}

fn row_text(row: &Row, column: &str) -> Result<String, ServiceError> {
    row.get_text(column)
        .ok_or_else(|| ServiceError::Internal(format!("firmware row without {column}")))
}

/// A NULL version reads as empty, which never parses and so ranks lowest.
fn row_version(row: &Row) -> FirmwareVersion {
    FirmwareVersion::new(row.get_text("version").unwrap_or_default())
}

fn row_private(row: &Row) -> Result<bool, ServiceError> {
    row.get_bool("private")
        .ok_or_else(|| ServiceError::Internal("firmware row without a valid private flag".into()))
}

fn row_to_record(row: &Row) -> Result<FirmwareRecord, ServiceError> {
    Ok(FirmwareRecord {
        firmware_id: row_firmware_id(row)?,
        version: row_version(row),
        private: row_private(row)?,
        firmware_type: row_text(row, "firmware_type")?,
    })
}

impl FirmwareStore for SqlFirmwareStore {
    fn query_latest_public_by_type(
        &self,
        firmware_type: &FirmwareType,
    ) -> Result<Vec<FirmwareRecord>, ServiceError> {
        self.query(PUBLIC_BY_TYPE, &[Value::Text(firmware_type.as_str().to_string())])?
            .iter()
            .map(row_to_record)
            .collect()
    }

    fn query_latest_by_device(
        &self,
        device_id: &DeviceId,
    ) -> Result<Vec<FirmwareRecord>, ServiceError> {
        self.query(BY_DEVICE, &[Value::Text(device_id.as_str().to_string())])?
            .iter()
            .map(row_to_record)
            .collect()
    }

    fn get_binary(&self, id: FirmwareId) -> Result<Option<FirmwareBinary>, ServiceError> {
        let sql_id = i64::try_from(id.0)
            .map_err(|_| ServiceError::InvalidIdentifier(format!("firmware id {id} out of range")))?;
        let mut rows = self.query(BINARY_BY_ID, &[Value::Integer(sql_id)])?;
        let Some(mut row) = rows.pop() else {
            return Ok(None);
        };

        let payload = row
            .take_blob("payload")
            .ok_or_else(|| ServiceError::Internal(format!("firmware {id} has no payload")))?;
        Ok(Some(FirmwareBinary {
            firmware_id: row_firmware_id(&row)?,
            firmware_type: row_text(&row, "firmware_type")?,
            version: row_version(&row),
            payload,
        }))
    }
}
