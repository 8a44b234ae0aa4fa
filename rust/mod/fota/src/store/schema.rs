/// DDL for the tables the publisher writes and the resolver reads.
///
/// `version` is TEXT because publishers store both `"5"` and `"1.2.3"`;
/// ordering happens in the resolver, not in SQL.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS firmware (
    firmware_id   INTEGER PRIMARY KEY,
    version       TEXT NOT NULL,
    private       INTEGER NOT NULL DEFAULT 0,
    firmware_type TEXT NOT NULL,
    payload       BLOB NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_firmware_type ON firmware(firmware_type, private);

CREATE TABLE IF NOT EXISTS devices (
    device_id   TEXT PRIMARY KEY,
    firmware_id INTEGER NOT NULL
);
";
