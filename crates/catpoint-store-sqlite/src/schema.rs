//! SQL schema for the Catpoint SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS` / `OR IGNORE`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- A sensor's identity is (name, sensor_type); `active` is mutable state.
CREATE TABLE IF NOT EXISTS sensors (
    name        TEXT    NOT NULL,
    sensor_type TEXT    NOT NULL,   -- 'door' | 'window' | 'motion'
    active      INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (name, sensor_type)
);

-- Exactly one row.
CREATE TABLE IF NOT EXISTS system_status (
    id            INTEGER PRIMARY KEY CHECK (id = 1),
    alarm_status  TEXT NOT NULL,    -- 'no_alarm' | 'pending_alarm' | 'alarm'
    arming_status TEXT NOT NULL     -- 'disarmed' | 'armed_home' | 'armed_away'
);

INSERT OR IGNORE INTO system_status (id, alarm_status, arming_status)
VALUES (1, 'no_alarm', 'disarmed');

PRAGMA user_version = 1;
";
