//! The SQLite implementation of [`SecurityRepository`].

use std::{collections::BTreeSet, path::Path};

use catpoint_core::{
  repository::SecurityRepository,
  sensor::Sensor,
  status::{AlarmStatus, ArmingStatus},
};
use rusqlite::{Connection, params};
use tracing::debug;

use crate::{
  Error, Result,
  encode::{
    RawSensor, decode_alarm_status, decode_arming_status, encode_alarm_status,
    encode_arming_status, encode_sensor_type,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A security repository backed by a single SQLite file.
pub struct SqliteRepository {
  conn: Connection,
}

impl SqliteRepository {
  /// Open (or create) a repository at `path` and run schema initialisation.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = Connection::open(path)?;
    debug!(?path, "opened sqlite repository");
    Self::init(conn)
  }

  /// Open a repository that lives only as long as the connection.
  pub fn open_in_memory() -> Result<Self> {
    Self::init(Connection::open_in_memory()?)
  }

  fn init(conn: Connection) -> Result<Self> {
    conn.execute_batch(SCHEMA)?;
    debug!("schema initialised");
    Ok(Self { conn })
  }

  fn read_status_column(&self, column: &'static str) -> Result<String> {
    // `column` is always one of the two literal names below.
    let sql = format!("SELECT {column} FROM system_status WHERE id = 1");
    Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
  }

  fn write_status_column(&self, column: &'static str, value: String) -> Result<()> {
    let sql = format!("UPDATE system_status SET {column} = ?1 WHERE id = 1");
    self.conn.execute(&sql, params![value])?;
    debug!(column, %value, "status written");
    Ok(())
  }
}

// ─── SecurityRepository impl ─────────────────────────────────────────────────

impl SecurityRepository for SqliteRepository {
  type Error = Error;

  // ── Sensors ───────────────────────────────────────────────────────────────

  fn sensors(&self) -> Result<BTreeSet<Sensor>> {
    let mut stmt = self
      .conn
      .prepare("SELECT name, sensor_type, active FROM sensors")?;
    let raws = stmt
      .query_map([], RawSensor::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    raws.into_iter().map(RawSensor::into_sensor).collect()
  }

  fn add_sensor(&mut self, sensor: &Sensor) -> Result<()> {
    self.conn.execute(
      "INSERT OR IGNORE INTO sensors (name, sensor_type, active)
       VALUES (?1, ?2, ?3)",
      params![
        sensor.name,
        encode_sensor_type(sensor.sensor_type),
        sensor.active
      ],
    )?;
    Ok(())
  }

  fn remove_sensor(&mut self, sensor: &Sensor) -> Result<()> {
    self.conn.execute(
      "DELETE FROM sensors WHERE name = ?1 AND sensor_type = ?2",
      params![sensor.name, encode_sensor_type(sensor.sensor_type)],
    )?;
    Ok(())
  }

  fn update_sensor(&mut self, sensor: &Sensor) -> Result<()> {
    self.conn.execute(
      "INSERT INTO sensors (name, sensor_type, active) VALUES (?1, ?2, ?3)
       ON CONFLICT (name, sensor_type) DO UPDATE SET active = excluded.active",
      params![
        sensor.name,
        encode_sensor_type(sensor.sensor_type),
        sensor.active
      ],
    )?;
    debug!(name = %sensor.name, active = sensor.active, "sensor written");
    Ok(())
  }

  // ── Statuses ──────────────────────────────────────────────────────────────

  fn alarm_status(&self) -> Result<AlarmStatus> {
    decode_alarm_status(&self.read_status_column("alarm_status")?)
  }

  fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<()> {
    self.write_status_column("alarm_status", encode_alarm_status(status))
  }

  fn arming_status(&self) -> Result<ArmingStatus> {
    decode_arming_status(&self.read_status_column("arming_status")?)
  }

  fn set_arming_status(&mut self, status: ArmingStatus) -> Result<()> {
    self.write_status_column("arming_status", encode_arming_status(status))
  }
}
