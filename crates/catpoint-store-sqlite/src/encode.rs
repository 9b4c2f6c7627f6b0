//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Enums are stored as their `snake_case` `Display` form; the active flag is
//! an integer 0/1.

use std::str::FromStr;

use catpoint_core::{
  sensor::{Sensor, SensorType},
  status::{AlarmStatus, ArmingStatus},
};

use crate::{Error, Result};

fn decode_enum<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  s.parse().map_err(|_| Error::UnknownValue { column, value: s.to_owned() })
}

// ─── SensorType ──────────────────────────────────────────────────────────────

pub fn encode_sensor_type(t: SensorType) -> String { t.to_string() }

pub fn decode_sensor_type(s: &str) -> Result<SensorType> {
  decode_enum("sensor_type", s)
}

// ─── Statuses ────────────────────────────────────────────────────────────────

pub fn encode_alarm_status(s: AlarmStatus) -> String { s.to_string() }

pub fn decode_alarm_status(s: &str) -> Result<AlarmStatus> {
  decode_enum("alarm_status", s)
}

pub fn encode_arming_status(s: ArmingStatus) -> String { s.to_string() }

pub fn decode_arming_status(s: &str) -> Result<ArmingStatus> {
  decode_enum("arming_status", s)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `sensors` row.
pub struct RawSensor {
  pub name:        String,
  pub sensor_type: String,
  pub active:      bool,
}

impl RawSensor {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      name:        row.get(0)?,
      sensor_type: row.get(1)?,
      active:      row.get(2)?,
    })
  }

  pub fn into_sensor(self) -> Result<Sensor> {
    Ok(Sensor {
      name:        self.name,
      sensor_type: decode_sensor_type(&self.sensor_type)?,
      active:      self.active,
    })
  }
}
