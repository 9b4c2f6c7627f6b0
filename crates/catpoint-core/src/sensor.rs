//! Sensor: a binary-state input device attached to the system.

use std::{
  cmp::Ordering,
  hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The kind of device a sensor represents.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SensorType {
  Door,
  Window,
  Motion,
}

/// A door, window or motion sensor and its last known activation state.
///
/// Identity is `(name, sensor_type)`: equality, hashing and ordering ignore
/// `active`, so inserting an updated sensor into a set replaces the old entry
/// rather than adding a second one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
  pub name:        String,
  pub sensor_type: SensorType,
  #[serde(default)]
  pub active:      bool,
}

impl Sensor {
  /// A new, inactive sensor.
  pub fn new(name: impl Into<String>, sensor_type: SensorType) -> Self {
    Self { name: name.into(), sensor_type, active: false }
  }
}

impl PartialEq for Sensor {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name && self.sensor_type == other.sensor_type
  }
}

impl Eq for Sensor {}

impl Hash for Sensor {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.name.hash(state);
    self.sensor_type.hash(state);
  }
}

impl PartialOrd for Sensor {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Sensor {
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .name
      .cmp(&other.name)
      .then(self.sensor_type.cmp(&other.sensor_type))
  }
}
