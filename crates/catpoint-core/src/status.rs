//! Alarm and arming status enums.
//!
//! The `snake_case` string forms produced by `Display` / parsed by `FromStr`
//! are the representation used in storage columns and on the command line.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The current alert level of the system.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlarmStatus {
  #[default]
  NoAlarm,
  PendingAlarm,
  Alarm,
}

/// Whether, and how, the system is monitoring its sensors.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ArmingStatus {
  #[default]
  Disarmed,
  ArmedHome,
  ArmedAway,
}

impl ArmingStatus {
  /// `true` for both armed variants.
  pub fn is_armed(self) -> bool { !matches!(self, Self::Disarmed) }
}
