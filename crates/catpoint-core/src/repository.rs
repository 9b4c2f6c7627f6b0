//! The `SecurityRepository` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `catpoint-store-sqlite`, or [`crate::memory::InMemoryRepository`]). The
//! controller depends on this abstraction, never on a concrete backend.

use std::collections::BTreeSet;

use crate::{
  sensor::Sensor,
  status::{AlarmStatus, ArmingStatus},
};

/// Durable store of the sensor set, the alarm status and the arming status.
///
/// Every mutation must be visible to the next read; backends do not buffer or
/// batch writes.
pub trait SecurityRepository {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Sensors ───────────────────────────────────────────────────────────

  /// All known sensors. The returned set is owned by the caller, so it is a
  /// snapshot that later repository writes do not disturb.
  fn sensors(&self) -> Result<BTreeSet<Sensor>, Self::Error>;

  /// Add a sensor. Adding a sensor whose identity is already present keeps
  /// the stored one.
  fn add_sensor(&mut self, sensor: &Sensor) -> Result<(), Self::Error>;

  /// Remove the sensor with the same identity. Missing sensors are ignored.
  fn remove_sensor(&mut self, sensor: &Sensor) -> Result<(), Self::Error>;

  /// Replace the stored sensor with the same identity by `sensor`, inserting
  /// it if absent.
  fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), Self::Error>;

  // ── Statuses ──────────────────────────────────────────────────────────

  fn alarm_status(&self) -> Result<AlarmStatus, Self::Error>;

  fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), Self::Error>;

  fn arming_status(&self) -> Result<ArmingStatus, Self::Error>;

  fn set_arming_status(
    &mut self,
    status: ArmingStatus,
  ) -> Result<(), Self::Error>;
}
