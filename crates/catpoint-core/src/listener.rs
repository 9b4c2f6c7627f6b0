//! Status listeners and their registration handles.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::AlarmStatus;

/// Receiver of controller notifications.
///
/// Callbacks run synchronously, after the change they report has been
/// persisted. Every method has an empty default so implementors only override
/// what they observe.
pub trait StatusListener: Send + Sync {
  fn on_alarm_status_changed(&self, _status: AlarmStatus) {}

  /// Fired once per arming-status change, after the sensor sweep.
  fn on_sensor_status_refresh(&self) {}

  fn on_cat_detected(&self, _detected: bool) {}
}

/// Opaque handle returned when a listener is registered.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ListenerId(Uuid);

impl ListenerId {
  pub(crate) fn new() -> Self { Self(Uuid::new_v4()) }
}

impl fmt::Display for ListenerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// A notification queued during one controller operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Notification {
  AlarmStatusChanged(AlarmStatus),
  SensorStatusRefresh,
  CatDetected(bool),
}

impl Notification {
  pub(crate) fn deliver(self, listener: &dyn StatusListener) {
    match self {
      Self::AlarmStatusChanged(status) => listener.on_alarm_status_changed(status),
      Self::SensorStatusRefresh => listener.on_sensor_status_refresh(),
      Self::CatDetected(detected) => listener.on_cat_detected(detected),
    }
  }
}
