//! A [`SecurityRepository`] held entirely in memory.

use std::{collections::BTreeSet, convert::Infallible};

use crate::{
  repository::SecurityRepository,
  sensor::{Sensor, SensorType},
  status::{AlarmStatus, ArmingStatus},
};

/// Non-durable repository; state lives as long as the value does.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
  sensors:       BTreeSet<Sensor>,
  alarm_status:  AlarmStatus,
  arming_status: ArmingStatus,
}

impl InMemoryRepository {
  pub fn new() -> Self { Self::default() }

  /// A disarmed, quiet repository with one window and one door sensor.
  pub fn with_default_sensors() -> Self {
    Self::from_sensors([
      Sensor::new("Window Sensor", SensorType::Window),
      Sensor::new("Door Sensor", SensorType::Door),
    ])
  }

  pub fn from_sensors(sensors: impl IntoIterator<Item = Sensor>) -> Self {
    Self { sensors: sensors.into_iter().collect(), ..Self::default() }
  }
}

impl SecurityRepository for InMemoryRepository {
  type Error = Infallible;

  fn sensors(&self) -> Result<BTreeSet<Sensor>, Infallible> {
    Ok(self.sensors.clone())
  }

  fn add_sensor(&mut self, sensor: &Sensor) -> Result<(), Infallible> {
    self.sensors.insert(sensor.clone());
    Ok(())
  }

  fn remove_sensor(&mut self, sensor: &Sensor) -> Result<(), Infallible> {
    self.sensors.remove(sensor);
    Ok(())
  }

  fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), Infallible> {
    self.sensors.replace(sensor.clone());
    Ok(())
  }

  fn alarm_status(&self) -> Result<AlarmStatus, Infallible> {
    Ok(self.alarm_status)
  }

  fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), Infallible> {
    self.alarm_status = status;
    Ok(())
  }

  fn arming_status(&self) -> Result<ArmingStatus, Infallible> {
    Ok(self.arming_status)
  }

  fn set_arming_status(
    &mut self,
    status: ArmingStatus,
  ) -> Result<(), Infallible> {
    self.arming_status = status;
    Ok(())
  }
}
