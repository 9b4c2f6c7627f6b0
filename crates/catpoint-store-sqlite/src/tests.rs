//! Integration tests for `SqliteRepository`.

use catpoint_core::{
  SecurityService,
  classifier::FixedClassifier,
  repository::SecurityRepository,
  sensor::{Sensor, SensorType},
  status::{AlarmStatus, ArmingStatus},
};
use rusqlite::Connection;

use crate::{Error, SqliteRepository};

fn repo() -> SqliteRepository {
  SqliteRepository::open_in_memory().expect("in-memory repository")
}

fn front_door() -> Sensor { Sensor::new("Front Door", SensorType::Door) }

// ─── Statuses ────────────────────────────────────────────────────────────────

#[test]
fn fresh_repository_is_quiet_and_disarmed() {
  let r = repo();
  assert_eq!(r.alarm_status().unwrap(), AlarmStatus::NoAlarm);
  assert_eq!(r.arming_status().unwrap(), ArmingStatus::Disarmed);
  assert!(r.sensors().unwrap().is_empty());
}

#[test]
fn statuses_roundtrip() {
  let mut r = repo();

  r.set_alarm_status(AlarmStatus::PendingAlarm).unwrap();
  r.set_arming_status(ArmingStatus::ArmedAway).unwrap();

  assert_eq!(r.alarm_status().unwrap(), AlarmStatus::PendingAlarm);
  assert_eq!(r.arming_status().unwrap(), ArmingStatus::ArmedAway);
}

// ─── Sensors ─────────────────────────────────────────────────────────────────

#[test]
fn add_and_list_sensors() {
  let mut r = repo();
  r.add_sensor(&front_door()).unwrap();
  r.add_sensor(&Sensor::new("Front Door", SensorType::Motion)).unwrap();
  r.add_sensor(&Sensor::new("Bedroom", SensorType::Window)).unwrap();

  let sensors = r.sensors().unwrap();
  assert_eq!(sensors.len(), 3);
  assert!(sensors.contains(&front_door()));
  assert!(sensors.iter().all(|s| !s.active));
}

#[test]
fn add_existing_identity_keeps_stored_sensor() {
  let mut r = repo();
  let mut door = front_door();
  door.active = true;
  r.add_sensor(&door).unwrap();

  r.add_sensor(&front_door()).unwrap();

  let sensors = r.sensors().unwrap();
  assert_eq!(sensors.len(), 1);
  assert!(sensors.first().unwrap().active);
}

#[test]
fn update_replaces_by_identity() {
  let mut r = repo();
  r.add_sensor(&front_door()).unwrap();

  let mut door = front_door();
  door.active = true;
  r.update_sensor(&door).unwrap();

  let sensors = r.sensors().unwrap();
  assert_eq!(sensors.len(), 1);
  assert!(sensors.get(&front_door()).unwrap().active);
}

#[test]
fn update_inserts_unknown_sensor() {
  let mut r = repo();
  r.update_sensor(&front_door()).unwrap();
  assert_eq!(r.sensors().unwrap().len(), 1);
}

#[test]
fn remove_by_identity() {
  let mut r = repo();
  let mut door = front_door();
  door.active = true;
  r.add_sensor(&door).unwrap();

  r.remove_sensor(&front_door()).unwrap();
  assert!(r.sensors().unwrap().is_empty());

  // Removing a missing sensor is not an error.
  r.remove_sensor(&front_door()).unwrap();
}

// ─── Durability ──────────────────────────────────────────────────────────────

#[test]
fn state_survives_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("catpoint.db");

  {
    let mut r = SqliteRepository::open(&path).unwrap();
    let mut door = front_door();
    door.active = true;
    r.add_sensor(&door).unwrap();
    r.set_alarm_status(AlarmStatus::Alarm).unwrap();
    r.set_arming_status(ArmingStatus::ArmedHome).unwrap();
  }

  let r = SqliteRepository::open(&path).unwrap();
  assert_eq!(r.alarm_status().unwrap(), AlarmStatus::Alarm);
  assert_eq!(r.arming_status().unwrap(), ArmingStatus::ArmedHome);
  assert!(r.sensors().unwrap().first().unwrap().active);
}

#[test]
fn unknown_column_value_is_an_error() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("catpoint.db");
  drop(SqliteRepository::open(&path).unwrap());

  Connection::open(&path)
    .unwrap()
    .execute("UPDATE system_status SET alarm_status = 'klaxon'", [])
    .unwrap();

  let r = SqliteRepository::open(&path).unwrap();
  match r.alarm_status() {
    Err(Error::UnknownValue { column, value }) => {
      assert_eq!(column, "alarm_status");
      assert_eq!(value, "klaxon");
    }
    other => panic!("expected UnknownValue, got {other:?}"),
  }
}

// ─── Through the controller ──────────────────────────────────────────────────

#[test]
fn controller_over_sqlite() {
  let mut svc = SecurityService::new(repo(), FixedClassifier(true));
  let mut door = front_door();
  svc.add_sensor(&door).unwrap();

  svc.set_arming_status(ArmingStatus::ArmedAway).unwrap();
  svc.change_sensor_activation_status(&mut door, true).unwrap();
  assert_eq!(svc.alarm_status().unwrap(), AlarmStatus::PendingAlarm);

  svc.process_image(b"frame").unwrap();
  svc.set_arming_status(ArmingStatus::ArmedHome).unwrap();
  assert_eq!(svc.alarm_status().unwrap(), AlarmStatus::Alarm);

  let r = svc.into_repository();
  assert_eq!(r.arming_status().unwrap(), ArmingStatus::ArmedHome);
  assert!(r.sensors().unwrap().iter().all(|s| !s.active));
}
