//! Property-based tests for the alarm state machine.
//!
//! Random sequences of operations are driven through a `SecurityService`
//! backed by the in-memory repository, and the following are checked after
//! every step:
//! - Activating a sensor while disarmed never raises the alarm status.
//! - Disarming always leaves `NoAlarm`; arming always leaves every sensor
//!   inactive.
//! - A sensor change is visible in the repository immediately.
//! - The last alarm status a listener heard is the stored alarm status.

use std::sync::{Arc, Mutex};

use catpoint_core::{
  SecurityService,
  classifier::{FixedClassifier, ImageClassifier},
  listener::StatusListener,
  memory::InMemoryRepository,
  sensor::{Sensor, SensorType},
  status::{AlarmStatus, ArmingStatus},
};
use proptest::prelude::*;

// =============================================================================
// HELPERS
// =============================================================================

const SENSOR_NAMES: [&str; 3] = ["Front Door", "Kitchen Window", "Hallway"];

#[derive(Debug, Clone)]
enum Op {
  Arm(ArmingStatus),
  Change { sensor: usize, active: bool },
  Reconcile { sensor: usize, active: bool },
  Image(bool),
}

fn arming_strategy() -> impl Strategy<Value = ArmingStatus> {
  prop_oneof![
    Just(ArmingStatus::Disarmed),
    Just(ArmingStatus::ArmedHome),
    Just(ArmingStatus::ArmedAway),
  ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
  let sensor = 0..SENSOR_NAMES.len();
  prop_oneof![
    arming_strategy().prop_map(Op::Arm),
    (sensor.clone(), any::<bool>())
      .prop_map(|(sensor, active)| Op::Change { sensor, active }),
    (sensor, any::<bool>())
      .prop_map(|(sensor, active)| Op::Reconcile { sensor, active }),
    any::<bool>().prop_map(Op::Image),
  ]
}

fn severity(status: AlarmStatus) -> u8 {
  match status {
    AlarmStatus::NoAlarm => 0,
    AlarmStatus::PendingAlarm => 1,
    AlarmStatus::Alarm => 2,
  }
}

fn sensor_type(index: usize) -> SensorType {
  [SensorType::Door, SensorType::Window, SensorType::Motion][index]
}

/// Swaps its answer between calls so one service can see both outcomes.
struct Toggle(std::cell::Cell<bool>);

impl ImageClassifier for Toggle {
  type Error = std::convert::Infallible;

  fn classify(&self, image: &[u8], threshold: f32) -> Result<bool, Self::Error> {
    FixedClassifier(self.0.get()).classify(image, threshold)
  }
}

#[derive(Default)]
struct LastAlarm(Mutex<Option<AlarmStatus>>);

impl StatusListener for LastAlarm {
  fn on_alarm_status_changed(&self, status: AlarmStatus) {
    *self.0.lock().unwrap() = Some(status);
  }
}

fn stored(svc: &SecurityService<InMemoryRepository, Toggle>, index: usize) -> Sensor {
  let probe = Sensor::new(SENSOR_NAMES[index], sensor_type(index));
  svc.sensors().unwrap().get(&probe).cloned().unwrap()
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
  #[test]
  fn invariants_hold_across_operation_sequences(
    initial in arming_strategy(),
    ops in prop::collection::vec(op_strategy(), 1..40),
  ) {
    let repo = InMemoryRepository::from_sensors(
      (0..SENSOR_NAMES.len()).map(|i| Sensor::new(SENSOR_NAMES[i], sensor_type(i))),
    );
    let mut svc = SecurityService::new(repo, Toggle(std::cell::Cell::new(false)));
    svc.set_arming_status(initial).unwrap();

    let listener = Arc::new(LastAlarm::default());
    svc.add_status_listener(listener.clone());

    for op in ops {
      let before = svc.alarm_status().unwrap();
      let arming = svc.arming_status().unwrap();

      match op {
        Op::Arm(status) => {
          svc.set_arming_status(status).unwrap();
          prop_assert_eq!(svc.arming_status().unwrap(), status);
          if status == ArmingStatus::Disarmed {
            prop_assert_eq!(svc.alarm_status().unwrap(), AlarmStatus::NoAlarm);
          } else {
            prop_assert!(svc.sensors().unwrap().iter().all(|s| !s.active));
          }
        }
        Op::Change { sensor, active } => {
          let mut target = stored(&svc, sensor);
          svc.change_sensor_activation_status(&mut target, active).unwrap();
          prop_assert_eq!(stored(&svc, sensor).active, active);

          let after = svc.alarm_status().unwrap();
          if arming == ArmingStatus::Disarmed || before == AlarmStatus::Alarm {
            prop_assert!(severity(after) <= severity(before));
          }
          if before == AlarmStatus::Alarm {
            prop_assert_eq!(after, AlarmStatus::Alarm);
          }
        }
        Op::Reconcile { sensor, active } => {
          let mut target = stored(&svc, sensor);
          target.active = active;
          svc.reconcile_sensor(&target).unwrap();
          prop_assert_eq!(stored(&svc, sensor).active, active);
          prop_assert!(severity(svc.alarm_status().unwrap()) <= severity(before));
        }
        Op::Image(cat) => {
          svc.classifier().0.set(cat);
          prop_assert_eq!(svc.process_image(b"frame").unwrap(), cat);
          prop_assert_eq!(svc.cat_detected(), cat);
          if !cat && svc.sensors().unwrap().iter().all(|s| !s.active) {
            prop_assert_eq!(svc.alarm_status().unwrap(), AlarmStatus::NoAlarm);
          }
        }
      }

      if let Some(heard) = *listener.0.lock().unwrap() {
        prop_assert_eq!(heard, svc.alarm_status().unwrap());
      }
    }
  }
}
