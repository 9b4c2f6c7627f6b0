//! The alarm state machine, [`SecurityService`].
//!
//! Every public operation is a short read-decide-write sequence against the
//! repository. Alarm-status writes all go through one funnel that persists the
//! new status and queues a listener notification; queued notifications are
//! delivered only after the whole operation has succeeded.

use std::{
  collections::{BTreeSet, HashMap},
  sync::Arc,
};

use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  classifier::ImageClassifier,
  listener::{ListenerId, Notification, StatusListener},
  repository::SecurityRepository,
  sensor::Sensor,
  status::{AlarmStatus, ArmingStatus},
};

/// Confidence (percent) every image is classified with.
pub const CAT_CONFIDENCE_THRESHOLD: f32 = 50.0;

type Outbox = Vec<Notification>;

/// Receives arming changes, sensor events and camera images, and derives the
/// alarm status from them.
///
/// Besides the repository and the classifier, the only state held here is
/// the result of the last image classification and the registered
/// listeners. Mutating operations take `&mut self`; share an instance across
/// threads behind a `Mutex`.
pub struct SecurityService<R, C> {
  repository:   R,
  classifier:   C,
  cat_detected: bool,
  listeners:    HashMap<ListenerId, Arc<dyn StatusListener>>,
}

impl<R, C> SecurityService<R, C>
where
  R: SecurityRepository,
  C: ImageClassifier,
{
  pub fn new(repository: R, classifier: C) -> Self {
    Self {
      repository,
      classifier,
      cat_detected: false,
      listeners: HashMap::new(),
    }
  }

  pub fn repository(&self) -> &R { &self.repository }

  pub fn into_repository(self) -> R { self.repository }

  pub fn classifier(&self) -> &C { &self.classifier }

  /// Result of the most recent image classification.
  pub fn cat_detected(&self) -> bool { self.cat_detected }

  // ── Listeners ─────────────────────────────────────────────────────────

  /// Register `listener`. Registering the same `Arc` again returns the handle
  /// it already has.
  pub fn add_status_listener(
    &mut self,
    listener: Arc<dyn StatusListener>,
  ) -> ListenerId {
    let existing = self
      .listeners
      .iter()
      .find(|(_, l)| std::ptr::addr_eq(Arc::as_ptr(l), Arc::as_ptr(&listener)));
    if let Some((id, _)) = existing {
      return *id;
    }

    let id = ListenerId::new();
    self.listeners.insert(id, listener);
    debug!(%id, "status listener added");
    id
  }

  /// Unregister a listener. Returns `false` if the handle was unknown.
  pub fn remove_status_listener(&mut self, id: ListenerId) -> bool {
    let removed = self.listeners.remove(&id).is_some();
    if removed {
      debug!(%id, "status listener removed");
    }
    removed
  }

  pub fn listener_count(&self) -> usize { self.listeners.len() }

  // ── Rule operations ───────────────────────────────────────────────────

  /// Change the arming status.
  ///
  /// Arming home while a cat was last seen raises the alarm; disarming clears
  /// it. Arming (home or away) also resets every known sensor to inactive.
  pub fn set_arming_status(&mut self, status: ArmingStatus) -> Result<()> {
    self.transact(|svc, outbox| {
      if svc.cat_detected && status == ArmingStatus::ArmedHome {
        debug!("armed home with a cat in view");
        svc.commit_alarm_status(AlarmStatus::Alarm, outbox)?;
      } else if status == ArmingStatus::Disarmed {
        svc.commit_alarm_status(AlarmStatus::NoAlarm, outbox)?;
      }

      if status.is_armed() {
        // Iterate an owned snapshot: each deactivation writes back to the
        // repository.
        for mut sensor in svc.read_sensors()? {
          svc.apply_activation(&mut sensor, false, outbox)?;
        }
      }

      svc
        .repository
        .set_arming_status(status)
        .map_err(Error::repository)?;
      info!(%status, "arming status changed");

      outbox.push(Notification::SensorStatusRefresh);
      Ok(())
    })
  }

  /// Classify `image` and apply the cat-detection rule. Returns the
  /// classification result.
  pub fn process_image(&mut self, image: &[u8]) -> Result<bool> {
    let cat = self
      .classifier
      .classify(image, CAT_CONFIDENCE_THRESHOLD)
      .map_err(Error::classifier)?;
    debug!(cat, bytes = image.len(), "image classified");

    self.transact(|svc, outbox| {
      svc.handle_cat_detection(cat, outbox)?;
      Ok(cat)
    })
  }

  /// Set a sensor's activation to `active` and evaluate the consequences.
  ///
  /// No transition is evaluated while the alarm is ringing. Deactivating a
  /// sensor that is already inactive is a no-op for the alarm status. The
  /// sensor is updated in place and persisted either way.
  pub fn change_sensor_activation_status(
    &mut self,
    sensor: &mut Sensor,
    active: bool,
  ) -> Result<()> {
    self.transact(|svc, outbox| svc.apply_activation(sensor, active, outbox))
  }

  /// Evaluate a sensor whose `active` flag the caller has already changed.
  ///
  /// Narrower than [`Self::change_sensor_activation_status`]: only a quiet
  /// sensor during a pending alarm, or any sensor while a disarmed system is
  /// still ringing, steps the alarm down.
  pub fn reconcile_sensor(&mut self, sensor: &Sensor) -> Result<()> {
    self.transact(|svc, outbox| {
      let alarm = svc.read_alarm_status()?;
      if alarm == AlarmStatus::PendingAlarm && !sensor.active {
        svc.handle_sensor_deactivated(outbox)?;
      } else if alarm == AlarmStatus::Alarm
        && svc.read_arming_status()? == ArmingStatus::Disarmed
      {
        svc.handle_sensor_deactivated(outbox)?;
      }

      svc.persist_sensor(sensor)
    })
  }

  /// Persist `status` and notify every listener.
  pub fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<()> {
    self.transact(|svc, outbox| svc.commit_alarm_status(status, outbox))
  }

  // ── Passthroughs ──────────────────────────────────────────────────────

  pub fn sensors(&self) -> Result<BTreeSet<Sensor>> { self.read_sensors() }

  pub fn add_sensor(&mut self, sensor: &Sensor) -> Result<()> {
    self.repository.add_sensor(sensor).map_err(Error::repository)
  }

  pub fn remove_sensor(&mut self, sensor: &Sensor) -> Result<()> {
    self.repository.remove_sensor(sensor).map_err(Error::repository)
  }

  pub fn alarm_status(&self) -> Result<AlarmStatus> { self.read_alarm_status() }

  pub fn arming_status(&self) -> Result<ArmingStatus> {
    self.read_arming_status()
  }

  // ── Transitions ───────────────────────────────────────────────────────

  fn apply_activation(
    &mut self,
    sensor: &mut Sensor,
    active: bool,
    outbox: &mut Outbox,
  ) -> Result<()> {
    if self.read_alarm_status()? != AlarmStatus::Alarm {
      if active {
        self.handle_sensor_activated(outbox)?;
      } else if sensor.active {
        self.handle_sensor_deactivated(outbox)?;
      }
    }

    sensor.active = active;
    self.persist_sensor(sensor)
  }

  fn handle_sensor_activated(&mut self, outbox: &mut Outbox) -> Result<()> {
    if self.read_arming_status()? == ArmingStatus::Disarmed {
      debug!("sensor activated while disarmed");
      return Ok(());
    }

    match self.read_alarm_status()? {
      AlarmStatus::NoAlarm => {
        self.commit_alarm_status(AlarmStatus::PendingAlarm, outbox)
      }
      AlarmStatus::PendingAlarm => {
        self.commit_alarm_status(AlarmStatus::Alarm, outbox)
      }
      AlarmStatus::Alarm => Ok(()),
    }
  }

  fn handle_sensor_deactivated(&mut self, outbox: &mut Outbox) -> Result<()> {
    match self.read_alarm_status()? {
      AlarmStatus::PendingAlarm => {
        self.commit_alarm_status(AlarmStatus::NoAlarm, outbox)
      }
      AlarmStatus::Alarm => {
        self.commit_alarm_status(AlarmStatus::PendingAlarm, outbox)
      }
      AlarmStatus::NoAlarm => Ok(()),
    }
  }

  fn handle_cat_detection(&mut self, cat: bool, outbox: &mut Outbox) -> Result<()> {
    self.cat_detected = cat;

    if cat {
      if self.read_arming_status()? == ArmingStatus::ArmedHome {
        self.commit_alarm_status(AlarmStatus::Alarm, outbox)?;
      }
    } else if self.read_sensors()?.iter().all(|s| !s.active) {
      self.commit_alarm_status(AlarmStatus::NoAlarm, outbox)?;
    }

    outbox.push(Notification::CatDetected(cat));
    Ok(())
  }

  /// The only place alarm status is written.
  fn commit_alarm_status(
    &mut self,
    status: AlarmStatus,
    outbox: &mut Outbox,
  ) -> Result<()> {
    self
      .repository
      .set_alarm_status(status)
      .map_err(Error::repository)?;
    info!(%status, "alarm status changed");
    outbox.push(Notification::AlarmStatusChanged(status));
    Ok(())
  }

  // ── Plumbing ──────────────────────────────────────────────────────────

  /// Run `op`, then deliver what it queued. A failed operation delivers
  /// nothing.
  fn transact<T>(
    &mut self,
    op: impl FnOnce(&mut Self, &mut Outbox) -> Result<T>,
  ) -> Result<T> {
    let mut outbox = Outbox::new();
    match op(self, &mut outbox) {
      Ok(value) => {
        self.dispatch(outbox);
        Ok(value)
      }
      Err(e) => {
        if !outbox.is_empty() {
          warn!(
            dropped = outbox.len(),
            error = %e,
            "operation failed; discarding queued notifications"
          );
        }
        Err(e)
      }
    }
  }

  fn dispatch(&self, outbox: Outbox) {
    for notification in outbox {
      for listener in self.listeners.values() {
        notification.deliver(listener.as_ref());
      }
    }
  }

  fn persist_sensor(&mut self, sensor: &Sensor) -> Result<()> {
    self.repository.update_sensor(sensor).map_err(Error::repository)
  }

  fn read_sensors(&self) -> Result<BTreeSet<Sensor>> {
    self.repository.sensors().map_err(Error::repository)
  }

  fn read_alarm_status(&self) -> Result<AlarmStatus> {
    self.repository.alarm_status().map_err(Error::repository)
  }

  fn read_arming_status(&self) -> Result<ArmingStatus> {
    self.repository.arming_status().map_err(Error::repository)
  }
}
