//! Listener that reports controller notifications on stdout.

use catpoint_core::{listener::StatusListener, status::AlarmStatus};

pub struct ConsoleListener;

impl StatusListener for ConsoleListener {
  fn on_alarm_status_changed(&self, status: AlarmStatus) {
    let banner = match status {
      AlarmStatus::NoAlarm => "all clear",
      AlarmStatus::PendingAlarm => "sensor tripped, alarm pending",
      AlarmStatus::Alarm => "ALARM",
    };
    println!("* alarm status: {status} ({banner})");
  }

  fn on_sensor_status_refresh(&self) {
    println!("* sensors reset");
  }

  fn on_cat_detected(&self, detected: bool) {
    if detected {
      println!("* camera: cat detected");
    } else {
      println!("* camera: no cat");
    }
  }
}
