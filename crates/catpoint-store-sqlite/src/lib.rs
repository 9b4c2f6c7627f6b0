//! SQLite backend for the Catpoint security repository.
//!
//! One database file holds the sensor set and the current alarm and arming
//! status. Every repository call is a single statement against that file.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteRepository;

#[cfg(test)]
mod tests;
