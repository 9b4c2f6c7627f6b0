//! Core types, collaborator contracts and the alarm controller for Catpoint.
//!
//! This crate is deliberately free of storage and UI dependencies. Backends
//! implement [`repository::SecurityRepository`] and
//! [`classifier::ImageClassifier`]; front ends drive a
//! [`service::SecurityService`] and observe it through
//! [`listener::StatusListener`].

pub mod classifier;
pub mod error;
pub mod listener;
pub mod memory;
pub mod repository;
pub mod sensor;
pub mod service;
pub mod status;

pub use error::{Error, Result};
pub use service::{CAT_CONFIDENCE_THRESHOLD, SecurityService};
