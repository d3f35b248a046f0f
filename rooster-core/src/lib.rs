//! Core types for the rooster volunteer scheduler.
//!
//! This crate is shared by the CLI and the hosted-store backend:
//! - `model` for events, volunteers, roster blocks and departments
//! - `store` for the record-store boundary, its schema contract and a local
//!   file-backed implementation
//! - `matrix` for the volunteer × hour grid of one event day

pub mod account;
pub mod admin;
pub mod config;
pub mod constants;
pub mod days;
pub mod deletion;
pub mod error;
pub mod matrix;
pub mod model;
pub mod names;
pub mod palette;
pub mod registration;
pub mod repository;
pub mod schedule;
pub mod session;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::{DisplayConfig, RoosterConfig, StoreConfig};
pub use deletion::{DeletionStaging, StagingState};
pub use error::{RoosterError, RoosterResult};
pub use matrix::{HourSlots, MatrixRow, RosterMatrix, build_matrix};
pub use model::*;
pub use names::NameDirectory;
pub use palette::DepartmentPalette;
pub use registration::{RegistrationRequest, RegistrationSet};
pub use repository::Repository;
pub use schedule::ScheduleView;
pub use session::Session;
pub use store::{Collection, LocalStore, Normalizer, RecordStore, Schema};
