//! winmax
//!
//! Monitor-aware maximize/restore toggle for the focused window.
//!
//! Responsibilities:
//! - Persist pre-maximize geometry per process id (`store`)
//! - Decide between maximize and restore (`controller`)
//! - Load configuration (`config`) and set up the diagnostic log (`logging`)
//!
//! The OS is reached only through [`winmax_core::GeometryProvider`].

pub mod config;
pub mod controller;
pub mod logging;
pub mod store;

pub use config::Config;
pub use controller::{PlainRestoreReason, RunOutcome, ToggleController, ToggleError, ToggleOutcome};
pub use store::{StateStore, StoreError};
