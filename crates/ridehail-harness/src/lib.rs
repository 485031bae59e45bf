//! Deterministic simulation harness for the ride-hailing flow.
//!
//! Virtual-clock implementations of the Environment and Driver traits, so
//! the production App and Runtime run in tests without waiting on real time.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation for model-based
//! testing. Operations are applied to both the model and the real App, and
//! their observable states are compared.
//!
//! # Invariant Testing
//!
//! The `invariants` module holds the ride and navigation properties checked
//! after every step of a run; [`InvariantRegistry::standard()`] bundles them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod model;
pub mod sim_driver;
pub mod sim_env;

pub use invariants::{
    AppSnapshot, CancelBeforeArrival, HistoryNonEmpty, Invariant, InvariantRegistry,
    InvariantResult, NoDriverAfterArrival, RideSnapshot, SnapshotRecorder, StatusMonotonicity,
    SystemSnapshot, TerminalRideHasNoTimers, Violation,
};
pub use model::{
    AddressSlot, ModelRide, ModelWorld, ObservableRide, ObservableState, Operation,
    OperationError, OperationResult, SimpleScreen, TierSlot,
};
pub use sim_driver::{RenderedFrame, SimDriver, SimDriverError, Step};
pub use sim_env::{SimEnv, SimInstant};
