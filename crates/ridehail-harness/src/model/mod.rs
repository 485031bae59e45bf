//! Reference model for model-based testing.
//!
//! The model tracks navigation and ride progress with plain integers and
//! closed-form status arithmetic, independent of the timer machinery. Tests
//! apply the same [`Operation`] sequence to the model and to a real App and
//! compare their [`ObservableState`].

mod operation;
mod world;

pub use operation::{
    AddressSlot, Operation, OperationError, OperationResult, SimpleScreen, TierSlot,
};
pub use world::{ModelRide, ModelWorld, ObservableRide, ObservableState};
