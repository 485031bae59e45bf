//! Model-based property tests.
//!
//! These tests generate random operation sequences and verify that the real
//! App behaves identically to the reference model.
//!
//! # Architecture
//!
//! ```text
//! proptest generates: Vec<Operation>
//!                          │
//!           ┌──────────────┼──────────────┐
//!           ▼              ▼              ▼
//!      ModelWorld      RealWorld       Compare
//!      (reference)     (App+SimEnv)    Results
//! ```

use std::time::Duration;

use proptest::prelude::*;
use ridehail_app::{App, AppConfig};
use ridehail_core::{NavigationConfig, ParamScope};
use ridehail_harness::{
    AddressSlot, InvariantRegistry, ModelWorld, ObservableState, Operation, OperationError,
    OperationResult, SimEnv, SimpleScreen, SnapshotRecorder, TierSlot,
};

/// Real system wrapper that mirrors `ModelWorld`'s interface.
struct RealWorld {
    env: SimEnv,
    app: App<SimEnv>,
    recorder: SnapshotRecorder,
    invariants: InvariantRegistry,
}

impl RealWorld {
    fn new(scope: ParamScope) -> Self {
        let env = SimEnv::new();
        let config = AppConfig {
            navigation: NavigationConfig { param_scope: scope },
            ..AppConfig::default()
        };
        Self {
            app: App::new(env.clone(), config),
            env,
            recorder: SnapshotRecorder::new(),
            invariants: InvariantRegistry::standard(),
        }
    }

    fn apply(&mut self, op: &Operation) -> OperationResult {
        if let Operation::AdvanceTime { millis } = op {
            self.env.advance(Duration::from_millis(u64::from(*millis)));
        }

        let actions = self.app.handle(op.event());
        let result = OperationResult::from_actions(&actions);

        let snapshot = self.recorder.observe(&self.app);
        self.invariants.assert_all(&snapshot, &format!("after {op:?}"));

        result
    }

    fn observable_state(&self) -> ObservableState {
        ObservableState::from_app(&self.app, &self.app.config().ride)
    }
}

fn address_strategy() -> impl Strategy<Value = AddressSlot> {
    (0u8..4).prop_map(AddressSlot)
}

fn tier_strategy() -> impl Strategy<Value = TierSlot> {
    (0u8..4).prop_map(TierSlot)
}

fn screen_strategy() -> impl Strategy<Value = SimpleScreen> {
    prop_oneof![
        Just(SimpleScreen::Home),
        Just(SimpleScreen::Driver),
        Just(SimpleScreen::Rides),
        Just(SimpleScreen::Payment),
        Just(SimpleScreen::Profile),
    ]
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        2 => screen_strategy().prop_map(|screen| Operation::Navigate { screen }),
        2 => (address_strategy(), address_strategy())
            .prop_map(|(pickup, dropoff)| Operation::BookRide { pickup, dropoff }),
        2 => tier_strategy().prop_map(|tier| Operation::ConfirmRide { tier }),
        2 => (address_strategy(), address_strategy(), tier_strategy())
            .prop_map(|(pickup, dropoff, tier)| Operation::OpenDetails { pickup, dropoff, tier }),
        2 => Just(Operation::Back),
        4 => (0u16..15_000).prop_map(|millis| Operation::AdvanceTime { millis }),
        1 => Just(Operation::RequestCancel),
        1 => Just(Operation::ConfirmCancel),
        1 => Just(Operation::DeclineCancel),
        1 => Just(Operation::BookAnother),
        1 => (0u8..8).prop_map(|stars| Operation::RateRide { stars }),
    ]
}

fn scope_strategy() -> impl Strategy<Value = ParamScope> {
    prop_oneof![Just(ParamScope::PerScreen), Just(ParamScope::PerEntry)]
}

proptest! {
    /// Verify that operation results and observable state match between model
    /// and real implementation after every operation.
    #[test]
    fn prop_model_matches_real(
        scope in scope_strategy(),
        ops in prop::collection::vec(operation_strategy(), 0..60)
    ) {
        let mut model = ModelWorld::new(scope);
        let mut real = RealWorld::new(scope);

        for (i, op) in ops.iter().enumerate() {
            let model_result = model.apply(op);
            let real_result = real.apply(op);

            prop_assert_eq!(
                &model_result,
                &real_result,
                "Divergence at operation {}: {:?}",
                i,
                op
            );
            prop_assert_eq!(
                model.observable_state(),
                real.observable_state(),
                "State divergence after operation {}: {:?}",
                i,
                op
            );
        }
    }
}

#[test]
fn cancel_confirmed_after_arrival_is_rejected_by_both() {
    let ops = [
        Operation::OpenDetails { pickup: AddressSlot(1), dropoff: AddressSlot(2), tier: TierSlot(1) },
        Operation::AdvanceTime { millis: 12_000 },
        Operation::RequestCancel,
        Operation::AdvanceTime { millis: 14_000 },
        Operation::AdvanceTime { millis: 4_000 },
        Operation::ConfirmCancel,
    ];

    let mut model = ModelWorld::default();
    let mut real = RealWorld::new(ParamScope::PerScreen);
    let mut last = (OperationResult::Ok, OperationResult::Ok);
    for op in &ops {
        last = (model.apply(op), real.apply(op));
    }

    assert_eq!(last, (OperationResult::Rejected, OperationResult::Rejected));
    assert_eq!(model.observable_state(), real.observable_state());
}

#[test]
fn confirm_outside_booking_fails_in_both() {
    let op = Operation::ConfirmRide { tier: TierSlot(0) };

    let model_result = ModelWorld::default().apply(&op);
    let real_result = RealWorld::new(ParamScope::PerScreen).apply(&op);

    assert_eq!(model_result, OperationResult::Error(OperationError::NoBookingParams));
    assert_eq!(real_result, model_result);
}

#[test]
fn restart_on_return_matches_model() {
    let ops = [
        Operation::BookRide { pickup: AddressSlot(1), dropoff: AddressSlot(3) },
        Operation::ConfirmRide { tier: TierSlot(2) },
        Operation::AdvanceTime { millis: 9_000 },
        Operation::Navigate { screen: SimpleScreen::Driver },
        Operation::AdvanceTime { millis: 5_000 },
        Operation::Back,
        Operation::AdvanceTime { millis: 3_000 },
    ];

    let mut model = ModelWorld::default();
    let mut real = RealWorld::new(ParamScope::PerScreen);
    for op in &ops {
        assert_eq!(model.apply(op), real.apply(op), "divergence at {op:?}");
    }

    let state = real.observable_state();
    assert_eq!(state.ride.as_ref().map(|r| r.status_index), Some(0));
    assert_eq!(state.ride.as_ref().and_then(|r| r.driver_steps), Some(1));
    assert_eq!(model.observable_state(), state);
}
