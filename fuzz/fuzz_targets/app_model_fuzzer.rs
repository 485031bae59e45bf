//! Fuzz target comparing the App against the reference model
//!
//! # Strategy
//!
//! - Same operation sequence applied to `ModelWorld` and a real App
//!
//! # Invariants
//!
//! - Operation results match
//! - Observable state matches after every operation

#![no_main]

use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use ridehail_app::{App, AppConfig};
use ridehail_core::{NavigationConfig, ParamScope};
use ridehail_harness::{ModelWorld, ObservableState, Operation, OperationResult, SimEnv};

fuzz_target!(|input: (bool, Vec<Operation>)| {
    let (per_entry, ops) = input;
    let scope = if per_entry { ParamScope::PerEntry } else { ParamScope::PerScreen };

    let env = SimEnv::new();
    let config = AppConfig {
        navigation: NavigationConfig { param_scope: scope },
        ..AppConfig::default()
    };
    let mut app = App::new(env.clone(), config);
    let mut model = ModelWorld::new(scope);

    for (i, op) in ops.iter().take(256).enumerate() {
        if let Operation::AdvanceTime { millis } = op {
            env.advance(Duration::from_millis(u64::from(*millis)));
        }
        let real = OperationResult::from_actions(&app.handle(op.event()));
        let expected = model.apply(op);
        assert_eq!(real, expected, "result divergence at operation {i}: {op:?}");

        let observed = ObservableState::from_app(&app, &app.config().ride);
        assert_eq!(observed, model.observable_state(), "state divergence at operation {i}: {op:?}");
    }
});
