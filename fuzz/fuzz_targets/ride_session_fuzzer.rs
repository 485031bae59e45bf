//! Fuzz target for the application coordinator
//!
//! # Strategy
//!
//! - Arbitrary operation sequences against an App on the virtual clock
//! - Clock advances interleaved with navigation and cancellation
//!
//! # Invariants
//!
//! - Every standard invariant holds after every operation
//! - No operation panics, whatever state the App is in

#![no_main]

use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use ridehail_app::{App, AppConfig};
use ridehail_core::{NavigationConfig, ParamScope};
use ridehail_harness::{InvariantRegistry, Operation, SimEnv, SnapshotRecorder};

fuzz_target!(|input: (bool, Vec<Operation>)| {
    let (per_entry, ops) = input;
    let scope = if per_entry { ParamScope::PerEntry } else { ParamScope::PerScreen };

    let env = SimEnv::new();
    let config = AppConfig {
        navigation: NavigationConfig { param_scope: scope },
        ..AppConfig::default()
    };
    let mut app = App::new(env.clone(), config);
    let mut recorder = SnapshotRecorder::new();
    let invariants = InvariantRegistry::standard();

    for op in ops.iter().take(256) {
        if let Operation::AdvanceTime { millis } = op {
            env.advance(Duration::from_millis(u64::from(*millis)));
        }
        app.handle(op.event());

        let snapshot = recorder.observe(&app);
        invariants.assert_all(&snapshot, &format!("after {op:?}"));
    }
});
