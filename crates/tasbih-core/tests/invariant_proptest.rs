//! Property tests: `0 <= count <= target` holds under arbitrary operation
//! sequences, including failing writes and overlapping operations.

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use tasbih_core::feedback::RecordingBackend;
use tasbih_core::reminder::RecordingScheduler;
use tasbih_core::{
    FeedbackCoordinator, MemoryStore, PhraseCatalog, PhraseDefinition, SessionEngine,
    SessionSettings,
};

#[derive(Debug, Clone)]
enum Op {
    Increment,
    Reset,
    Select(usize),
    SetTarget(i64),
    ClearTarget,
    Sound(bool),
    Vibration(bool),
    FailWrites(bool),
    SlowWrites(bool),
    Flush,
    IncrementDuringReset,
    DoubleIncrement,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => Just(Op::Increment),
        1 => Just(Op::Reset),
        1 => (0usize..4).prop_map(Op::Select),
        2 => (-3i64..12).prop_map(Op::SetTarget),
        1 => Just(Op::ClearTarget),
        1 => any::<bool>().prop_map(Op::Sound),
        1 => any::<bool>().prop_map(Op::Vibration),
        1 => any::<bool>().prop_map(Op::FailWrites),
        1 => any::<bool>().prop_map(Op::SlowWrites),
        1 => Just(Op::Flush),
        1 => Just(Op::IncrementDuringReset),
        1 => Just(Op::DoubleIncrement),
    ]
}

fn catalog() -> Arc<PhraseCatalog> {
    Arc::new(
        PhraseCatalog::new(vec![
            PhraseDefinition::new("one", "One", "١", 3),
            PhraseDefinition::new("two", "Two", "٢", 1),
            PhraseDefinition::new("three", "Three", "٣", 5),
            PhraseDefinition::new("four", "Four", "٤", 2),
        ])
        .unwrap(),
    )
}

async fn apply(engine: &SessionEngine, store: &MemoryStore, op: &Op) {
    let ids = ["one", "two", "three", "four"];
    match op {
        Op::Increment => {
            engine.increment().await;
        }
        Op::Reset => {
            let _ = engine.reset().await;
        }
        Op::Select(i) => {
            let _ = engine.select_phrase(ids[*i]).await;
        }
        Op::SetTarget(n) => {
            let _ = engine.set_target(*n).await;
        }
        Op::ClearTarget => {
            let _ = engine.clear_target().await;
        }
        Op::Sound(on) => {
            engine.set_sound_enabled(*on).await;
        }
        Op::Vibration(on) => {
            engine.set_vibration_enabled(*on).await;
        }
        Op::FailWrites(fail) => store.set_fail_writes(*fail),
        Op::SlowWrites(slow) => {
            store.set_write_delay(slow.then(|| Duration::from_millis(40)));
        }
        Op::Flush => {
            let _ = engine.flush_preferences().await;
        }
        Op::IncrementDuringReset => {
            let _ = tokio::join!(engine.reset(), async {
                tokio::task::yield_now().await;
                engine.increment().await
            });
        }
        Op::DoubleIncrement => {
            tokio::join!(engine.increment(), async {
                tokio::task::yield_now().await;
                engine.increment().await
            });
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn count_never_exceeds_target(ops in prop::collection::vec(op(), 1..60)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();

        runtime.block_on(async {
            let store = Arc::new(MemoryStore::new());
            let engine = SessionEngine::new(
                catalog(),
                store.clone(),
                FeedbackCoordinator::new(Arc::new(RecordingBackend::new())),
                Arc::new(RecordingScheduler::new()),
                SessionSettings {
                    vibration_enabled: false,
                    sound_enabled: false,
                    transition_delay_ms: 250,
                    ..SessionSettings::default()
                },
            );
            engine.initialize().await;

            for op in &ops {
                apply(&engine, &store, op).await;
                let state = engine.state();
                assert!(
                    state.invariant_holds(),
                    "invariant broken after {op:?}: {state:?}"
                );
                assert!(engine.catalog().contains(&state.phrase_id));
                assert!(!engine.is_transitioning());
            }
            engine.shutdown();
        });
    }
}
