//! Property tests for the diff-and-dispatch invariants.

mod support;

use proptest::prelude::*;

use elysion_core::capture::CaptureLayer;
use elysion_core::config::{BoardConfig, ButtonWiring, FeatureSet, PanelConfig};
use elysion_core::engine::SyncEngine;
use elysion_core::{BoardMap, EventKind, LogicalBoard, BOARD_COUNT};
use support::{trace_log, MockAdc, MockDelay, MockEncoder, MockIo, RecordingSink};

/// Digital button on every board, pin = 2 + board index, active-low
fn all_buttons() -> PanelConfig {
    let mut config = PanelConfig::default();
    for board in LogicalBoard::ALL {
        config.boards[board] = BoardConfig {
            features: FeatureSet::BUTTON,
            button: Some(ButtonWiring::Digital {
                pin: button_pin(board),
                active_low: true,
            }),
            ..BoardConfig::disabled()
        };
    }
    config
}

fn button_pin(board: LogicalBoard) -> u8 {
    2 + board.index() as u8
}

fn apply(io: &MockIo, pressed: u8) {
    for board in LogicalBoard::ALL {
        io.set(button_pin(board), pressed & board.mask() == 0);
    }
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(200))]

    /// Every bit flip between consecutive samples produces exactly one event
    /// carrying the new value, and nothing else is reported.
    #[test]
    fn prop_events_match_bit_transitions(
        samples in proptest::collection::vec(0u8..(1 << BOARD_COUNT), 1..40),
    ) {
        let config = all_buttons();
        let capture: CaptureLayer<MockEncoder> = CaptureLayer::new(BoardMap::filled(None));
        let io = MockIo::default();
        let mut engine = SyncEngine::new(
            &config,
            &capture,
            io.clone(),
            MockAdc::default(),
            MockDelay { log: trace_log() },
        );
        engine.start();

        let mut previous = 0u8;
        for &sample in &samples {
            apply(&io, sample);
            let mut sink = RecordingSink::default();
            engine.poll(&mut sink);

            let changed = previous ^ sample;
            prop_assert_eq!(sink.events.len(), changed.count_ones() as usize);
            for event in &sink.events {
                prop_assert_eq!(event.kind, EventKind::Button);
                prop_assert!(changed & event.board.mask() != 0);
                prop_assert_eq!(event.value, (sample & event.board.mask() != 0) as i32);
            }
            previous = sample;
        }
    }

    /// Repeating a sample never reports anything after the first poll.
    #[test]
    fn prop_stable_input_is_silent(sample in 0u8..(1 << BOARD_COUNT), repeats in 1usize..10) {
        let config = all_buttons();
        let capture: CaptureLayer<MockEncoder> = CaptureLayer::new(BoardMap::filled(None));
        let io = MockIo::default();
        let mut engine = SyncEngine::new(
            &config,
            &capture,
            io.clone(),
            MockAdc::default(),
            MockDelay { log: trace_log() },
        );
        engine.start();

        apply(&io, sample);
        engine.poll(&mut RecordingSink::default());
        for _ in 0..repeats {
            let mut sink = RecordingSink::default();
            engine.poll(&mut sink);
            prop_assert!(sink.events.is_empty());
        }
    }
}
