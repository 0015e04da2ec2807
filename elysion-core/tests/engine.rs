//! Synchronization engine behaviour against simulated panel hardware.

mod support;

use elysion_core::capture::CaptureLayer;
use elysion_core::config::{
    BoardConfig, ButtonSlot, ButtonWiring, ClampPolicy, EncoderConfig, FeatureSet, MatrixConfig,
    PadConfig, PanelConfig, SamplingMode,
};
use elysion_core::engine::SyncEngine;
use elysion_core::{BoardMap, ChangeEvent, EventKind, LogicalBoard};
use elysion_hal::PinMode;
use support::{trace_log, MockAdc, MockDelay, MockEncoder, MockIo, RecordingSink, Trace};

use LogicalBoard::*;

type Engine<'a> = SyncEngine<'a, MockIo, MockAdc, MockEncoder, MockDelay>;

fn button(board: LogicalBoard, value: i32) -> ChangeEvent {
    ChangeEvent::new(board, EventKind::Button, 0, value)
}

fn digital_button(pin: u8) -> BoardConfig {
    BoardConfig {
        features: FeatureSet::BUTTON,
        button: Some(ButtonWiring::Digital { pin, active_low: true }),
        ..BoardConfig::disabled()
    }
}

fn shared_button(pin: u8, slot: ButtonSlot) -> BoardConfig {
    BoardConfig {
        features: FeatureSet::BUTTON,
        button: Some(ButtonWiring::SharedAnalog { pin, slot }),
        ..BoardConfig::disabled()
    }
}

fn matrix_board(outputs: &[u8], inputs: &[u8]) -> BoardConfig {
    BoardConfig {
        features: FeatureSet::PAD_MATRIX,
        matrix: MatrixConfig::new(outputs, inputs),
        ..BoardConfig::disabled()
    }
}

fn encoder_board(encoder: EncoderConfig) -> BoardConfig {
    BoardConfig {
        features: FeatureSet::ENCODER,
        encoder: Some(encoder),
        ..BoardConfig::disabled()
    }
}

fn no_encoders() -> CaptureLayer<'static, MockEncoder> {
    CaptureLayer::new(BoardMap::filled(None))
}

fn engine<'a>(
    config: &'a PanelConfig,
    capture: &'a CaptureLayer<'a, MockEncoder>,
    io: &MockIo,
    adc: &MockAdc,
) -> Engine<'a> {
    assert_eq!(config.validate(), Ok(()));
    let delay = MockDelay { log: trace_log() };
    let mut engine = SyncEngine::new(config, capture, io.clone(), adc.clone(), delay);
    engine.start();
    engine
}

fn poll(engine: &mut Engine<'_>) -> Vec<ChangeEvent> {
    let mut sink = RecordingSink::default();
    engine.poll(&mut sink);
    sink.events
}

#[test]
fn button_press_and_release_report_once() {
    let mut config = PanelConfig::default();
    config.boards[L1] = digital_button(2);
    let (io, adc, capture) = (MockIo::default(), MockAdc::default(), no_encoders());
    let mut engine = engine(&config, &capture, &io, &adc);

    assert_eq!(io.mode(2), Some(PinMode::InputPullUp));
    assert!(poll(&mut engine).is_empty());

    io.set(2, false);
    assert_eq!(poll(&mut engine), vec![button(L1, 1)]);
    for _ in 0..5 {
        assert!(poll(&mut engine).is_empty());
    }

    io.set(2, true);
    assert_eq!(poll(&mut engine), vec![button(L1, 0)]);
}

#[test]
fn inputs_held_at_start_are_not_reported() {
    let mut config = PanelConfig::default();
    config.boards[L1] = digital_button(2);
    config.boards[R1] = BoardConfig {
        features: FeatureSet::TOUCH,
        touch_pin: Some(5),
        ..BoardConfig::disabled()
    };
    let (io, adc, capture) = (MockIo::default(), MockAdc::default(), no_encoders());
    io.set(2, false);
    io.set(5, true);

    let mut engine = engine(&config, &capture, &io, &adc);
    assert!(poll(&mut engine).is_empty());

    io.set(5, false);
    assert_eq!(
        poll(&mut engine),
        vec![ChangeEvent::new(R1, EventKind::Touch, 0, 0)]
    );
}

#[test]
fn shared_line_decodes_both_boards_from_one_sample() {
    let mut config = PanelConfig::default();
    config.boards[L1] = shared_button(26, ButtonSlot::First);
    config.boards[R1] = shared_button(26, ButtonSlot::Second);
    let (io, adc, capture) = (MockIo::default(), MockAdc::default(), no_encoders());
    adc.set(26, 1023);
    let mut engine = engine(&config, &capture, &io, &adc);

    adc.set(26, 583 + 10);
    let before = adc.samples.get();
    assert_eq!(poll(&mut engine), vec![button(L1, 1), button(R1, 1)]);
    assert_eq!(adc.samples.get() - before, 1);

    adc.set(26, 485 - 10);
    assert_eq!(poll(&mut engine), vec![button(R1, 0)]);

    adc.set(26, 700);
    assert_eq!(poll(&mut engine), vec![button(L1, 0)]);
}

#[test]
fn matrix_reports_only_changed_keys() {
    let mut config = PanelConfig::default();
    config.boards[L2] = matrix_board(&[10, 11, 12], &[13, 14, 15]);
    let (io, adc, capture) = (MockIo::default(), MockAdc::default(), no_encoders());

    // Output 0 starts with input 2 held: {0, 0, 1}
    io.press_key(10, 15);
    let mut engine = engine(&config, &capture, &io, &adc);
    assert_eq!(io.mode(10), Some(PinMode::Output));
    assert_eq!(io.mode(13), Some(PinMode::InputPullUp));

    // Now {1, 0, 1}
    io.press_key(10, 13);
    assert_eq!(poll(&mut engine), vec![button(L2, 1)]);

    io.press_key(11, 14);
    assert_eq!(
        poll(&mut engine),
        vec![ChangeEvent::new(L2, EventKind::Button, 4, 1)]
    );

    io.release_key(10, 15);
    assert_eq!(
        poll(&mut engine),
        vec![ChangeEvent::new(L2, EventKind::Button, 2, 0)]
    );
}

#[test]
fn matrix_drives_one_output_at_a_time() {
    let mut config = PanelConfig::default();
    config.boards[R1] = matrix_board(&[10, 11], &[13]);
    let (io, adc, capture) = (MockIo::default(), MockAdc::default(), no_encoders());
    let log = trace_log();
    let mut engine = SyncEngine::new(&config, &capture, io.clone(), adc, MockDelay { log: log.clone() });
    engine.start();

    io.state.borrow_mut().writes.clear();
    log.borrow_mut().clear();
    poll(&mut engine);

    assert_eq!(
        io.state.borrow().writes,
        vec![(10, false), (10, true), (11, false), (11, true)]
    );
    assert_eq!(*log.borrow(), vec![Trace::DelayUs(10_000), Trace::DelayUs(10_000)]);
    assert!(io.state.borrow().driven_low.is_empty());
}

#[test]
fn pads_report_per_pad_index() {
    let mut config = PanelConfig::default();
    config.boards[R1] = BoardConfig {
        features: FeatureSet::PADS,
        pads: Some(PadConfig {
            pins: [20, 21, 22, 23],
            active_low: true,
        }),
        ..BoardConfig::disabled()
    };
    let (io, adc, capture) = (MockIo::default(), MockAdc::default(), no_encoders());
    let mut engine = engine(&config, &capture, &io, &adc);

    io.set(22, false);
    io.set(20, false);
    assert_eq!(
        poll(&mut engine),
        vec![
            ChangeEvent::new(R1, EventKind::Button, 0, 1),
            ChangeEvent::new(R1, EventKind::Button, 2, 1),
        ]
    );
}

#[test]
fn absolute_encoder_is_clamped_and_written_back() {
    let mut config = PanelConfig::default();
    config.boards[M2] =
        encoder_board(EncoderConfig::absolute(6, 7, 0, 127, ClampPolicy::Saturate));
    let encoder = MockEncoder::default();
    let mut encoders = BoardMap::filled(None);
    encoders[M2] = Some(&encoder);
    let capture = CaptureLayer::new(encoders);
    let (io, adc) = (MockIo::default(), MockAdc::default());
    let mut engine = engine(&config, &capture, &io, &adc);

    encoder.position.set(130);
    assert_eq!(
        poll(&mut engine),
        vec![ChangeEvent::new(M2, EventKind::Position, 0, 127)]
    );
    assert_eq!(*encoder.writes.borrow(), vec![127]);
    assert_eq!(engine.encoder_position(M2), Some(127));

    encoder.position.set(131);
    assert!(poll(&mut engine).is_empty());
}

#[test]
fn wrapping_encoder_jumps_to_opposite_bound() {
    let mut config = PanelConfig::default();
    config.boards[M1] = encoder_board(EncoderConfig::absolute(6, 7, 0, 127, ClampPolicy::Wrap));
    let encoder = MockEncoder::default();
    encoder.position.set(120);
    let mut encoders = BoardMap::filled(None);
    encoders[M1] = Some(&encoder);
    let capture = CaptureLayer::new(encoders);
    let (io, adc) = (MockIo::default(), MockAdc::default());
    let mut engine = engine(&config, &capture, &io, &adc);

    encoder.position.set(130);
    assert_eq!(
        poll(&mut engine),
        vec![ChangeEvent::new(M1, EventKind::Position, 0, 0)]
    );
    assert_eq!(*encoder.writes.borrow(), vec![0]);
}

#[test]
fn potentiometer_reports_seven_bit_position() {
    let mut config = PanelConfig::default();
    config.boards[R2] = BoardConfig {
        features: FeatureSet::POTENTIOMETER,
        pot_pin: Some(27),
        ..BoardConfig::disabled()
    };
    let (io, adc, capture) = (MockIo::default(), MockAdc::default(), no_encoders());
    adc.set(27, 0);
    let mut engine = engine(&config, &capture, &io, &adc);
    assert!(poll(&mut engine).is_empty());

    adc.set(27, 512);
    assert_eq!(
        poll(&mut engine),
        vec![ChangeEvent::new(R2, EventKind::Position, 0, 64)]
    );

    adc.set(27, 520);
    assert!(poll(&mut engine).is_empty());
}

#[test]
fn capabilities_are_reported_in_fixed_order() {
    let mut config = PanelConfig::default();
    config.boards[L2] = matrix_board(&[10], &[13]);
    config.boards[L1] = digital_button(2);
    config.boards[M1] = BoardConfig {
        features: FeatureSet::TOUCH,
        touch_pin: Some(5),
        ..BoardConfig::disabled()
    };
    config.boards[M2] = encoder_board(EncoderConfig::relative(6, 7));
    config.boards[R1] = BoardConfig {
        features: FeatureSet::PADS,
        pads: Some(PadConfig {
            pins: [20, 21, 22, 23],
            active_low: true,
        }),
        ..BoardConfig::disabled()
    };
    let encoder = MockEncoder::default();
    let mut encoders = BoardMap::filled(None);
    encoders[M2] = Some(&encoder);
    let capture = CaptureLayer::new(encoders);
    let (io, adc) = (MockIo::default(), MockAdc::default());
    let mut engine = engine(&config, &capture, &io, &adc);

    encoder.direction.set(-1);
    io.set(21, false);
    io.set(5, true);
    io.set(2, false);
    io.press_key(10, 13);

    assert_eq!(
        poll(&mut engine),
        vec![
            ChangeEvent::new(L2, EventKind::Button, 0, 1),
            button(L1, 1),
            ChangeEvent::new(M1, EventKind::Touch, 0, 1),
            ChangeEvent::new(R1, EventKind::Button, 1, 1),
            ChangeEvent::new(M2, EventKind::EncoderDelta, 0, -1),
        ]
    );
}

#[test]
fn interrupt_sampling_reads_the_capture_cache() {
    let mut config = PanelConfig::default();
    config.boards[L1] = digital_button(2);
    config.sampling = SamplingMode::Interrupt;
    let (io, adc, capture) = (MockIo::default(), MockAdc::default(), no_encoders());
    capture.on_port_sample(1 << 2);
    let mut engine = engine(&config, &capture, &io, &adc);

    let reads = io.state.borrow().reads;
    io.set(2, false);
    assert!(poll(&mut engine).is_empty());
    assert_eq!(io.state.borrow().reads, reads);

    capture.on_port_sample(0);
    assert_eq!(poll(&mut engine), vec![button(L1, 1)]);
}

#[test]
fn interrupt_sampling_primes_from_the_port_before_the_first_capture() {
    let mut config = PanelConfig::default();
    config.boards[L1] = digital_button(2);
    config.sampling = SamplingMode::Interrupt;
    let (io, adc, capture) = (MockIo::default(), MockAdc::default(), no_encoders());
    let mut engine = engine(&config, &capture, &io, &adc);
    assert!(!capture.cache().take_fresh());

    // Released button, pull-up high: no phantom release on the first capture
    let reads = io.state.borrow().reads;
    assert!(poll(&mut engine).is_empty());
    capture.on_port_sample(1 << 2);
    assert!(poll(&mut engine).is_empty());
    assert_eq!(io.state.borrow().reads, reads);

    capture.on_port_sample(0);
    assert_eq!(poll(&mut engine), vec![button(L1, 1)]);
    assert!(poll(&mut engine).is_empty());
}

#[test]
fn disabled_feature_is_never_sampled() {
    let mut config = PanelConfig::default();
    config.boards[M1] = BoardConfig {
        features: FeatureSet::empty(),
        pot_pin: Some(27),
        button: Some(ButtonWiring::Digital { pin: 2, active_low: true }),
        ..BoardConfig::disabled()
    };
    let (io, adc, capture) = (MockIo::default(), MockAdc::default(), no_encoders());
    let mut engine = engine(&config, &capture, &io, &adc);

    adc.set(27, 512);
    io.set(2, false);
    assert!(poll(&mut engine).is_empty());
    assert_eq!(adc.samples.get(), 0);
    assert_eq!(io.mode(2), None);
}
