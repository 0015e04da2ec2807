//! Input synchronization engine
//!
//! Once per polling cycle the engine samples every enabled input, compares
//! it with the previous pass and hands one [`ChangeEvent`] per changed input
//! to an [`EventSink`]. The order within a cycle is fixed:
//!
//! 1. Matrix scan
//! 2. Buttons
//! 3. Touch
//! 4. Pads
//! 5. Encoders and potentiometers
//!
//! Boards are visited in declaration order within each step.

pub mod diff;
pub mod encoder;
pub mod matrix;
pub mod pot;

use elysion_hal::{AnalogInput, DigitalIo, PinMode};
use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::board::{BoardMap, LogicalBoard, BOARD_COUNT};
use crate::capture::{pin_level, CaptureLayer};
use crate::config::{ButtonPair, ButtonWiring, PanelConfig, SamplingMode, MAX_MATRIX_LINES};
use crate::event::{ChangeEvent, EventKind};
use crate::traits::{EncoderDriver, EventSink};

pub use diff::{BitChanges, Shadow};
pub use encoder::EncoderChannel;
pub use matrix::MatrixShadow;
pub use pot::{PotChannel, POT_CHANGE_THRESHOLD};

/// The synchronization engine
///
/// Owns the pins it samples and all main-loop state. Only one engine should
/// exist per device; the firmware entry point constructs it once.
pub struct SyncEngine<'a, IO, ADC, E, D> {
    config: &'a PanelConfig,
    capture: &'a CaptureLayer<'a, E>,
    io: IO,
    adc: ADC,
    delay: D,
    /// Port word the digital shadows were last computed from
    levels: u32,
    buttons: Shadow,
    touch: Shadow,
    pads: BoardMap<Shadow>,
    matrix: BoardMap<MatrixShadow>,
    encoders: BoardMap<Option<EncoderChannel>>,
    pots: BoardMap<PotChannel>,
}

impl<'a, IO, ADC, E, D> SyncEngine<'a, IO, ADC, E, D>
where
    IO: DigitalIo,
    ADC: AnalogInput,
    E: EncoderDriver,
    D: DelayNs,
{
    /// Create an engine for a validated configuration
    pub fn new(
        config: &'a PanelConfig,
        capture: &'a CaptureLayer<'a, E>,
        io: IO,
        adc: ADC,
        delay: D,
    ) -> Self {
        Self {
            config,
            capture,
            io,
            adc,
            delay,
            levels: 0,
            buttons: Shadow::new(),
            touch: Shadow::new(),
            pads: BoardMap::filled(Shadow::new()),
            matrix: BoardMap::filled([0; MAX_MATRIX_LINES]),
            encoders: BoardMap::from_fn(|board| {
                config.board(board).encoder().copied().map(EncoderChannel::new)
            }),
            pots: BoardMap::filled(PotChannel::new()),
        }
    }

    /// Configure pins and take the initial snapshot
    ///
    /// Inputs already active at power-on are absorbed into the snapshot
    /// and not reported.
    pub fn start(&mut self) {
        self.configure_pins();

        let levels = self.prime_levels();
        let buttons = self.sample_buttons(levels);
        self.buttons.prime(buttons);
        let touch = self.sample_touch(levels);
        self.touch.prime(touch);
        for board in LogicalBoard::ALL {
            let pads = self.sample_pads(board, levels);
            self.pads[board].prime(pads);
        }

        let config = self.config;
        for (board, board_config) in config.boards.iter() {
            if let Some(matrix) = board_config.matrix() {
                matrix::scan(
                    &mut self.io,
                    &mut self.delay,
                    config.matrix_settle_us,
                    matrix,
                    &mut self.matrix[board],
                    |_, _| {},
                );
            }
            if let (Some(channel), Some(driver)) =
                (self.encoders[board].as_mut(), self.capture.encoder(board))
            {
                channel.prime(driver);
            }
        }

        info!(
            "engine started: buttons={=u8:b} touch={=u8:b}",
            self.buttons.current(),
            self.touch.current()
        );
    }

    /// Run one polling cycle
    pub fn poll<S: EventSink>(&mut self, sink: &mut S) {
        let levels = self.refresh();

        self.scan_matrices(sink);
        self.diff_buttons(levels, sink);
        self.diff_touch(levels, sink);
        self.diff_pads(levels, sink);
        self.decode_positions(sink);
    }

    /// Panel configuration the engine was built for
    pub fn config(&self) -> &'a PanelConfig {
        self.config
    }

    /// Last reported absolute position of a board's encoder
    pub fn encoder_position(&self, board: LogicalBoard) -> Option<i32> {
        self.encoders[board].as_ref().map(EncoderChannel::position)
    }

    /// Tear down into the owned collaborators
    pub fn release(self) -> (IO, ADC, D) {
        (self.io, self.adc, self.delay)
    }

    fn configure_pins(&mut self) {
        for (board, config) in self.config.boards.iter() {
            if let Some(encoder) = config.encoder() {
                self.io.configure(encoder.pin_a, PinMode::InputPullUp);
                self.io.configure(encoder.pin_b, PinMode::InputPullUp);
            }
            match config.button() {
                Some(&ButtonWiring::Digital { pin, active_low }) => {
                    self.io.configure(pin, input_mode(active_low));
                }
                Some(&ButtonWiring::SharedAnalog { pin, .. }) => {
                    self.io.configure(pin, PinMode::Input);
                }
                None => {}
            }
            if let Some(pin) = config.pot_pin() {
                self.io.configure(pin, PinMode::Input);
            }
            if let Some(pin) = config.touch_pin() {
                self.io.configure(pin, PinMode::Input);
            }
            if let Some(pads) = config.pads() {
                for &pin in &pads.pins {
                    self.io.configure(pin, input_mode(pads.active_low));
                }
            }
            if let Some(matrix) = config.matrix() {
                for &pin in &matrix.outputs {
                    self.io.configure(pin, PinMode::Output);
                    self.io.write(pin, true);
                }
                for &pin in &matrix.inputs {
                    self.io.configure(pin, PinMode::InputPullUp);
                }
            }
            debug!("board {} pins configured: {}", board, config.features);
        }
    }

    /// Port word for the start-up snapshot
    ///
    /// Interrupt sampling may not have stored anything yet; the port is then
    /// read directly so the snapshot never starts from an empty cache.
    fn prime_levels(&mut self) -> u32 {
        let cache = self.capture.cache();
        self.levels = match self.config.sampling {
            SamplingMode::Interrupt if cache.take_fresh() => cache.levels(),
            SamplingMode::Interrupt => self.sample_port(),
            SamplingMode::Poll => {
                let levels = self.sample_port();
                cache.store(levels);
                levels
            }
        };
        self.levels
    }

    /// Latest digital levels, sampled now or taken from the capture cache
    ///
    /// In interrupt sampling the previous word is kept until the capture
    /// side stores a new one.
    fn refresh(&mut self) -> u32 {
        let cache = self.capture.cache();
        match self.config.sampling {
            SamplingMode::Interrupt => {
                if cache.take_fresh() {
                    self.levels = cache.levels();
                }
            }
            SamplingMode::Poll => {
                self.levels = self.sample_port();
                cache.store(self.levels);
            }
        }
        self.levels
    }

    fn sample_port(&mut self) -> u32 {
        let mut levels = 0u32;
        let mut sample = |io: &mut IO, pin: u8| {
            if io.read(pin) {
                levels |= 1u32.checked_shl(pin as u32).unwrap_or(0);
            }
        };

        for (_, config) in self.config.boards.iter() {
            if let Some(&ButtonWiring::Digital { pin, .. }) = config.button() {
                sample(&mut self.io, pin);
            }
            if let Some(pin) = config.touch_pin() {
                sample(&mut self.io, pin);
            }
            if let Some(pads) = config.pads() {
                for &pin in &pads.pins {
                    sample(&mut self.io, pin);
                }
            }
        }
        levels
    }

    /// Logical pressed bits of every button (bit = board index)
    ///
    /// Each shared analog line is sampled once, however many boards use it.
    fn sample_buttons(&mut self, levels: u32) -> u8 {
        let mut shared: Vec<(u8, ButtonPair), BOARD_COUNT> = Vec::new();
        let mut snapshot = 0u8;

        for (board, config) in self.config.boards.iter() {
            let pressed = match config.button() {
                Some(&ButtonWiring::Digital { pin, active_low }) => {
                    pin_level(levels, pin) != active_low
                }
                Some(&ButtonWiring::SharedAnalog { pin, slot }) => {
                    let pair = match shared.iter().find(|(p, _)| *p == pin) {
                        Some(&(_, pair)) => pair,
                        None => {
                            let pair = self.config.calibration.decode(self.adc.read_analog(pin));
                            // At most one entry per board, so this cannot overflow
                            let _ = shared.push((pin, pair));
                            pair
                        }
                    };
                    pair.get(slot)
                }
                None => false,
            };
            if pressed {
                snapshot |= board.mask();
            }
        }
        snapshot
    }

    fn sample_touch(&self, levels: u32) -> u8 {
        self.config
            .boards
            .iter()
            .filter(|(_, config)| config.touch_pin().is_some_and(|pin| pin_level(levels, pin)))
            .fold(0, |snapshot, (board, _)| snapshot | board.mask())
    }

    fn sample_pads(&self, board: LogicalBoard, levels: u32) -> u8 {
        let Some(pads) = self.config.board(board).pads() else {
            return 0;
        };
        pads.pins
            .iter()
            .enumerate()
            .filter(|(_, pin)| pin_level(levels, **pin) != pads.active_low)
            .fold(0, |snapshot, (index, _)| snapshot | (1 << index))
    }

    fn scan_matrices<S: EventSink>(&mut self, sink: &mut S) {
        let config = self.config;
        for (board, board_config) in config.boards.iter() {
            let Some(matrix) = board_config.matrix() else {
                continue;
            };
            matrix::scan(
                &mut self.io,
                &mut self.delay,
                config.matrix_settle_us,
                matrix,
                &mut self.matrix[board],
                |index, pressed| {
                    emit(sink, ChangeEvent::new(board, EventKind::Button, index, pressed as i32))
                },
            );
        }
    }

    fn diff_buttons<S: EventSink>(&mut self, levels: u32, sink: &mut S) {
        let snapshot = self.sample_buttons(levels);
        for (bit, pressed) in self.buttons.update(snapshot) {
            if let Some(board) = LogicalBoard::from_index(bit as usize) {
                emit(sink, ChangeEvent::new(board, EventKind::Button, 0, pressed as i32));
            }
        }
    }

    fn diff_touch<S: EventSink>(&mut self, levels: u32, sink: &mut S) {
        let snapshot = self.sample_touch(levels);
        for (bit, touched) in self.touch.update(snapshot) {
            if let Some(board) = LogicalBoard::from_index(bit as usize) {
                emit(sink, ChangeEvent::new(board, EventKind::Touch, 0, touched as i32));
            }
        }
    }

    fn diff_pads<S: EventSink>(&mut self, levels: u32, sink: &mut S) {
        for board in LogicalBoard::ALL {
            let snapshot = self.sample_pads(board, levels);
            for (pad, pressed) in self.pads[board].update(snapshot) {
                emit(sink, ChangeEvent::new(board, EventKind::Button, pad, pressed as i32));
            }
        }
    }

    /// Encoders first; a board without an encoder may report a potentiometer
    fn decode_positions<S: EventSink>(&mut self, sink: &mut S) {
        let config = self.config;
        for (board, board_config) in config.boards.iter() {
            if let (Some(channel), Some(driver)) =
                (self.encoders[board].as_mut(), self.capture.encoder(board))
            {
                if let Some((kind, value)) = channel.poll(driver) {
                    emit(sink, ChangeEvent::new(board, kind, 0, value));
                }
            } else if let Some(pin) = board_config.pot_pin() {
                let reading = self.adc.read_analog(pin);
                if let Some(position) = self.pots[board].update(reading) {
                    emit(sink, ChangeEvent::new(board, EventKind::Position, 0, position as i32));
                }
            }
        }
    }
}

fn input_mode(active_low: bool) -> PinMode {
    if active_low {
        PinMode::InputPullUp
    } else {
        PinMode::Input
    }
}

fn emit<S: EventSink>(sink: &mut S, event: ChangeEvent) {
    trace!("change {}", event);
    sink.on_change(event);
}
