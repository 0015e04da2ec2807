//! Panel configuration
//!
//! Board revisions differ only in data: which features each board has and
//! which pins they use. The firmware builds a [`PanelConfig`] from a
//! built-in revision table (or a postcard override in flash) and validates
//! it once before the engine starts.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use elysion_protocol::MAX_INPUT_INDEX;

use super::calibration::{ButtonSlot, DualButtonCalibration};
use super::features::FeatureSet;
use crate::board::{BoardMap, LogicalBoard};

/// Current configuration layout version
pub const CONFIG_VERSION: u8 = 2;

/// Maximum output or input lines on one matrix
pub const MAX_MATRIX_LINES: usize = 8;

/// Width of the digital port sample; pins read from it must be below this
pub const PORT_WIDTH: u8 = 32;

/// Number of plain digital pads per board
pub const PAD_COUNT: usize = 4;

/// Default settle time after driving a matrix output
pub const DEFAULT_MATRIX_SETTLE_US: u32 = 10_000;

/// Encoder reporting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EncoderMode {
    /// Report each detent as a signed tick
    #[default]
    Relative,
    /// Track and report a bounded position
    Absolute,
}

/// What happens when an absolute position leaves its bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClampPolicy {
    /// Stop at the nearest bound
    #[default]
    Saturate,
    /// Jump to the opposite bound
    Wrap,
}

/// Rotary encoder wiring and decode parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EncoderConfig {
    pub pin_a: u8,
    pub pin_b: u8,
    pub mode: EncoderMode,
    /// +1 or -1, corrects mirrored wiring
    pub direction: i8,
    pub clamp: ClampPolicy,
    pub min: i32,
    pub max: i32,
}

impl EncoderConfig {
    /// Relative encoder with default direction
    pub const fn relative(pin_a: u8, pin_b: u8) -> Self {
        Self {
            pin_a,
            pin_b,
            mode: EncoderMode::Relative,
            direction: 1,
            clamp: ClampPolicy::Saturate,
            min: 0,
            max: 127,
        }
    }

    /// Absolute encoder over `[min, max]`
    pub const fn absolute(pin_a: u8, pin_b: u8, min: i32, max: i32, clamp: ClampPolicy) -> Self {
        Self {
            pin_a,
            pin_b,
            mode: EncoderMode::Absolute,
            direction: 1,
            clamp,
            min,
            max,
        }
    }

    /// Flip the direction multiplier
    pub const fn reversed(mut self) -> Self {
        self.direction = -self.direction;
        self
    }
}

/// How a board's push button is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ButtonWiring {
    /// Dedicated digital pin
    Digital { pin: u8, active_low: bool },
    /// One of two buttons on a shared analog divider
    SharedAnalog { pin: u8, slot: ButtonSlot },
}

/// Four plain digital pads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PadConfig {
    pub pins: [u8; PAD_COUNT],
    pub active_low: bool,
}

/// Button matrix lines
///
/// Outputs are driven low one at a time; inputs are pulled up and read low
/// when a key on the driven output is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatrixConfig {
    pub outputs: Vec<u8, MAX_MATRIX_LINES>,
    pub inputs: Vec<u8, MAX_MATRIX_LINES>,
}

impl MatrixConfig {
    /// Build from pin slices, `None` if either side is too long
    pub fn new(outputs: &[u8], inputs: &[u8]) -> Option<Self> {
        Some(Self {
            outputs: Vec::from_slice(outputs).ok()?,
            inputs: Vec::from_slice(inputs).ok()?,
        })
    }

    /// Event input index of a key
    pub fn key_index(&self, output: usize, input: usize) -> u8 {
        (self.inputs.len() * output + input) as u8
    }

    /// Number of distinct key indices
    pub fn key_count(&self) -> usize {
        self.outputs.len() * self.inputs.len()
    }
}

/// Run of LEDs one board owns on a chain
///
/// Boards that share a chain own disjoint runs; LED positions handed to the
/// indicator bank count from `first`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LedRange {
    pub chain: u8,
    /// Chain position of the board's first LED
    pub first: u8,
    pub count: u8,
}

impl LedRange {
    pub const fn new(chain: u8, first: u8, count: u8) -> Self {
        Self { chain, first, count }
    }

    /// Chain position one past the board's last LED
    fn end(&self) -> u16 {
        u16::from(self.first) + u16::from(self.count)
    }

    fn overlaps(&self, other: &LedRange) -> bool {
        self.chain == other.chain
            && u16::from(self.first) < other.end()
            && u16::from(other.first) < self.end()
    }
}

/// Everything wired on one logical board
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    pub features: FeatureSet,
    pub encoder: Option<EncoderConfig>,
    pub button: Option<ButtonWiring>,
    pub pot_pin: Option<u8>,
    /// Active-high touch sensor output
    pub touch_pin: Option<u8>,
    pub pads: Option<PadConfig>,
    pub matrix: Option<MatrixConfig>,
    /// LEDs this board's indicators live on
    pub indicators: Option<LedRange>,
}

impl BoardConfig {
    /// A board with nothing enabled
    pub const fn disabled() -> Self {
        Self {
            features: FeatureSet::empty(),
            encoder: None,
            button: None,
            pot_pin: None,
            touch_pin: None,
            pads: None,
            matrix: None,
            indicators: None,
        }
    }

    pub fn has(&self, feature: FeatureSet) -> bool {
        self.features.contains(feature)
    }

    /// Enabled encoder config
    pub fn encoder(&self) -> Option<&EncoderConfig> {
        self.encoder.as_ref().filter(|_| self.has(FeatureSet::ENCODER))
    }

    /// Enabled button wiring
    pub fn button(&self) -> Option<&ButtonWiring> {
        self.button.as_ref().filter(|_| self.has(FeatureSet::BUTTON))
    }

    /// Enabled potentiometer pin
    pub fn pot_pin(&self) -> Option<u8> {
        self.pot_pin.filter(|_| self.has(FeatureSet::POTENTIOMETER))
    }

    /// Enabled touch pin
    pub fn touch_pin(&self) -> Option<u8> {
        self.touch_pin.filter(|_| self.has(FeatureSet::TOUCH))
    }

    /// Enabled pads
    pub fn pads(&self) -> Option<&PadConfig> {
        self.pads.as_ref().filter(|_| self.has(FeatureSet::PADS))
    }

    /// Enabled matrix
    pub fn matrix(&self) -> Option<&MatrixConfig> {
        self.matrix.as_ref().filter(|_| self.has(FeatureSet::PAD_MATRIX))
    }

    /// Enabled indicator LEDs
    pub fn indicators(&self) -> Option<LedRange> {
        self.indicators.filter(|_| self.has(FeatureSet::INDICATOR))
    }

    fn validate(&self, board: LogicalBoard) -> Result<(), ConfigError> {
        let missing = |feature| ConfigError::MissingPin(board, feature);

        if self.has(FeatureSet::ENCODER) {
            let encoder = self.encoder.as_ref().ok_or(missing(FeatureSet::ENCODER))?;
            if encoder.min > encoder.max {
                return Err(ConfigError::InvalidBounds(board));
            }
            if encoder.direction != 1 && encoder.direction != -1 {
                return Err(ConfigError::InvalidDirection(board));
            }
        }
        if self.has(FeatureSet::BUTTON) {
            match self.button.as_ref().ok_or(missing(FeatureSet::BUTTON))? {
                ButtonWiring::Digital { pin, .. } => port_pin(*pin)?,
                ButtonWiring::SharedAnalog { .. } => {}
            }
        }
        if self.has(FeatureSet::POTENTIOMETER) && self.pot_pin.is_none() {
            return Err(missing(FeatureSet::POTENTIOMETER));
        }
        if self.has(FeatureSet::TOUCH) {
            port_pin(self.touch_pin.ok_or(missing(FeatureSet::TOUCH))?)?;
        }
        if self.has(FeatureSet::PADS) {
            let pads = self.pads.as_ref().ok_or(missing(FeatureSet::PADS))?;
            for pin in pads.pins {
                port_pin(pin)?;
            }
        }
        if self.has(FeatureSet::INDICATOR) {
            let leds = self.indicators.ok_or(missing(FeatureSet::INDICATOR))?;
            if leds.count == 0 {
                return Err(missing(FeatureSet::INDICATOR));
            }
        }
        if self.has(FeatureSet::PAD_MATRIX) {
            let matrix = self.matrix.as_ref().ok_or(missing(FeatureSet::PAD_MATRIX))?;
            if matrix.outputs.is_empty() || matrix.inputs.is_empty() {
                return Err(missing(FeatureSet::PAD_MATRIX));
            }
            if matrix.key_count() > MAX_INPUT_INDEX as usize + 1 {
                return Err(ConfigError::MatrixTooLarge(board));
            }
        }
        Ok(())
    }
}

/// Digital inputs are read from the port sample, so their pins must fit in it
fn port_pin(pin: u8) -> Result<(), ConfigError> {
    if pin < PORT_WIDTH {
        Ok(())
    } else {
        Err(ConfigError::InvalidPin(pin))
    }
}

/// When digital samples are taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SamplingMode {
    /// The engine samples at the start of every poll
    #[default]
    Poll,
    /// Pin-change interrupts refresh the sample cache
    Interrupt,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A feature is enabled without the pins it needs
    MissingPin(LogicalBoard, FeatureSet),
    /// Encoder bounds have `min > max`
    InvalidBounds(LogicalBoard),
    /// Encoder direction is not +1 or -1
    InvalidDirection(LogicalBoard),
    /// Matrix produces more key indices than the record can address
    MatrixTooLarge(LogicalBoard),
    /// Shared analog line used by more than two boards or twice for one slot
    SharedLineConflict(u8),
    /// Dual-button calibration points are not distinct
    InvalidCalibration,
    /// Digital input pin outside the port sample
    InvalidPin(u8),
    /// Two boards claim the same LED on a chain
    OverlappingIndicators(LogicalBoard, LogicalBoard),
}

/// Complete panel description
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    /// Config layout version
    pub version: u8,
    pub boards: BoardMap<BoardConfig>,
    pub calibration: DualButtonCalibration,
    /// Settle time after driving a matrix output
    pub matrix_settle_us: u32,
    pub sampling: SamplingMode,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            boards: BoardMap::default(),
            calibration: DualButtonCalibration::default(),
            matrix_settle_us: DEFAULT_MATRIX_SETTLE_US,
            sampling: SamplingMode::Poll,
        }
    }
}

impl PanelConfig {
    pub fn board(&self, board: LogicalBoard) -> &BoardConfig {
        &self.boards[board]
    }

    /// Check the whole panel once, before the engine starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (board, config) in self.boards.iter() {
            config.validate(board)?;
        }

        for (board, config) in self.boards.iter() {
            let Some(leds) = config.indicators() else {
                continue;
            };
            let clash = self.boards.iter().find(|(other, other_config)| {
                *other > board && other_config.indicators().is_some_and(|o| o.overlaps(&leds))
            });
            if let Some((other, _)) = clash {
                return Err(ConfigError::OverlappingIndicators(board, other));
            }
        }

        let mut uses_shared_line = false;
        for (board, config) in self.boards.iter() {
            let Some(ButtonWiring::SharedAnalog { pin, slot }) = config.button() else {
                continue;
            };
            uses_shared_line = true;

            // Later boards on the same line are checked when they come up
            let conflict = self.boards.iter().any(|(other, other_config)| {
                other > board
                    && matches!(
                        other_config.button(),
                        Some(ButtonWiring::SharedAnalog { pin: p, slot: s })
                            if p == pin && s == slot
                    )
            });
            if conflict {
                return Err(ConfigError::SharedLineConflict(*pin));
            }
        }

        if uses_shared_line && !self.calibration.is_valid() {
            return Err(ConfigError::InvalidCalibration);
        }

        Ok(())
    }

    /// Boards that have a feature, in declaration order
    pub fn boards_with(&self, feature: FeatureSet) -> impl Iterator<Item = (LogicalBoard, &BoardConfig)> {
        self.boards.iter().filter(move |(_, config)| config.has(feature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(pin: u8, slot: ButtonSlot) -> BoardConfig {
        BoardConfig {
            features: FeatureSet::BUTTON,
            button: Some(ButtonWiring::SharedAnalog { pin, slot }),
            ..BoardConfig::disabled()
        }
    }

    #[test]
    fn test_default_panel_is_valid() {
        assert_eq!(PanelConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_missing_encoder() {
        let mut config = PanelConfig::default();
        config.boards[LogicalBoard::L1].features = FeatureSet::ENCODER;
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingPin(LogicalBoard::L1, FeatureSet::ENCODER))
        );
    }

    #[test]
    fn test_encoder_bounds_and_direction() {
        let mut config = PanelConfig::default();
        config.boards[LogicalBoard::M1] = BoardConfig {
            features: FeatureSet::ENCODER,
            encoder: Some(EncoderConfig::absolute(2, 3, 10, 0, ClampPolicy::Saturate)),
            ..BoardConfig::disabled()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidBounds(LogicalBoard::M1)));

        let mut encoder = EncoderConfig::relative(2, 3);
        encoder.direction = 2;
        config.boards[LogicalBoard::M1].encoder = Some(encoder);
        assert_eq!(config.validate(), Err(ConfigError::InvalidDirection(LogicalBoard::M1)));
    }

    #[test]
    fn test_matrix_too_large() {
        let mut config = PanelConfig::default();
        config.boards[LogicalBoard::R1] = BoardConfig {
            features: FeatureSet::PAD_MATRIX,
            matrix: MatrixConfig::new(&[1, 2, 3, 4, 5], &[6, 7, 8, 9]),
            ..BoardConfig::disabled()
        };
        assert_eq!(config.validate(), Err(ConfigError::MatrixTooLarge(LogicalBoard::R1)));
    }

    #[test]
    fn test_matrix_index() {
        let matrix = MatrixConfig::new(&[1, 2, 3], &[4, 5, 6]).unwrap();
        assert_eq!(matrix.key_index(0, 0), 0);
        assert_eq!(matrix.key_index(1, 2), 5);
        assert_eq!(matrix.key_index(2, 2), 8);
        assert!(MatrixConfig::new(&[0; 9], &[1]).is_none());
    }

    #[test]
    fn test_shared_line_pairs() {
        let mut config = PanelConfig::default();
        config.boards[LogicalBoard::L1] = shared(26, ButtonSlot::First);
        config.boards[LogicalBoard::R1] = shared(26, ButtonSlot::Second);
        assert_eq!(config.validate(), Ok(()));

        config.boards[LogicalBoard::M1] = shared(26, ButtonSlot::First);
        assert_eq!(config.validate(), Err(ConfigError::SharedLineConflict(26)));
    }

    #[test]
    fn test_invalid_calibration_only_matters_when_shared() {
        let mut config = PanelConfig::default();
        config.calibration = DualButtonCalibration {
            first: 500,
            second: 500,
            both: 600,
        };
        assert_eq!(config.validate(), Ok(()));

        config.boards[LogicalBoard::L1] = shared(26, ButtonSlot::First);
        assert_eq!(config.validate(), Err(ConfigError::InvalidCalibration));
    }

    #[test]
    fn test_digital_pins_must_fit_the_port_sample() {
        let mut config = PanelConfig::default();
        config.boards[LogicalBoard::L1] = BoardConfig {
            features: FeatureSet::BUTTON,
            button: Some(ButtonWiring::Digital { pin: 31, active_low: true }),
            ..BoardConfig::disabled()
        };
        assert_eq!(config.validate(), Ok(()));

        config.boards[LogicalBoard::L1].button = Some(ButtonWiring::Digital { pin: 32, active_low: true });
        assert_eq!(config.validate(), Err(ConfigError::InvalidPin(32)));

        config.boards[LogicalBoard::L1] = BoardConfig {
            features: FeatureSet::TOUCH,
            touch_pin: Some(40),
            ..BoardConfig::disabled()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidPin(40)));

        config.boards[LogicalBoard::L1] = BoardConfig {
            features: FeatureSet::PADS,
            pads: Some(PadConfig {
                pins: [4, 5, 6, 33],
                active_low: true,
            }),
            ..BoardConfig::disabled()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidPin(33)));
    }

    #[test]
    fn test_shared_chain_needs_disjoint_runs() {
        let leds = |range| BoardConfig {
            features: FeatureSet::INDICATOR,
            indicators: Some(range),
            ..BoardConfig::disabled()
        };
        let mut config = PanelConfig::default();
        config.boards[LogicalBoard::L2] = leds(LedRange::new(0, 0, 6));
        config.boards[LogicalBoard::L1] = leds(LedRange::new(0, 6, 6));
        config.boards[LogicalBoard::M1] = leds(LedRange::new(1, 0, 12));
        assert_eq!(config.validate(), Ok(()));

        config.boards[LogicalBoard::L1] = leds(LedRange::new(0, 5, 6));
        assert_eq!(
            config.validate(),
            Err(ConfigError::OverlappingIndicators(LogicalBoard::L2, LogicalBoard::L1))
        );

        config.boards[LogicalBoard::L1] = leds(LedRange::new(0, 6, 0));
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingPin(LogicalBoard::L1, FeatureSet::INDICATOR))
        );
    }

    #[test]
    fn test_disabled_feature_hides_wiring() {
        let board = BoardConfig {
            features: FeatureSet::empty(),
            pot_pin: Some(27),
            ..BoardConfig::disabled()
        };
        assert_eq!(board.pot_pin(), None);
    }
}
