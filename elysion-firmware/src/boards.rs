//! Built-in board revisions
//!
//! Each revision is a panel configuration table. The RP2040 carrier keeps
//! the same header pinout across revisions; what changes is which logical
//! boards are populated and what the header lines are used for.

use elysion_core::config::{
    BoardConfig, ButtonSlot, ClampPolicy, ButtonWiring, EncoderConfig, FeatureSet, LedRange, MatrixConfig,
    PadConfig, PanelConfig,
};
use elysion_core::{BoardMap, LogicalBoard};

/// Bus data line (I2C0 SDA)
pub const BUS_SDA: u8 = 0;
/// Bus clock line (I2C0 SCL)
pub const BUS_SCL: u8 = 1;
/// Status LED toggled on every record sent
pub const ACTIVITY_LED: u8 = 25;
/// GPIOs routed to the ADC
pub const ANALOG_PINS: [u8; 3] = [26, 27, 28];
/// Data lines of the left, middle and right LED chains
pub const CHAIN_PINS: [u8; 3] = [2, 3, 6];
/// LEDs on each chain
pub const CHAIN_LEN: usize = 12;

/// Encoder header lines `(a, b)`
const ENC_L1: (u8, u8) = (8, 9);
const ENC_L2: (u8, u8) = (10, 11);
const ENC_M1: (u8, u8) = (12, 13);
const ENC_M2: (u8, u8) = (14, 15);
const ENC_R1: (u8, u8) = (16, 17);
const ENC_R2: (u8, u8) = (18, 19);

/// Switch header lines
const SW_L: u8 = 20;
const SW_M: u8 = 21;
const SW_R: u8 = 22;
const TOUCH_M: u8 = 7;

/// Analog header lines
const ADC_L: u8 = 26;
const ADC_M: u8 = 27;
const ADC_R: u8 = 28;

const CHAIN_L: u8 = 0;
const CHAIN_M: u8 = 1;
const CHAIN_R: u8 = 2;

/// Boards that share a chain split it in half
const HALF_CHAIN: u8 = (CHAIN_LEN / 2) as u8;

/// Board revisions with a built-in table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Revision {
    /// Left, middle and right boards with touch-sensitive encoder caps
    Rev1,
    /// Pads on the left, encoder in the middle, key matrix on the right
    Rev2,
    /// Six encoder boards with paired buttons on shared analog lines
    Rev3,
}

/// Revision this firmware is built for
pub const REVISION: Revision = Revision::Rev3;

impl Revision {
    pub fn panel_config(self) -> PanelConfig {
        let boards = match self {
            Revision::Rev1 => rev1(),
            Revision::Rev2 => rev2(),
            Revision::Rev3 => rev3(),
        };
        PanelConfig {
            boards,
            ..PanelConfig::default()
        }
    }
}

fn whole_chain(chain: u8) -> LedRange {
    LedRange::new(chain, 0, CHAIN_LEN as u8)
}

fn encoder((a, b): (u8, u8)) -> EncoderConfig {
    EncoderConfig::relative(a, b)
}

fn rev1() -> BoardMap<BoardConfig> {
    BoardMap::from_fn(|board| match board {
        LogicalBoard::L1 => BoardConfig {
            features: FeatureSet::ENCODER
                | FeatureSet::BUTTON
                | FeatureSet::TOUCH
                | FeatureSet::INDICATOR,
            encoder: Some(encoder(ENC_L1)),
            button: Some(ButtonWiring::Digital { pin: SW_L, active_low: true }),
            touch_pin: Some(ENC_L2.1),
            indicators: Some(whole_chain(CHAIN_L)),
            ..BoardConfig::disabled()
        },
        LogicalBoard::M1 => BoardConfig {
            features: FeatureSet::POTENTIOMETER
                | FeatureSet::BUTTON
                | FeatureSet::TOUCH
                | FeatureSet::INDICATOR,
            pot_pin: Some(ADC_M),
            button: Some(ButtonWiring::Digital { pin: SW_M, active_low: true }),
            touch_pin: Some(TOUCH_M),
            indicators: Some(whole_chain(CHAIN_M)),
            ..BoardConfig::disabled()
        },
        LogicalBoard::R1 => BoardConfig {
            features: FeatureSet::ENCODER
                | FeatureSet::BUTTON
                | FeatureSet::TOUCH
                | FeatureSet::INDICATOR,
            encoder: Some(encoder(ENC_R1)),
            button: Some(ButtonWiring::Digital { pin: SW_R, active_low: true }),
            touch_pin: Some(ENC_R2.1),
            indicators: Some(whole_chain(CHAIN_R)),
            ..BoardConfig::disabled()
        },
        _ => BoardConfig::disabled(),
    })
}

fn rev2() -> BoardMap<BoardConfig> {
    BoardMap::from_fn(|board| match board {
        LogicalBoard::L1 => BoardConfig {
            features: FeatureSet::PADS | FeatureSet::INDICATOR,
            pads: Some(PadConfig {
                pins: [ENC_L2.0, ENC_L1.1, ENC_L1.0, SW_L],
                active_low: true,
            }),
            indicators: Some(whole_chain(CHAIN_L)),
            ..BoardConfig::disabled()
        },
        LogicalBoard::M1 => BoardConfig {
            features: FeatureSet::ENCODER | FeatureSet::BUTTON | FeatureSet::INDICATOR,
            encoder: Some(EncoderConfig::absolute(
                ENC_M1.0,
                ENC_M1.1,
                0,
                127,
                ClampPolicy::Saturate,
            )),
            button: Some(ButtonWiring::Digital { pin: SW_M, active_low: true }),
            indicators: Some(whole_chain(CHAIN_M)),
            ..BoardConfig::disabled()
        },
        LogicalBoard::R1 => BoardConfig {
            features: FeatureSet::PAD_MATRIX | FeatureSet::INDICATOR,
            matrix: MatrixConfig::new(&[ENC_R2.1, ENC_R2.0, SW_R], &[ENC_R1.1, ENC_R1.0, 24]),
            indicators: Some(whole_chain(CHAIN_R)),
            ..BoardConfig::disabled()
        },
        _ => BoardConfig::disabled(),
    })
}

fn rev3() -> BoardMap<BoardConfig> {
    let board = |pins: (u8, u8), line: u8, slot: ButtonSlot, chain: u8| BoardConfig {
        features: FeatureSet::ENCODER | FeatureSet::BUTTON | FeatureSet::INDICATOR,
        encoder: Some(encoder(pins)),
        button: Some(ButtonWiring::SharedAnalog { pin: line, slot }),
        indicators: Some(match slot {
            ButtonSlot::First => LedRange::new(chain, 0, HALF_CHAIN),
            ButtonSlot::Second => LedRange::new(chain, HALF_CHAIN, HALF_CHAIN),
        }),
        ..BoardConfig::disabled()
    };
    BoardMap::new([
        board(ENC_L2, ADC_L, ButtonSlot::First, CHAIN_L),
        board(ENC_L1, ADC_L, ButtonSlot::Second, CHAIN_L),
        board(ENC_M1, ADC_M, ButtonSlot::First, CHAIN_M),
        board(ENC_M2, ADC_M, ButtonSlot::Second, CHAIN_M),
        board(ENC_R1, ADC_R, ButtonSlot::First, CHAIN_R),
        board(ENC_R2, ADC_R, ButtonSlot::Second, CHAIN_R),
    ])
}
