//! Panel configuration persistence.

#![cfg(feature = "serde")]

use elysion_core::config::{
    BoardConfig, ButtonSlot, ButtonWiring, ClampPolicy, EncoderConfig, FeatureSet, LedRange,
    MatrixConfig, PanelConfig,
};
use elysion_core::LogicalBoard;

#[test]
fn panel_config_survives_postcard() {
    let mut config = PanelConfig::default();
    config.boards[LogicalBoard::L1] = BoardConfig {
        features: FeatureSet::ENCODER | FeatureSet::BUTTON | FeatureSet::INDICATOR,
        encoder: Some(EncoderConfig::absolute(2, 3, 0, 127, ClampPolicy::Wrap).reversed()),
        button: Some(ButtonWiring::SharedAnalog {
            pin: 26,
            slot: ButtonSlot::First,
        }),
        indicators: Some(LedRange::new(0, 6, 6)),
        ..BoardConfig::disabled()
    };
    config.boards[LogicalBoard::R1] = BoardConfig {
        features: FeatureSet::PAD_MATRIX,
        matrix: MatrixConfig::new(&[10, 11, 12], &[13, 14, 15]),
        ..BoardConfig::disabled()
    };

    let mut buffer = [0u8; 512];
    let bytes = postcard::to_slice(&config, &mut buffer).unwrap();
    let decoded: PanelConfig = postcard::from_bytes(bytes).unwrap();

    assert_eq!(decoded, config);
    assert_eq!(decoded.validate(), Ok(()));
}
