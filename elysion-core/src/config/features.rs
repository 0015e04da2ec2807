//! Per-board capability flags

use bitflags::bitflags;

bitflags! {
    /// Capabilities wired on a logical board
    ///
    /// Set once when the panel configuration is loaded and never changed at
    /// runtime.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FeatureSet: u8 {
        /// Quadrature rotary encoder
        const ENCODER       = 0b0000_0001;
        /// Push button (digital or shared analog line)
        const BUTTON        = 0b0000_0010;
        /// Potentiometer on an analog line
        const POTENTIOMETER = 0b0000_0100;
        /// Capacitive touch sensor
        const TOUCH         = 0b0000_1000;
        /// Scanned button matrix
        const PAD_MATRIX    = 0b0001_0000;
        /// Addressable LED chain
        const INDICATOR     = 0b0010_0000;
        /// Four plain digital pads
        const PADS          = 0b0100_0000;
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FeatureSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FeatureSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = <u8 as serde::Deserialize>::deserialize(deserializer)?;
        Ok(FeatureSet::from_bits_truncate(bits))
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FeatureSet {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "FeatureSet({=u8:#09b})", self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_distinct() {
        let all = FeatureSet::all();
        assert_eq!(all.bits().count_ones(), 7);
    }

    #[test]
    fn test_unknown_bits_truncate() {
        assert_eq!(FeatureSet::from_bits_truncate(0xFF), FeatureSet::all());
    }
}
