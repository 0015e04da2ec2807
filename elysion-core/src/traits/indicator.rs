//! Addressable LED chain trait

/// Color packed as `0x00RRGGBB`
pub type Color = u32;

/// Trait for addressable LED chains
pub trait IndicatorDriver {
    /// Number of pixels on the chain
    fn len(&self) -> usize;

    /// Set one pixel in the buffer; out-of-range indices are ignored
    fn set_pixel(&mut self, index: usize, color: Color);

    /// Set `count` pixels starting at `first`; `count == 0` fills to the end
    fn fill(&mut self, color: Color, first: usize, count: usize);

    /// Push the buffer out to the LEDs
    fn show(&mut self);
}
