use core::fmt;

/// 24-bit RGB color packed as `0xRRGGBB`.
///
/// Invariant: the high byte is always zero. Out-of-range input is masked on
/// construction rather than rejected.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Rgb24(u32);

impl Rgb24 {
    /// Tint value that leaves colors untouched.
    pub const NEUTRAL: Rgb24 = Rgb24(0xFF_FF_FF);
    pub const BLACK: Rgb24 = Rgb24(0);

    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value & 0xFF_FF_FF)
    }

    #[inline]
    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub fn is_neutral(self) -> bool {
        self == Self::NEUTRAL
    }

    /// Multiplies each channel by the matching channel ratio of `tint`.
    ///
    /// Channels are truncated, not rounded; see [`tint_channel`]. A neutral
    /// tint returns `self` without touching the arithmetic.
    pub fn tinted(self, tint: Rgb24) -> Rgb24 {
        if tint.is_neutral() {
            return self;
        }
        Rgb24::from_channels(
            tint_channel(self.r(), tint.r()),
            tint_channel(self.g(), tint.g()),
            tint_channel(self.b(), tint.b()),
        )
    }

    /// `#rrggbb`, lower-case and zero-padded.
    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.0)
    }

    /// Channels scaled to `[0, 1]`, as consumed by shader uniforms.
    #[inline]
    pub fn to_normalized(self) -> [f32; 3] {
        [
            f32::from(self.r()) / 255.0,
            f32::from(self.g()) / 255.0,
            f32::from(self.b()) / 255.0,
        ]
    }
}

impl From<u32> for Rgb24 {
    #[inline]
    fn from(value: u32) -> Self {
        Rgb24::new(value)
    }
}

/// Scales one channel by a tint channel with truncating arithmetic.
///
/// Computed in `f64` as `value / 255 * (tint / 255) * 255`, evaluated left to
/// right, then truncated. Both backends must produce the same bytes, so this is
/// intentionally not `round(value * tint / 255)`.
#[inline]
pub fn tint_channel(value: u8, tint: u8) -> u8 {
    let ratio = f64::from(tint) / 255.0;
    (f64::from(value) / 255.0 * ratio * 255.0) as u8
}

/// Color value in the string form a canvas-style backend accepts.
///
/// Alpha is stored in thousandths so the `rgba(...)` form always carries
/// exactly three decimals and equality is exact.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CssColor {
    Hex(Rgb24),
    Rgba { rgb: Rgb24, milli_alpha: u16 },
}

impl CssColor {
    /// Builds an `rgba(...)` color; alpha is clamped to `[0, 1]` and rounded
    /// half-up to three decimals.
    pub fn rgba(rgb: Rgb24, alpha: f32) -> Self {
        let alpha = if alpha.is_finite() {
            f64::from(alpha).clamp(0.0, 1.0)
        } else {
            0.0
        };
        CssColor::Rgba {
            rgb,
            milli_alpha: (alpha * 1000.0).round() as u16,
        }
    }

    #[inline]
    pub fn rgb(self) -> Rgb24 {
        match self {
            CssColor::Hex(rgb) | CssColor::Rgba { rgb, .. } => rgb,
        }
    }

    #[inline]
    pub fn alpha(self) -> f32 {
        match self {
            CssColor::Hex(_) => 1.0,
            CssColor::Rgba { milli_alpha, .. } => f32::from(milli_alpha) / 1000.0,
        }
    }
}

impl fmt::Display for CssColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            CssColor::Hex(rgb) => write!(f, "#{:06x}", rgb.value()),
            CssColor::Rgba { rgb, milli_alpha } => write!(
                f,
                "rgba({}, {}, {}, {}.{:03})",
                rgb.r(),
                rgb.g(),
                rgb.b(),
                milli_alpha / 1000,
                milli_alpha % 1000
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_masks_high_bits() {
        assert_eq!(Rgb24::new(0xAB_12_34_56).value(), 0x12_34_56);
        assert_eq!(Rgb24::from(0xFF_FF_FF_FF), Rgb24::NEUTRAL);
    }

    #[test]
    fn channels_round_trip() {
        let c = Rgb24::from_channels(0x12, 0x34, 0x56);
        assert_eq!(c.value(), 0x12_34_56);
        assert_eq!((c.r(), c.g(), c.b()), (0x12, 0x34, 0x56));
    }

    #[test]
    fn hex_is_zero_padded() {
        assert_eq!(Rgb24::new(0x0000FF).to_hex(), "#0000ff");
        assert_eq!(Rgb24::BLACK.to_hex(), "#000000");
        assert_eq!(Rgb24::new(0xFF8040).to_hex(), "#ff8040");
    }

    #[test]
    fn neutral_tint_is_passthrough() {
        for v in [0x000000, 0x010203, 0x7F7F7F, 0xC8C8C8, 0xFFFFFF] {
            let c = Rgb24::new(v);
            assert_eq!(c.tinted(Rgb24::NEUTRAL), c);
        }
    }

    #[test]
    fn tint_truncates_instead_of_rounding() {
        // 200 * 127 / 255 = 99.6: truncation gives 0x63, rounding would give 0x64.
        assert_eq!(Rgb24::new(0xC8C8C8).tinted(Rgb24::new(0x7F7F7F)), Rgb24::new(0x636363));
        assert_eq!(tint_channel(51, 153), 30);
    }

    #[test]
    fn tint_scales_per_channel() {
        assert_eq!(Rgb24::new(0xFF8040).tinted(Rgb24::new(0x808080)), Rgb24::new(0x804020));
        assert_eq!(Rgb24::new(0x123456).tinted(Rgb24::new(0xFF0000)), Rgb24::new(0x120000));
        assert_eq!(Rgb24::new(0xFF0000).tinted(Rgb24::new(0x00FF00)), Rgb24::BLACK);
    }

    #[test]
    fn normalized_channels() {
        assert_eq!(Rgb24::new(0xFF0000).to_normalized(), [1.0, 0.0, 0.0]);
        assert_eq!(Rgb24::NEUTRAL.to_normalized(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn css_rgba_has_three_decimals() {
        assert_eq!(CssColor::rgba(Rgb24::new(0xFF0000), 0.5).to_string(), "rgba(255, 0, 0, 0.500)");
        assert_eq!(
            CssColor::rgba(Rgb24::new(0x0A0B0C), 1.0).to_string(),
            "rgba(10, 11, 12, 1.000)"
        );
        assert_eq!(CssColor::rgba(Rgb24::BLACK, 0.1234).to_string(), "rgba(0, 0, 0, 0.123)");
        assert_eq!(CssColor::rgba(Rgb24::BLACK, 0.0).to_string(), "rgba(0, 0, 0, 0.000)");
    }

    #[test]
    fn css_rgba_clamps_alpha() {
        assert_eq!(CssColor::rgba(Rgb24::BLACK, 3.0).alpha(), 1.0);
        assert_eq!(CssColor::rgba(Rgb24::BLACK, -1.0).alpha(), 0.0);
        assert_eq!(CssColor::rgba(Rgb24::BLACK, f32::NAN).alpha(), 0.0);
    }

    #[test]
    fn css_hex_display() {
        assert_eq!(CssColor::Hex(Rgb24::new(0x00FF00)).to_string(), "#00ff00");
        assert_eq!(CssColor::Hex(Rgb24::new(0x00FF00)).alpha(), 1.0);
    }
}
