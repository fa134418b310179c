//! Color parsing and WCAG contrast math

use crate::error::{PlacardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum contrast for normal-size text (WCAG 2.x AA)
pub const WCAG_AA_NORMAL_TEXT: f64 = 4.5;
/// Minimum contrast for large text (WCAG 2.x AA)
pub const WCAG_AA_LARGE_TEXT: f64 = 3.0;

/// An 8-bit sRGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or the `#RGB` shorthand. The leading `#` is optional.
    pub fn parse(input: &str) -> Result<Self> {
        let hex = input.trim().trim_start_matches('#');
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return Err(PlacardError::InvalidColor(input.to_string())),
        };

        let channel = |range: std::ops::Range<usize>| {
            expanded
                .get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| PlacardError::InvalidColor(input.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Uppercase `#RRGGBB` form
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// WCAG relative luminance in `[0, 1]`
    pub fn relative_luminance(&self) -> f64 {
        fn linearize(channel: u8) -> f64 {
            let c = channel as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }

        0.2126 * linearize(self.r) + 0.7152 * linearize(self.g) + 0.0722 * linearize(self.b)
    }

    /// Perceived brightness on a 0-255 scale (YIQ weighting)
    pub fn brightness(&self) -> f64 {
        (299.0 * self.r as f64 + 587.0 * self.g as f64 + 114.0 * self.b as f64) / 1000.0
    }

    /// True when the background reads as light (brightness above 128)
    pub fn is_light(&self) -> bool {
        self.brightness() > 128.0
    }

    /// Euclidean distance in RGB space
    pub fn distance(&self, other: Rgb) -> f64 {
        let d = |a: u8, b: u8| (a as f64 - b as f64).powi(2);
        (d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)).sqrt()
    }
}

impl FromStr for Rgb {
    type Err = PlacardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// WCAG contrast ratio between two colors, in `[1, 21]`
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = a.relative_luminance();
    let lb = b.relative_luminance();
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Required AA ratio for a text size class
pub fn required_ratio(is_large_text: bool) -> f64 {
    if is_large_text {
        WCAG_AA_LARGE_TEXT
    } else {
        WCAG_AA_NORMAL_TEXT
    }
}

/// Whether `text` on `background` meets WCAG AA
pub fn meets_wcag_aa(text: Rgb, background: Rgb, is_large_text: bool) -> bool {
    contrast_ratio(text, background) >= required_ratio(is_large_text)
}

/// Pick black or white text for a background.
///
/// Light backgrounds (brightness > 128) get black, dark ones white. For
/// mid-tones where the brightness pick misses normal-text AA, the other
/// extreme is used; one of black or white always clears 4.5:1.
pub fn suggested_text_color(background: Rgb) -> Rgb {
    let (preferred, fallback) = if background.is_light() {
        (Rgb::BLACK, Rgb::WHITE)
    } else {
        (Rgb::WHITE, Rgb::BLACK)
    };

    if meets_wcag_aa(preferred, background, false) {
        preferred
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_hex() {
        assert_eq!(Rgb::parse("#FF8844").unwrap(), Rgb::new(0xFF, 0x88, 0x44));
        assert_eq!(Rgb::parse("ff8844").unwrap(), Rgb::new(0xFF, 0x88, 0x44));
        assert_eq!(Rgb::parse("#fff").unwrap(), Rgb::WHITE);
        assert_eq!(Rgb::parse("#000").unwrap(), Rgb::BLACK);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Rgb::parse("").is_err());
        assert!(Rgb::parse("#12345").is_err());
        assert!(Rgb::parse("#GGGGGG").is_err());
        assert!(Rgb::parse("red").is_err());
    }

    #[test]
    fn test_to_hex_is_uppercase() {
        assert_eq!(Rgb::new(0xab, 0x01, 0xff).to_hex(), "#AB01FF");
    }

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(Rgb::BLACK.relative_luminance(), 0.0);
        assert!((Rgb::WHITE.relative_luminance() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_contrast_black_white_is_max() {
        assert_eq!(contrast_ratio(Rgb::WHITE, Rgb::BLACK), 21.0);
        assert_eq!(contrast_ratio(Rgb::BLACK, Rgb::WHITE), 21.0);
    }

    #[test]
    fn test_contrast_near_identical() {
        let near_white = Rgb::parse("#FEFEFE").unwrap();
        assert!(contrast_ratio(Rgb::WHITE, near_white) < 1.1);

        let red = Rgb::parse("#FF0000").unwrap();
        assert_eq!(contrast_ratio(red, red), 1.0);
    }

    #[test]
    fn test_wcag_thresholds() {
        let light_grey = Rgb::parse("#CCCCCC").unwrap();
        assert!(!meets_wcag_aa(light_grey, Rgb::WHITE, false));
        assert!(!meets_wcag_aa(light_grey, Rgb::WHITE, true));
        assert!(meets_wcag_aa(Rgb::BLACK, Rgb::WHITE, false));

        // #767676 on white sits right above 4.5
        let grey = Rgb::parse("#767676").unwrap();
        assert!(meets_wcag_aa(grey, Rgb::WHITE, false));
    }

    #[test]
    fn test_suggested_text_color() {
        assert_eq!(suggested_text_color(Rgb::WHITE), Rgb::BLACK);
        assert_eq!(suggested_text_color(Rgb::BLACK), Rgb::WHITE);
        assert_eq!(suggested_text_color(Rgb::parse("#FFD700").unwrap()), Rgb::BLACK);
        assert_eq!(suggested_text_color(Rgb::parse("#003366").unwrap()), Rgb::WHITE);
    }

    #[test]
    fn test_suggested_text_color_always_passes() {
        for v in (0..=255u16).step_by(5) {
            let bg = Rgb::new(v as u8, v as u8, v as u8);
            let text = suggested_text_color(bg);
            assert!(meets_wcag_aa(text, bg, false), "failed for {}", bg);
        }
    }

    #[test]
    fn test_distance() {
        assert_eq!(Rgb::BLACK.distance(Rgb::BLACK), 0.0);
        assert_eq!(Rgb::new(3, 4, 0).distance(Rgb::BLACK), 5.0);
    }
}
