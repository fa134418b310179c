//! Output channels, canvas context and channel-scoped rule parameters

use crate::error::{PlacardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canvas height every font size in a scene is authored against
pub const REFERENCE_HEIGHT: f64 = 1920.0;

/// Canvas dimensions in pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub const STORY: Self = Self {
        width: 1080.0,
        height: 1920.0,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Parse a `"WxH"` string such as `"1080x1920"`
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || PlacardError::InvalidCanvasSize(input.to_string());
        let (w, h) = input.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self::new(width as f64, height as f64))
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::STORY
    }
}

impl FromStr for CanvasSize {
    type Err = PlacardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A named output target
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Facebook,
    Instagram,
    #[default]
    Stories,
    InStore,
    /// Anything not recognised; evaluated with the most conservative profile
    Unknown,
}

impl Channel {
    pub const KNOWN: [Channel; 4] = [
        Channel::Facebook,
        Channel::Instagram,
        Channel::Stories,
        Channel::InStore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Facebook => "facebook",
            Channel::Instagram => "instagram",
            Channel::Stories => "stories",
            Channel::InStore => "in_store",
            Channel::Unknown => "unknown",
        }
    }
}

impl FromStr for Channel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "facebook" => Channel::Facebook,
            "instagram" => Channel::Instagram,
            "stories" => Channel::Stories,
            "in_store" | "in-store" => Channel::InStore,
            _ => Channel::Unknown,
        })
    }
}

impl<'de> Deserialize<'de> for Channel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(Channel::Unknown))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Excluded top and bottom bands, as percentages of canvas height
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SafeZone {
    pub top: f64,
    pub bottom: f64,
}

impl SafeZone {
    pub fn is_empty(&self) -> bool {
        self.top <= 0.0 && self.bottom <= 0.0
    }

    /// Top band height in pixels
    pub fn top_px(&self, canvas_height: f64) -> f64 {
        self.top / 100.0 * canvas_height
    }

    /// Y coordinate (pixels) where the bottom band starts
    pub fn bottom_start_px(&self, canvas_height: f64) -> f64 {
        canvas_height - self.bottom / 100.0 * canvas_height
    }
}

/// Rule parameters scoped to one channel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelProfile {
    pub channel: Channel,
    #[serde(default)]
    pub safe_zone: SafeZone,
    /// Ceiling on non-background elements
    pub max_elements: usize,
    pub headline_min_font: f64,
    pub body_min_font: f64,
    pub price_min_font: f64,
    /// Minimum disclaimer height in canvas pixels
    pub disclaimer_min_px: f64,
    /// Whether a retailer tag is mandatory on this channel
    #[serde(default = "default_true")]
    pub retailer_specific: bool,
}

fn default_true() -> bool {
    true
}

impl ChannelProfile {
    /// Built-in parameters for a channel
    pub fn builtin(channel: Channel) -> Self {
        let base = Self {
            channel,
            safe_zone: SafeZone::default(),
            max_elements: 8,
            headline_min_font: 20.0,
            body_min_font: 16.0,
            price_min_font: 32.0,
            disclaimer_min_px: 20.0,
            retailer_specific: true,
        };

        match channel {
            Channel::Facebook | Channel::Instagram => base,
            // 200px / 250px on the 1920px reference height
            Channel::Stories => Self {
                safe_zone: SafeZone {
                    top: 200.0 / REFERENCE_HEIGHT * 100.0,
                    bottom: 250.0 / REFERENCE_HEIGHT * 100.0,
                },
                max_elements: 7,
                ..base
            },
            Channel::InStore => Self {
                max_elements: 10,
                ..base
            },
            Channel::Unknown => Self::conservative(),
        }
    }

    /// The strictest combination of every known channel's parameters
    pub fn conservative() -> Self {
        let mut profile = Self::builtin(Channel::Stories);
        for channel in Channel::KNOWN {
            let other = Self::builtin(channel);
            profile.tighten(&other);
        }
        profile.channel = Channel::Unknown;
        profile
    }

    /// Fold another profile in, keeping the stricter value of each parameter
    pub fn tighten(&mut self, other: &ChannelProfile) {
        self.safe_zone.top = self.safe_zone.top.max(other.safe_zone.top);
        self.safe_zone.bottom = self.safe_zone.bottom.max(other.safe_zone.bottom);
        self.max_elements = self.max_elements.min(other.max_elements);
        self.headline_min_font = self.headline_min_font.max(other.headline_min_font);
        self.body_min_font = self.body_min_font.max(other.body_min_font);
        self.price_min_font = self.price_min_font.max(other.price_min_font);
        self.disclaimer_min_px = self.disclaimer_min_px.max(other.disclaimer_min_px);
        self.retailer_specific |= other.retailer_specific;
    }
}

/// Retailer branding parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RetailerPolicy {
    pub name: String,
    pub approved_tags: Vec<String>,
    /// Tag text written by the auto-fix
    pub canonical_tag: String,
}

impl Default for RetailerPolicy {
    fn default() -> Self {
        Self {
            name: "Tesco".to_string(),
            approved_tags: vec![
                "Only at Tesco".to_string(),
                "Available at Tesco".to_string(),
                "Selected stores. While stocks last".to_string(),
            ],
            canonical_tag: "Available at Tesco".to_string(),
        }
    }
}

impl RetailerPolicy {
    /// Exact match (after trimming) against the approved strings
    pub fn is_approved(&self, text: &str) -> bool {
        let text = text.trim();
        self.approved_tags.iter().any(|t| t == text)
    }
}

/// Brand identity parameters used by the brand checks
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandPolicy {
    pub name: String,
    /// Palette for text and shape colors. Empty disables the palette check.
    pub colors: Vec<String>,
    /// Logo bounds, percent of the canvas
    pub logo_min_width: f64,
    pub logo_min_height: f64,
    pub logo_max_width: f64,
    pub logo_max_height: f64,
    /// Clear space around the logo, percent of canvas width
    pub logo_clear_space: f64,
}

impl Default for BrandPolicy {
    fn default() -> Self {
        Self {
            name: String::new(),
            colors: Vec::new(),
            logo_min_width: 5.0,
            logo_min_height: 3.0,
            logo_max_width: 30.0,
            logo_max_height: 20.0,
            logo_clear_space: 2.0,
        }
    }
}

impl BrandPolicy {
    /// Default bounds with a palette
    pub fn with_colors<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            colors: colors.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Evaluation parameters for one validation call. Not stored on the scene.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasContext {
    pub canvas: CanvasSize,
    pub channel: Channel,
    /// Regulated product (e.g. alcohol) requiring a disclaimer
    pub regulated: bool,
}

impl CanvasContext {
    pub fn new(canvas: CanvasSize, channel: Channel, regulated: bool) -> Self {
        Self {
            canvas,
            channel,
            regulated,
        }
    }
}

impl Default for CanvasContext {
    fn default() -> Self {
        Self::new(CanvasSize::default(), Channel::default(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canvas_size() {
        assert_eq!(CanvasSize::parse("1080x1920").unwrap(), CanvasSize::new(1080.0, 1920.0));
        assert_eq!(CanvasSize::parse("1200x628").unwrap(), CanvasSize::new(1200.0, 628.0));
        assert_eq!(CanvasSize::parse(" 1080X1080 ").unwrap(), CanvasSize::new(1080.0, 1080.0));
    }

    #[test]
    fn test_parse_canvas_size_invalid() {
        assert!(CanvasSize::parse("invalid").is_err());
        assert!(CanvasSize::parse("1080-1920").is_err());
        assert!(CanvasSize::parse("0x1920").is_err());
        assert!(CanvasSize::parse("x1920").is_err());
    }

    #[test]
    fn test_channel_from_str_falls_back_to_unknown() {
        assert_eq!("stories".parse::<Channel>().unwrap(), Channel::Stories);
        assert_eq!("In-Store".parse::<Channel>().unwrap(), Channel::InStore);
        assert_eq!("tiktok".parse::<Channel>().unwrap(), Channel::Unknown);
    }

    #[test]
    fn test_channel_deserialize_unknown() {
        #[derive(Deserialize)]
        struct Wrapper {
            channel: Channel,
        }
        let w: Wrapper = serde_json::from_str(r#"{"channel": "billboard"}"#).unwrap();
        assert_eq!(w.channel, Channel::Unknown);
        let w: Wrapper = serde_json::from_str(r#"{"channel": "in_store"}"#).unwrap();
        assert_eq!(w.channel, Channel::InStore);
    }

    #[test]
    fn test_stories_bands() {
        let p = ChannelProfile::builtin(Channel::Stories);
        assert!((p.safe_zone.top_px(1920.0) - 200.0).abs() < 1e-9);
        assert!((p.safe_zone.bottom_start_px(1920.0) - 1670.0).abs() < 1e-9);
        assert!(ChannelProfile::builtin(Channel::Facebook).safe_zone.is_empty());
    }

    #[test]
    fn test_conservative_profile_is_strictest() {
        let c = ChannelProfile::builtin(Channel::Unknown);
        for channel in Channel::KNOWN {
            let p = ChannelProfile::builtin(channel);
            assert!(c.safe_zone.top >= p.safe_zone.top);
            assert!(c.safe_zone.bottom >= p.safe_zone.bottom);
            assert!(c.max_elements <= p.max_elements);
            assert!(c.headline_min_font >= p.headline_min_font);
        }
        assert_eq!(c.channel, Channel::Unknown);
    }

    #[test]
    fn test_retailer_policy_approval() {
        let policy = RetailerPolicy::default();
        assert!(policy.is_approved("Available at Tesco"));
        assert!(policy.is_approved("  Only at Tesco "));
        assert!(!policy.is_approved("Buy at Tesco"));
        assert!(!policy.is_approved(""));
        assert!(policy.is_approved(&policy.canonical_tag));
    }

    #[test]
    fn test_brand_policy_defaults_fill_missing_fields() {
        let brand: BrandPolicy = toml::from_str("name = \"Acme\"\ncolors = [\"#E30613\"]").unwrap();
        assert_eq!(brand.colors, vec!["#E30613"]);
        assert_eq!(brand.logo_max_width, 30.0);
        assert_eq!(BrandPolicy::with_colors(["#00539F"]).logo_min_width, 5.0);
    }
}
