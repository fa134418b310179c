//! Element variants and the shared positional trait

use placard_core::{Rect, Rgb};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element kinds, in the order the editor palette lists them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Background,
    Packshot,
    Logo,
    Headline,
    Subhead,
    RetailerTag,
    PriceTile,
    Disclaimer,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Background => "background",
            ElementKind::Packshot => "packshot",
            ElementKind::Logo => "logo",
            ElementKind::Headline => "headline",
            ElementKind::Subhead => "subhead",
            ElementKind::RetailerTag => "retailer_tag",
            ElementKind::PriceTile => "price_tile",
            ElementKind::Disclaimer => "disclaimer",
        }
    }

    /// Nominal font size used when a text element has none
    pub fn nominal_font_size(&self) -> Option<f64> {
        match self {
            ElementKind::Headline => Some(48.0),
            ElementKind::Subhead => Some(24.0),
            ElementKind::RetailerTag => Some(20.0),
            ElementKind::PriceTile => Some(32.0),
            ElementKind::Disclaimer => Some(16.0),
            ElementKind::Background | ElementKind::Packshot | ElementKind::Logo => None,
        }
    }

    /// Nominal color used when an element has none
    pub fn nominal_color(&self) -> Option<Rgb> {
        match self {
            ElementKind::Background => Some(Rgb::WHITE),
            ElementKind::Headline
            | ElementKind::Subhead
            | ElementKind::RetailerTag
            | ElementKind::PriceTile
            | ElementKind::Disclaimer => Some(Rgb::BLACK),
            ElementKind::Packshot | ElementKind::Logo => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position, size and layer attributes shared by every element.
///
/// Coordinates are percentages of the canvas and are deliberately not clamped
/// here; a drag may leave them outside 0-100 for a moment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<i32>,
    /// Degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl Frame {
    /// Placed box, if the element has a position. Missing sizes count as 0.
    pub fn rect(&self) -> Option<Rect> {
        Some(Rect::new(
            self.x?,
            self.y?,
            self.width.unwrap_or(0.0),
            self.height.unwrap_or(0.0),
        ))
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = Some(rect.x);
        self.y = Some(rect.y);
        self.width = Some(rect.width);
        self.height = Some(rect.height);
    }
}

/// Anything with a [`Frame`]
pub trait Positioned {
    fn frame(&self) -> &Frame;
    fn frame_mut(&mut self) -> &mut Frame;

    fn rect(&self) -> Option<Rect> {
        self.frame().rect()
    }

    /// Layer order, 0 when unset
    fn z(&self) -> i32 {
        self.frame().z.unwrap_or(0)
    }
}

/// Solid color and/or image background
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackgroundElement {
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
}

/// Packshot or logo image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    #[serde(flatten)]
    pub frame: Frame,
    /// Opaque key resolved by the asset store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
}

/// Copy and compliance tiles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Pixels on the 1920 reference height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Tiles may be supplied as artwork instead of text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
}

macro_rules! impl_positioned {
    ($($ty:ty),*) => {
        $(impl Positioned for $ty {
            fn frame(&self) -> &Frame {
                &self.frame
            }

            fn frame_mut(&mut self) -> &mut Frame {
                &mut self.frame
            }
        })*
    };
}

impl_positioned!(BackgroundElement, ImageElement, TextElement);

/// One positioned visual unit of a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Background(BackgroundElement),
    Packshot(ImageElement),
    Logo(ImageElement),
    Headline(TextElement),
    Subhead(TextElement),
    #[serde(alias = "tesco_tag")]
    RetailerTag(TextElement),
    #[serde(alias = "value_tile")]
    PriceTile(TextElement),
    #[serde(alias = "drinkaware")]
    Disclaimer(TextElement),
}

impl Element {
    pub fn background(color: &str) -> Self {
        Element::Background(BackgroundElement {
            frame: Frame::default(),
            color: Some(color.to_string()),
            asset: None,
        })
    }

    pub fn packshot(asset: &str) -> Self {
        Element::Packshot(ImageElement {
            asset: Some(asset.to_string()),
            ..Default::default()
        })
    }

    pub fn logo(asset: &str) -> Self {
        Element::Logo(ImageElement {
            asset: Some(asset.to_string()),
            ..Default::default()
        })
    }

    /// A text element of `kind`. Non-text kinds fall back to a headline.
    pub fn text(kind: ElementKind, text: &str) -> Self {
        let body = TextElement {
            text: Some(text.to_string()),
            ..Default::default()
        };
        match kind {
            ElementKind::Subhead => Element::Subhead(body),
            ElementKind::RetailerTag => Element::RetailerTag(body),
            ElementKind::PriceTile => Element::PriceTile(body),
            ElementKind::Disclaimer => Element::Disclaimer(body),
            ElementKind::Headline
            | ElementKind::Background
            | ElementKind::Packshot
            | ElementKind::Logo => Element::Headline(body),
        }
    }

    pub fn headline(text: &str) -> Self {
        Self::text(ElementKind::Headline, text)
    }

    pub fn subhead(text: &str) -> Self {
        Self::text(ElementKind::Subhead, text)
    }

    pub fn with_rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.frame_mut().set_rect(Rect::new(x, y, width, height));
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.frame_mut().id = Some(id.to_string());
        self
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.frame_mut().z = Some(z);
        self
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.set_font_size(size);
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.set_color(color);
        self
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Background(_) => ElementKind::Background,
            Element::Packshot(_) => ElementKind::Packshot,
            Element::Logo(_) => ElementKind::Logo,
            Element::Headline(_) => ElementKind::Headline,
            Element::Subhead(_) => ElementKind::Subhead,
            Element::RetailerTag(_) => ElementKind::RetailerTag,
            Element::PriceTile(_) => ElementKind::PriceTile,
            Element::Disclaimer(_) => ElementKind::Disclaimer,
        }
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            Element::Headline(t)
            | Element::Subhead(t)
            | Element::RetailerTag(t)
            | Element::PriceTile(t)
            | Element::Disclaimer(t) => Some(t),
            Element::Background(_) | Element::Packshot(_) | Element::Logo(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextElement> {
        match self {
            Element::Headline(t)
            | Element::Subhead(t)
            | Element::RetailerTag(t)
            | Element::PriceTile(t)
            | Element::Disclaimer(t) => Some(t),
            Element::Background(_) | Element::Packshot(_) | Element::Logo(_) => None,
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        self.as_text().and_then(|t| t.text.as_deref())
    }

    pub fn asset(&self) -> Option<&str> {
        match self {
            Element::Background(b) => b.asset.as_deref(),
            Element::Packshot(i) | Element::Logo(i) => i.asset.as_deref(),
            Element::Headline(t)
            | Element::Subhead(t)
            | Element::RetailerTag(t)
            | Element::PriceTile(t)
            | Element::Disclaimer(t) => t.asset.as_deref(),
        }
    }

    /// The color as authored, if any
    pub fn color(&self) -> Option<&str> {
        match self {
            Element::Background(b) => b.color.as_deref(),
            Element::Packshot(_) | Element::Logo(_) => None,
            Element::Headline(t)
            | Element::Subhead(t)
            | Element::RetailerTag(t)
            | Element::PriceTile(t)
            | Element::Disclaimer(t) => t.color.as_deref(),
        }
    }

    /// Authored color, or the kind's nominal color when absent or unparseable
    pub fn effective_color(&self) -> Option<Rgb> {
        self.color()
            .and_then(|c| Rgb::parse(c).ok())
            .or_else(|| self.kind().nominal_color())
    }

    /// Authored font size, or the kind's nominal size when absent
    pub fn effective_font_size(&self) -> Option<f64> {
        let text = self.as_text()?;
        text.font_size
            .filter(|s| s.is_finite())
            .or_else(|| self.kind().nominal_font_size())
    }

    /// Set the color of a text or background element. Returns false for images.
    pub fn set_color(&mut self, color: &str) -> bool {
        match self {
            Element::Background(b) => {
                b.color = Some(color.to_string());
                true
            }
            Element::Packshot(_) | Element::Logo(_) => false,
            Element::Headline(t)
            | Element::Subhead(t)
            | Element::RetailerTag(t)
            | Element::PriceTile(t)
            | Element::Disclaimer(t) => {
                t.color = Some(color.to_string());
                true
            }
        }
    }

    /// Set the text of a text element. Returns false for other kinds.
    pub fn set_text(&mut self, text: &str) -> bool {
        match self.as_text_mut() {
            Some(t) => {
                t.text = Some(text.to_string());
                true
            }
            None => false,
        }
    }

    /// Set the font size of a text element. Returns false for other kinds.
    pub fn set_font_size(&mut self, size: f64) -> bool {
        match self.as_text_mut() {
            Some(t) => {
                t.font_size = Some(size);
                true
            }
            None => false,
        }
    }

    /// Element id if present, otherwise `kind#index`
    pub fn label(&self, index: usize) -> String {
        match &self.frame().id {
            Some(id) => id.clone(),
            None => format!("{}#{}", self.kind(), index),
        }
    }
}

impl Positioned for Element {
    fn frame(&self) -> &Frame {
        match self {
            Element::Background(b) => &b.frame,
            Element::Packshot(i) | Element::Logo(i) => &i.frame,
            Element::Headline(t)
            | Element::Subhead(t)
            | Element::RetailerTag(t)
            | Element::PriceTile(t)
            | Element::Disclaimer(t) => &t.frame,
        }
    }

    fn frame_mut(&mut self) -> &mut Frame {
        match self {
            Element::Background(b) => &mut b.frame,
            Element::Packshot(i) | Element::Logo(i) => &mut i.frame,
            Element::Headline(t)
            | Element::Subhead(t)
            | Element::RetailerTag(t)
            | Element::PriceTile(t)
            | Element::Disclaimer(t) => &mut t.frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_text_element() {
        let json = r##"{
            "type": "headline",
            "text": "New Product Launch",
            "x": 10, "y": 50, "width": 80, "height": 10,
            "font_size": 32, "color": "#000000", "z": 2
        }"##;
        let element: Element = serde_json::from_str(json).unwrap();
        assert_eq!(element.kind(), ElementKind::Headline);
        assert_eq!(element.text_content(), Some("New Product Launch"));
        assert_eq!(element.rect(), Some(Rect::new(10.0, 50.0, 80.0, 10.0)));
        assert_eq!(element.effective_font_size(), Some(32.0));
        assert_eq!(element.z(), 2);
    }

    #[test]
    fn test_legacy_kind_aliases() {
        let tag: Element =
            serde_json::from_str(r#"{"type": "tesco_tag", "text": "Only at Tesco"}"#).unwrap();
        assert_eq!(tag.kind(), ElementKind::RetailerTag);

        let tile: Element = serde_json::from_str(r#"{"type": "value_tile"}"#).unwrap();
        assert_eq!(tile.kind(), ElementKind::PriceTile);

        let disclaimer: Element =
            serde_json::from_str(r##"{"type": "drinkaware", "color": "#000000"}"##).unwrap();
        assert_eq!(disclaimer.kind(), ElementKind::Disclaimer);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(serde_json::from_str::<Element>(r#"{"type": "sticker"}"#).is_err());
    }

    #[test]
    fn test_nominal_defaults_applied() {
        let headline = Element::headline("Hi");
        assert_eq!(headline.effective_font_size(), Some(48.0));
        assert_eq!(headline.effective_color(), Some(Rgb::BLACK));

        let bad_color = Element::subhead("x").with_color("not-a-color");
        assert_eq!(bad_color.effective_color(), Some(Rgb::BLACK));

        let background = Element::Background(BackgroundElement::default());
        assert_eq!(background.effective_color(), Some(Rgb::WHITE));
        assert_eq!(background.effective_font_size(), None);

        assert_eq!(Element::logo("logo.png").effective_color(), None);
    }

    #[test]
    fn test_rect_requires_position() {
        let unplaced = Element::packshot("p.png");
        assert_eq!(unplaced.rect(), None);

        let mut partial = Element::packshot("p.png");
        partial.frame_mut().x = Some(5.0);
        partial.frame_mut().y = Some(6.0);
        assert_eq!(partial.rect(), Some(Rect::new(5.0, 6.0, 0.0, 0.0)));
    }

    #[test]
    fn test_setters_respect_kind() {
        let mut logo = Element::logo("l.png");
        assert!(!logo.set_text("nope"));
        assert!(!logo.set_color("#FFFFFF"));
        assert!(!logo.set_font_size(12.0));

        let mut sub = Element::subhead("a");
        assert!(sub.set_text("b"));
        assert!(sub.set_font_size(30.0));
        assert_eq!(sub.text_content(), Some("b"));
        assert_eq!(sub.effective_font_size(), Some(30.0));
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let json = serde_json::to_string(&Element::logo("brand.png")).unwrap();
        assert_eq!(json, r#"{"type":"logo","asset":"brand.png"}"#);
    }

    #[test]
    fn test_label() {
        assert_eq!(Element::logo("l").label(3), "logo#3");
        assert_eq!(Element::logo("l").with_id("brand").label(3), "brand");
    }
}
