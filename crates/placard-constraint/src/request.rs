//! Request and response shapes for the validation boundary

use placard_core::{CanvasContext, CanvasSize, Channel, Result, RetailerPolicy};
use placard_scene::{Element, ElementKind, Scene};
use serde::{Deserialize, Serialize};

fn default_canvas_size() -> String {
    "1080x1920".to_string()
}

/// `{ layout, canvas_size, is_alcohol, channel }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub layout: Scene,
    /// `"WxH"` in pixels
    #[serde(default = "default_canvas_size")]
    pub canvas_size: String,
    #[serde(default)]
    pub is_alcohol: bool,
    #[serde(default)]
    pub channel: Channel,
}

impl ValidateRequest {
    pub fn new(layout: Scene) -> Self {
        Self {
            layout,
            canvas_size: default_canvas_size(),
            is_alcohol: false,
            channel: Channel::default(),
        }
    }

    /// Parse the canvas size and build the evaluation context
    pub fn context(&self) -> Result<CanvasContext> {
        let canvas = CanvasSize::parse(&self.canvas_size)?;
        Ok(CanvasContext::new(canvas, self.channel, self.is_alcohol))
    }

    /// Parse a JSON request body
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Scalar copy for a pre-assembly check
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuickCheckRequest {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub subhead: Option<String>,
    #[serde(default, alias = "tesco_tag")]
    pub retailer_tag: Option<String>,
    #[serde(default)]
    pub is_alcohol: bool,
}

impl QuickCheckRequest {
    /// Throwaway scene holding the copy. A missing retailer tag stands in as
    /// the policy's canonical tag.
    pub fn scene(&self, retailer: &RetailerPolicy) -> Scene {
        let tag = self
            .retailer_tag
            .as_deref()
            .unwrap_or(retailer.canonical_tag.as_str());
        let mut scene = Scene::new("quick-check");
        for (kind, text) in [
            (ElementKind::Headline, self.headline.as_deref()),
            (ElementKind::Subhead, self.subhead.as_deref()),
            (ElementKind::RetailerTag, Some(tag)),
        ] {
            if let Some(text) = text {
                scene.elements.push(Element::text(kind, text));
            }
        }
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = ValidateRequest::from_json(r#"{ "layout": { "id": "a" } }"#).unwrap();
        assert_eq!(request.canvas_size, "1080x1920");
        assert!(!request.is_alcohol);
        assert_eq!(request.channel, Channel::Stories);

        let ctx = request.context().unwrap();
        assert_eq!(ctx.canvas, CanvasSize::STORY);
        assert!(!ctx.regulated);
    }

    #[test]
    fn test_full_request() {
        let request = ValidateRequest::from_json(
            r#"{
                "layout": { "id": "b", "score": 0.8, "elements": [ { "type": "drinkaware" } ] },
                "canvas_size": "1200x628",
                "is_alcohol": true,
                "channel": "in_store"
            }"#,
        )
        .unwrap();
        let ctx = request.context().unwrap();
        assert_eq!(ctx.canvas, CanvasSize::new(1200.0, 628.0));
        assert_eq!(ctx.channel, Channel::InStore);
        assert!(ctx.regulated);
        assert_eq!(request.layout.elements.len(), 1);
    }

    #[test]
    fn test_unknown_channel_accepted() {
        let request =
            ValidateRequest::from_json(r#"{ "layout": { "id": "c" }, "channel": "tiktok" }"#)
                .unwrap();
        assert_eq!(request.channel, Channel::Unknown);
    }

    #[test]
    fn test_bad_canvas_size() {
        let mut request = ValidateRequest::new(Scene::new("d"));
        request.canvas_size = "wide".to_string();
        assert!(request.context().is_err());
    }

    #[test]
    fn test_quick_check_tag_alias() {
        let request: QuickCheckRequest =
            serde_json::from_str(r#"{ "headline": "Hi", "tesco_tag": "Only at Tesco" }"#).unwrap();
        assert_eq!(request.retailer_tag.as_deref(), Some("Only at Tesco"));
        assert!(request.subhead.is_none());
    }

    #[test]
    fn test_quick_check_scene_defaults_tag() {
        let policy = RetailerPolicy::default();
        let request: QuickCheckRequest = serde_json::from_str(r#"{ "headline": "Hi" }"#).unwrap();
        let scene = request.scene(&policy);
        assert_eq!(scene.elements.len(), 2);
        let (_, tag) = scene.of_kind(ElementKind::RetailerTag).next().unwrap();
        assert_eq!(tag.text_content(), Some("Available at Tesco"));

        let given = QuickCheckRequest {
            retailer_tag: Some("Only at Tesco".to_string()),
            ..request
        };
        let scene = given.scene(&policy);
        let (_, tag) = scene.of_kind(ElementKind::RetailerTag).next().unwrap();
        assert_eq!(tag.text_content(), Some("Only at Tesco"));
    }
}
