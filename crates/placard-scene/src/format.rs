//! Scene (layout) definitions

use crate::element::{Element, ElementKind, Positioned};
use placard_core::geometry::collect_snap_points;
use placard_core::{CanvasSize, Rect, Rgb, SafeZone, SnapPoint};
use serde::{Deserialize, Serialize};

/// The full declarative description of one creative.
///
/// Element order is not paint order; see [`Scene::paint_order`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    /// Advisory quality score in `[0, 1]`, never read by rules
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// A list of candidate scenes from the suggestion service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestionList {
    pub layouts: Vec<Scene>,
}

impl Scene {
    /// Create an empty scene
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            score: 0.0,
            elements: Vec::new(),
        }
    }

    /// Builder-style append
    pub fn with(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Indexed elements of one kind, in sequence order
    pub fn of_kind(&self, kind: ElementKind) -> impl Iterator<Item = (usize, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.kind() == kind)
    }

    pub fn has(&self, kind: ElementKind) -> bool {
        self.elements.iter().any(|e| e.kind() == kind)
    }

    pub fn count(&self, kind: ElementKind) -> usize {
        self.elements.iter().filter(|e| e.kind() == kind).count()
    }

    /// The first background element, if any
    pub fn background(&self) -> Option<&Element> {
        self.elements
            .iter()
            .find(|e| e.kind() == ElementKind::Background)
    }

    /// Background color for contrast checks; white when absent or malformed
    pub fn background_color(&self) -> Rgb {
        self.background()
            .and_then(|b| b.effective_color())
            .unwrap_or(Rgb::WHITE)
    }

    /// Number of elements other than backgrounds
    pub fn foreground_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| e.kind() != ElementKind::Background)
            .count()
    }

    /// Element indices back-to-front: ascending z, ties by sequence position
    pub fn paint_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.elements.len()).collect();
        // sort_by_key is stable, so equal z keeps sequence order
        order.sort_by_key(|&i| self.elements[i].z());
        order
    }

    /// Every text element's content joined with single spaces
    pub fn text_content(&self) -> String {
        self.elements
            .iter()
            .filter_map(|e| e.text_content())
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the scene has any non-empty text
    pub fn has_text(&self) -> bool {
        self.elements
            .iter()
            .filter_map(|e| e.text_content())
            .any(|t| !t.trim().is_empty())
    }

    /// Snap lines for dragging the element at `dragged`
    pub fn snap_points(&self, dragged: usize, canvas: CanvasSize, zone: &SafeZone) -> Vec<SnapPoint> {
        let others: Vec<Rect> = self
            .elements
            .iter()
            .enumerate()
            .filter(|(i, e)| *i != dragged && e.kind() != ElementKind::Background)
            .filter_map(|(_, e)| e.rect())
            .collect();
        collect_snap_points(&others, canvas, zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placard_core::SnapKind;

    fn sample() -> Scene {
        Scene::new("layout_1")
            .with(Element::background("#FFFFFF"))
            .with(Element::headline("Fresh").with_z(3))
            .with(Element::packshot("p.png").with_rect(30.0, 30.0, 40.0, 40.0))
            .with(Element::logo("l.png").with_z(3))
            .with(Element::subhead("  "))
    }

    #[test]
    fn test_scene_json_roundtrip_shape() {
        let json = r##"{
            "id": "test_1",
            "score": 0.9,
            "elements": [
                {"type": "background", "color": "#FFFFFF"},
                {"type": "headline", "text": "New Product Launch", "x": 10, "y": 50,
                 "width": 80, "height": 10, "font_size": 32, "color": "#000000"},
                {"type": "tesco_tag", "text": "Available at Tesco", "x": 5, "y": 85,
                 "width": 25, "height": 5}
            ]
        }"##;
        let scene: Scene = serde_json::from_str(json).unwrap();
        assert_eq!(scene.id, "test_1");
        assert_eq!(scene.elements.len(), 3);
        assert!(scene.has(ElementKind::RetailerTag));
    }

    #[test]
    fn test_missing_elements_defaults_to_empty() {
        let scene: Scene = serde_json::from_str(r#"{"id": "empty"}"#).unwrap();
        assert!(scene.elements.is_empty());
        assert_eq!(scene.score, 0.0);
    }

    #[test]
    fn test_paint_order() {
        // background(z0) packshot(z0) subhead(z0) headline(z3) logo(z3)
        assert_eq!(sample().paint_order(), vec![0, 2, 4, 1, 3]);
    }

    #[test]
    fn test_counts_and_lookup() {
        let scene = sample();
        assert_eq!(scene.foreground_count(), 4);
        assert_eq!(scene.count(ElementKind::Headline), 1);
        assert_eq!(scene.of_kind(ElementKind::Logo).next().map(|(i, _)| i), Some(3));
        assert_eq!(scene.background_color(), Rgb::WHITE);
    }

    #[test]
    fn test_background_color_default() {
        assert_eq!(Scene::new("x").background_color(), Rgb::WHITE);
        let dark = Scene::new("x").with(Element::background("#101010"));
        assert_eq!(dark.background_color(), Rgb::new(0x10, 0x10, 0x10));
    }

    #[test]
    fn test_text_content_skips_blank() {
        let scene = sample();
        assert_eq!(scene.text_content(), "Fresh");
        assert!(scene.has_text());
        assert!(!Scene::new("x").with(Element::subhead(" ")).has_text());
    }

    #[test]
    fn test_snap_points_exclude_dragged_and_background() {
        let scene = Scene::new("s")
            .with(Element::background("#FFFFFF").with_rect(0.0, 0.0, 100.0, 100.0))
            .with(Element::packshot("a").with_rect(10.0, 10.0, 10.0, 10.0))
            .with(Element::logo("b").with_rect(50.0, 50.0, 10.0, 10.0));

        let points = scene.snap_points(1, CanvasSize::STORY, &SafeZone::default());
        let element_points = points.iter().filter(|p| p.kind == SnapKind::Element).count();
        // only the logo contributes
        assert_eq!(element_points, 6);
    }
}
