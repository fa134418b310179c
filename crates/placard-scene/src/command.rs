//! Editor commands
//!
//! The editor never mutates a scene in place. Each [`SceneCommand`] takes the
//! current snapshot and returns a new one, and the host re-validates the
//! result. A rejected command leaves the caller's snapshot untouched.

use crate::element::{Element, ElementKind, Positioned};
use crate::format::Scene;
use placard_core::geometry::{resolve_snap, scale_font_size, to_percent};
use placard_core::{CanvasSize, PlacardError, Rect, Result, Rgb, SafeZone, SnapResult};

/// A single editor mutation
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    /// Append an element at the end of the sequence
    AddElement(Element),
    /// Remove an element. Removing the only background is refused.
    RemoveElement { index: usize },
    /// Set the top-left corner, in percent
    Move { index: usize, x: f64, y: f64 },
    /// Set the size, in percent
    Resize { index: usize, width: f64, height: f64 },
    /// Drop a dragged element at a pixel position, snapping to nearby lines
    Drag {
        index: usize,
        x_px: f64,
        y_px: f64,
        canvas: CanvasSize,
        safe_zone: SafeZone,
        threshold: f64,
    },
    SetText { index: usize, text: String },
    /// Color as `#RRGGBB`; stored normalized to uppercase
    SetColor { index: usize, color: String },
    SetFontSize { index: usize, font_size: f64 },
    SetZ { index: usize, z: i32 },
    /// Swap in a whole new scene, e.g. a picked suggestion
    Replace(Scene),
    /// Rescale every font size from one canvas height to another
    Retarget { from: CanvasSize, to: CanvasSize },
}

impl SceneCommand {
    /// Apply the command to a snapshot, producing the next snapshot
    pub fn apply(&self, scene: &Scene) -> Result<Scene> {
        let mut next = scene.clone();
        match self {
            SceneCommand::AddElement(element) => {
                next.elements.push(element.clone());
            }

            SceneCommand::RemoveElement { index } => {
                let element = scene
                    .element(*index)
                    .ok_or(PlacardError::ElementNotFound(*index))?;
                if element.kind() == ElementKind::Background
                    && scene.count(ElementKind::Background) == 1
                {
                    return Err(PlacardError::CommandRejected(
                        "cannot remove the only background".to_string(),
                    ));
                }
                next.elements.remove(*index);
            }

            SceneCommand::Move { index, x, y } => {
                let frame = element_mut(&mut next, *index)?.frame_mut();
                frame.x = Some(*x);
                frame.y = Some(*y);
            }

            SceneCommand::Resize {
                index,
                width,
                height,
            } => {
                if *width < 0.0 || *height < 0.0 {
                    return Err(PlacardError::CommandRejected(format!(
                        "negative size {}x{}",
                        width, height
                    )));
                }
                let frame = element_mut(&mut next, *index)?.frame_mut();
                frame.width = Some(*width);
                frame.height = Some(*height);
            }

            SceneCommand::Drag {
                index,
                x_px,
                y_px,
                canvas,
                safe_zone,
                threshold,
            } => {
                let snap = drag_snap(scene, *index, *x_px, *y_px, *canvas, safe_zone, *threshold)?;
                let frame = element_mut(&mut next, *index)?.frame_mut();
                frame.x = Some(to_percent(snap.x, canvas.width));
                frame.y = Some(to_percent(snap.y, canvas.height));
            }

            SceneCommand::SetText { index, text } => {
                if !element_mut(&mut next, *index)?.set_text(text) {
                    return Err(rejected(scene, *index, "text"));
                }
            }

            SceneCommand::SetColor { index, color } => {
                let rgb = Rgb::parse(color)?;
                if !element_mut(&mut next, *index)?.set_color(&rgb.to_hex()) {
                    return Err(rejected(scene, *index, "color"));
                }
            }

            SceneCommand::SetFontSize { index, font_size } => {
                if !font_size.is_finite() || *font_size <= 0.0 {
                    return Err(PlacardError::CommandRejected(format!(
                        "invalid font size {}",
                        font_size
                    )));
                }
                if !element_mut(&mut next, *index)?.set_font_size(*font_size) {
                    return Err(rejected(scene, *index, "font size"));
                }
            }

            SceneCommand::SetZ { index, z } => {
                element_mut(&mut next, *index)?.frame_mut().z = Some(*z);
            }

            SceneCommand::Replace(replacement) => {
                next = replacement.clone();
            }

            SceneCommand::Retarget { from, to } => {
                for element in &mut next.elements {
                    if let Some(text) = element.as_text_mut() {
                        if let Some(size) = text.font_size {
                            text.font_size = Some(scale_font_size(size, from.height, to.height));
                        }
                    }
                }
            }
        }

        tracing::debug!(scene = %next.id, command = self.name(), "command applied");
        Ok(next)
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            SceneCommand::AddElement(_) => "add",
            SceneCommand::RemoveElement { .. } => "remove",
            SceneCommand::Move { .. } => "move",
            SceneCommand::Resize { .. } => "resize",
            SceneCommand::Drag { .. } => "drag",
            SceneCommand::SetText { .. } => "set_text",
            SceneCommand::SetColor { .. } => "set_color",
            SceneCommand::SetFontSize { .. } => "set_font_size",
            SceneCommand::SetZ { .. } => "set_z",
            SceneCommand::Replace(_) => "replace",
            SceneCommand::Retarget { .. } => "retarget",
        }
    }
}

/// Snap a drag of element `index` whose top-left corner is at
/// (`x_px`, `y_px`). The element must have a size; an unplaced element
/// counts as zero-sized.
pub fn drag_snap(
    scene: &Scene,
    index: usize,
    x_px: f64,
    y_px: f64,
    canvas: CanvasSize,
    safe_zone: &SafeZone,
    threshold: f64,
) -> Result<SnapResult> {
    let element = scene
        .element(index)
        .ok_or(PlacardError::ElementNotFound(index))?;
    let frame = element.frame();
    let size = Rect::new(
        0.0,
        0.0,
        frame.width.unwrap_or(0.0),
        frame.height.unwrap_or(0.0),
    )
    .to_absolute(canvas);

    let points = scene.snap_points(index, canvas, safe_zone);
    Ok(resolve_snap(
        x_px,
        y_px,
        size.width,
        size.height,
        &points,
        threshold,
    ))
}

fn element_mut(scene: &mut Scene, index: usize) -> Result<&mut Element> {
    scene
        .elements
        .get_mut(index)
        .ok_or(PlacardError::ElementNotFound(index))
}

fn rejected(scene: &Scene, index: usize, what: &str) -> PlacardError {
    let kind = scene
        .element(index)
        .map(|e| e.kind().as_str())
        .unwrap_or("element");
    PlacardError::CommandRejected(format!("{} has no {}", kind, what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use placard_core::geometry::DEFAULT_SNAP_THRESHOLD;
    use placard_core::SnapKind;

    fn scene() -> Scene {
        Scene::new("cmd")
            .with(Element::background("#FFFFFF"))
            .with(Element::headline("Hello").with_rect(10.0, 40.0, 80.0, 10.0))
            .with(Element::logo("l.png").with_rect(70.0, 5.0, 20.0, 5.0))
    }

    #[test]
    fn test_apply_is_copy_on_write() {
        let before = scene();
        let after = SceneCommand::Move {
            index: 1,
            x: 5.0,
            y: 60.0,
        }
        .apply(&before)
        .unwrap();

        assert_eq!(before.elements[1].rect().unwrap().y, 40.0);
        assert_eq!(after.elements[1].rect(), Some(Rect::new(5.0, 60.0, 80.0, 10.0)));
    }

    #[test]
    fn test_remove_only_background_refused() {
        let result = SceneCommand::RemoveElement { index: 0 }.apply(&scene());
        assert!(matches!(result, Err(PlacardError::CommandRejected(_))));

        let two = scene().with(Element::background("#000000"));
        let after = SceneCommand::RemoveElement { index: 0 }.apply(&two).unwrap();
        assert_eq!(after.count(ElementKind::Background), 1);
    }

    #[test]
    fn test_missing_index() {
        let result = SceneCommand::SetZ { index: 9, z: 1 }.apply(&scene());
        assert!(matches!(result, Err(PlacardError::ElementNotFound(9))));
    }

    #[test]
    fn test_set_color_normalizes_and_validates() {
        let after = SceneCommand::SetColor {
            index: 1,
            color: "#ff0000".to_string(),
        }
        .apply(&scene())
        .unwrap();
        assert_eq!(after.elements[1].color(), Some("#FF0000"));

        let bad = SceneCommand::SetColor {
            index: 1,
            color: "red".to_string(),
        }
        .apply(&scene());
        assert!(matches!(bad, Err(PlacardError::InvalidColor(_))));

        let logo = SceneCommand::SetColor {
            index: 2,
            color: "#000000".to_string(),
        }
        .apply(&scene());
        assert!(matches!(logo, Err(PlacardError::CommandRejected(_))));
    }

    #[test]
    fn test_set_font_size_rejects_nonpositive() {
        let result = SceneCommand::SetFontSize {
            index: 1,
            font_size: 0.0,
        }
        .apply(&scene());
        assert!(result.is_err());
    }

    #[test]
    fn test_drag_snaps_center_exactly() {
        let canvas = CanvasSize::STORY;
        // headline is 80% of 1080 = 864px wide; center lands at 545px
        let x_px = 545.0 - 432.0;
        let after = SceneCommand::Drag {
            index: 1,
            x_px,
            y_px: 1000.0,
            canvas,
            safe_zone: SafeZone::default(),
            threshold: DEFAULT_SNAP_THRESHOLD,
        }
        .apply(&scene())
        .unwrap();

        let rect = after.elements[1].rect().unwrap().to_absolute(canvas);
        assert_eq!(rect.center_x(), 540.0);
    }

    #[test]
    fn test_drag_snap_reports_line() {
        let snap = drag_snap(
            &scene(),
            1,
            113.0,
            1000.0,
            CanvasSize::STORY,
            &SafeZone::default(),
            DEFAULT_SNAP_THRESHOLD,
        )
        .unwrap();
        assert_eq!(snap.snapped_x.map(|p| p.kind), Some(SnapKind::Center));
    }

    #[test]
    fn test_retarget_scales_fonts() {
        let scene = Scene::new("r").with(Element::headline("Big").with_font_size(64.0));
        let after = SceneCommand::Retarget {
            from: CanvasSize::STORY,
            to: CanvasSize::new(1080.0, 1080.0),
        }
        .apply(&scene)
        .unwrap();
        // 64 * 1080 / 1920 = 36
        assert_eq!(after.elements[0].effective_font_size(), Some(36.0));
    }

    #[test]
    fn test_replace() {
        let other = Scene::new("other");
        let after = SceneCommand::Replace(other.clone()).apply(&scene()).unwrap();
        assert_eq!(after, other);
    }
}
