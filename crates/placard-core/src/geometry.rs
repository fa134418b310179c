//! Percentage/pixel conversion, bounding boxes and drag snapping
//!
//! Scene coordinates are percentages of the canvas (0-100 on each axis) so a
//! layout is resolution independent. Snapping and band tests work in pixels,
//! where the threshold and the channel bands are defined.

use crate::channel::{CanvasSize, SafeZone};
use serde::{Deserialize, Serialize};

/// Default snap distance in pixels
pub const DEFAULT_SNAP_THRESHOLD: f64 = 10.0;

/// Inset of the margin guide lines, percent of each canvas dimension
pub const GUIDE_INSET_PCT: f64 = 5.0;

/// Smallest font size produced by [`scale_font_size`]
pub const MIN_SCALED_FONT: f64 = 8.0;

/// Slack for containment tests, absorbing float error from clamping
const EPSILON: f64 = 1e-9;

/// Percentage of `total` to an absolute length
pub fn to_absolute(pct: f64, total: f64) -> f64 {
    pct / 100.0 * total
}

/// Absolute length to a percentage of `total`
pub fn to_percent(px: f64, total: f64) -> f64 {
    px / total * 100.0
}

/// Scale a font size authored for `base_height` to `target_height`, with a
/// floor of 8px.
pub fn scale_font_size(size: f64, base_height: f64, target_height: f64) -> f64 {
    (size * (target_height / base_height)).floor().max(MIN_SCALED_FONT)
}

/// Axis-aligned box. Units depend on context (percent or pixels).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full canvas in percentage space
    pub const FULL: Self = Self::new(0.0, 0.0, 100.0, 100.0);

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Interiors overlap. Boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// `other` lies entirely inside `self` (edges inclusive)
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x - EPSILON
            && other.y >= self.y - EPSILON
            && other.right() <= self.right() + EPSILON
            && other.bottom() <= self.bottom() + EPSILON
    }

    /// Separation between two boxes: the larger of the horizontal and
    /// vertical gaps, 0 when they touch or overlap
    pub fn gap(&self, other: &Rect) -> f64 {
        let horizontal = (other.x - self.right()).max(self.x - other.right()).max(0.0);
        let vertical = (other.y - self.bottom()).max(self.y - other.bottom()).max(0.0);
        horizontal.max(vertical)
    }

    /// Grown by `margin` on every side
    pub fn expanded(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Convert a percentage box to canvas pixels
    pub fn to_absolute(&self, canvas: CanvasSize) -> Rect {
        Rect::new(
            to_absolute(self.x, canvas.width),
            to_absolute(self.y, canvas.height),
            to_absolute(self.width, canvas.width),
            to_absolute(self.height, canvas.height),
        )
    }

    /// Convert a pixel box to canvas percentages
    pub fn to_percent(&self, canvas: CanvasSize) -> Rect {
        Rect::new(
            to_percent(self.x, canvas.width),
            to_percent(self.y, canvas.height),
            to_percent(self.width, canvas.width),
            to_percent(self.height, canvas.height),
        )
    }

    /// Every field is a finite number
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Move (and if necessary shrink) a percentage box back inside the canvas.
    ///
    /// Non-finite fields and negative sizes become 0 first, so the result is
    /// always a finite box within `FULL`.
    pub fn clamped_to_canvas(&self) -> Rect {
        let width = finite_or_zero(self.width).clamp(0.0, 100.0);
        let height = finite_or_zero(self.height).clamp(0.0, 100.0);
        Rect::new(
            finite_or_zero(self.x).clamp(0.0, 100.0 - width),
            finite_or_zero(self.y).clamp(0.0, 100.0 - height),
            width,
            height,
        )
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Which excluded bands a box (in percentage space) reaches into
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BandHits {
    pub top: bool,
    pub bottom: bool,
}

impl BandHits {
    pub fn any(&self) -> bool {
        self.top || self.bottom
    }
}

/// Test a percentage box against a channel's excluded bands, in pixels
pub fn band_hits(rect_pct: &Rect, canvas: CanvasSize, zone: &SafeZone) -> BandHits {
    if zone.is_empty() {
        return BandHits::default();
    }
    let px = rect_pct.to_absolute(canvas);
    BandHits {
        top: zone.top > 0.0 && px.y < zone.top_px(canvas.height),
        bottom: zone.bottom > 0.0 && px.bottom() > zone.bottom_start_px(canvas.height),
    }
}

/// Snap axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapAxis {
    X,
    Y,
}

/// What produced a snap line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapKind {
    Center,
    Guide,
    SafeZone,
    Element,
}

/// A snap line at `value` pixels along `axis`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapPoint {
    pub axis: SnapAxis,
    pub value: f64,
    pub kind: SnapKind,
}

impl SnapPoint {
    pub const fn new(axis: SnapAxis, value: f64, kind: SnapKind) -> Self {
        Self { axis, value, kind }
    }
}

/// Collect snap lines for a drag.
///
/// `others` are the percentage boxes of the elements the dragged element may
/// align to; the caller leaves out the dragged element and backgrounds. The
/// order of the result is the order [`resolve_snap`] scans: canvas center,
/// margin guides, safe-zone edges, then element edges.
pub fn collect_snap_points(
    others: &[Rect],
    canvas: CanvasSize,
    zone: &SafeZone,
) -> Vec<SnapPoint> {
    use SnapAxis::{X, Y};

    let (w, h) = (canvas.width, canvas.height);
    let mut points = vec![
        SnapPoint::new(X, w / 2.0, SnapKind::Center),
        SnapPoint::new(Y, h / 2.0, SnapKind::Center),
        SnapPoint::new(X, to_absolute(GUIDE_INSET_PCT, w), SnapKind::Guide),
        SnapPoint::new(X, to_absolute(100.0 - GUIDE_INSET_PCT, w), SnapKind::Guide),
        SnapPoint::new(Y, to_absolute(GUIDE_INSET_PCT, h), SnapKind::Guide),
        SnapPoint::new(Y, to_absolute(100.0 - GUIDE_INSET_PCT, h), SnapKind::Guide),
    ];

    if zone.top > 0.0 {
        points.push(SnapPoint::new(Y, zone.top_px(h), SnapKind::SafeZone));
    }
    if zone.bottom > 0.0 {
        points.push(SnapPoint::new(Y, zone.bottom_start_px(h), SnapKind::SafeZone));
    }

    for rect in others {
        let px = rect.to_absolute(canvas);
        for value in [px.x, px.center_x(), px.right()] {
            points.push(SnapPoint::new(X, value, SnapKind::Element));
        }
        for value in [px.y, px.center_y(), px.bottom()] {
            points.push(SnapPoint::new(Y, value, SnapKind::Element));
        }
    }

    points
}

/// Outcome of a snap: the adjusted top-left corner and the lines hit, if any
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapResult {
    pub x: f64,
    pub y: f64,
    pub snapped_x: Option<SnapPoint>,
    pub snapped_y: Option<SnapPoint>,
}

/// First-fit snapping of a dragged box (all values in pixels).
///
/// Each axis is handled independently. Points are scanned in slice order and,
/// per point, the leading edge, center and trailing edge are tried in that
/// order; the first one within `threshold` wins. This is first-fit, not
/// best-fit: a nearer line later in the list is ignored once an earlier one
/// matched.
pub fn resolve_snap(
    current_x: f64,
    current_y: f64,
    width: f64,
    height: f64,
    points: &[SnapPoint],
    threshold: f64,
) -> SnapResult {
    let (x, snapped_x) = snap_axis(current_x, width, SnapAxis::X, points, threshold);
    let (y, snapped_y) = snap_axis(current_y, height, SnapAxis::Y, points, threshold);
    SnapResult {
        x,
        y,
        snapped_x,
        snapped_y,
    }
}

fn snap_axis(
    start: f64,
    extent: f64,
    axis: SnapAxis,
    points: &[SnapPoint],
    threshold: f64,
) -> (f64, Option<SnapPoint>) {
    for point in points.iter().filter(|p| p.axis == axis) {
        // (edge position, offset from the edge back to the start)
        let anchors = [
            (start, 0.0),
            (start + extent / 2.0, extent / 2.0),
            (start + extent, extent),
        ];
        for (anchor, offset) in anchors {
            if (anchor - point.value).abs() <= threshold {
                return (point.value - offset, Some(*point));
            }
        }
    }
    (start, None)
}
