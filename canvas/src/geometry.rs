//! Geometry engine: pure math that turns pointer deltas into element
//! position, size and rotation, plus derived shapes (regular polygon clip
//! paths).
//!
//! Everything here is stateless and works in canvas pixels. The interaction
//! controller in [`crate::engine`] owns the gesture context and calls into
//! these functions on every pointer-move.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_ELEMENT_SIZE;

/// A point in canvas (or client) pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise `self - other`.
    #[must_use]
    pub fn delta_from(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Width and height of an element box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle (e.g. a DOM bounding rect).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One of the eight compass handles around a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    /// All handles, clockwise from north.
    pub const ALL: [ResizeHandle; 8] =
        [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Parse a compass token such as `"nw"` or `"e"`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "n" => Some(Self::N),
            "ne" => Some(Self::Ne),
            "e" => Some(Self::E),
            "se" => Some(Self::Se),
            "s" => Some(Self::S),
            "sw" => Some(Self::Sw),
            "w" => Some(Self::W),
            "nw" => Some(Self::Nw),
            _ => None,
        }
    }

    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::N => "n",
            Self::Ne => "ne",
            Self::E => "e",
            Self::Se => "se",
            Self::S => "s",
            Self::Sw => "sw",
            Self::W => "w",
            Self::Nw => "nw",
        }
    }

    #[must_use]
    pub fn has_north(self) -> bool {
        self.token().contains('n')
    }

    #[must_use]
    pub fn has_south(self) -> bool {
        self.token().contains('s')
    }

    #[must_use]
    pub fn has_east(self) -> bool {
        self.token().contains('e')
    }

    #[must_use]
    pub fn has_west(self) -> bool {
        self.token().contains('w')
    }

    /// CSS cursor shown while hovering this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }
}

/// Translate a pre-gesture position by the pointer delta. No clamping:
/// elements may be dragged partially or fully off the canvas.
#[must_use]
pub fn apply_drag(origin: Point, delta: Point) -> Point {
    Point::new(origin.x + delta.x, origin.y + delta.y)
}

/// Resize a pre-gesture box by the pointer delta using the default floor.
#[must_use]
pub fn apply_resize(handle: ResizeHandle, origin: Size, delta: Point) -> Size {
    apply_resize_with_floor(handle, origin, delta, MIN_ELEMENT_SIZE)
}

/// Resize a pre-gesture box by the pointer delta.
///
/// East grows the width by `dx`, west shrinks it by `dx`; south and north do
/// the same for the height with `dy`. Each dimension is floored at `floor`
/// independently. Only the size changes; the top-left corner stays put.
#[must_use]
pub fn apply_resize_with_floor(handle: ResizeHandle, origin: Size, delta: Point, floor: f64) -> Size {
    let mut width = origin.width;
    let mut height = origin.height;

    if handle.has_east() {
        width += delta.x;
    }
    if handle.has_west() {
        width -= delta.x;
    }
    if handle.has_south() {
        height += delta.y;
    }
    if handle.has_north() {
        height -= delta.y;
    }

    Size::new(width.max(floor), height.max(floor))
}

/// Angle in degrees from `center` to `pointer`, as `atan2(dy, dx)`.
#[must_use]
pub fn angle_from_center(center: Point, pointer: Point) -> f64 {
    (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees()
}

/// Rotation after the pointer swept from `start_angle` to `current_angle`
/// (both in degrees, measured from the element's visual center).
///
/// Rotation is additive and unbounded; the result is rounded to the nearest
/// whole degree with halves rounding up.
#[must_use]
pub fn apply_rotate(start_angle: f64, current_angle: f64, base_rotation: f64) -> f64 {
    round_half_up(base_rotation + (current_angle - start_angle))
}

/// Round to the nearest integer, halves toward positive infinity.
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Rotate `pt` around `center` by `degrees` (clockwise in screen space).
#[must_use]
pub fn rotate_about(pt: Point, center: Point, degrees: f64) -> Point {
    if degrees == 0.0 {
        return pt;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = pt.x - center.x;
    let dy = pt.y - center.y;
    Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

/// Vertices of a regular polygon inscribed in the unit box, as percentages.
///
/// `sides` vertices are spaced evenly on the circle starting at the top
/// (−90°). Each vertex is `(50 + 50·cos θ, 50 + 50·sin θ)`. Fewer than three
/// sides are not rejected; the caller decides what a degenerate path means.
#[must_use]
pub fn regular_polygon_path(sides: usize) -> Vec<Point> {
    #[allow(clippy::cast_precision_loss)]
    let step = 2.0 * PI / sides as f64;
    let start = -PI / 2.0;

    (0..sides)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = start + i as f64 * step;
            Point::new(50.0 + 50.0 * angle.cos(), 50.0 + 50.0 * angle.sin())
        })
        .collect()
}

/// CSS `clip-path` value for a regular polygon with `sides` vertices.
#[must_use]
pub fn polygon_clip_path(sides: usize) -> String {
    let mut out = String::from("polygon(");
    for (i, p) in regular_polygon_path(sides).iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&format!("{}% {}%", format_number(p.x), format_number(p.y)));
    }
    out.push(')');
    out
}

/// Shortest round-trip decimal form of `value`, with negative zero printed as `0`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 { "0".to_string() } else { value.to_string() }
}
