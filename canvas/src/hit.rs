//! Hit-testing pointer positions against page elements.
//!
//! Handles belong to the selected element and rotate with it, so handle and
//! body tests run in the element's local (unrotated) frame.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::config::EditorConfig;
use crate::doc::{Element, ElementId};
use crate::geometry::{Point, ResizeHandle, rotate_about};

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeHandle),
    RotateHandle,
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
    /// Locked elements absorb the pointer but never start a gesture.
    pub locked: bool,
}

/// Handle sizes used by the hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMetrics {
    pub handle_radius: f64,
    pub rotate_offset: f64,
    pub rotate_radius: f64,
}

impl From<&EditorConfig> for HandleMetrics {
    fn from(cfg: &EditorConfig) -> Self {
        Self {
            handle_radius: cfg.handle_radius_px,
            rotate_offset: cfg.rotate_handle_offset_px,
            rotate_radius: cfg.rotate_handle_radius_px,
        }
    }
}

/// Visual center of an element's box.
#[must_use]
pub fn element_center(el: &Element) -> Point {
    Point::new(el.x + el.width / 2.0, el.y + el.height / 2.0)
}

/// Convert a canvas point into `el`'s local frame: origin at the box's
/// top-left, axes aligned with the unrotated box.
#[must_use]
pub fn to_local(el: &Element, pt: Point) -> Point {
    let unrotated = rotate_about(pt, element_center(el), -el.rotation);
    Point::new(unrotated.x - el.x, unrotated.y - el.y)
}

/// Local-frame position of a resize handle on a `width` × `height` box.
#[must_use]
pub fn handle_position(handle: ResizeHandle, width: f64, height: f64) -> Point {
    let x = if handle.has_west() {
        0.0
    } else if handle.has_east() {
        width
    } else {
        width / 2.0
    };
    let y = if handle.has_north() {
        0.0
    } else if handle.has_south() {
        height
    } else {
        height / 2.0
    };
    Point::new(x, y)
}

/// Local-frame position of the rotate handle (centered above the top edge).
#[must_use]
pub fn rotate_handle_position(width: f64, metrics: &HandleMetrics) -> Point {
    Point::new(width / 2.0, -metrics.rotate_offset)
}

fn within(a: Point, b: Point, radius: f64) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy <= radius * radius
}

fn hit_handles(el: &Element, pt: Point, metrics: &HandleMetrics) -> Option<HitPart> {
    let local = to_local(el, pt);
    if within(local, rotate_handle_position(el.width, metrics), metrics.rotate_radius) {
        return Some(HitPart::RotateHandle);
    }
    ResizeHandle::ALL
        .into_iter()
        .find(|h| within(local, handle_position(*h, el.width, el.height), metrics.handle_radius))
        .map(HitPart::ResizeHandle)
}

fn hit_body(el: &Element, pt: Point) -> bool {
    let local = to_local(el, pt);
    local.x >= 0.0 && local.x <= el.width && local.y >= 0.0 && local.y <= el.height
}

/// Find what is under `pt`.
///
/// The selected element's handles are checked first (only when it is visible
/// and unlocked, matching when handles are drawn). Bodies are then tested
/// topmost-first by `(z_index, list order)`. Hidden elements are skipped.
#[must_use]
pub fn hit_test(pt: Point, elements: &[Element], selected: Option<&str>, metrics: &HandleMetrics) -> Option<Hit> {
    if let Some(sel) = selected.and_then(|id| elements.iter().find(|el| el.id == id))
        && sel.visible
        && !sel.locked
        && let Some(part) = hit_handles(sel, pt, metrics)
    {
        return Some(Hit { element_id: sel.id.clone(), part, locked: false });
    }

    let mut order: Vec<usize> = (0..elements.len()).collect();
    order.sort_by_key(|&i| elements[i].z_index);

    order
        .into_iter()
        .rev()
        .map(|i| &elements[i])
        .filter(|el| el.visible)
        .find(|el| hit_body(el, pt))
        .map(|el| Hit { element_id: el.id.clone(), part: HitPart::Body, locked: el.locked })
}
