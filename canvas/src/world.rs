//! Location markers inside world elements.
//!
//! These helpers compute the new `locations` list for a world element; the
//! engine applies the result through the ordinary element update path so
//! marker edits are recorded by history like any other change.

#[cfg(test)]
#[path = "world_test.rs"]
mod world_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::doc::{ButtonStyles, Link, Location};
use crate::geometry::{Point, Rect};

/// Sparse update for a location marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// `Some(None)` removes the link.
    #[serde(default, deserialize_with = "crate::doc::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub link: Option<Option<Link>>,
}

/// Clamp a percentage into `[0, 100]`.
#[must_use]
pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Convert a pointer position over the world image into clamped
/// percentages of `container`.
#[must_use]
pub fn location_position_from_pointer(pointer: Point, container: Rect) -> Point {
    if container.width <= 0.0 || container.height <= 0.0 {
        return Point::new(0.0, 0.0);
    }
    let x = (pointer.x - container.x) / container.width * 100.0;
    let y = (pointer.y - container.y) / container.height * 100.0;
    Point::new(clamp_percent(x), clamp_percent(y))
}

/// Append a marker named `Location N` at `(x, y)`. Returns the new list and
/// the new marker's id.
#[must_use]
pub fn with_location_added(locations: &[Location], x: f64, y: f64) -> (Vec<Location>, String) {
    let location = Location {
        id: Uuid::new_v4().to_string(),
        name: format!("Location {}", locations.len() + 1),
        x: clamp_percent(x),
        y: clamp_percent(y),
        link: None,
        button_styles: ButtonStyles::preset(),
    };
    let id = location.id.clone();
    let mut out = locations.to_vec();
    out.push(location);
    (out, id)
}

/// Move marker `id` to `(x, y)`, clamped. `None` when `id` is unknown.
#[must_use]
pub fn with_location_moved(locations: &[Location], id: &str, x: f64, y: f64) -> Option<Vec<Location>> {
    with_location_patched(locations, id, &LocationPatch { x: Some(x), y: Some(y), ..Default::default() })
}

/// Apply `patch` to marker `id`. `None` when `id` is unknown.
#[must_use]
pub fn with_location_patched(locations: &[Location], id: &str, patch: &LocationPatch) -> Option<Vec<Location>> {
    let pos = locations.iter().position(|l| l.id == id)?;
    let mut out = locations.to_vec();
    let loc = &mut out[pos];
    if let Some(ref name) = patch.name {
        loc.name.clone_from(name);
    }
    if let Some(x) = patch.x {
        loc.x = clamp_percent(x);
    }
    if let Some(y) = patch.y {
        loc.y = clamp_percent(y);
    }
    if let Some(ref link) = patch.link {
        loc.link.clone_from(link);
    }
    Some(out)
}

/// Merge `styles` into marker `id`'s button styles. `None` when `id` is unknown.
#[must_use]
pub fn with_location_styles(locations: &[Location], id: &str, styles: &ButtonStyles) -> Option<Vec<Location>> {
    let pos = locations.iter().position(|l| l.id == id)?;
    let mut out = locations.to_vec();
    out[pos].button_styles.merge(styles);
    Some(out)
}

/// Remove marker `id`. `None` when `id` is unknown.
#[must_use]
pub fn without_location(locations: &[Location], id: &str) -> Option<Vec<Location>> {
    let pos = locations.iter().position(|l| l.id == id)?;
    let mut out = locations.to_vec();
    out.remove(pos);
    Some(out)
}
