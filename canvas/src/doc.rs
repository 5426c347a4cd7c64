//! Document model: canvas elements, their styles, and sparse updates.
//!
//! This module defines what sits on a page (`Element`, `ElementKind`), the
//! style bag attached to every element (`Styles`), the nested location
//! markers carried by world elements (`Location`), and the sparse-update
//! type used for every edit (`ElementPatch`).
//!
//! Field names serialize in camelCase so project files written by the
//! browser shell load unchanged. The page/project aggregate and the
//! element-list mutations live in [`crate::scene`].

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Opaque element identifier, unique within one element list.
pub type ElementId = String;

/// The kind of a canvas element. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Plain colored box.
    Div,
    /// Box painted with a background image.
    Image,
    /// Box with centered text content.
    Text,
    /// Geometric shape; see [`ShapeKind`].
    Shape,
    /// Image pinned to the viewport's bottom-right corner.
    Pagedoll,
    /// Image hosting percentage-positioned location markers.
    World,
}

impl ElementKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Div => "div",
            Self::Image => "image",
            Self::Text => "text",
            Self::Shape => "shape",
            Self::Pagedoll => "pagedoll",
            Self::World => "world",
        }
    }
}

/// Geometric variant of a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Rectangle,
    Triangle,
    Polygon,
    Ellipse,
}

/// Whether `x, y` are canvas offsets or viewport offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Fixed,
    Absolute,
}

/// Navigation target kind for a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Page,
    Url,
}

/// Navigation performed when the element is clicked in exported output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub target: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub open_in_new_tab: bool,
}

impl Link {
    #[must_use]
    pub fn url(target: impl Into<String>) -> Self {
        Self { kind: LinkKind::Url, target: target.into(), open_in_new_tab: false }
    }

    #[must_use]
    pub fn page(target: impl Into<String>) -> Self {
        Self { kind: LinkKind::Page, target: target.into(), open_in_new_tab: false }
    }
}

/// Corner radius: a bare number (pixels) or any CSS length string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BorderRadius {
    Px(f64),
    Css(String),
}

impl BorderRadius {
    /// CSS value, or `None` when the radius is zero or empty.
    #[must_use]
    pub fn to_css(&self) -> Option<String> {
        match self {
            Self::Px(v) if *v == 0.0 || v.is_nan() => None,
            Self::Px(v) => Some(format!("{}px", crate::geometry::format_number(*v))),
            Self::Css(s) if s.is_empty() => None,
            Self::Css(s) => Some(s.clone()),
        }
    }
}

/// Visual style bag. Known properties are typed; anything else lands in
/// `extra` and round-trips untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Styles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_repeat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<BorderRadius>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mix_blend_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_style: Option<String>,
    /// Forward-compatible escape hatch for properties without a typed field.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Button styling for a world location marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ButtonStyles {
    /// Styles given to a freshly placed marker.
    #[must_use]
    pub fn preset() -> Self {
        Self {
            background_color: Some("#1a1a1a".into()),
            color: Some("#ffffff".into()),
            border_color: Some("#ffffff".into()),
            border_width: Some(2.0),
            border_radius: Some(8.0),
            padding: Some("8px 14px".into()),
            font_size: Some("14px".into()),
            font_weight: Some("bold".into()),
            extra: BTreeMap::new(),
        }
    }

    /// Overlay every field present in `patch` onto `self`.
    pub fn merge(&mut self, patch: &ButtonStyles) {
        fn set<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
            if let Some(v) = src {
                *dst = Some(v.clone());
            }
        }
        set(&mut self.background_color, &patch.background_color);
        set(&mut self.color, &patch.color);
        set(&mut self.border_color, &patch.border_color);
        set(&mut self.border_width, &patch.border_width);
        set(&mut self.border_radius, &patch.border_radius);
        set(&mut self.padding, &patch.padding);
        set(&mut self.font_size, &patch.font_size);
        set(&mut self.font_weight, &patch.font_weight);
        for (k, v) in &patch.extra {
            self.extra.insert(k.clone(), v.clone());
        }
    }
}

/// A named marker inside a world element. `x` and `y` are percentages of
/// the world image, kept within `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
    #[serde(default)]
    pub button_styles: ButtonStyles,
}

/// A positioned, stylable unit on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, unbounded.
    #[serde(default)]
    pub rotation: f64,
    /// Stacking key; higher draws on top. Not necessarily contiguous.
    #[serde(default)]
    pub z_index: i64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_behavior: Option<ScrollBehavior>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,

    // Text payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,

    // Shape payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<ShapeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<u32>,

    // World payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,

    #[serde(default)]
    pub styles: Styles,
}

impl Element {
    /// A bare element of `kind` with a fresh id and no payload.
    #[must_use]
    pub fn new(kind: ElementKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: new_element_id(kind.as_str()),
            kind,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            z_index: 1,
            visible: true,
            locked: false,
            name: None,
            scroll_behavior: None,
            link: None,
            content: None,
            font_size: None,
            font_color: None,
            font_family: None,
            text_align: None,
            shape_type: None,
            sides: None,
            world_image: None,
            locations: Vec::new(),
            styles: Styles::default(),
        }
    }

    #[must_use]
    pub fn div() -> Self {
        let mut el = Self::new(ElementKind::Div, 100.0, 100.0, 200.0, 200.0);
        el.styles.background_color = Some("#3b82f6".into());
        el.styles.border_radius = Some(BorderRadius::Px(0.0));
        el.styles.opacity = Some(1.0);
        el
    }

    #[must_use]
    pub fn image(url: &str) -> Self {
        let mut el = Self::new(ElementKind::Image, 100.0, 100.0, 300.0, 200.0);
        el.id = new_element_id("img");
        el.styles.background_image = Some(format!("url({url})"));
        el.styles.background_size = Some("cover".into());
        el.styles.background_position = Some("center".into());
        el.styles.opacity = Some(1.0);
        el
    }

    #[must_use]
    pub fn pagedoll(url: &str) -> Self {
        let mut el = Self::new(ElementKind::Pagedoll, 10.0, 10.0, 200.0, 300.0);
        el.z_index = 100;
        el.scroll_behavior = Some(ScrollBehavior::Fixed);
        el.styles.background_image = Some(format!("url({url})"));
        el.styles.background_size = Some("contain".into());
        el.styles.background_position = Some("center".into());
        el.styles.background_repeat = Some("no-repeat".into());
        el.styles.opacity = Some(1.0);
        el
    }

    #[must_use]
    pub fn text(content: &str) -> Self {
        let mut el = Self::new(ElementKind::Text, 100.0, 100.0, 200.0, 50.0);
        el.content = Some(content.into());
        el.font_size = Some(16.0);
        el.font_color = Some("#000000".into());
        el.font_family = Some("Arial, sans-serif".into());
        el.text_align = Some("center".into());
        el.styles.background_color = Some("transparent".into());
        el.styles.opacity = Some(1.0);
        el
    }

    #[must_use]
    pub fn circle() -> Self {
        let mut el = Self::shape(ShapeKind::Circle, "circle", 150.0, 150.0, "#ef4444");
        el.styles.border_radius = Some(BorderRadius::Css("50%".into()));
        el
    }

    #[must_use]
    pub fn rectangle() -> Self {
        let mut el = Self::shape(ShapeKind::Rectangle, "rect", 200.0, 120.0, "#8b5cf6");
        el.styles.border_radius = Some(BorderRadius::Px(8.0));
        el
    }

    #[must_use]
    pub fn triangle() -> Self {
        Self::shape(ShapeKind::Triangle, "triangle", 150.0, 130.0, "#10b981")
    }

    #[must_use]
    pub fn polygon(sides: u32) -> Self {
        let mut el = Self::shape(ShapeKind::Polygon, "polygon", 150.0, 150.0, "#f59e0b");
        el.sides = Some(sides);
        el
    }

    #[must_use]
    pub fn world(image_url: &str) -> Self {
        let mut el = Self::new(ElementKind::World, 100.0, 100.0, 400.0, 300.0);
        el.world_image = Some(image_url.into());
        el.styles.opacity = Some(1.0);
        el
    }

    fn shape(shape: ShapeKind, prefix: &str, width: f64, height: f64, color: &str) -> Self {
        let mut el = Self::new(ElementKind::Shape, 100.0, 100.0, width, height);
        el.id = new_element_id(prefix);
        el.shape_type = Some(shape);
        el.styles.background_color = Some(color.into());
        el.styles.opacity = Some(1.0);
        el
    }

    /// Whether this is a shape of the given variant.
    #[must_use]
    pub fn is_shape(&self, shape: ShapeKind) -> bool {
        self.kind == ElementKind::Shape && self.shape_type == Some(shape)
    }

    /// Shallow-merge `patch` into this element. Returns `true` if any field
    /// changed value.
    pub fn apply_patch(&mut self, patch: &ElementPatch) -> bool {
        let before = self.clone();

        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(w) = patch.width {
            self.width = w;
        }
        if let Some(h) = patch.height {
            self.height = h;
        }
        if let Some(r) = patch.rotation {
            self.rotation = r;
        }
        if let Some(z) = patch.z_index {
            self.z_index = z;
        }
        if let Some(v) = patch.visible {
            self.visible = v;
        }
        if let Some(l) = patch.locked {
            self.locked = l;
        }
        if let Some(ref name) = patch.name {
            self.name = Some(name.clone());
        }
        if let Some(sb) = patch.scroll_behavior {
            self.scroll_behavior = Some(sb);
        }
        if let Some(ref link) = patch.link {
            self.link.clone_from(link);
        }
        if let Some(ref content) = patch.content {
            self.content = Some(content.clone());
        }
        if let Some(fs) = patch.font_size {
            self.font_size = Some(fs);
        }
        if let Some(ref fc) = patch.font_color {
            self.font_color = Some(fc.clone());
        }
        if let Some(ref ff) = patch.font_family {
            self.font_family = Some(ff.clone());
        }
        if let Some(ref ta) = patch.text_align {
            self.text_align = Some(ta.clone());
        }
        if let Some(st) = patch.shape_type {
            self.shape_type = Some(st);
        }
        if let Some(sides) = patch.sides {
            self.sides = Some(sides);
        }
        if let Some(ref wi) = patch.world_image {
            self.world_image = Some(wi.clone());
        }
        if let Some(ref locations) = patch.locations {
            self.locations.clone_from(locations);
        }
        if let Some(ref styles) = patch.styles {
            self.styles = styles.clone();
        }

        *self != before
    }
}

/// Sparse update for an element. Only present fields are applied; `styles`
/// and `locations` replace the whole value (shallow merge). `id` and `kind`
/// cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_behavior: Option<ScrollBehavior>,
    /// `Some(None)` (JSON `null`) removes the link.
    #[serde(default, deserialize_with = "deserialize_present", skip_serializing_if = "Option::is_none")]
    pub link: Option<Option<Link>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<ShapeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<Location>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Styles>,
}

impl ElementPatch {
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }

    #[must_use]
    pub fn size(width: f64, height: f64) -> Self {
        Self { width: Some(width), height: Some(height), ..Default::default() }
    }

    #[must_use]
    pub fn rotation(rotation: f64) -> Self {
        Self { rotation: Some(rotation), ..Default::default() }
    }

    #[must_use]
    pub fn z_index(z_index: i64) -> Self {
        Self { z_index: Some(z_index), ..Default::default() }
    }

    #[must_use]
    pub fn locations(locations: Vec<Location>) -> Self {
        Self { locations: Some(locations), ..Default::default() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Generate a fresh element id with a readable prefix, e.g. `div-<uuid>`.
#[must_use]
pub fn new_element_id(prefix: &str) -> ElementId {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Keeps an explicit JSON `null` as `Some(None)` instead of collapsing it.
pub(crate) fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn default_true() -> bool {
    true
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}
