//! Scene model: the project aggregate, its pages, and element-list
//! mutations.
//!
//! A [`Project`] carries the default page's data at its top level plus an
//! optional list of extra [`Page`]s. `current_page_id` selects which list is
//! live; `None` means the top-level page. Every element mutation here acts
//! on the live list and returns whether it applied, so callers can decide
//! what to broadcast. Unknown ids are silent no-ops.
//!
//! Selection is UI state and lives in [`crate::input::UiState`], not here.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EditorConfig;
use crate::consts::{DEFAULT_CANVAS_BACKGROUND, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_PROJECT_NAME, MAIN_PAGE_ID};
use crate::doc::{Element, ElementId, ElementPatch, new_element_id};

/// Error returned when a project document cannot be decoded or encoded.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("invalid project JSON: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode project: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Which neighbor to swap stacking order with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderDirection {
    /// Toward the top of the stack (higher z-index).
    Up,
    /// Toward the bottom of the stack.
    Down,
}

/// Source of a user-supplied font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSource {
    Google,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFont {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub source: FontSource,
}

/// A named, independent canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub name: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub canvas_background: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// Canvas geometry of whichever page is live.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSettings {
    pub width: f64,
    pub height: f64,
    pub background: String,
}

/// Sparse update for project/canvas settings. `name` applies to the
/// project; the canvas fields apply to the live page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_background: Option<String>,
}

/// Root aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub canvas_background: String,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_fonts: Vec<CustomFont>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROJECT_NAME.to_string(),
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            canvas_background: DEFAULT_CANVAS_BACKGROUND.to_string(),
            elements: Vec::new(),
            pages: Vec::new(),
            current_page_id: None,
            custom_fonts: Vec::new(),
        }
    }
}

impl Project {
    /// Decode a project document.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Decode`] if `json` is not a valid project.
    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        serde_json::from_str(json).map_err(ProjectError::Decode)
    }

    /// Encode as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ProjectError> {
        serde_json::to_string_pretty(self).map_err(ProjectError::Encode)
    }

    // --- Active page routing ---

    fn active_page_index(&self) -> Option<usize> {
        let id = self.current_page_id.as_deref()?;
        self.pages.iter().position(|p| p.id == id)
    }

    /// The live element list.
    #[must_use]
    pub fn active_elements(&self) -> &[Element] {
        match self.active_page_index() {
            Some(i) => &self.pages[i].elements,
            None => &self.elements,
        }
    }

    /// Mutable access to the live element list.
    pub fn active_elements_mut(&mut self) -> &mut Vec<Element> {
        match self.active_page_index() {
            Some(i) => &mut self.pages[i].elements,
            None => &mut self.elements,
        }
    }

    /// Canvas geometry of the live page.
    #[must_use]
    pub fn active_canvas(&self) -> CanvasSettings {
        match self.active_page_index() {
            Some(i) => {
                let page = &self.pages[i];
                CanvasSettings {
                    width: page.canvas_width,
                    height: page.canvas_height,
                    background: page.canvas_background.clone(),
                }
            }
            None => CanvasSettings {
                width: self.canvas_width,
                height: self.canvas_height,
                background: self.canvas_background.clone(),
            },
        }
    }

    /// Id of the live page, with [`MAIN_PAGE_ID`] standing for the top level.
    #[must_use]
    pub fn active_page_id(&self) -> &str {
        match self.active_page_index() {
            Some(i) => &self.pages[i].id,
            None => MAIN_PAGE_ID,
        }
    }

    /// Look up an element in the live list.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.active_elements().iter().find(|el| el.id == id)
    }

    /// Live elements sorted bottom-first by `(z_index, list order)`.
    #[must_use]
    pub fn sorted_elements(&self) -> Vec<&Element> {
        let mut els: Vec<&Element> = self.active_elements().iter().collect();
        els.sort_by_key(|el| el.z_index);
        els
    }

    // --- Element mutations ---

    /// Append an element to the live list on top of the stack.
    ///
    /// The z-index is always reassigned to one above the current maximum (or
    /// 1 on an empty list). An empty or colliding id is replaced with a
    /// fresh one. Returns the id the element ended up with.
    pub fn add_element(&mut self, mut element: Element) -> ElementId {
        let elements = self.active_elements_mut();

        if element.id.is_empty() || elements.iter().any(|el| el.id == element.id) {
            element.id = new_element_id(element.kind.as_str());
        }
        let max_z = elements.iter().map(|el| el.z_index).fold(0, i64::max);
        element.z_index = max_z + 1;

        let id = element.id.clone();
        elements.push(element);
        id
    }

    /// Shallow-merge `patch` into the element with `id`. Returns `true` if
    /// the element exists and a value changed.
    pub fn update_element(&mut self, id: &str, patch: &ElementPatch) -> bool {
        let Some(el) = self.active_elements_mut().iter_mut().find(|el| el.id == id) else {
            debug!(%id, "update for unknown element ignored");
            return false;
        };
        el.apply_patch(patch)
    }

    /// Remove the element with `id`, returning it if present.
    pub fn delete_element(&mut self, id: &str) -> Option<Element> {
        let elements = self.active_elements_mut();
        let Some(pos) = elements.iter().position(|el| el.id == id) else {
            debug!(%id, "delete for unknown element ignored");
            return None;
        };
        Some(elements.remove(pos))
    }

    /// Swap z-index with the neighbor in `direction` on the z-sorted stack.
    ///
    /// Only the two z-index values are exchanged; every other element keeps
    /// its value. Returns the neighbor's id, or `None` when `id` is unknown or
    /// already at that end of the stack.
    pub fn reorder_element(&mut self, id: &str, direction: ReorderDirection) -> Option<ElementId> {
        let elements = self.active_elements_mut();

        // Top of the stack first; ties keep list order.
        let mut order: Vec<usize> = (0..elements.len()).collect();
        order.sort_by(|&a, &b| elements[b].z_index.cmp(&elements[a].z_index));

        let Some(rank) = order.iter().position(|&i| elements[i].id == id) else {
            debug!(%id, "reorder for unknown element ignored");
            return None;
        };
        let neighbor_rank = match direction {
            ReorderDirection::Up => rank.checked_sub(1)?,
            ReorderDirection::Down => Some(rank + 1).filter(|r| *r < order.len())?,
        };

        let a = order[rank];
        let b = order[neighbor_rank];
        let za = elements[a].z_index;
        elements[a].z_index = elements[b].z_index;
        elements[b].z_index = za;

        Some(elements[b].id.clone())
    }

    // --- Canvas and pages ---

    /// Apply a settings patch. Returns `true` if anything changed.
    pub fn update_canvas_settings(&mut self, patch: &CanvasPatch) -> bool {
        let before = self.clone();

        if let Some(ref name) = patch.name {
            self.name.clone_from(name);
        }
        let (width, height, background) = match self.active_page_index() {
            Some(i) => {
                let page = &mut self.pages[i];
                (&mut page.canvas_width, &mut page.canvas_height, &mut page.canvas_background)
            }
            None => (&mut self.canvas_width, &mut self.canvas_height, &mut self.canvas_background),
        };
        if let Some(w) = patch.canvas_width {
            *width = w;
        }
        if let Some(h) = patch.canvas_height {
            *height = h;
        }
        if let Some(ref bg) = patch.canvas_background {
            background.clone_from(bg);
        }

        *self != before
    }

    /// Append a new empty page and return its id.
    ///
    /// The id is the creation timestamp in milliseconds, bumped until unique.
    /// The name is `Page N` where N is the page count after insertion.
    pub fn add_page(&mut self, now_ms: u64, config: &EditorConfig) -> String {
        let mut stamp = now_ms;
        while self.pages.iter().any(|p| p.id == stamp.to_string()) {
            stamp += 1;
        }
        let page = Page {
            id: stamp.to_string(),
            name: format!("Page {}", self.pages.len() + 1),
            canvas_width: config.page_width,
            canvas_height: config.page_height,
            canvas_background: config.page_background.clone(),
            elements: Vec::new(),
        };
        info!(page_id = %page.id, name = %page.name, "page added");
        let id = page.id.clone();
        self.pages.push(page);
        id
    }

    /// Switch the live page. `"main"` selects the top-level page. Returns
    /// `false` for an unknown page id.
    pub fn change_page(&mut self, page_id: &str) -> bool {
        if page_id == MAIN_PAGE_ID {
            self.current_page_id = None;
            return true;
        }
        if !self.pages.iter().any(|p| p.id == page_id) {
            debug!(%page_id, "change to unknown page ignored");
            return false;
        }
        self.current_page_id = Some(page_id.to_string());
        true
    }
}
