//! Editor tunables.
//!
//! The browser host has no environment to read from, so configuration is a
//! plain value handed to [`crate::engine::EngineCore::with_config`]. Every
//! field defaults to the constant of the same meaning in [`crate::consts`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CANVAS_BACKGROUND, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, HANDLE_RADIUS_PX, HISTORY_DEBOUNCE_MS,
    HISTORY_LIMIT, MIN_ELEMENT_SIZE, ROTATE_HANDLE_OFFSET_PX, ROTATE_HANDLE_RADIUS_PX,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Snapshots retained by the history manager.
    pub history_limit: usize,
    /// Quiet period before a pending snapshot is committed.
    pub history_debounce_ms: u64,
    /// Resize floor applied to width and height.
    pub min_element_size: f64,
    /// Geometry given to pages created by `add_page`.
    pub page_width: f64,
    pub page_height: f64,
    pub page_background: String,
    pub handle_radius_px: f64,
    pub rotate_handle_offset_px: f64,
    pub rotate_handle_radius_px: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: HISTORY_LIMIT,
            history_debounce_ms: HISTORY_DEBOUNCE_MS,
            min_element_size: MIN_ELEMENT_SIZE,
            page_width: DEFAULT_CANVAS_WIDTH,
            page_height: DEFAULT_CANVAS_HEIGHT,
            page_background: DEFAULT_CANVAS_BACKGROUND.to_string(),
            handle_radius_px: HANDLE_RADIUS_PX,
            rotate_handle_offset_px: ROTATE_HANDLE_OFFSET_PX,
            rotate_handle_radius_px: ROTATE_HANDLE_RADIUS_PX,
        }
    }
}

impl EditorConfig {
    /// History limit, never below one so the current state is always retained.
    #[must_use]
    pub fn effective_history_limit(&self) -> usize {
        self.history_limit.max(1)
    }
}
