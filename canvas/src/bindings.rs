//! JavaScript entry points for the export serializer.
//!
//! Interactive editing goes through [`crate::engine::Engine`]; these
//! functions cover hosts that only hold a saved project document.

#[cfg(test)]
#[path = "bindings_test.rs"]
mod bindings_test;

use wasm_bindgen::prelude::*;

use crate::export::{self, ExportFormat};
use crate::geometry::polygon_clip_path;
use crate::scene::{Project, ProjectError};

/// Decode `project_json` and export its live page.
///
/// # Errors
///
/// Returns [`ProjectError::Decode`] if the document is not a valid project.
pub fn export_json(project_json: &str, format: ExportFormat) -> Result<String, ProjectError> {
    let project = Project::from_json(project_json)?;
    Ok(export::export(&project, format))
}

/// # Errors
///
/// Rejects with the decode error message if `project_json` is malformed.
#[wasm_bindgen(js_name = exportHtml)]
pub fn export_html(project_json: &str) -> Result<String, JsValue> {
    export_json(project_json, ExportFormat::Html).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// # Errors
///
/// Rejects with the decode error message if `project_json` is malformed.
#[wasm_bindgen(js_name = exportCss)]
pub fn export_css(project_json: &str) -> Result<String, JsValue> {
    export_json(project_json, ExportFormat::Css).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// CSS `clip-path` for a regular polygon, as used by the canvas preview.
#[wasm_bindgen(js_name = polygonClipPath)]
#[must_use]
pub fn polygon_clip_path_js(sides: u32) -> String {
    polygon_clip_path(sides as usize)
}
