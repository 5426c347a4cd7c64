//! Shared numeric constants for the canvas crate.

// ── Geometry ────────────────────────────────────────────────────

/// Smallest width or height a resize gesture may produce, in canvas pixels.
pub const MIN_ELEMENT_SIZE: f64 = 20.0;

/// Clip path used for triangle shapes.
pub const TRIANGLE_CLIP_PATH: &str = "polygon(50% 0%, 0% 100%, 100% 100%)";

// ── Hit-testing ─────────────────────────────────────────────────

/// Hit slop in pixels around resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance above the top edge to the rotate handle center, in pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 20.0;

/// Hit radius of the rotate handle, in pixels.
pub const ROTATE_HANDLE_RADIUS_PX: f64 = 12.0;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of snapshots retained.
pub const HISTORY_LIMIT: usize = 50;

/// Quiet period before a pending snapshot is committed.
pub const HISTORY_DEBOUNCE_MS: u64 = 400;

// ── Pages ───────────────────────────────────────────────────────

/// Page id that selects the top-level default page.
pub const MAIN_PAGE_ID: &str = "main";

pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 1200.0;
pub const DEFAULT_CANVAS_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_PROJECT_NAME: &str = "Untitled Project";
