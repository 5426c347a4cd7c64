use web_sys::HtmlElement;

use tracing::debug;

use crate::config::EditorConfig;
use crate::doc::{ButtonStyles, Element, ElementId, ElementKind, ElementPatch, Location};
use crate::export::{self, ExportFormat};
use crate::geometry::{Point, Size, angle_from_center, apply_drag, apply_resize_with_floor, apply_rotate};
use crate::hit::{HandleMetrics, HitPart, element_center, hit_test};
use crate::history::History;
use crate::input::{Button, InputState, Key, Modifiers, UiState};
use crate::scene::{CanvasPatch, Project, ReorderDirection};
use crate::world::{self, LocationPatch};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from engine entry points for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ElementCreated(Element),
    ElementUpdated { id: ElementId, patch: ElementPatch },
    ElementDeleted { id: ElementId },
    SelectionChanged(Option<ElementId>),
    PageAdded { id: String },
    /// Undo/redo swapped in a whole snapshot.
    ProjectReplaced(Box<Project>),
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// A snapshot is pending; the host should call `tick` at or after `due_at`.
    HistoryPending { due_at: u64 },
    SetCursor(String),
    PreventDefault,
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the DOM.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub project: Project,
    pub ui: UiState,
    pub input: InputState,
    pub history: History,
    pub config: EditorConfig,
    /// Host clock in milliseconds, advanced by [`EngineCore::tick`] and
    /// [`EngineCore::set_now`].
    pub now_ms: u64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        Self::with_project(Project::default(), config)
    }

    /// Start editing `project`. It becomes history entry 0.
    #[must_use]
    pub fn with_project(project: Project, config: EditorConfig) -> Self {
        Self {
            history: History::new(project.clone(), &config),
            project,
            ui: UiState::default(),
            input: InputState::default(),
            config,
            now_ms: 0,
        }
    }

    // --- Clock ---

    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Advance the clock and commit the pending snapshot if it is due.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Action> {
        self.set_now(now_ms);
        if self.history.poll(self.now_ms) { vec![self.history_changed()] } else { Vec::new() }
    }

    /// Commit the pending snapshot immediately.
    pub fn flush_history(&mut self) -> Vec<Action> {
        if self.history.flush() { vec![self.history_changed()] } else { Vec::new() }
    }

    fn history_changed(&self) -> Action {
        Action::HistoryChanged { can_undo: self.history.can_undo(), can_redo: self.history.can_redo() }
    }

    /// Record that the project changed: schedule a snapshot and request a redraw.
    fn touched(&mut self, actions: &mut Vec<Action>) {
        let due_at = self.history.schedule(&self.project, self.now_ms);
        actions.push(Action::HistoryPending { due_at });
        actions.push(Action::RenderNeeded);
    }

    fn select(&mut self, id: Option<ElementId>, actions: &mut Vec<Action>) {
        if self.ui.selected_id != id {
            self.ui.selected_id.clone_from(&id);
            actions.push(Action::SelectionChanged(id));
        }
    }

    // --- Mutation API ---

    /// Append `element` on top of the live page and select it.
    pub fn add_element(&mut self, element: Element) -> Vec<Action> {
        let id = self.project.add_element(element);
        let mut actions = Vec::new();
        if let Some(el) = self.project.element(&id) {
            actions.push(Action::ElementCreated(el.clone()));
        }
        self.select(Some(id), &mut actions);
        self.touched(&mut actions);
        actions
    }

    /// Shallow-merge `patch` into element `id`. Unknown ids and patches that
    /// change nothing produce no actions.
    pub fn update_element(&mut self, id: &str, patch: &ElementPatch) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.project.update_element(id, patch) {
            actions.push(Action::ElementUpdated { id: id.to_string(), patch: patch.clone() });
            self.touched(&mut actions);
        }
        actions
    }

    /// Remove element `id`. The selection is cleared whether or not `id` was
    /// the selected element.
    pub fn delete_element(&mut self, id: &str) -> Vec<Action> {
        let mut actions = Vec::new();
        self.select(None, &mut actions);
        if self.input.target() == Some(id) {
            self.input = InputState::Idle;
        }
        if self.project.delete_element(id).is_some() {
            actions.push(Action::ElementDeleted { id: id.to_string() });
            self.touched(&mut actions);
        }
        actions
    }

    /// Swap `id`'s z-index with its neighbor in `direction`.
    pub fn reorder_element(&mut self, id: &str, direction: ReorderDirection) -> Vec<Action> {
        let mut actions = Vec::new();
        let Some(neighbor) = self.project.reorder_element(id, direction) else {
            return actions;
        };
        for changed in [id, neighbor.as_str()] {
            if let Some(el) = self.project.element(changed) {
                actions.push(Action::ElementUpdated { id: changed.to_string(), patch: ElementPatch::z_index(el.z_index) });
            }
        }
        self.touched(&mut actions);
        actions
    }

    pub fn update_canvas_settings(&mut self, patch: &CanvasPatch) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.project.update_canvas_settings(patch) {
            self.touched(&mut actions);
        }
        actions
    }

    /// Append a new empty page. The live page does not change.
    pub fn add_page(&mut self) -> Vec<Action> {
        let id = self.project.add_page(self.now_ms, &self.config);
        let mut actions = vec![Action::PageAdded { id }];
        self.touched(&mut actions);
        actions
    }

    /// Switch the live page (`"main"` for the top level). Clears the
    /// selection and abandons any gesture. Unknown ids are ignored.
    pub fn change_page(&mut self, page_id: &str) -> Vec<Action> {
        let before = self.project.current_page_id.clone();
        if !self.project.change_page(page_id) {
            return Vec::new();
        }
        let mut actions = Vec::new();
        self.input = InputState::Idle;
        self.select(None, &mut actions);
        if self.project.current_page_id != before {
            self.touched(&mut actions);
        }
        actions
    }

    pub fn undo(&mut self) -> Vec<Action> {
        let restored = self.history.undo().cloned();
        self.restore(restored)
    }

    pub fn redo(&mut self) -> Vec<Action> {
        let restored = self.history.redo().cloned();
        self.restore(restored)
    }

    /// Swap in a snapshot from history without recording it again.
    fn restore(&mut self, snapshot: Option<Project>) -> Vec<Action> {
        let Some(project) = snapshot else {
            return Vec::new();
        };
        self.project = project;
        self.input = InputState::Idle;

        let mut actions = vec![Action::ProjectReplaced(Box::new(self.project.clone()))];
        let selected_gone = self.ui.selected_id.as_deref().is_some_and(|id| self.project.element(id).is_none());
        if selected_gone {
            self.select(None, &mut actions);
        }
        actions.push(self.history_changed());
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- World markers ---

    fn edit_locations(
        &mut self,
        element_id: &str,
        edit: impl FnOnce(&[Location]) -> Option<Vec<Location>>,
    ) -> Vec<Action> {
        let Some(el) = self.project.element(element_id) else {
            debug!(%element_id, "location edit for unknown element ignored");
            return Vec::new();
        };
        if el.kind != ElementKind::World {
            debug!(%element_id, kind = el.kind.as_str(), "location edit on non-world element ignored");
            return Vec::new();
        }
        match edit(&el.locations) {
            Some(locations) => self.update_element(element_id, &ElementPatch::locations(locations)),
            None => {
                debug!(%element_id, "location edit for unknown marker ignored");
                Vec::new()
            }
        }
    }

    /// Place a new marker at percentage position `(x, y)` inside world
    /// element `element_id`.
    pub fn add_location(&mut self, element_id: &str, x: f64, y: f64) -> Vec<Action> {
        self.edit_locations(element_id, |locs| Some(world::with_location_added(locs, x, y).0))
    }

    pub fn move_location(&mut self, element_id: &str, location_id: &str, x: f64, y: f64) -> Vec<Action> {
        self.edit_locations(element_id, |locs| world::with_location_moved(locs, location_id, x, y))
    }

    pub fn update_location(&mut self, element_id: &str, location_id: &str, patch: &LocationPatch) -> Vec<Action> {
        self.edit_locations(element_id, |locs| world::with_location_patched(locs, location_id, patch))
    }

    pub fn update_location_styles(&mut self, element_id: &str, location_id: &str, styles: &ButtonStyles) -> Vec<Action> {
        self.edit_locations(element_id, |locs| world::with_location_styles(locs, location_id, styles))
    }

    pub fn delete_location(&mut self, element_id: &str, location_id: &str) -> Vec<Action> {
        self.edit_locations(element_id, |locs| world::without_location(locs, location_id))
    }

    // --- Pointer input ---

    fn metrics(&self) -> HandleMetrics {
        HandleMetrics::from(&self.config)
    }

    /// Begin a gesture, or update the selection, for a press at canvas point `pt`.
    pub fn on_pointer_down(&mut self, pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if button != Button::Primary || self.input.is_active() {
            return actions;
        }

        let hit = hit_test(pt, self.project.active_elements(), self.ui.selected_id.as_deref(), &self.metrics());
        let Some(hit) = hit else {
            if self.ui.selected_id.is_some() {
                self.select(None, &mut actions);
                actions.push(Action::RenderNeeded);
            }
            return actions;
        };
        if hit.locked {
            return actions;
        }
        let Some(el) = self.project.element(&hit.element_id) else {
            return actions;
        };

        let (state, cursor) = match hit.part {
            HitPart::Body => (
                InputState::Dragging { id: el.id.clone(), start: pt, orig: Point::new(el.x, el.y), moved: false },
                "move",
            ),
            HitPart::ResizeHandle(handle) => (
                InputState::Resizing { id: el.id.clone(), handle, start: pt, orig: Size::new(el.width, el.height) },
                handle.cursor(),
            ),
            HitPart::RotateHandle => {
                let center = element_center(el);
                (
                    InputState::Rotating {
                        id: el.id.clone(),
                        center,
                        start_angle: angle_from_center(center, pt),
                        orig_rotation: el.rotation,
                    },
                    "grabbing",
                )
            }
        };
        self.input = state;
        self.set_cursor(cursor, &mut actions);
        actions
    }

    /// Update the active gesture, or the hover cursor when idle.
    pub fn on_pointer_move(&mut self, pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        let (id, patch) = match self.input {
            InputState::Idle => {
                let cursor = self.hover_cursor(pt);
                self.set_cursor(cursor, &mut actions);
                return actions;
            }
            InputState::Dragging { ref id, start, orig, .. } => {
                let pos = apply_drag(orig, pt.delta_from(start));
                (id.clone(), ElementPatch::position(pos.x, pos.y))
            }
            InputState::Resizing { ref id, handle, start, orig } => {
                let size = apply_resize_with_floor(handle, orig, pt.delta_from(start), self.config.min_element_size);
                (id.clone(), ElementPatch::size(size.width, size.height))
            }
            InputState::Rotating { ref id, center, start_angle, orig_rotation } => {
                let rotation = apply_rotate(start_angle, angle_from_center(center, pt), orig_rotation);
                (id.clone(), ElementPatch::rotation(rotation))
            }
        };

        let updated = self.update_element(&id, &patch);
        if !updated.is_empty()
            && let InputState::Dragging { ref mut moved, .. } = self.input
        {
            *moved = true;
        }
        actions.extend(updated);
        actions
    }

    /// End the active gesture, whichever button was released. A primary
    /// press-and-release on a body without movement selects the element.
    pub fn on_pointer_up(&mut self, pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        let ended = std::mem::take(&mut self.input);
        if button != Button::Primary {
            return actions;
        }
        if let InputState::Dragging { id, moved: false, .. } = ended {
            self.select(Some(id), &mut actions);
            actions.push(Action::RenderNeeded);
        }
        let cursor = self.hover_cursor(pt);
        self.set_cursor(cursor, &mut actions);
        actions
    }

    /// The pointer left the editing surface: abandon the gesture.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        self.input = InputState::Idle;
        self.set_cursor("default", &mut actions);
        actions
    }

    fn hover_cursor(&self, pt: Point) -> &'static str {
        let hit = hit_test(pt, self.project.active_elements(), self.ui.selected_id.as_deref(), &self.metrics());
        match hit {
            Some(h) if h.locked => "not-allowed",
            Some(h) => match h.part {
                HitPart::Body => "move",
                HitPart::ResizeHandle(handle) => handle.cursor(),
                HitPart::RotateHandle => "grab",
            },
            None => "default",
        }
    }

    fn set_cursor(&mut self, cursor: &str, actions: &mut Vec<Action>) {
        if self.ui.cursor != cursor {
            self.ui.cursor = cursor.to_string();
            actions.push(Action::SetCursor(cursor.to_string()));
        }
    }

    // --- Keyboard input ---

    /// Ctrl/Cmd+Z undoes; Ctrl/Cmd+Shift+Z and Ctrl/Cmd+Y redo. Handled
    /// combinations always start with `PreventDefault`.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if !modifiers.command() {
            return Vec::new();
        }
        let redo = if key.is_letter('z') {
            modifiers.shift
        } else if key.is_letter('y') {
            true
        } else {
            return Vec::new();
        };

        let mut actions = vec![Action::PreventDefault];
        actions.extend(if redo { self.redo() } else { self.undo() });
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// The currently selected element id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.ui.selected_id.as_deref()
    }

    #[must_use]
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.project.element(id)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn export(&self, format: ExportFormat) -> String {
        export::export(&self.project, format)
    }
}

/// The browser-facing engine. Wraps `EngineCore`, owns the editing surface
/// element, and supplies the wall clock.
pub struct Engine {
    surface: HtmlElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given surface element.
    #[must_use]
    pub fn new(surface: HtmlElement, project: Project, config: EditorConfig) -> Self {
        let mut core = EngineCore::with_project(project, config);
        core.set_now(now_ms());
        Self { surface, core }
    }

    /// Convert a client-space (viewport) point to canvas space.
    #[must_use]
    pub fn client_to_canvas(&self, client: Point) -> Point {
        let rect = self.surface.get_bounding_client_rect();
        Point::new(client.x - rect.left(), client.y - rect.top())
    }

    // --- Clock ---

    /// Call when a `HistoryPending` timer fires.
    pub fn tick(&mut self) -> Vec<Action> {
        self.core.tick(now_ms())
    }

    // --- Delegated mutations ---

    pub fn add_element(&mut self, element: Element) -> Vec<Action> {
        self.core.set_now(now_ms());
        self.core.add_element(element)
    }

    pub fn update_element(&mut self, id: &str, patch: &ElementPatch) -> Vec<Action> {
        self.core.set_now(now_ms());
        self.core.update_element(id, patch)
    }

    pub fn delete_element(&mut self, id: &str) -> Vec<Action> {
        self.core.set_now(now_ms());
        self.core.delete_element(id)
    }

    pub fn reorder_element(&mut self, id: &str, direction: ReorderDirection) -> Vec<Action> {
        self.core.set_now(now_ms());
        self.core.reorder_element(id, direction)
    }

    pub fn update_canvas_settings(&mut self, patch: &CanvasPatch) -> Vec<Action> {
        self.core.set_now(now_ms());
        self.core.update_canvas_settings(patch)
    }

    pub fn add_page(&mut self) -> Vec<Action> {
        self.core.set_now(now_ms());
        self.core.add_page()
    }

    pub fn change_page(&mut self, page_id: &str) -> Vec<Action> {
        self.core.set_now(now_ms());
        self.core.change_page(page_id)
    }

    pub fn undo(&mut self) -> Vec<Action> {
        self.core.undo()
    }

    pub fn redo(&mut self) -> Vec<Action> {
        self.core.redo()
    }

    // --- Input events (client coordinates) ---

    pub fn on_pointer_down(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.set_now(now_ms());
        let pt = self.client_to_canvas(client);
        self.core.on_pointer_down(pt, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, client: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.set_now(now_ms());
        let pt = self.client_to_canvas(client);
        self.core.on_pointer_move(pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.set_now(now_ms());
        let pt = self.client_to_canvas(client);
        self.core.on_pointer_up(pt, button, modifiers)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.core.selection()
    }

    #[must_use]
    pub fn project(&self) -> &Project {
        self.core.project()
    }

    #[must_use]
    pub fn export(&self, format: ExportFormat) -> String {
        self.core.export(format)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}
