#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::Link;
use crate::geometry::ResizeHandle;

// =============================================================
// Helpers
// =============================================================

fn down(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_down(Point::new(x, y), Button::Primary, Modifiers::default())
}

fn mv(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_move(Point::new(x, y), Modifiers::default())
}

fn up(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_up(Point::new(x, y), Button::Primary, Modifiers::default())
}

fn ctrl() -> Modifiers {
    Modifiers { ctrl: true, ..Modifiers::default() }
}

fn key(k: &str) -> Key {
    Key(k.to_string())
}

/// Add an element and return its id.
fn add(core: &mut EngineCore, el: Element) -> ElementId {
    core.add_element(el)
        .into_iter()
        .find_map(|a| match a {
            Action::ElementCreated(el) => Some(el.id),
            _ => None,
        })
        .unwrap()
}

fn has_history_changed(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::HistoryChanged { .. }))
}

// =============================================================
// Mutation API
// =============================================================

#[test]
fn add_element_selects_and_stacks_on_top() {
    let mut core = EngineCore::new();
    let a = add(&mut core, Element::div());
    let b = add(&mut core, Element::circle());
    assert_eq!(core.element(&a).unwrap().z_index, 1);
    assert_eq!(core.element(&b).unwrap().z_index, 2);
    assert_eq!(core.selection(), Some(b.as_str()));
}

#[test]
fn add_element_emits_created_selection_and_pending_snapshot() {
    let mut core = EngineCore::new();
    let actions = core.add_element(Element::div());
    assert!(matches!(actions[0], Action::ElementCreated(_)));
    assert!(matches!(actions[1], Action::SelectionChanged(Some(_))));
    assert!(actions.contains(&Action::HistoryPending { due_at: 400 }));
    assert!(actions.contains(&Action::RenderNeeded));
}

#[test]
fn update_element_reports_patch() {
    let mut core = EngineCore::new();
    let id = add(&mut core, Element::div());
    let patch = ElementPatch::position(5.0, 6.0);
    let actions = core.update_element(&id, &patch);
    assert_eq!(actions[0], Action::ElementUpdated { id: id.clone(), patch });
    assert_eq!(core.element(&id).unwrap().x, 5.0);
}

#[test]
fn no_op_update_emits_nothing() {
    let mut core = EngineCore::new();
    let id = add(&mut core, Element::div());
    core.tick(400);
    assert!(core.update_element(&id, &ElementPatch::position(100.0, 100.0)).is_empty());
    assert!(core.update_element("missing", &ElementPatch::position(1.0, 1.0)).is_empty());
    assert!(!core.history.has_pending());
}

#[test]
fn delete_clears_selection_unconditionally() {
    let mut core = EngineCore::new();
    let a = add(&mut core, Element::div());
    let b = add(&mut core, Element::div());
    assert_eq!(core.selection(), Some(b.as_str()));

    let actions = core.delete_element(&a);
    assert!(actions.contains(&Action::SelectionChanged(None)));
    assert!(actions.contains(&Action::ElementDeleted { id: a.clone() }));
    assert!(core.selection().is_none());
    assert!(core.element(&a).is_none());
    assert!(core.element(&b).is_some());
}

#[test]
fn delete_unknown_only_clears_selection() {
    let mut core = EngineCore::new();
    add(&mut core, Element::div());
    let actions = core.delete_element("missing");
    assert_eq!(actions, vec![Action::SelectionChanged(None)]);
    assert_eq!(core.project().elements.len(), 1);
}

#[test]
fn reorder_up_swaps_with_neighbor() {
    let mut core = EngineCore::new();
    let a = add(&mut core, Element::div());
    let b = add(&mut core, Element::div());

    let actions = core.reorder_element(&a, ReorderDirection::Up);
    assert_eq!(core.element(&a).unwrap().z_index, 2);
    assert_eq!(core.element(&b).unwrap().z_index, 1);
    assert!(actions.contains(&Action::ElementUpdated { id: a.clone(), patch: ElementPatch::z_index(2) }));
    assert!(actions.contains(&Action::ElementUpdated { id: b.clone(), patch: ElementPatch::z_index(1) }));

    assert!(core.reorder_element(&a, ReorderDirection::Up).is_empty());
}

#[test]
fn canvas_settings_change_is_recorded() {
    let mut core = EngineCore::new();
    let patch = CanvasPatch { canvas_width: Some(1024.0), ..CanvasPatch::default() };
    let actions = core.update_canvas_settings(&patch);
    assert!(actions.contains(&Action::RenderNeeded));
    assert_eq!(core.project().canvas_width, 1024.0);
    assert!(core.update_canvas_settings(&patch).is_empty());
}

// =============================================================
// Pages
// =============================================================

#[test]
fn pages_route_element_mutations() {
    let mut core = EngineCore::new();
    core.set_now(1_700_000_000_000);
    let page_id = match core.add_page().first() {
        Some(Action::PageAdded { id }) => id.clone(),
        other => panic!("expected PageAdded, got {other:?}"),
    };
    assert_eq!(page_id, "1700000000000");
    assert_eq!(core.project().active_page_id(), "main");

    let main_el = add(&mut core, Element::div());
    core.change_page(&page_id);
    assert!(core.selection().is_none());
    assert!(core.element(&main_el).is_none());

    let page_el = add(&mut core, Element::text("hi"));
    assert_eq!(core.project().pages[0].elements.len(), 1);
    assert_eq!(core.project().elements.len(), 1);

    core.change_page("main");
    assert!(core.element(&main_el).is_some());
    assert!(core.element(&page_el).is_none());
}

#[test]
fn change_to_unknown_page_is_ignored() {
    let mut core = EngineCore::new();
    add(&mut core, Element::div());
    assert!(core.change_page("nope").is_empty());
    assert!(core.selection().is_some());
}

// =============================================================
// Gestures
// =============================================================

#[test]
fn drag_moves_by_pointer_delta() {
    let mut core = EngineCore::new();
    let id = add(&mut core, Element::div());
    let (x0, y0) = (core.element(&id).unwrap().x, core.element(&id).unwrap().y);

    down(&mut core, 150.0, 150.0);
    assert!(matches!(core.input, InputState::Dragging { .. }));
    mv(&mut core, 180.0, 140.0);
    mv(&mut core, 200.0, 130.0);
    up(&mut core, 200.0, 130.0);

    let el = core.element(&id).unwrap();
    assert_eq!((el.x, el.y), (x0 + 50.0, y0 - 20.0));
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn every_move_applies_an_update() {
    let mut core = EngineCore::new();
    let id = add(&mut core, Element::div());
    down(&mut core, 150.0, 150.0);
    let actions = mv(&mut core, 151.0, 150.0);
    assert!(actions.contains(&Action::ElementUpdated { id: id.clone(), patch: ElementPatch::position(101.0, 100.0) }));
    let actions = mv(&mut core, 152.0, 150.0);
    assert!(actions.contains(&Action::ElementUpdated { id, patch: ElementPatch::position(102.0, 100.0) }));
}

#[test]
fn click_without_movement_selects() {
    let mut core = EngineCore::new();
    let a = add(&mut core, Element::div());
    let mut other = Element::div();
    other.x = 500.0;
    let b = add(&mut core, other);
    assert_eq!(core.selection(), Some(b.as_str()));

    down(&mut core, 150.0, 150.0);
    let actions = up(&mut core, 150.0, 150.0);
    assert!(actions.contains(&Action::SelectionChanged(Some(a.clone()))));
    assert_eq!(core.selection(), Some(a.as_str()));
}

#[test]
fn click_empty_canvas_clears_selection() {
    let mut core = EngineCore::new();
    add(&mut core, Element::div());
    let actions = down(&mut core, 700.0, 700.0);
    assert!(actions.contains(&Action::SelectionChanged(None)));
    assert!(core.selection().is_none());
    assert!(!core.input.is_active());
}

#[test]
fn locked_element_absorbs_press() {
    let mut core = EngineCore::new();
    let mut el = Element::div();
    el.locked = true;
    let id = add(&mut core, el);
    core.delete_element("missing");

    let actions = down(&mut core, 150.0, 150.0);
    assert!(actions.is_empty());
    assert!(!core.input.is_active());
    up(&mut core, 150.0, 150.0);
    assert!(core.selection().is_none());
    assert_eq!(core.element(&id).unwrap().x, 100.0);
}

#[test]
fn resize_from_corner_handle_with_floor() {
    let mut core = EngineCore::new();
    let id = add(&mut core, Element::div());

    down(&mut core, 300.0, 300.0);
    assert!(matches!(core.input, InputState::Resizing { handle: ResizeHandle::Se, .. }));
    mv(&mut core, 250.0, 260.0);
    let el = core.element(&id).unwrap();
    assert_eq!((el.width, el.height), (150.0, 160.0));
    assert_eq!((el.x, el.y), (100.0, 100.0));

    mv(&mut core, -1000.0, -1000.0);
    let el = core.element(&id).unwrap();
    assert_eq!((el.width, el.height), (20.0, 20.0));
}

#[test]
fn resize_floor_follows_config() {
    let cfg = EditorConfig { min_element_size: 50.0, ..EditorConfig::default() };
    let mut core = EngineCore::with_config(cfg);
    let id = add(&mut core, Element::div());
    down(&mut core, 300.0, 300.0);
    mv(&mut core, -1000.0, -1000.0);
    assert_eq!(core.element(&id).unwrap().width, 50.0);
}

#[test]
fn rotate_from_handle() {
    let mut core = EngineCore::new();
    let id = add(&mut core, Element::div());

    // Center (200, 200); rotate handle 20px above the top edge.
    down(&mut core, 200.0, 80.0);
    assert!(matches!(core.input, InputState::Rotating { .. }));
    mv(&mut core, 320.0, 200.0);
    assert_eq!(core.element(&id).unwrap().rotation, 90.0);
    up(&mut core, 320.0, 200.0);
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn press_during_gesture_is_ignored() {
    let mut core = EngineCore::new();
    add(&mut core, Element::div());
    down(&mut core, 150.0, 150.0);
    let before = core.input.clone();
    assert!(down(&mut core, 300.0, 300.0).is_empty());
    assert_eq!(core.input, before);
}

#[test]
fn pointer_leave_ends_gesture() {
    let mut core = EngineCore::new();
    let id = add(&mut core, Element::div());
    down(&mut core, 150.0, 150.0);
    core.on_pointer_leave();
    assert_eq!(core.input, InputState::Idle);
    mv(&mut core, 400.0, 400.0);
    assert_eq!(core.element(&id).unwrap().x, 100.0);
}

#[test]
fn secondary_button_is_ignored() {
    let mut core = EngineCore::new();
    add(&mut core, Element::div());
    let actions = core.on_pointer_down(Point::new(150.0, 150.0), Button::Secondary, Modifiers::default());
    assert!(actions.is_empty());
    assert!(!core.input.is_active());
}

#[test]
fn secondary_release_ends_gesture_without_selecting() {
    let mut core = EngineCore::new();
    let id = add(&mut core, Element::div());
    down(&mut core, 150.0, 150.0);
    assert!(core.input.is_active());

    let actions = core.on_pointer_up(Point::new(150.0, 150.0), Button::Secondary, Modifiers::default());
    assert!(actions.is_empty());
    assert_eq!(core.input, InputState::Idle);
    mv(&mut core, 400.0, 400.0);
    assert_eq!(core.element(&id).unwrap().x, 100.0);
}

#[test]
fn hover_sets_cursor_once() {
    let mut core = EngineCore::new();
    add(&mut core, Element::div());
    core.delete_element("missing");
    assert_eq!(mv(&mut core, 150.0, 150.0), vec![Action::SetCursor("move".into())]);
    assert!(mv(&mut core, 151.0, 150.0).is_empty());
    assert_eq!(mv(&mut core, 700.0, 700.0), vec![Action::SetCursor("default".into())]);
}

// =============================================================
// History
// =============================================================

#[test]
fn tick_commits_after_quiet_period() {
    let mut core = EngineCore::new();
    add(&mut core, Element::div());
    assert!(core.tick(399).is_empty());
    let actions = core.tick(400);
    assert_eq!(actions, vec![Action::HistoryChanged { can_undo: true, can_redo: false }]);
    assert_eq!(core.history.len(), 2);
}

#[test]
fn continuous_drag_is_one_history_entry() {
    let mut core = EngineCore::new();
    let id = add(&mut core, Element::div());
    core.tick(400);

    core.set_now(1_000);
    down(&mut core, 150.0, 150.0);
    for step in 1..=5_u32 {
        core.set_now(1_000 + u64::from(step) * 50);
        mv(&mut core, 150.0 + f64::from(step) * 10.0, 150.0);
    }
    up(&mut core, 200.0, 150.0);

    assert!(core.tick(1_649).is_empty());
    assert!(has_history_changed(&core.tick(1_650)));
    assert_eq!(core.history.len(), 3);

    core.undo();
    assert_eq!(core.element(&id).unwrap().x, 100.0);
    core.redo();
    assert_eq!(core.element(&id).unwrap().x, 150.0);
}

#[test]
fn undo_redo_round_trip_restores_final_state() {
    let mut core = EngineCore::new();
    let id = add(&mut core, Element::div());
    core.flush_history();
    for i in 1..=4 {
        core.update_element(&id, &ElementPatch::rotation(f64::from(i) * 10.0));
        core.flush_history();
    }
    let final_state = core.project().clone();

    while !core.undo().is_empty() {}
    assert_eq!(core.project(), &Project::default());
    assert!(core.selection().is_none());
    while !core.redo().is_empty() {}
    assert_eq!(core.project(), &final_state);
}

#[test]
fn undo_restores_without_recording() {
    let mut core = EngineCore::new();
    add(&mut core, Element::div());
    core.flush_history();
    let actions = core.undo();
    assert!(matches!(actions[0], Action::ProjectReplaced(_)));
    assert!(actions.contains(&Action::HistoryChanged { can_undo: false, can_redo: true }));
    assert!(!core.history.has_pending());
    assert!(core.tick(10_000).is_empty());
    assert!(core.can_redo());
}

#[test]
fn undo_cancels_pending_snapshot() {
    let mut core = EngineCore::new();
    let id = add(&mut core, Element::div());
    core.tick(400);
    core.set_now(500);
    core.update_element(&id, &ElementPatch::position(0.0, 0.0));
    assert!(core.history.has_pending());

    core.undo();
    assert!(!core.history.has_pending());
    assert!(core.project().elements.is_empty());
    assert_eq!(core.history.len(), 2);
}

#[test]
fn undo_with_nothing_to_undo_is_empty() {
    let mut core = EngineCore::new();
    assert!(core.undo().is_empty());
    assert!(core.redo().is_empty());
}

#[test]
fn redo_with_nothing_to_redo_keeps_pending_edit() {
    let mut core = EngineCore::new();
    let id = add(&mut core, Element::div());
    core.tick(1_000);
    core.set_now(2_000);
    core.update_element(&id, &ElementPatch::position(500.0, 500.0));

    assert_eq!(core.on_key_down(&key("y"), ctrl()), vec![Action::PreventDefault]);
    assert!(core.history.has_pending());
    assert!(has_history_changed(&core.tick(10_000)));
    assert_eq!(core.history.len(), 3);

    core.undo();
    assert_eq!(core.element(&id).unwrap().x, 100.0);
    core.redo();
    assert_eq!(core.element(&id).unwrap().x, 500.0);
}

#[test]
fn undo_with_nothing_to_undo_keeps_pending_edit() {
    let mut core = EngineCore::new();
    add(&mut core, Element::div());
    assert_eq!(core.on_key_down(&key("z"), ctrl()), vec![Action::PreventDefault]);
    assert!(core.history.has_pending());
    assert!(has_history_changed(&core.tick(400)));
    assert_eq!(core.history.len(), 2);
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn ctrl_z_undoes_and_prevents_default() {
    let mut core = EngineCore::new();
    add(&mut core, Element::div());
    core.flush_history();
    let actions = core.on_key_down(&key("z"), ctrl());
    assert_eq!(actions[0], Action::PreventDefault);
    assert!(core.project().elements.is_empty());
}

#[test]
fn redo_bindings() {
    let mut core = EngineCore::new();
    add(&mut core, Element::div());
    core.flush_history();

    core.on_key_down(&key("z"), ctrl());
    let shift = Modifiers { shift: true, ..ctrl() };
    core.on_key_down(&key("Z"), shift);
    assert_eq!(core.project().elements.len(), 1);

    core.on_key_down(&key("z"), ctrl());
    let meta = Modifiers { meta: true, ..Modifiers::default() };
    let actions = core.on_key_down(&key("y"), meta);
    assert_eq!(actions[0], Action::PreventDefault);
    assert_eq!(core.project().elements.len(), 1);
}

#[test]
fn unbound_keys_are_ignored() {
    let mut core = EngineCore::new();
    add(&mut core, Element::div());
    core.flush_history();
    assert!(core.on_key_down(&key("z"), Modifiers::default()).is_empty());
    assert!(core.on_key_down(&key("x"), ctrl()).is_empty());
    assert_eq!(core.project().elements.len(), 1);
}

#[test]
fn handled_key_without_history_still_prevents_default() {
    let mut core = EngineCore::new();
    assert_eq!(core.on_key_down(&key("z"), ctrl()), vec![Action::PreventDefault]);
}

// =============================================================
// World markers
// =============================================================

#[test]
fn location_lifecycle() {
    let mut core = EngineCore::new();
    let world = add(&mut core, Element::world("https://x.test/map.png"));

    core.add_location(&world, 150.0, -5.0);
    let loc = core.element(&world).unwrap().locations[0].clone();
    assert_eq!(loc.name, "Location 1");
    assert_eq!((loc.x, loc.y), (100.0, 0.0));

    core.move_location(&world, &loc.id, 40.0, 60.0);
    let patch = LocationPatch { name: Some("Castle".into()), link: Some(Some(Link::page("p2"))), ..Default::default() };
    core.update_location(&world, &loc.id, &patch);
    let styles = ButtonStyles { color: Some("#ff0000".into()), ..ButtonStyles::default() };
    core.update_location_styles(&world, &loc.id, &styles);

    let moved = &core.element(&world).unwrap().locations[0];
    assert_eq!((moved.x, moved.y), (40.0, 60.0));
    assert_eq!(moved.name, "Castle");
    assert_eq!(moved.link, Some(Link::page("p2")));
    assert_eq!(moved.button_styles.color.as_deref(), Some("#ff0000"));
    assert_eq!(moved.button_styles.background_color.as_deref(), Some("#1a1a1a"));

    let actions = core.delete_location(&world, &loc.id);
    assert!(matches!(actions[0], Action::ElementUpdated { .. }));
    assert!(core.element(&world).unwrap().locations.is_empty());
}

#[test]
fn location_edits_on_non_world_are_ignored() {
    let mut core = EngineCore::new();
    let div = add(&mut core, Element::div());
    assert!(core.add_location(&div, 10.0, 10.0).is_empty());
    assert!(core.add_location("missing", 10.0, 10.0).is_empty());

    let world = add(&mut core, Element::world("map.png"));
    assert!(core.delete_location(&world, "missing").is_empty());
}

#[test]
fn location_edits_are_undoable() {
    let mut core = EngineCore::new();
    let world = add(&mut core, Element::world("map.png"));
    core.flush_history();
    core.add_location(&world, 10.0, 10.0);
    core.flush_history();
    core.undo();
    assert!(core.element(&world).unwrap().locations.is_empty());
}

// =============================================================
// Export
// =============================================================

#[test]
fn export_reflects_live_project() {
    let mut core = EngineCore::new();
    add(&mut core, Element::text("Hello"));
    let html = core.export(ExportFormat::Html);
    assert!(html.contains(">Hello</div>"));
    let css = core.export(ExportFormat::Css);
    assert!(css.contains(".element-1 {"));
}
