use super::*;

fn metrics() -> HandleMetrics {
    HandleMetrics::from(&EditorConfig::default())
}

fn boxed(id: &str, x: f64, y: f64, w: f64, h: f64, z: i64) -> Element {
    let mut el = Element::div();
    el.id = id.into();
    el.x = x;
    el.y = y;
    el.width = w;
    el.height = h;
    el.z_index = z;
    el
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Bodies
// =============================================================

#[test]
fn empty_space_misses() {
    let els = vec![boxed("a", 0.0, 0.0, 100.0, 100.0, 1)];
    assert!(hit_test(pt(500.0, 500.0), &els, None, &metrics()).is_none());
}

#[test]
fn body_hit_inside_box() {
    let els = vec![boxed("a", 10.0, 10.0, 100.0, 50.0, 1)];
    let hit = hit_test(pt(50.0, 30.0), &els, None, &metrics()).unwrap();
    assert_eq!(hit.element_id, "a");
    assert_eq!(hit.part, HitPart::Body);
    assert!(!hit.locked);
}

#[test]
fn topmost_by_z_wins() {
    let els = vec![boxed("top", 0.0, 0.0, 100.0, 100.0, 5), boxed("bottom", 0.0, 0.0, 100.0, 100.0, 1)];
    let hit = hit_test(pt(50.0, 50.0), &els, None, &metrics()).unwrap();
    assert_eq!(hit.element_id, "top");
}

#[test]
fn z_ties_prefer_later_in_list() {
    let els = vec![boxed("first", 0.0, 0.0, 100.0, 100.0, 1), boxed("second", 0.0, 0.0, 100.0, 100.0, 1)];
    let hit = hit_test(pt(50.0, 50.0), &els, None, &metrics()).unwrap();
    assert_eq!(hit.element_id, "second");
}

#[test]
fn hidden_elements_are_not_hit() {
    let mut hidden = boxed("hidden", 0.0, 0.0, 100.0, 100.0, 9);
    hidden.visible = false;
    let els = vec![hidden, boxed("under", 0.0, 0.0, 100.0, 100.0, 1)];
    let hit = hit_test(pt(50.0, 50.0), &els, None, &metrics()).unwrap();
    assert_eq!(hit.element_id, "under");
}

#[test]
fn locked_elements_are_hit_and_flagged() {
    let mut locked = boxed("l", 0.0, 0.0, 100.0, 100.0, 1);
    locked.locked = true;
    let hit = hit_test(pt(50.0, 50.0), &[locked], None, &metrics()).unwrap();
    assert!(hit.locked);
}

#[test]
fn rotated_body_uses_local_frame() {
    // 200x20 bar rotated 90° around (100, 10) occupies x in [90, 110], y in [-90, 110].
    let mut bar = boxed("bar", 0.0, 0.0, 200.0, 20.0, 1);
    bar.rotation = 90.0;
    let els = vec![bar];
    assert!(hit_test(pt(100.0, 100.0), &els, None, &metrics()).is_some());
    assert!(hit_test(pt(180.0, 10.0), &els, None, &metrics()).is_none());
}

// =============================================================
// Handles
// =============================================================

#[test]
fn handles_only_for_selected() {
    let els = vec![boxed("a", 100.0, 100.0, 200.0, 100.0, 1)];
    let unselected = hit_test(pt(300.0, 200.0), &els, None, &metrics()).unwrap();
    assert_eq!(unselected.part, HitPart::Body);
    let selected = hit_test(pt(300.0, 200.0), &els, Some("a"), &metrics()).unwrap();
    assert_eq!(selected.part, HitPart::ResizeHandle(ResizeHandle::Se));
}

#[test]
fn each_handle_is_reachable() {
    let els = vec![boxed("a", 100.0, 100.0, 200.0, 100.0, 1)];
    for handle in ResizeHandle::ALL {
        let local = handle_position(handle, 200.0, 100.0);
        let hit = hit_test(pt(100.0 + local.x, 100.0 + local.y), &els, Some("a"), &metrics()).unwrap();
        assert_eq!(hit.part, HitPart::ResizeHandle(handle));
    }
}

#[test]
fn rotate_handle_above_top_edge() {
    let els = vec![boxed("a", 100.0, 100.0, 200.0, 100.0, 1)];
    let hit = hit_test(pt(200.0, 80.0), &els, Some("a"), &metrics()).unwrap();
    assert_eq!(hit.part, HitPart::RotateHandle);
}

#[test]
fn rotate_handle_follows_rotation() {
    // Rotated 180°: the handle sits below the bottom edge.
    let mut el = boxed("a", 100.0, 100.0, 200.0, 100.0, 1);
    el.rotation = 180.0;
    let hit = hit_test(pt(200.0, 220.0), &[el], Some("a"), &metrics()).unwrap();
    assert_eq!(hit.part, HitPart::RotateHandle);
}

#[test]
fn locked_selected_element_has_no_handles() {
    let mut el = boxed("a", 100.0, 100.0, 200.0, 100.0, 1);
    el.locked = true;
    let hit = hit_test(pt(300.0, 200.0), &[el], Some("a"), &metrics()).unwrap();
    assert_eq!(hit.part, HitPart::Body);
}

#[test]
fn to_local_of_unrotated_is_offset() {
    let el = boxed("a", 10.0, 20.0, 100.0, 100.0, 1);
    assert_eq!(to_local(&el, pt(15.0, 25.0)), pt(5.0, 5.0));
}
