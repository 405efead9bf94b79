// tests/editor_tests.rs
//
// Full authoring sessions driven through the public API: click protocols,
// store round trips, and handoff to the conversion engine.

use collision_studio::{
    build_colliders, BackgroundGeometry, Collider, ConversionConfig, Editor, EditorMode,
    MemoryStore, PercentPoint, Shape, ShapeKind,
};
use macroquad::prelude::*;

fn pp(x: f32, y: f32) -> PercentPoint {
    PercentPoint::new(x, y)
}

#[test]
fn authoring_session_produces_all_three_kinds() {
    let mut ed = Editor::new("village");

    ed.set_mode(EditorMode::DrawRect);
    ed.click(pp(5.0, 5.0));
    ed.click(pp(25.0, 15.0));

    ed.set_mode(EditorMode::DrawPolygon);
    ed.click(pp(40.0, 40.0));
    ed.click(pp(60.0, 40.0));
    ed.click(pp(50.0, 60.0));
    ed.finish_polygon();

    ed.set_mode(EditorMode::DrawCircle);
    ed.click(pp(80.0, 80.0));
    ed.click(pp(85.0, 80.0));

    let kinds: Vec<ShapeKind> = ed.document().shapes().iter().map(Shape::kind).collect();
    assert_eq!(
        kinds,
        vec![ShapeKind::Rect, ShapeKind::Polygon, ShapeKind::Circle]
    );
    assert_eq!(ed.mode(), EditorMode::Select);
}

#[test]
fn authored_rect_resolves_to_the_expected_world_rect() {
    // Author the 10/20 -> 40/35 rect, then resolve it on a 1000x500
    // background whose top-left sits at the world origin.
    let mut ed = Editor::new("village");
    ed.set_mode(EditorMode::DrawRect);
    ed.click(pp(10.0, 20.0));
    ed.click(pp(40.0, 35.0));

    let bg = BackgroundGeometry::new(vec2(500.0, 250.0), 1000.0, 500.0);
    let cfg = ConversionConfig {
        rect_padding: 0.0,
        ..ConversionConfig::default()
    };
    let set = build_colliders(ed.document(), &bg, &cfg);
    assert_eq!(set.len(), 1);
    match set.iter().next().unwrap() {
        Collider::Rect { rect, .. } => {
            assert!((rect.x - 100.0).abs() < 1e-3);
            assert!((rect.y - 100.0).abs() < 1e-3);
            assert!((rect.w - 300.0).abs() < 1e-3);
            assert!((rect.h - 75.0).abs() < 1e-3);
        }
        Collider::Circle { .. } => panic!("expected a rect collider"),
    };
}

#[test]
fn save_reopen_convert_round_trip() {
    let mut store = MemoryStore::new();

    let mut ed = Editor::new("village");
    ed.set_mode(EditorMode::DrawPolygon);
    ed.click(pp(20.0, 20.0));
    ed.click(pp(60.0, 20.0));
    ed.click(pp(60.0, 60.0));
    ed.click(pp(20.0, 60.0));
    ed.finish_polygon();
    ed.save(&mut store).expect("save");

    // The runtime's view of the same store.
    let bg = BackgroundGeometry::new(vec2(500.0, 250.0), 1000.0, 500.0);
    let set = collision_studio::load_level_colliders(
        &store,
        "village",
        &bg,
        &ConversionConfig::default(),
    );
    assert!(!set.is_empty());
    // A point deep inside the authored square, in world units.
    assert!(set.contains_point(vec2(410.0, 210.0)));

    // And the editor reopens the identical document.
    let reopened = Editor::open(&store, "village");
    assert_eq!(reopened.document(), ed.document());
}

#[test]
fn export_import_between_two_editors() {
    let mut a = Editor::new("village");
    a.set_mode(EditorMode::DrawCircle);
    a.click(pp(30.0, 30.0));
    a.click(pp(30.0, 42.0));

    let bytes = a.export_bytes().expect("export");

    let mut b = Editor::new("scratch");
    b.import_bytes(&bytes).expect("import");
    assert_eq!(b.document(), a.document());
    assert_eq!(b.document().map_name, "village");
}

#[test]
fn updated_at_moves_with_edits_but_not_saves() {
    let mut store = MemoryStore::new();
    let mut ed = Editor::new("village");
    ed.set_mode(EditorMode::DrawRect);
    ed.click(pp(0.0, 0.0));
    ed.click(pp(10.0, 10.0));
    let after_edit = ed.document().updated_at.clone();

    ed.save(&mut store).unwrap();
    assert_eq!(ed.document().updated_at, after_edit);

    ed.set_mode(EditorMode::DrawRect);
    ed.click(pp(20.0, 20.0));
    ed.click(pp(30.0, 30.0));
    assert!(ed.document().updated_at >= after_edit);
}
