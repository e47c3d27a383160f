//! Integration tests: undo/redo through the viewport controller (sk-editor).
//!
//! Verifies that every recorded action can be undone and redone across
//! crate boundaries, and that each commit broadcasts the new state.

use pretty_assertions::assert_eq;
use sk_core::StrokeId;
use sk_core::model::*;
use sk_editor::commands::Action;
use sk_editor::controller::ViewportController;
use sk_editor::input::PointerInput;
use std::cell::RefCell;
use std::rc::Rc;

fn make_controller() -> ViewportController {
    let input = include_str!("fixtures/strokes.json");
    ViewportController::from_json(input).unwrap()
}

fn empty_controller() -> ViewportController {
    let mut c = ViewportController::default();
    c.set_pan_zoom(PanZoomPatch {
        scale: Some(1.0),
        offset: Some(Point::ZERO),
    });
    c
}

/// World (x, y) → screen at scale 1, offset 0 on an 800×600 viewport.
fn at(x: f64, y: f64) -> PointerInput {
    PointerInput::mouse(x + 400.0, y + 300.0)
}

fn draw(c: &mut ViewportController, from: (f64, f64), to: (f64, f64)) {
    c.pointer_down(&at(from.0, from.1));
    c.pointer_move(&at(to.0, to.1));
    c.pointer_up();
}

/// Collects the stroke count of every DATA_CHANGE.
fn watch(c: &mut ViewportController) -> Rc<RefCell<Vec<usize>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    c.on_data_change(move |e| sink.borrow_mut().push(e.strokes.len()));
    seen
}

// ─── Basic undo/redo ────────────────────────────────────────────────────

#[test]
fn paint_undo_redo_scenario() {
    let mut c = empty_controller();
    let changes = watch(&mut c);
    let ended = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&ended);
    c.on_stroke_end(move |e| sink.borrow_mut().push((e.stroke.points.len(), e.color.to_string())));

    c.change_brush_tool(PenTool::Pen);
    c.change_brush_color("#FF0000");
    c.change_stroke_width(3.0);
    draw(&mut c, (10.0, 10.0), (20.0, 20.0));

    assert_eq!(c.strokes().len(), 1);
    assert_eq!(c.strokes()[0].points, vec![Point::new(10.0, 10.0), Point::new(20.0, 20.0)]);
    assert_eq!(c.strokes()[0].color, "#FF0000");
    assert_eq!(c.strokes()[0].stroke_width, 3.0);
    assert_eq!(*ended.borrow(), vec![(2, "#FF0000".to_string())]);
    assert!(c.can_undo());

    let painted = c.strokes().to_vec();
    assert!(c.undo());
    assert!(c.strokes().is_empty());
    assert!(c.redo());
    assert_eq!(c.strokes(), painted.as_slice());

    assert_eq!(*changes.borrow(), vec![1, 0, 1]);
}

#[test]
fn undo_restores_fixture_state() {
    let mut c = make_controller();
    let before = c.strokes().to_vec();
    draw(&mut c, (50.0, 50.0), (60.0, 70.0));
    assert_eq!(c.strokes().len(), 3);
    c.undo();
    assert_eq!(c.strokes(), before.as_slice());
}

#[test]
fn empty_history_is_silent() {
    let mut c = empty_controller();
    let changes = watch(&mut c);
    assert!(!c.undo());
    assert!(!c.redo());
    assert!(changes.borrow().is_empty());
}

#[test]
fn new_action_clears_redo() {
    let mut c = empty_controller();
    draw(&mut c, (10.0, 10.0), (20.0, 20.0));
    draw(&mut c, (30.0, 30.0), (40.0, 40.0));
    c.undo();
    assert!(c.can_redo());
    draw(&mut c, (50.0, 50.0), (60.0, 60.0));
    assert!(!c.can_redo());
    assert_eq!(c.strokes().len(), 2);
    assert_eq!(c.strokes()[1].points[0], Point::new(50.0, 50.0));
}

#[test]
fn multiple_undo_redo_in_order() {
    let mut c = empty_controller();
    for i in 0..4 {
        let x = 10.0 + i as f64 * 20.0;
        draw(&mut c, (x, 10.0), (x + 5.0, 15.0));
    }
    let full = c.strokes().to_vec();
    while c.undo() {}
    assert!(c.strokes().is_empty());
    while c.redo() {}
    assert_eq!(c.strokes(), full.as_slice());
}

// ─── Actions ────────────────────────────────────────────────────────────

#[test]
fn inverse_then_action_restores_state() {
    let mut c = make_controller();
    let before = c.strokes().to_vec();
    let actions = [
        Action::Erase {
            stroke: before[0].clone(),
            index: 0,
        },
        Action::Paint {
            stroke: Stroke::new("#00FF00", 2.0)
                .with_points([Point::new(1.0, 1.0), Point::new(2.0, 2.0)]),
            index: 1,
        },
    ];
    for action in actions {
        c.commit(action.clone());
        c.commit(action.inverse());
        assert_eq!(c.strokes(), before.as_slice());
    }

    let region_before = *c.region();
    let resize = Action::RegionResize {
        before: region_before,
        after: DrawingRegion::new(-10.0, 0.0, 200.0, 150.0),
    };
    c.commit(resize.clone());
    c.commit(resize.inverse());
    assert_eq!(*c.region(), region_before);
}

#[test]
fn delete_stroke_is_undoable_in_place() {
    let mut c = make_controller();
    let before = c.strokes().to_vec();
    let id: StrokeId = "6f1c2a4e-8b3d-4c7a-9e21-0d5f3b8a7c10".parse().unwrap();

    assert!(c.delete_stroke(id));
    assert_eq!(c.strokes().len(), 1);
    assert_eq!(c.strokes()[0].color, "#0000FF");

    c.undo();
    assert_eq!(c.strokes(), before.as_slice());
    c.redo();
    assert_eq!(c.strokes().len(), 1);

    assert!(!c.delete_stroke(StrokeId::new()));
}

#[test]
fn region_resize_undo_redo() {
    let mut c = empty_controller();
    // Right edge at world (150, 75), dragged 30 to the right.
    c.pointer_down(&at(150.0, 75.0));
    c.pointer_move(&at(180.0, 75.0));
    c.pointer_up();
    assert_eq!(*c.region(), DrawingRegion::new(0.0, 0.0, 180.0, 150.0));

    c.undo();
    assert_eq!(*c.region(), DrawingRegion::default());
    c.redo();
    assert_eq!(c.region().width, 180.0);
}

#[test]
fn history_depth_comes_from_config() {
    let mut c = make_controller();
    for i in 0..60 {
        let x = 20.0 + (i % 10) as f64 * 10.0;
        draw(&mut c, (x, 20.0), (x, 30.0));
    }
    let mut undone = 0;
    while c.undo() {
        undone += 1;
    }
    assert_eq!(undone, 50);
    assert_eq!(c.strokes().len(), 2 + 10);
}
