use shotframe_lib::canvas::controller::{CanvasOutcome, InteractiveCanvasController};
use shotframe_lib::canvas::input::{CanvasEvent, CanvasKey, PanDirection, ResizeTarget};
use shotframe_lib::config::EngineConfig;
use shotframe_lib::editor::overrides::FocusOverrideEditor;
use shotframe_lib::focus::calculator::FocusTransformCalculator;
use shotframe_lib::focus::hints::RegionOfInterestHint;
use shotframe_lib::focus::types::{RadarPoint, ScreenshotOverridesV1};
use shotframe_lib::geometry::{Point, Rect, Size, UnitPoint};

const SOURCE: Size = Size::new(1000.0, 600.0);
const VIEWPORT: Size = Size::new(900.0, 540.0);
const CONTAINER: Rect = Rect::new(40.0, 80.0, 900.0, 540.0);

fn hint() -> RegionOfInterestHint {
    RegionOfInterestHint::BoundingBox {
        x: 400.0,
        y: 200.0,
        width: 100.0,
        height: 80.0,
    }
}

/// Mount a canvas the way the host does: compute the framing, measure, activate.
fn open_canvas(
    config: &EngineConfig,
    overrides: Option<&ScreenshotOverridesV1>,
) -> InteractiveCanvasController {
    let calc = FocusTransformCalculator::new(config.focus);
    let focus = calc.compute_with_overrides(
        SOURCE,
        SOURCE,
        Some(&hint()),
        Some(&RadarPoint::step_pixels(450.0, 240.0)),
        overrides,
    );
    let mut canvas = InteractiveCanvasController::new(config.canvas, SOURCE, focus);
    canvas.activate(true, true);
    canvas.handle(CanvasEvent::Resize {
        target: ResizeTarget::Viewport,
        size: VIEWPORT,
    });
    canvas.handle(CanvasEvent::Resize {
        target: ResizeTarget::Image,
        size: VIEWPORT,
    });
    canvas
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn repeated_save_and_reopen_does_not_drift() {
    let config = EngineConfig::default();

    let mut canvas = open_canvas(&config, None);
    canvas.handle_key(CanvasKey::ZoomOut);
    canvas.handle_key(CanvasKey::Pan { direction: PanDirection::Right });
    canvas.handle_key(CanvasKey::Pan { direction: PanDirection::Up });
    let edited = canvas.state();

    let mut editor = FocusOverrideEditor::open(None, config.focus);
    let mut saved = editor.save(&canvas.snapshot()).expect("savable snapshot");

    for _ in 0..25 {
        let reopened = open_canvas(&config, Some(&saved));
        let state = reopened.state();
        assert!(close(state.scale, edited.scale), "{} vs {}", state.scale, edited.scale);
        assert!(close(state.position_x, edited.position_x));
        assert!(close(state.position_y, edited.position_y));

        let mut editor = FocusOverrideEditor::open(Some(&saved), config.focus);
        let next = editor.save(&reopened.snapshot()).expect("savable snapshot");
        let (a, b) = (saved.focus.unwrap(), next.focus.unwrap());
        assert!(close(a.zoom_scale, b.zoom_scale));
        assert!(close(a.center_unit.x, b.center_unit.x));
        assert!(close(a.center_unit.y, b.center_unit.y));
        saved = next;
    }
}

#[test]
fn round_trip_holds_at_every_scale() {
    let config = EngineConfig::default();
    for target in [1.0, 1.3, 2.0, 3.7, 4.0] {
        let mut canvas = open_canvas(&config, None);
        canvas.set_zoom(target);
        let before = canvas.state();

        let mut editor = FocusOverrideEditor::open(None, config.focus);
        let saved = editor.save(&canvas.snapshot()).unwrap();
        let after = open_canvas(&config, Some(&saved)).state();
        assert!(close(before.scale, after.scale), "scale {target}");
        assert!(close(before.position_x, after.position_x), "x at {target}");
        assert!(close(before.position_y, after.position_y), "y at {target}");
    }
}

#[test]
fn round_trip_holds_with_narrower_canvas_range() {
    let mut config = EngineConfig::default();
    config.canvas.min_scale = 1.5;
    config.canvas.max_scale = 3.0;
    config.validate().expect("canvas range inside focus range");

    for target in [1.5, 2.2, 3.0] {
        let mut canvas = open_canvas(&config, None);
        canvas.set_zoom(target);
        let before = canvas.state();
        let mut editor = FocusOverrideEditor::open(None, config.focus);
        let saved = editor.save(&canvas.snapshot()).unwrap();
        let after = open_canvas(&config, Some(&saved)).state();
        assert!(close(before.scale, after.scale), "scale {target}");
        assert!(close(before.position_x, after.position_x), "x at {target}");
        assert!(close(before.position_y, after.position_y), "y at {target}");
    }
}

#[test]
fn click_inversion_is_exact_inverse_of_forward_map() {
    let config = EngineConfig::default();
    let mut canvas = open_canvas(&config, None);
    canvas.handle(CanvasEvent::Wheel {
        delta_y: 120.0,
        client: Point::new(300.0, 200.0),
        container: CONTAINER,
    });

    for (x, y) in [(0.0, 0.0), (0.12, 0.9), (0.5, 0.5), (0.77, 0.31), (1.0, 1.0)] {
        let unit = UnitPoint::clamped(x, y);
        let viewport = canvas.unit_to_viewport(unit).unwrap();
        let client = Point::new(viewport.x + CONTAINER.x, viewport.y + CONTAINER.y);
        let back = canvas.client_to_unit(client, CONTAINER).unwrap();
        assert!(close(back.x, x) && close(back.y, y), "({x}, {y}) -> {back:?}");
    }
}

#[test]
fn captured_click_becomes_cursor_override() {
    let config = EngineConfig::default();
    let mut canvas = open_canvas(&config, None);
    canvas.set_capture_click(true);

    let client = Point::new(CONTAINER.x + 450.0, CONTAINER.y + 270.0);
    canvas.handle(CanvasEvent::PointerDown { client, container: CONTAINER });
    let outcome = canvas.handle(CanvasEvent::PointerUp { client, container: CONTAINER });
    let CanvasOutcome::ClickCaptured(point) = outcome else {
        panic!("expected captured click, got {outcome:?}");
    };

    let mut editor = FocusOverrideEditor::open(None, config.focus);
    editor.set_cursor_point(point);
    let saved = editor.save(&canvas.snapshot()).unwrap();
    let cursor = saved.cursor.unwrap();
    // viewport center sits on the focus origin (45%, 40%)
    assert!(close(cursor.point_unit.x, 0.45));
    assert!(close(cursor.point_unit.y, 0.40));
}
