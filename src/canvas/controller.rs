use serde::{Deserialize, Serialize};

use crate::canvas::adapter::{
    actual_size_transform, clamp_guide_canvas_scale, compute_guide_canvas_focus_transform,
    fit_transform, CanvasTransformState,
};
use crate::canvas::input::{CanvasEvent, CanvasKey, PanDirection, ResizeTarget};
use crate::config::CanvasConfig;
use crate::focus::types::FocusTransformResult;
use crate::geometry::{Point, Rect, Size, UnitPoint};

/// Bound on `ln(zoom factor)` for a single wheel event.
const MAX_WHEEL_EXPONENT: f64 = 10.0;

/// Live canvas state handed to the save path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    pub scale: f64,
    pub position_x: f64,
    pub position_y: f64,
    pub viewport_size: Size,
    pub rendered_image_size: Size,
}

impl CanvasSnapshot {
    /// Strictly positive, finite sizes and scale.
    pub fn is_savable(&self) -> bool {
        self.scale.is_finite()
            && self.scale > 0.0
            && self.position_x.is_finite()
            && self.position_y.is_finite()
            && self.viewport_size.is_valid()
            && self.rendered_image_size.is_valid()
    }

    pub fn transform(&self) -> CanvasTransformState {
        CanvasTransformState {
            scale: self.scale,
            position_x: self.position_x,
            position_y: self.position_y,
        }
    }
}

/// What the host should do after an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasOutcome {
    Unchanged,
    /// Commit `state`; animate over `animate_ms` when set.
    Transform {
        state: CanvasTransformState,
        animate_ms: Option<u32>,
    },
    /// Capture-click mode produced a point in image unit space.
    ClickCaptured(UnitPoint),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Drag { start: Point, last: Point, moved: bool },
    Pinch { start: CanvasTransformState },
}

/// Pan/zoom state machine for one mounted screenshot canvas.
pub struct InteractiveCanvasController {
    config: CanvasConfig,
    state: CanvasTransformState,
    viewport: Size,
    rendered: Size,
    source: Size,
    focus: FocusTransformResult,
    gesture: Gesture,
    active: bool,
    auto_focus: bool,
    reduced_motion: bool,
    pending_activation: bool,
    capture_click: bool,
}

impl InteractiveCanvasController {
    pub fn new(config: CanvasConfig, source: Size, focus: FocusTransformResult) -> Self {
        Self {
            config,
            state: CanvasTransformState::IDENTITY,
            viewport: Size::ZERO,
            rendered: Size::ZERO,
            source,
            focus,
            gesture: Gesture::Idle,
            active: false,
            auto_focus: true,
            reduced_motion: false,
            pending_activation: false,
            capture_click: false,
        }
    }

    pub fn state(&self) -> CanvasTransformState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn focus_transform(&self) -> &FocusTransformResult {
        &self.focus
    }

    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            scale: self.state.scale,
            position_x: self.state.position_x,
            position_y: self.state.position_y,
            viewport_size: self.viewport,
            rendered_image_size: self.rendered,
        }
    }

    /// Both measured sizes are known and non-zero.
    pub fn is_measured(&self) -> bool {
        self.viewport.is_valid() && self.rendered.is_valid()
    }

    /// Swap in a new screenshot. Resets the transform and drops any gesture;
    /// the rendered size must be re-measured.
    pub fn set_image(&mut self, source: Size, focus: FocusTransformResult) {
        self.source = source;
        self.focus = focus;
        self.rendered = Size::ZERO;
        self.state = CanvasTransformState::IDENTITY;
        self.gesture = Gesture::Idle;
        self.pending_activation = self.active;
        tracing::debug!(?source, "canvas image replaced");
    }

    /// Replace the focus framing (e.g. after overrides were saved) without
    /// touching the current transform.
    pub fn set_focus(&mut self, focus: FocusTransformResult) {
        self.focus = focus;
    }

    pub fn set_capture_click(&mut self, enabled: bool) {
        self.capture_click = enabled;
        self.gesture = Gesture::Idle;
    }

    pub fn is_capturing_clicks(&self) -> bool {
        self.capture_click
    }

    /// The step became visible. Jumps to focus when `auto_focus` is set,
    /// otherwise fits; `reduced_motion` only drops the animation. If sizes
    /// are not measured yet the jump waits for the resize that completes them.
    pub fn activate(&mut self, auto_focus: bool, reduced_motion: bool) -> CanvasOutcome {
        self.active = true;
        self.auto_focus = auto_focus;
        self.reduced_motion = reduced_motion;
        self.state = CanvasTransformState::IDENTITY;
        self.gesture = Gesture::Idle;
        self.pending_activation = true;
        self.apply_pending_activation()
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.pending_activation = false;
        self.gesture = Gesture::Idle;
        self.state = CanvasTransformState::IDENTITY;
    }

    pub fn handle(&mut self, event: CanvasEvent) -> CanvasOutcome {
        match event {
            CanvasEvent::Resize { target, size } => self.resize(target, size),
            CanvasEvent::PointerDown { client, .. } => {
                // A click can still be captured against the source size
                // before the viewport is measured.
                let can_capture = self.capture_click && self.normalization_basis().is_some();
                if self.gesture != Gesture::Idle || !(self.is_measured() || can_capture) {
                    return CanvasOutcome::Unchanged;
                }
                self.gesture = Gesture::Drag {
                    start: client,
                    last: client,
                    moved: false,
                };
                CanvasOutcome::Unchanged
            }
            CanvasEvent::PointerMove { client, .. } => self.drag_to(client),
            CanvasEvent::PointerUp { client, container } => {
                let Gesture::Drag { moved, .. } = self.gesture else {
                    return CanvasOutcome::Unchanged;
                };
                self.gesture = Gesture::Idle;
                if self.capture_click && !moved {
                    if let Some(unit) = self.client_to_unit(client, container) {
                        tracing::debug!(x = unit.x, y = unit.y, "click captured");
                        return CanvasOutcome::ClickCaptured(unit);
                    }
                }
                CanvasOutcome::Unchanged
            }
            CanvasEvent::Wheel {
                delta_y,
                client,
                container,
            } => {
                if self.gesture != Gesture::Idle || !delta_y.is_finite() {
                    return CanvasOutcome::Unchanged;
                }
                let exponent = (-delta_y * self.config.wheel_zoom_sensitivity)
                    .clamp(-MAX_WHEEL_EXPONENT, MAX_WHEEL_EXPONENT);
                let factor = exponent.exp();
                let anchor = to_viewport(client, container);
                self.zoom_to(self.state.scale * factor, anchor, None)
            }
            CanvasEvent::PinchStart { .. } => {
                if !self.is_measured() || self.gesture != Gesture::Idle {
                    return CanvasOutcome::Unchanged;
                }
                self.gesture = Gesture::Pinch { start: self.state };
                CanvasOutcome::Unchanged
            }
            CanvasEvent::PinchMove {
                ratio,
                center,
                container,
            } => {
                let Gesture::Pinch { start } = self.gesture else {
                    return CanvasOutcome::Unchanged;
                };
                if !ratio.is_finite() || ratio <= 0.0 {
                    return CanvasOutcome::Unchanged;
                }
                self.zoom_to(start.scale * ratio, to_viewport(center, container), None)
            }
            CanvasEvent::PinchEnd => {
                if matches!(self.gesture, Gesture::Pinch { .. }) {
                    self.gesture = Gesture::Idle;
                }
                CanvasOutcome::Unchanged
            }
            CanvasEvent::Key(key) => self.handle_key(key),
        }
    }

    pub fn handle_key(&mut self, key: CanvasKey) -> CanvasOutcome {
        match key {
            CanvasKey::ZoomIn => self.zoom_in(),
            CanvasKey::ZoomOut => self.zoom_out(),
            CanvasKey::Fit => self.fit(),
            CanvasKey::Focus => self.focus(),
            CanvasKey::Pan { direction } => {
                let step = self.config.pan_step_px;
                let (dx, dy) = match direction {
                    PanDirection::Left => (step, 0.0),
                    PanDirection::Right => (-step, 0.0),
                    PanDirection::Up => (0.0, step),
                    PanDirection::Down => (0.0, -step),
                };
                self.pan_by(dx, dy)
            }
        }
    }

    /// Whole image at minimum scale.
    pub fn fit(&mut self) -> CanvasOutcome {
        if !self.is_measured() {
            return CanvasOutcome::Unchanged;
        }
        let animate = self.animation();
        match fit_transform(self.viewport, self.rendered, self.config.min_scale) {
            Some(state) => self.commit(state, animate),
            None => CanvasOutcome::Unchanged,
        }
    }

    /// One source pixel per viewport pixel, about the viewport center.
    pub fn actual_size(&mut self) -> CanvasOutcome {
        if !self.is_measured() {
            return CanvasOutcome::Unchanged;
        }
        let Some(next) = actual_size_transform(
            &self.state,
            self.viewport,
            self.rendered,
            self.source,
            self.config.min_scale,
            self.config.max_scale,
        ) else {
            return CanvasOutcome::Unchanged;
        };
        let animate = self.animation();
        self.commit(next, animate)
    }

    /// Jump to the focus framing.
    pub fn focus(&mut self) -> CanvasOutcome {
        if !self.is_measured() {
            return CanvasOutcome::Unchanged;
        }
        let animate = self.animation();
        match self.focus_state() {
            Some(state) => self.commit(state, animate),
            None => CanvasOutcome::Unchanged,
        }
    }

    /// Back to the framing the canvas opened with.
    pub fn reset(&mut self) -> CanvasOutcome {
        if self.auto_focus {
            self.focus()
        } else {
            self.fit()
        }
    }

    /// Zoom slider: absolute scale about the viewport center.
    pub fn set_zoom(&mut self, scale: f64) -> CanvasOutcome {
        if !self.is_measured() {
            return CanvasOutcome::Unchanged;
        }
        self.zoom_to(scale, self.viewport.center(), None)
    }

    pub fn zoom_in(&mut self) -> CanvasOutcome {
        let target = self.state.scale * self.config.zoom_step;
        let animate = self.animation();
        self.zoom_to(target, self.viewport.center(), animate)
    }

    pub fn zoom_out(&mut self) -> CanvasOutcome {
        let target = self.state.scale / self.config.zoom_step;
        let animate = self.animation();
        self.zoom_to(target, self.viewport.center(), animate)
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> CanvasOutcome {
        if !self.is_measured() || !dx.is_finite() || !dy.is_finite() {
            return CanvasOutcome::Unchanged;
        }
        let next = self.state.panned_by(dx, dy);
        self.commit(next, None)
    }

    /// Invert a client-space pointer position into image unit space.
    ///
    /// Normalizes by the rendered image size, or by the source size while the
    /// rendered size is unknown. The result is clamped to `[0, 1]²`.
    pub fn client_to_unit(&self, client: Point, container: Rect) -> Option<UnitPoint> {
        if !self.state.is_valid() || !client.is_finite() {
            return None;
        }
        let basis = self.normalization_basis()?;
        let image = self.state.viewport_to_image(to_viewport(client, container));
        Some(UnitPoint::clamped(image.x / basis.width, image.y / basis.height))
    }

    /// Forward counterpart of `client_to_unit`, in viewport pixels.
    pub fn unit_to_viewport(&self, unit: UnitPoint) -> Option<Point> {
        let basis = self.normalization_basis()?;
        Some(
            self.state
                .image_to_viewport(Point::new(unit.x * basis.width, unit.y * basis.height)),
        )
    }

    fn normalization_basis(&self) -> Option<Size> {
        if self.rendered.is_valid() {
            Some(self.rendered)
        } else if self.source.is_valid() {
            Some(self.source)
        } else {
            None
        }
    }

    fn resize(&mut self, target: ResizeTarget, size: Size) -> CanvasOutcome {
        let size = if size.is_valid() { size } else { Size::ZERO };
        match target {
            ResizeTarget::Viewport => self.viewport = size,
            ResizeTarget::Image => self.rendered = size,
        }
        tracing::debug!(?target, ?size, "canvas resized");
        self.apply_pending_activation()
    }

    fn apply_pending_activation(&mut self) -> CanvasOutcome {
        if !self.pending_activation || !self.is_measured() {
            return CanvasOutcome::Unchanged;
        }
        self.pending_activation = false;
        if self.auto_focus {
            let animate = self.animation();
            if let Some(state) = self.focus_state() {
                tracing::debug!(
                    scale = state.scale,
                    animated = animate.is_some(),
                    "auto-focus on activation"
                );
                return self.commit(state, animate);
            }
        }
        match fit_transform(self.viewport, self.rendered, self.config.min_scale) {
            Some(state) => self.commit(state, None),
            None => CanvasOutcome::Unchanged,
        }
    }

    fn focus_state(&self) -> Option<CanvasTransformState> {
        compute_guide_canvas_focus_transform(
            &self.focus,
            self.viewport.width,
            self.viewport.height,
            self.rendered.width,
            self.rendered.height,
            self.config.min_scale,
            self.config.max_scale,
        )
    }

    fn drag_to(&mut self, client: Point) -> CanvasOutcome {
        let Gesture::Drag { start, last, moved } = self.gesture else {
            return CanvasOutcome::Unchanged;
        };
        if !client.is_finite() {
            return CanvasOutcome::Unchanged;
        }
        let moved = moved || start.distance_to(client) > self.config.click_slop_px;
        if self.capture_click && !moved {
            return CanvasOutcome::Unchanged;
        }
        self.gesture = Gesture::Drag {
            start,
            last: client,
            moved,
        };
        self.pan_by(client.x - last.x, client.y - last.y)
    }

    fn zoom_to(&mut self, scale: f64, anchor: Point, animate: Option<u32>) -> CanvasOutcome {
        if !self.is_measured() || !anchor.is_finite() {
            return CanvasOutcome::Unchanged;
        }
        let scale = clamp_guide_canvas_scale(scale, self.config.min_scale, self.config.max_scale);
        let next = self.state.zoomed_about(anchor, scale);
        self.commit(next, animate)
    }

    fn commit(&mut self, state: CanvasTransformState, animate_ms: Option<u32>) -> CanvasOutcome {
        if !state.is_valid() || state == self.state {
            return CanvasOutcome::Unchanged;
        }
        self.state = state;
        CanvasOutcome::Transform { state, animate_ms }
    }

    fn animation(&self) -> Option<u32> {
        (!self.reduced_motion && self.config.animation_ms > 0).then_some(self.config.animation_ms)
    }
}

fn to_viewport(client: Point, container: Rect) -> Point {
    Point::new(client.x - container.x, client.y - container.y)
}
