/// Manual focus / cursor overrides for one step's screenshot.
///
/// The editor turns the live canvas into a persistable
/// `ScreenshotOverridesV1`. The saved zoom is multiplied by
/// `FocusConfig::saved_zoom_compensation` because the calculator divides it
/// back out when it re-expands the saved crop; reopening and saving again
/// without edits therefore reproduces the same framing.
use crate::canvas::controller::CanvasSnapshot;
use crate::config::FocusConfig;
use crate::focus::types::{CursorOverride, FocusOverride, ScreenshotOverridesV1};
use crate::geometry::UnitPoint;

pub struct FocusOverrideEditor {
    config: FocusConfig,
    focus: Option<FocusOverride>,
    carried_cursor: Option<CursorOverride>,
    session_cursor: Option<UnitPoint>,
    cursor_touched: bool,
    dirty: bool,
}

impl FocusOverrideEditor {
    /// Start an editing session over previously persisted overrides.
    pub fn open(existing: Option<&ScreenshotOverridesV1>, config: FocusConfig) -> Self {
        Self {
            config,
            focus: existing
                .and_then(|o| o.focus)
                .filter(FocusOverride::is_valid),
            carried_cursor: existing
                .and_then(|o| o.cursor)
                .filter(CursorOverride::is_valid),
            session_cursor: None,
            cursor_touched: false,
            dirty: false,
        }
    }

    pub fn cursor_touched(&self) -> bool {
        self.cursor_touched
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Manual focus held by the session, persisted or captured.
    pub fn effective_focus(&self) -> Option<FocusOverride> {
        self.focus
    }

    /// Cursor that a save would persist right now.
    pub fn effective_cursor(&self) -> Option<CursorOverride> {
        if self.cursor_touched {
            self.session_cursor.map(|point_unit| CursorOverride { point_unit })
        } else {
            self.carried_cursor
        }
    }

    /// Operator placed a custom cursor point (e.g. via capture-click).
    pub fn set_cursor_point(&mut self, point: UnitPoint) {
        self.session_cursor = Some(UnitPoint::clamped(point.x, point.y));
        self.cursor_touched = true;
        self.dirty = true;
    }

    /// Drop any custom cursor so the automatic radar point applies again.
    pub fn clear_cursor(&mut self) {
        self.session_cursor = None;
        self.carried_cursor = None;
        self.cursor_touched = false;
        self.dirty = true;
    }

    /// Convert a canvas snapshot into a saved focus. `None` unless the
    /// snapshot has strictly positive, finite sizes and scale.
    pub fn focus_from_snapshot(&self, snapshot: &CanvasSnapshot) -> Option<FocusOverride> {
        if !snapshot.is_savable() {
            return None;
        }
        let viewport_center = snapshot.viewport_size.center();
        let rendered = snapshot.rendered_image_size;
        let scale = snapshot.scale;
        let center_unit = UnitPoint::clamped(
            (viewport_center.x - snapshot.position_x) / scale / rendered.width,
            (viewport_center.y - snapshot.position_y) / scale / rendered.height,
        );
        let compensated = if scale > 1.0 {
            scale * self.config.saved_zoom_compensation()
        } else {
            scale
        };
        let zoom_scale = compensated.min(self.config.max_saved_zoom_scale()).max(1.0);
        Some(FocusOverride {
            center_unit,
            zoom_scale,
        })
    }

    /// Adopt the current canvas framing as the manual focus. Leaves the
    /// session untouched and returns `None` for an unsavable snapshot.
    pub fn capture_focus(&mut self, snapshot: &CanvasSnapshot) -> Option<FocusOverride> {
        let Some(focus) = self.focus_from_snapshot(snapshot) else {
            tracing::debug!(?snapshot, "focus capture skipped: canvas not measured");
            return None;
        };
        tracing::debug!(
            center_x = focus.center_unit.x,
            center_y = focus.center_unit.y,
            zoom_scale = focus.zoom_scale,
            "focus captured"
        );
        self.focus = Some(focus);
        self.dirty = true;
        Some(focus)
    }

    /// Drop the manual focus so the automatic framing applies again.
    pub fn clear_focus(&mut self) {
        self.focus = None;
        self.dirty = true;
    }

    /// Explicit save of the current canvas framing. No-op (`None`) for an
    /// unsavable snapshot.
    pub fn save(&mut self, snapshot: &CanvasSnapshot) -> Option<ScreenshotOverridesV1> {
        self.capture_focus(snapshot)?;
        Some(self.commit())
    }

    /// Save without a manual focus so the automatic framing applies again.
    pub fn save_automatic_focus(&mut self) -> ScreenshotOverridesV1 {
        self.clear_focus();
        self.commit()
    }

    fn commit(&mut self) -> ScreenshotOverridesV1 {
        let overrides = ScreenshotOverridesV1 {
            focus: self.focus,
            cursor: self.effective_cursor(),
        };
        tracing::debug!(
            focus = overrides.focus.is_some(),
            cursor = overrides.cursor.is_some(),
            "focus overrides saved"
        );
        self.dirty = false;
        overrides
    }
}
