/// Maps normalized framings onto a concrete viewport.
///
/// The canvas draws the rendered image at `scale` with its top-left corner at
/// `(position_x, position_y)` in viewport pixels:
///
///   viewport = image_px * scale + position
///
/// Everything here is the forward direction of that map; `viewport_to_image`
/// is its exact inverse.
use serde::{Deserialize, Serialize};

use crate::focus::types::FocusTransformResult;
use crate::geometry::{Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasTransformState {
    pub scale: f64,
    pub position_x: f64,
    pub position_y: f64,
}

impl Default for CanvasTransformState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CanvasTransformState {
    pub const IDENTITY: CanvasTransformState = CanvasTransformState {
        scale: 1.0,
        position_x: 0.0,
        position_y: 0.0,
    };

    pub fn position(&self) -> Point {
        Point::new(self.position_x, self.position_y)
    }

    pub fn is_valid(&self) -> bool {
        self.scale.is_finite() && self.scale > 0.0 && self.position().is_finite()
    }

    /// Rendered-image pixel → viewport pixel.
    pub fn image_to_viewport(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.position_x,
            p.y * self.scale + self.position_y,
        )
    }

    /// Viewport pixel → rendered-image pixel.
    pub fn viewport_to_image(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.position_x) / self.scale,
            (p.y - self.position_y) / self.scale,
        )
    }

    /// Rescale while keeping the image pixel under `anchor` fixed.
    pub fn zoomed_about(&self, anchor: Point, new_scale: f64) -> CanvasTransformState {
        let under = self.viewport_to_image(anchor);
        CanvasTransformState {
            scale: new_scale,
            position_x: anchor.x - under.x * new_scale,
            position_y: anchor.y - under.y * new_scale,
        }
    }

    pub fn panned_by(&self, dx: f64, dy: f64) -> CanvasTransformState {
        CanvasTransformState {
            scale: self.scale,
            position_x: self.position_x + dx,
            position_y: self.position_y + dy,
        }
    }
}

/// Clamp a scale into `[min, max]`; non-finite input resolves to `min`.
pub fn clamp_guide_canvas_scale(scale: f64, min: f64, max: f64) -> f64 {
    if !scale.is_finite() || scale < min {
        min
    } else if scale > max {
        max
    } else {
        scale
    }
}

/// Center the focus origin in the viewport at the focus zoom.
///
/// `image_w`/`image_h` are the rendered image size at scale 1. Returns `None`
/// if any size is non-positive or non-finite.
pub fn compute_guide_canvas_focus_transform(
    focus: &FocusTransformResult,
    viewport_w: f64,
    viewport_h: f64,
    image_w: f64,
    image_h: f64,
    min_scale: f64,
    max_scale: f64,
) -> Option<CanvasTransformState> {
    let viewport = Size::new(viewport_w, viewport_h);
    let image = Size::new(image_w, image_h);
    if !viewport.is_valid() || !image.is_valid() {
        return None;
    }
    let scale = clamp_guide_canvas_scale(focus.zoom_scale, min_scale, max_scale);
    let origin = focus.transform_origin_percent.to_pixels(image);
    let center = viewport.center();
    Some(CanvasTransformState {
        scale,
        position_x: center.x - origin.x * scale,
        position_y: center.y - origin.y * scale,
    })
}

/// Whole image centered in the viewport at `scale`.
pub fn fit_transform(viewport: Size, image: Size, scale: f64) -> Option<CanvasTransformState> {
    if !viewport.is_valid() || !image.is_valid() || !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    Some(CanvasTransformState {
        scale,
        position_x: (viewport.width - image.width * scale) / 2.0,
        position_y: (viewport.height - image.height * scale) / 2.0,
    })
}

/// Scale at which one source pixel covers one viewport pixel.
pub fn actual_size_scale(rendered: Size, source: Size) -> Option<f64> {
    if !rendered.is_valid() || !source.is_valid() {
        return None;
    }
    Some(source.width / rendered.width)
}

/// Zoom about the viewport center to the 1:1 source-pixel scale, clamped to
/// `[min_scale, max_scale]`.
pub fn actual_size_transform(
    current: &CanvasTransformState,
    viewport: Size,
    rendered: Size,
    source: Size,
    min_scale: f64,
    max_scale: f64,
) -> Option<CanvasTransformState> {
    if !viewport.is_valid() || !current.is_valid() {
        return None;
    }
    let scale = actual_size_scale(rendered, source)?;
    let scale = clamp_guide_canvas_scale(scale, min_scale, max_scale);
    Some(current.zoomed_about(viewport.center(), scale))
}
