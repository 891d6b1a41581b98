/// Default framing for a screenshot: how far to zoom and where to center.
///
/// Two sources feed the crop box:
///   - an upstream region-of-interest hint, expanded by the context margin and
///     clamped to the image;
///   - a saved manual focus (center + zoom), re-expanded by the same margin
///     symmetrically about its center.
///
/// The `viewport` passed in is the nominal frame the crop is fitted into,
/// measured in source pixels (usually the image size itself).
use crate::config::FocusConfig;
use crate::focus::hints::RegionOfInterestHint;
use crate::focus::types::{
    unit_to_pixels, FocusOverride, FocusTransformResult, OriginPercent, RadarPercent, RadarPoint,
    ScreenshotOverridesV1,
};
use crate::geometry::{Point, Rect, Size};

#[derive(Debug, Clone, Copy)]
pub struct FocusTransformCalculator {
    config: FocusConfig,
}

impl FocusTransformCalculator {
    pub fn new(config: FocusConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FocusConfig {
        &self.config
    }

    /// Framing from the automatic inputs only.
    pub fn compute(
        &self,
        image: Size,
        viewport: Size,
        hint: Option<&RegionOfInterestHint>,
        radar: Option<&RadarPoint>,
    ) -> FocusTransformResult {
        let radar_px = radar.and_then(RadarPoint::source_pixels);
        self.compute_inner(image, viewport, hint, None, radar_px)
    }

    /// Framing with operator overrides applied: a saved focus replaces the
    /// hint and a saved cursor replaces the radar point.
    pub fn compute_with_overrides(
        &self,
        image: Size,
        viewport: Size,
        hint: Option<&RegionOfInterestHint>,
        radar: Option<&RadarPoint>,
        overrides: Option<&ScreenshotOverridesV1>,
    ) -> FocusTransformResult {
        let cursor_px = overrides
            .and_then(|o| o.cursor)
            .and_then(|c| unit_to_pixels(c.point_unit, image));
        let radar_px = cursor_px.or_else(|| radar.and_then(RadarPoint::source_pixels));
        let focus = overrides.and_then(|o| o.focus).filter(FocusOverride::is_valid);
        self.compute_inner(image, viewport, hint, focus, radar_px)
    }

    /// Hint box expanded by the context margin and clamped to the image.
    pub fn expanded_crop(&self, image: Size, hint: &RegionOfInterestHint) -> Option<Rect> {
        let b = hint.pixel_box(image)?;
        let m = self.config.context_margin_factor;
        let grown = Rect::new(
            b.x - b.width * m,
            b.y - b.height * m,
            b.width * (1.0 + 2.0 * m),
            b.height * (1.0 + 2.0 * m),
        );
        let clipped = grown.clip_to(image);
        (clipped.width > 0.0 && clipped.height > 0.0).then_some(clipped)
    }

    fn compute_inner(
        &self,
        image: Size,
        viewport: Size,
        hint: Option<&RegionOfInterestHint>,
        focus: Option<FocusOverride>,
        radar_px: Option<Point>,
    ) -> FocusTransformResult {
        if !image.is_valid() || !viewport.is_valid() {
            tracing::debug!(?image, ?viewport, "invalid dimensions, no focus crop");
            return FocusTransformResult::uncropped(OriginPercent::CENTER);
        }
        let radar_pct = radar_px.map(|p| {
            RadarPercent::clamped(p.x / image.width * 100.0, p.y / image.height * 100.0)
        });

        if let Some(focus) = focus {
            return self.from_saved_focus(image, viewport, focus, radar_px);
        }

        let Some(crop) = hint.and_then(|h| self.expanded_crop(image, h)) else {
            let origin = radar_pct.map(OriginPercent::from).unwrap_or(OriginPercent::CENTER);
            tracing::debug!(?origin, "no usable region hint, uncropped framing");
            return FocusTransformResult::uncropped(origin);
        };

        let raw = (viewport.width / crop.width).min(viewport.height / crop.height);
        let zoom_scale = self.clamp_zoom(raw);
        let center = crop.center();
        let origin = OriginPercent::clamped(
            center.x / image.width * 100.0,
            center.y / image.height * 100.0,
        );
        tracing::debug!(?crop, raw_zoom = raw, zoom_scale, "focus crop from region hint");

        FocusTransformResult {
            has_focus_crop: true,
            zoom_scale,
            transform_origin_percent: origin,
            radar_percent_in_crop: radar_px.and_then(|p| percent_in_crop(p, crop)),
        }
    }

    fn from_saved_focus(
        &self,
        image: Size,
        viewport: Size,
        focus: FocusOverride,
        radar_px: Option<Point>,
    ) -> FocusTransformResult {
        let compensation = self.config.saved_zoom_compensation();
        let effective = focus.zoom_scale / compensation;
        let center = Point::new(
            focus.center_unit.x * image.width,
            focus.center_unit.y * image.height,
        );
        // Saved box is viewport / zoom_scale; re-expanding it by the margin
        // multiplies both sides by `compensation`.
        let crop_w = viewport.width / effective;
        let crop_h = viewport.height / effective;
        let crop = Rect::new(center.x - crop_w / 2.0, center.y - crop_h / 2.0, crop_w, crop_h)
            .clip_to(image);
        let zoom_scale = self.clamp_zoom(effective);
        tracing::debug!(
            saved_zoom = focus.zoom_scale,
            zoom_scale,
            "focus crop from saved override"
        );

        FocusTransformResult {
            has_focus_crop: true,
            zoom_scale,
            transform_origin_percent: OriginPercent::clamped(
                focus.center_unit.x * 100.0,
                focus.center_unit.y * 100.0,
            ),
            radar_percent_in_crop: radar_px.and_then(|p| percent_in_crop(p, crop)),
        }
    }

    fn clamp_zoom(&self, raw: f64) -> f64 {
        if raw.is_finite() {
            raw.clamp(self.config.min_scale, self.config.max_scale)
        } else {
            self.config.min_scale
        }
    }
}

impl Default for FocusTransformCalculator {
    fn default() -> Self {
        Self::new(FocusConfig::default())
    }
}

fn percent_in_crop(p: Point, crop: Rect) -> Option<RadarPercent> {
    if crop.width <= 0.0 || crop.height <= 0.0 || !crop.contains(p) {
        return None;
    }
    Some(RadarPercent::clamped(
        (p.x - crop.x) / crop.width * 100.0,
        (p.y - crop.y) / crop.height * 100.0,
    ))
}
