use serde::{Deserialize, Serialize};

use crate::geometry::{clamp_percent, is_positive, is_unit, Point, Size, UnitPoint};

/// Tag of the only coordinate space a radar point may be expressed in.
pub const STEP_IMAGE_PIXELS_V1: &str = "step_image_pixels_v1";

/// Pixel marker where the recorded interaction happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarPoint {
    pub x: f64,
    pub y: f64,
    pub coordinate_space: String,
}

impl RadarPoint {
    pub fn step_pixels(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            coordinate_space: STEP_IMAGE_PIXELS_V1.to_string(),
        }
    }

    /// The point in source pixels, or `None` when it is tagged with a foreign
    /// coordinate space or carries non-finite coordinates.
    pub fn source_pixels(&self) -> Option<Point> {
        if self.coordinate_space != STEP_IMAGE_PIXELS_V1 {
            return None;
        }
        let p = Point::new(self.x, self.y);
        p.is_finite().then_some(p)
    }
}

/// Position as percentages of some reference box, each axis in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarPercent {
    pub left: f64,
    pub top: f64,
}

impl RadarPercent {
    pub fn clamped(left: f64, top: f64) -> Self {
        Self {
            left: clamp_percent(left),
            top: clamp_percent(top),
        }
    }

    pub fn from_unit(p: UnitPoint) -> Self {
        Self::clamped(p.x * 100.0, p.y * 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OriginPercent {
    pub x: f64,
    pub y: f64,
}

impl OriginPercent {
    pub const CENTER: OriginPercent = OriginPercent { x: 50.0, y: 50.0 };

    pub fn clamped(x: f64, y: f64) -> Self {
        Self {
            x: clamp_percent(x),
            y: clamp_percent(y),
        }
    }

    /// The origin in pixels of an image of the given size.
    pub fn to_pixels(&self, image: Size) -> Point {
        Point::new(self.x / 100.0 * image.width, self.y / 100.0 * image.height)
    }
}

impl From<RadarPercent> for OriginPercent {
    fn from(p: RadarPercent) -> Self {
        Self { x: p.left, y: p.top }
    }
}

/// Default framing derived for one screenshot. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusTransformResult {
    pub has_focus_crop: bool,
    pub zoom_scale: f64,
    pub transform_origin_percent: OriginPercent,
    pub radar_percent_in_crop: Option<RadarPercent>,
}

impl FocusTransformResult {
    /// Unzoomed framing centered on `origin`.
    pub fn uncropped(origin: OriginPercent) -> Self {
        Self {
            has_focus_crop: false,
            zoom_scale: 1.0,
            transform_origin_percent: origin,
            radar_percent_in_crop: None,
        }
    }
}

impl Default for FocusTransformResult {
    fn default() -> Self {
        Self::uncropped(OriginPercent::CENTER)
    }
}

/// Manually chosen framing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusOverride {
    pub center_unit: UnitPoint,
    pub zoom_scale: f64,
}

impl FocusOverride {
    pub fn is_valid(&self) -> bool {
        self.center_unit.is_valid() && self.zoom_scale.is_finite() && self.zoom_scale >= 1.0
    }
}

/// Manually placed cursor hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorOverride {
    pub point_unit: UnitPoint,
}

impl CursorOverride {
    pub fn is_valid(&self) -> bool {
        self.point_unit.is_valid()
    }
}

/// Per-step operator overrides, persisted as JSON by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenshotOverridesV1 {
    #[serde(default)]
    pub focus: Option<FocusOverride>,
    #[serde(default)]
    pub cursor: Option<CursorOverride>,
}

impl ScreenshotOverridesV1 {
    pub fn is_empty(&self) -> bool {
        self.focus.is_none() && self.cursor.is_none()
    }

    /// Describe the first geometry violation, if any.
    pub fn violation(&self) -> Option<String> {
        if let Some(focus) = &self.focus {
            if !focus.center_unit.is_valid() {
                return Some(format!(
                    "focus.center_unit must lie in [0,1]², got ({}, {})",
                    focus.center_unit.x, focus.center_unit.y
                ));
            }
            if !(focus.zoom_scale.is_finite() && focus.zoom_scale >= 1.0) {
                return Some(format!(
                    "focus.zoom_scale must be finite and >= 1, got {}",
                    focus.zoom_scale
                ));
            }
        }
        if let Some(cursor) = &self.cursor {
            if !cursor.is_valid() {
                return Some(format!(
                    "cursor.point_unit must lie in [0,1]², got ({}, {})",
                    cursor.point_unit.x, cursor.point_unit.y
                ));
            }
        }
        None
    }
}

/// Cursor override as a pixel point in an image of the given size.
pub(crate) fn unit_to_pixels(p: UnitPoint, image: Size) -> Option<Point> {
    if !is_positive(image.width) || !is_positive(image.height) || !is_unit(p.x) || !is_unit(p.y) {
        return None;
    }
    Some(Point::new(p.x * image.width, p.y * image.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_space_is_not_usable() {
        let mut radar = RadarPoint::step_pixels(10.0, 20.0);
        assert_eq!(radar.source_pixels(), Some(Point::new(10.0, 20.0)));
        radar.coordinate_space = "screen_points".into();
        assert_eq!(radar.source_pixels(), None);
    }

    #[test]
    fn transform_result_serializes_camel_case() {
        let json = serde_json::to_value(FocusTransformResult::default()).unwrap();
        assert_eq!(json["hasFocusCrop"], false);
        assert_eq!(json["zoomScale"], 1.0);
        assert_eq!(json["transformOriginPercent"]["x"], 50.0);
        assert!(json["radarPercentInCrop"].is_null());
    }

    #[test]
    fn overrides_use_snake_case_and_nulls() {
        let overrides = ScreenshotOverridesV1 {
            focus: Some(FocusOverride {
                center_unit: UnitPoint::clamped(0.25, 0.5),
                zoom_scale: 2.0,
            }),
            cursor: None,
        };
        let json = serde_json::to_value(overrides).unwrap();
        assert_eq!(json["focus"]["center_unit"]["x"], 0.25);
        assert_eq!(json["focus"]["zoom_scale"], 2.0);
        assert!(json["cursor"].is_null());
    }

    #[test]
    fn violation_reports_bad_zoom() {
        let overrides = ScreenshotOverridesV1 {
            focus: Some(FocusOverride {
                center_unit: UnitPoint::CENTER,
                zoom_scale: 0.5,
            }),
            cursor: None,
        };
        assert!(overrides.violation().unwrap().contains("zoom_scale"));
    }
}
