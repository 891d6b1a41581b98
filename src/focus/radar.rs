use crate::focus::types::{RadarPercent, RadarPoint};
use crate::geometry::Size;

/// Position of a radar point as a percentage of the source image.
///
/// Returns `None` when there is nothing meaningful to draw: no point, a
/// foreign `coordinate_space`, non-finite coordinates, or non-positive
/// dimensions. Points outside the image are clamped onto its edge.
pub fn resolve_radar_percent(
    radar: Option<&RadarPoint>,
    width: f64,
    height: f64,
) -> Option<RadarPercent> {
    let image = Size::new(width, height);
    if !image.is_valid() {
        return None;
    }
    let p = radar?.source_pixels()?;
    Some(RadarPercent::clamped(
        p.x / image.width * 100.0,
        p.y / image.height * 100.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_point_maps_to_percent() {
        let radar = RadarPoint::step_pixels(25.0, 150.0);
        let pct = resolve_radar_percent(Some(&radar), 100.0, 200.0).unwrap();
        assert!((pct.left - 25.0).abs() < 1e-9);
        assert!((pct.top - 75.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_bounds_point_is_clamped() {
        let radar = RadarPoint::step_pixels(500.0, -40.0);
        let pct = resolve_radar_percent(Some(&radar), 100.0, 100.0).unwrap();
        assert_eq!(pct.left, 100.0);
        assert_eq!(pct.top, 0.0);
    }

    #[test]
    fn foreign_space_is_ignored() {
        let radar = RadarPoint {
            x: 10.0,
            y: 10.0,
            coordinate_space: "viewport_css_pixels".into(),
        };
        assert!(resolve_radar_percent(Some(&radar), 100.0, 100.0).is_none());
    }

    #[test]
    fn invalid_inputs_yield_none() {
        let radar = RadarPoint::step_pixels(10.0, 10.0);
        assert!(resolve_radar_percent(None, 100.0, 100.0).is_none());
        assert!(resolve_radar_percent(Some(&radar), 0.0, 100.0).is_none());
        assert!(resolve_radar_percent(Some(&radar), 100.0, f64::NAN).is_none());
        assert!(resolve_radar_percent(Some(&radar), -5.0, 100.0).is_none());

        let nan = RadarPoint::step_pixels(f64::NAN, 10.0);
        assert!(resolve_radar_percent(Some(&nan), 100.0, 100.0).is_none());
        let inf = RadarPoint::step_pixels(10.0, f64::INFINITY);
        assert!(resolve_radar_percent(Some(&inf), 100.0, 100.0).is_none());
    }
}
