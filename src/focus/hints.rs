/// Region-of-interest hints computed upstream of the engine.
///
/// Capture pipelines report the interesting region in a few shapes; all of
/// them reduce to one bounding box in source pixels, clipped to the image.
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionOfInterestHint {
    /// Box in source pixels.
    BoundingBox {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Box as percentages of the source image.
    BoundsPercent {
        x_percent: f64,
        y_percent: f64,
        width_percent: f64,
        height_percent: f64,
    },
    /// Scattered source-pixel points; the region is their bounding box.
    Points { points: Vec<Point> },
}

impl RegionOfInterestHint {
    /// Bounding box in source pixels, clipped to `image`.
    ///
    /// `None` if the image is invalid, any coordinate is non-finite, or the
    /// clipped box has no area.
    pub fn pixel_box(&self, image: Size) -> Option<Rect> {
        if !image.is_valid() {
            return None;
        }
        let raw = match self {
            Self::BoundingBox { x, y, width, height } => Rect::new(*x, *y, *width, *height),
            Self::BoundsPercent {
                x_percent,
                y_percent,
                width_percent,
                height_percent,
            } => Rect::new(
                x_percent / 100.0 * image.width,
                y_percent / 100.0 * image.height,
                width_percent / 100.0 * image.width,
                height_percent / 100.0 * image.height,
            ),
            Self::Points { points } => Rect::bounding(points.iter().copied())?,
        };
        if !raw.is_finite() || raw.width <= 0.0 || raw.height <= 0.0 {
            return None;
        }
        let clipped = raw.clip_to(image);
        (clipped.width > 0.0 && clipped.height > 0.0).then_some(clipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE: Size = Size::new(1000.0, 600.0);

    #[test]
    fn bounding_box_passes_through() {
        let hint = RegionOfInterestHint::BoundingBox {
            x: 400.0,
            y: 200.0,
            width: 100.0,
            height: 80.0,
        };
        assert_eq!(hint.pixel_box(IMAGE), Some(Rect::new(400.0, 200.0, 100.0, 80.0)));
    }

    #[test]
    fn percent_bounds_scale_by_image() {
        let hint = RegionOfInterestHint::BoundsPercent {
            x_percent: 10.0,
            y_percent: 50.0,
            width_percent: 20.0,
            height_percent: 25.0,
        };
        let r = hint.pixel_box(IMAGE).unwrap();
        assert!((r.x - 100.0).abs() < 1e-9);
        assert!((r.y - 300.0).abs() < 1e-9);
        assert!((r.width - 200.0).abs() < 1e-9);
        assert!((r.height - 150.0).abs() < 1e-9);
    }

    #[test]
    fn points_reduce_to_bounds() {
        let hint = RegionOfInterestHint::Points {
            points: vec![Point::new(100.0, 100.0), Point::new(300.0, 250.0)],
        };
        assert_eq!(hint.pixel_box(IMAGE), Some(Rect::new(100.0, 100.0, 200.0, 150.0)));
    }

    #[test]
    fn degenerate_hints_are_unusable() {
        let single = RegionOfInterestHint::Points {
            points: vec![Point::new(10.0, 10.0)],
        };
        assert!(single.pixel_box(IMAGE).is_none());

        let outside = RegionOfInterestHint::BoundingBox {
            x: 2000.0,
            y: 10.0,
            width: 50.0,
            height: 50.0,
        };
        assert!(outside.pixel_box(IMAGE).is_none());

        let nan = RegionOfInterestHint::BoundingBox {
            x: f64::NAN,
            y: 10.0,
            width: 50.0,
            height: 50.0,
        };
        assert!(nan.pixel_box(IMAGE).is_none());

        let ok = RegionOfInterestHint::BoundingBox {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        assert!(ok.pixel_box(Size::ZERO).is_none());
    }

    #[test]
    fn deserializes_tagged_json() {
        let hint: RegionOfInterestHint = serde_json::from_str(
            r#"{"kind":"bounding_box","x":1,"y":2,"width":3,"height":4}"#,
        )
        .unwrap();
        assert_eq!(
            hint,
            RegionOfInterestHint::BoundingBox {
                x: 1.0,
                y: 2.0,
                width: 3.0,
                height: 4.0
            }
        );
    }
}
