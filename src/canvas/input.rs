/// Input events the host forwards to a canvas controller.
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanDirection {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CanvasKey {
    ZoomIn,
    ZoomOut,
    Fit,
    Focus,
    Pan { direction: PanDirection },
}

impl CanvasKey {
    /// Map a DOM-style `KeyboardEvent.key` value to a canvas shortcut.
    pub fn from_key(key: &str) -> Option<CanvasKey> {
        let mapped = match key {
            "+" | "=" => CanvasKey::ZoomIn,
            "-" | "_" => CanvasKey::ZoomOut,
            "0" => CanvasKey::Fit,
            "f" | "F" => CanvasKey::Focus,
            "ArrowLeft" => CanvasKey::Pan { direction: PanDirection::Left },
            "ArrowRight" => CanvasKey::Pan { direction: PanDirection::Right },
            "ArrowUp" => CanvasKey::Pan { direction: PanDirection::Up },
            "ArrowDown" => CanvasKey::Pan { direction: PanDirection::Down },
            _ => return None,
        };
        Some(mapped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeTarget {
    /// The container the canvas is drawn in.
    Viewport,
    /// The image element at scale 1.
    Image,
}

/// `client` coordinates are page pixels; `container` is the canvas
/// container's bounding rect in the same space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanvasEvent {
    PointerDown { client: Point, container: Rect },
    PointerMove { client: Point, container: Rect },
    PointerUp { client: Point, container: Rect },
    Wheel { delta_y: f64, client: Point, container: Rect },
    PinchStart { center: Point, container: Rect },
    /// `ratio` is the finger distance relative to `PinchStart`.
    PinchMove { ratio: f64, center: Point, container: Rect },
    PinchEnd,
    Key(CanvasKey),
    Resize { target: ResizeTarget, size: Size },
}
