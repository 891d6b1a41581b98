/// Rectangular redaction masks drawn over a screenshot.
///
/// Masks only record *where* an effect applies, in image unit space; the
/// actual blurring happens wherever the screenshot is rendered.
use serde::{Deserialize, Serialize};

use crate::config::RedactionConfig;
use crate::geometry::{is_unit, Point, Rect, UnitPoint, UnitRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskKind {
    #[default]
    Blur,
    Solid,
    Pixelate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionMask {
    pub id: String,
    pub kind: MaskKind,
    pub rect: UnitRect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl RedactionMask {
    /// Describe the first problem that keeps this mask from being persisted.
    pub fn violation(&self, min_size: f64) -> Option<String> {
        if self.id.trim().is_empty() {
            return Some("mask id must not be empty".into());
        }
        if !self.rect.is_valid() {
            return Some(format!("mask {} rect lies outside the unit square", self.id));
        }
        if !self.rect.meets_min_size(min_size) {
            return Some(format!(
                "mask {} is smaller than {min_size} ({} x {})",
                self.id, self.rect.width, self.rect.height
            ));
        }
        if let Some(strength) = self.strength {
            if !is_unit(strength) {
                return Some(format!("mask {} strength must be within [0, 1]", self.id));
            }
        }
        None
    }
}

/// Partial update for an existing mask.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaskPatch {
    pub kind: Option<MaskKind>,
    pub color: Option<String>,
    pub strength: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Draft {
    start: UnitPoint,
    current: UnitPoint,
}

pub struct RedactionMaskEditor {
    config: RedactionConfig,
    masks: Vec<RedactionMask>,
    selected_kind: MaskKind,
    draft: Option<Draft>,
}

impl RedactionMaskEditor {
    pub fn new(masks: Vec<RedactionMask>, config: RedactionConfig) -> Self {
        let selected_kind = config.default_kind;
        Self {
            config,
            masks,
            selected_kind,
            draft: None,
        }
    }

    pub fn masks(&self) -> &[RedactionMask] {
        &self.masks
    }

    pub fn into_masks(self) -> Vec<RedactionMask> {
        self.masks
    }

    pub fn selected_kind(&self) -> MaskKind {
        self.selected_kind
    }

    pub fn select_kind(&mut self, kind: MaskKind) {
        self.selected_kind = kind;
    }

    /// Normalized rect of the drag in progress.
    pub fn draft_rect(&self) -> Option<UnitRect> {
        self.draft.map(|d| UnitRect::from_corners(d.start, d.current))
    }

    pub fn pointer_down(&mut self, client: Point, container: Rect) {
        self.draft = client_to_unit(client, container).map(|p| Draft {
            start: p,
            current: p,
        });
    }

    pub fn pointer_move(&mut self, client: Point, container: Rect) -> Option<UnitRect> {
        let p = client_to_unit(client, container)?;
        let draft = self.draft.as_mut()?;
        draft.current = p;
        self.draft_rect()
    }

    /// Finish the drag. Returns the new mask, or `None` when there was no
    /// drag or the rectangle is below the minimum size.
    pub fn pointer_up(&mut self, client: Point, container: Rect) -> Option<&RedactionMask> {
        let mut draft = self.draft.take()?;
        if let Some(p) = client_to_unit(client, container) {
            draft.current = p;
        }
        let rect = UnitRect::from_corners(draft.start, draft.current);
        if !rect.meets_min_size(self.config.min_mask_size) {
            tracing::debug!(
                width = rect.width,
                height = rect.height,
                "redaction draft too small, dropped"
            );
            return None;
        }
        let kind = self.selected_kind;
        let mask = RedactionMask {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            rect,
            strength: Some(self.config.default_strength),
            color: (kind == MaskKind::Solid).then(|| self.config.solid_color.clone()),
        };
        tracing::debug!(id = %mask.id, ?kind, "redaction mask added");
        self.masks.push(mask);
        self.masks.last()
    }

    /// Discard a partial drag (step switch, editor closed).
    pub fn cancel_draft(&mut self) {
        self.draft = None;
    }

    pub fn update_mask(&mut self, id: &str, patch: MaskPatch) -> bool {
        let Some(mask) = self.masks.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        if let Some(kind) = patch.kind {
            mask.kind = kind;
            if kind != MaskKind::Solid {
                mask.color = None;
            }
        }
        if let Some(color) = patch.color {
            if mask.kind == MaskKind::Solid {
                mask.color = Some(color);
            }
        }
        if mask.kind == MaskKind::Solid && mask.color.is_none() {
            mask.color = Some(self.config.solid_color.clone());
        }
        if let Some(strength) = patch.strength.filter(|s| is_unit(*s)) {
            mask.strength = Some(strength);
        }
        true
    }

    pub fn remove_mask(&mut self, id: &str) -> bool {
        let before = self.masks.len();
        self.masks.retain(|m| m.id != id);
        self.masks.len() != before
    }

    /// Masks in draw order: largest area first so smaller ones sit on top.
    /// Equal areas keep their insertion order.
    pub fn render_order(&self) -> Vec<&RedactionMask> {
        let mut ordered: Vec<&RedactionMask> = self.masks.iter().collect();
        ordered.sort_by(|a, b| b.rect.area().total_cmp(&a.rect.area()));
        ordered
    }
}

fn client_to_unit(client: Point, container: Rect) -> Option<UnitPoint> {
    if !client.is_finite() || !container.size().is_valid() || !container.is_finite() {
        return None;
    }
    Some(UnitPoint::clamped(
        (client.x - container.x) / container.width,
        (client.y - container.y) / container.height,
    ))
}
