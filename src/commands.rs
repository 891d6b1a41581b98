/// JSON boundary between the host page and the engine.
///
/// Payloads are parsed and validated here once; everything past this module
/// works with trusted types. Upstream metadata (hints, radar points) degrades
/// to "absent" when malformed, while operator-authored payloads (overrides,
/// masks) are checked strictly before being handed off for persistence.
use serde_json::Value;

use crate::config::{EngineConfig, RedactionConfig};
use crate::editor::redaction::RedactionMask;
use crate::errors::{ShotframeError, ShotframeResult};
use crate::focus::calculator::FocusTransformCalculator;
use crate::focus::hints::RegionOfInterestHint;
use crate::focus::types::{FocusTransformResult, RadarPoint, ScreenshotOverridesV1};
use crate::geometry::Size;

/// Screenshot metadata as the host supplies it.
#[derive(Debug, Clone, Default)]
pub struct StepImageInput<'a> {
    pub width: f64,
    pub height: f64,
    pub hint_json: Option<&'a str>,
    pub radar_json: Option<&'a str>,
    pub overrides_json: Option<&'a str>,
}

pub fn parse_overrides(json: &str) -> ShotframeResult<ScreenshotOverridesV1> {
    let overrides: ScreenshotOverridesV1 = serde_json::from_str(json)?;
    match overrides.violation() {
        Some(reason) => Err(ShotframeError::InvalidPayload(reason)),
        None => Ok(overrides),
    }
}

/// `None` for null, malformed JSON, or an unusable point.
pub fn parse_radar(json: &str) -> Option<RadarPoint> {
    match serde_json::from_str::<Option<RadarPoint>>(json) {
        Ok(Some(radar)) if radar.source_pixels().is_some() => Some(radar),
        Ok(Some(radar)) => {
            tracing::debug!(space = %radar.coordinate_space, "radar point ignored");
            None
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "malformed radar point dropped");
            None
        }
    }
}

/// `None` for null or malformed JSON. Geometric usability is decided later
/// against the image size.
pub fn parse_hint(json: &str) -> Option<RegionOfInterestHint> {
    match serde_json::from_str::<Option<RegionOfInterestHint>>(json) {
        Ok(hint) => hint,
        Err(e) => {
            tracing::warn!(error = %e, "malformed region hint dropped");
            None
        }
    }
}

/// Parse a persisted mask list. The payload must be a JSON array; individual
/// entries that fail to parse or validate are dropped.
pub fn parse_masks(json: &str, config: &RedactionConfig) -> ShotframeResult<Vec<RedactionMask>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(ShotframeError::InvalidPayload(
            "redaction masks must be a JSON array".into(),
        ));
    };
    let mut masks = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<RedactionMask>(item) {
            Ok(mask) => match mask.violation(config.min_mask_size) {
                None => masks.push(mask),
                Some(reason) => tracing::warn!(%reason, "redaction mask dropped"),
            },
            Err(e) => tracing::warn!(error = %e, "malformed redaction mask dropped"),
        }
    }
    Ok(masks)
}

pub fn overrides_to_json(overrides: &ScreenshotOverridesV1) -> ShotframeResult<String> {
    if let Some(reason) = overrides.violation() {
        return Err(ShotframeError::InvalidPayload(reason));
    }
    Ok(serde_json::to_string(overrides)?)
}

pub fn masks_to_json(masks: &[RedactionMask], config: &RedactionConfig) -> ShotframeResult<String> {
    if let Some(reason) = masks.iter().find_map(|m| m.violation(config.min_mask_size)) {
        return Err(ShotframeError::InvalidPayload(reason));
    }
    Ok(serde_json::to_string(masks)?)
}

/// Default framing for one screenshot, fitted to the image itself.
///
/// Invalid persisted overrides are ignored with a warning so the automatic
/// framing still applies.
pub fn focus_transform(input: &StepImageInput<'_>, config: &EngineConfig) -> FocusTransformResult {
    let image = Size::new(input.width, input.height);
    let hint = input.hint_json.and_then(parse_hint);
    let radar = input.radar_json.and_then(parse_radar);
    let overrides = input.overrides_json.and_then(|json| match parse_overrides(json) {
        Ok(o) => Some(o),
        Err(e) => {
            tracing::warn!(error = %e, "persisted overrides ignored");
            None
        }
    });
    FocusTransformCalculator::new(config.focus).compute_with_overrides(
        image,
        image,
        hint.as_ref(),
        radar.as_ref(),
        overrides.as_ref(),
    )
}

/// `focus_transform` serialized for the host (camelCase).
pub fn focus_transform_json(
    input: &StepImageInput<'_>,
    config: &EngineConfig,
) -> ShotframeResult<String> {
    Ok(serde_json::to_string(&focus_transform(input, config))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_are_strict() {
        let ok = parse_overrides(
            r#"{"focus":{"center_unit":{"x":0.5,"y":0.25},"zoom_scale":2.0},"cursor":null}"#,
        )
        .unwrap();
        assert_eq!(ok.focus.unwrap().zoom_scale, 2.0);
        assert!(ok.cursor.is_none());

        let err = parse_overrides(
            r#"{"focus":{"center_unit":{"x":1.5,"y":0.25},"zoom_scale":2.0},"cursor":null}"#,
        );
        assert!(matches!(err, Err(ShotframeError::InvalidPayload(_))));

        assert!(matches!(parse_overrides("{\"focus\": 3}"), Err(ShotframeError::Json(_))));
        assert!(parse_overrides("{}").unwrap().is_empty());
    }

    #[test]
    fn radar_is_lenient() {
        let tagged = r#"{"x":1,"y":2,"coordinate_space":"step_image_pixels_v1"}"#;
        assert!(parse_radar(tagged).is_some());
        assert!(parse_radar(r#"{"x":1,"y":2,"coordinate_space":"screen"}"#).is_none());
        assert!(parse_radar("null").is_none());
        assert!(parse_radar("{not json").is_none());
    }

    #[test]
    fn masks_drop_invalid_entries() {
        let config = RedactionConfig::default();
        let masks = parse_masks(
            r##"[
                {"id":"a","kind":"blur","strength":0.7,
                 "rect":{"x":0.1,"y":0.1,"width":0.2,"height":0.2}},
                {"id":"b","kind":"solid","color":"#000000",
                 "rect":{"x":0.1,"y":0.1,"width":0.005,"height":0.2}},
                {"id":"c","kind":"sparkle","rect":{"x":0.1,"y":0.1,"width":0.2,"height":0.2}}
            ]"##,
            &config,
        )
        .unwrap();
        assert_eq!(masks.len(), 1);
        assert_eq!(masks[0].id, "a");

        assert!(parse_masks("{}", &config).is_err());
    }

    #[test]
    fn masks_serialize_without_empty_fields() {
        let config = RedactionConfig::default();
        let masks = parse_masks(
            r#"[{"id":"a","kind":"pixelate","rect":{"x":0,"y":0,"width":0.5,"height":0.5}}]"#,
            &config,
        )
        .unwrap();
        let json = masks_to_json(&masks, &config).unwrap();
        assert!(!json.contains("color"));
        assert!(!json.contains("strength"));
    }

    #[test]
    fn transform_json_for_scenario() {
        let input = StepImageInput {
            width: 1000.0,
            height: 600.0,
            hint_json: Some(r#"{"kind":"bounding_box","x":400,"y":200,"width":100,"height":80}"#),
            radar_json: None,
            overrides_json: Some("{\"focus\": \"broken\"}"),
        };
        let value: Value =
            serde_json::from_str(&focus_transform_json(&input, &EngineConfig::default()).unwrap())
                .unwrap();
        assert_eq!(value["hasFocusCrop"], true);
        assert_eq!(value["zoomScale"], 4.0);
    }
}
