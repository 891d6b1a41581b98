use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::editor::redaction::MaskKind;
use crate::errors::{ShotframeError, ShotframeResult};

const CONFIG_FILE_NAME: &str = "shotframe.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub focus: FocusConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub redaction: RedactionConfig,
}

/// Tuning for the automatic focus crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Padding added on each side of a region of interest, as a fraction of
    /// the region's own width/height.
    #[serde(default = "default_context_margin")]
    pub context_margin_factor: f64,
    #[serde(default = "default_min_scale")]
    pub min_scale: f64,
    #[serde(default = "default_max_scale")]
    pub max_scale: f64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            context_margin_factor: default_context_margin(),
            min_scale: default_min_scale(),
            max_scale: default_max_scale(),
        }
    }
}

impl FocusConfig {
    /// Ratio between a crop box re-expanded by the context margin and the
    /// box itself: `1 + 2 * margin`.
    ///
    /// A manual focus saved at canvas scale `s` is persisted as
    /// `s * compensation`; the calculator divides by the same factor when it
    /// re-expands the saved crop, so reopening yields `s` again.
    pub fn saved_zoom_compensation(&self) -> f64 {
        1.0 + 2.0 * self.context_margin_factor
    }

    /// Largest persisted `zoom_scale` that still maps back into `max_scale`.
    pub fn max_saved_zoom_scale(&self) -> f64 {
        self.max_scale * self.saved_zoom_compensation()
    }
}

/// Tuning for the interactive pan/zoom canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "default_min_scale")]
    pub min_scale: f64,
    #[serde(default = "default_max_scale")]
    pub max_scale: f64,
    /// Arrow-key pan distance in viewport pixels.
    #[serde(default = "default_pan_step")]
    pub pan_step_px: f64,
    /// Multiplicative step for `+`/`-` keys and the floating zoom buttons.
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,
    /// Scale change per wheel delta unit (exponential).
    #[serde(default = "default_wheel_sensitivity")]
    pub wheel_zoom_sensitivity: f64,
    /// Pointer travel under which a press/release counts as a click.
    #[serde(default = "default_click_slop")]
    pub click_slop_px: f64,
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_scale: default_min_scale(),
            max_scale: default_max_scale(),
            pan_step_px: default_pan_step(),
            zoom_step: default_zoom_step(),
            wheel_zoom_sensitivity: default_wheel_sensitivity(),
            click_slop_px: default_click_slop(),
            animation_ms: default_animation_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionConfig {
    /// Minimum unit-space width and height a drawn mask must reach.
    #[serde(default = "default_min_mask_size")]
    pub min_mask_size: f64,
    #[serde(default = "default_strength")]
    pub default_strength: f64,
    #[serde(default = "default_solid_color")]
    pub solid_color: String,
    #[serde(default)]
    pub default_kind: MaskKind,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            min_mask_size: default_min_mask_size(),
            default_strength: default_strength(),
            solid_color: default_solid_color(),
            default_kind: MaskKind::default(),
        }
    }
}

fn default_context_margin() -> f64 {
    0.25
}

fn default_min_scale() -> f64 {
    1.0
}

fn default_max_scale() -> f64 {
    4.0
}

fn default_pan_step() -> f64 {
    40.0
}

fn default_zoom_step() -> f64 {
    1.25
}

fn default_wheel_sensitivity() -> f64 {
    0.0015
}

fn default_click_slop() -> f64 {
    4.0
}

fn default_animation_ms() -> u32 {
    200
}

fn default_min_mask_size() -> f64 {
    0.01
}

fn default_strength() -> f64 {
    0.7
}

fn default_solid_color() -> String {
    "#000000".to_string()
}

impl EngineConfig {
    pub fn validate(&self) -> ShotframeResult<()> {
        let f = &self.focus;
        if !f.context_margin_factor.is_finite() || f.context_margin_factor < 0.0 {
            return Err(ShotframeError::Config(format!(
                "focus.context_margin_factor must be finite and >= 0, got {}",
                f.context_margin_factor
            )));
        }
        check_scale_range("focus", f.min_scale, f.max_scale)?;
        if f.min_scale < 1.0 {
            return Err(ShotframeError::Config(format!(
                "focus.min_scale must be >= 1, got {}",
                f.min_scale
            )));
        }

        let c = &self.canvas;
        check_scale_range("canvas", c.min_scale, c.max_scale)?;
        // Reopened focus zoom is clamped to the focus range; the canvas range
        // has to nest inside it for a saved framing to come back unchanged.
        if c.min_scale < f.min_scale || c.max_scale > f.max_scale {
            return Err(ShotframeError::Config(format!(
                "canvas scale range [{}, {}] must lie within focus range [{}, {}]",
                c.min_scale, c.max_scale, f.min_scale, f.max_scale
            )));
        }
        for (name, value) in [
            ("canvas.pan_step_px", c.pan_step_px),
            ("canvas.wheel_zoom_sensitivity", c.wheel_zoom_sensitivity),
            ("canvas.click_slop_px", c.click_slop_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ShotframeError::Config(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        if !c.zoom_step.is_finite() || c.zoom_step <= 1.0 {
            return Err(ShotframeError::Config(format!(
                "canvas.zoom_step must be > 1, got {}",
                c.zoom_step
            )));
        }

        let r = &self.redaction;
        if !r.min_mask_size.is_finite() || !(0.0..=1.0).contains(&r.min_mask_size) {
            return Err(ShotframeError::Config(format!(
                "redaction.min_mask_size must be within [0, 1], got {}",
                r.min_mask_size
            )));
        }
        if !r.default_strength.is_finite() || !(0.0..=1.0).contains(&r.default_strength) {
            return Err(ShotframeError::Config(format!(
                "redaction.default_strength must be within [0, 1], got {}",
                r.default_strength
            )));
        }
        if r.solid_color.trim().is_empty() {
            return Err(ShotframeError::Config(
                "redaction.solid_color must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn check_scale_range(section: &str, min: f64, max: f64) -> ShotframeResult<()> {
    if !min.is_finite() || !max.is_finite() || min <= 0.0 || max < min {
        return Err(ShotframeError::Config(format!(
            "{section}: expected 0 < min_scale <= max_scale, got [{min}, {max}]"
        )));
    }
    Ok(())
}

fn resolve_config_path() -> ShotframeResult<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Ok(candidate);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join(CONFIG_FILE_NAME);
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Ok(candidate);
    }

    Err(ShotframeError::Config(format!(
        "{CONFIG_FILE_NAME} not found next to executable or in working directory"
    )))
}

/// Load the engine config from the standard locations, falling back to
/// defaults when no file exists.
pub fn load_config() -> ShotframeResult<EngineConfig> {
    match resolve_config_path() {
        Ok(path) => load_config_from(&path),
        Err(ShotframeError::Config(reason)) => {
            tracing::debug!(%reason, "using default engine config");
            Ok(EngineConfig::default())
        }
        Err(e) => Err(e),
    }
}

pub fn load_config_from(path: &Path) -> ShotframeResult<EngineConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: EngineConfig = toml::from_str(&content)?;
    config.validate()?;
    tracing::info!(
        path = %path.display(),
        margin = config.focus.context_margin_factor,
        max_scale = config.focus.max_scale,
        "config loaded"
    );
    Ok(config)
}

pub fn save_config_to(config: &EngineConfig, path: &Path) -> ShotframeResult<()> {
    config.validate()?;
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
