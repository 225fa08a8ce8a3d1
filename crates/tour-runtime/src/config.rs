#![forbid(unsafe_code)]

//! Tunable parameters for the tour engine.
//!
//! Every field defaults to the values the engine was designed around, so
//! `TourConfig::default()` needs no file at all. With the `config` feature the
//! configuration and the step catalog can be loaded from TOML or JSON.
//!
//! ```toml
//! # tour.toml
//! [placement]
//! margin = 20.0
//! anchor_padding = 12.0
//!
//! [measure]
//! estimated_width = 320.0
//! estimated_height = 180.0
//! refine_delay_ms = 150
//! ```
//!
//! ```rust,ignore
//! let config = TourConfig::from_toml_file("tour.toml")?;
//! let steps = load_steps_json(include_str!("onboarding.json"))?;
//! ```

use std::fmt;
#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use tour_core::{PlacementParams, Size};
#[cfg(feature = "config")]
use tour_core::TourStep;
use web_time::Duration;

// ---------------------------------------------------------------------------
// Top-level TourConfig
// ---------------------------------------------------------------------------

/// All engine tunables.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TourConfig {
    /// Margin and anchor padding for placement.
    pub placement: PlacementParams,
    /// Two-phase measurement timing and the size estimate.
    pub measure: MeasureConfig,
    /// Viewport-change handling.
    pub viewport: ViewportConfig,
}

/// Two-phase measurement parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct MeasureConfig {
    /// Tooltip width assumed before the real size is known.
    pub estimated_width: f64,
    /// Tooltip height assumed before the real size is known.
    pub estimated_height: f64,
    /// Delay from activation to the refine pass. Must be non-zero; the
    /// estimate is resolved at activation itself.
    pub refine_delay_ms: u64,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            estimated_width: 320.0,
            estimated_height: 180.0,
            refine_delay_ms: 150,
        }
    }
}

impl MeasureConfig {
    /// Estimated tooltip size.
    #[must_use]
    pub fn estimated_size(&self) -> Size {
        Size::new(self.estimated_width, self.estimated_height)
    }

    #[must_use]
    pub fn refine_delay(&self) -> Duration {
        Duration::from_millis(self.refine_delay_ms)
    }
}

/// Viewport-change handling.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ViewportConfig {
    /// Collapse a burst of pending viewport events into the latest one.
    pub coalesce: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { coalesce: true }
    }
}

impl TourConfig {
    /// Set placement parameters.
    #[must_use]
    pub fn placement(mut self, params: PlacementParams) -> Self {
        self.placement = params;
        self
    }

    /// Set the estimated tooltip size.
    #[must_use]
    pub fn estimated_size(mut self, size: Size) -> Self {
        self.measure.estimated_width = size.width;
        self.measure.estimated_height = size.height;
        self
    }

    /// Set the delay from activation to the refine pass.
    #[must_use]
    pub fn refine_delay(mut self, delay: Duration) -> Self {
        self.measure.refine_delay_ms = delay.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    /// Enable or disable viewport event coalescing.
    #[must_use]
    pub fn coalesce_viewport(mut self, coalesce: bool) -> Self {
        self.viewport.coalesce = coalesce;
        self
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let p = &self.placement;
        if !p.margin.is_finite() || p.margin < 0.0 {
            errors.push(format!("placement.margin must be finite and >= 0, got {}", p.margin));
        }
        if !p.anchor_padding.is_finite() || p.anchor_padding < 0.0 {
            errors.push(format!(
                "placement.anchor_padding must be finite and >= 0, got {}",
                p.anchor_padding
            ));
        }

        let m = &self.measure;
        if !m.estimated_size().is_valid() {
            errors.push(format!(
                "measure.estimated size must be finite and >= 0, got {}x{}",
                m.estimated_width, m.estimated_height
            ));
        }
        if m.refine_delay_ms == 0 {
            errors.push("measure.refine_delay_ms must be > 0".to_string());
        }

        errors
    }

    /// Repair invalid values so the engine can always run.
    ///
    /// Invalid fields fall back to their defaults. The result always passes
    /// [`validate`](Self::validate).
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        let p = &mut self.placement;
        if !p.margin.is_finite() || p.margin < 0.0 {
            p.margin = defaults.placement.margin;
        }
        if !p.anchor_padding.is_finite() || p.anchor_padding < 0.0 {
            p.anchor_padding = defaults.placement.anchor_padding;
        }
        let m = &mut self.measure;
        if !m.estimated_size().is_valid() {
            m.estimated_width = defaults.measure.estimated_width;
            m.estimated_height = defaults.measure.estimated_height;
        }
        if m.refine_delay_ms == 0 {
            m.refine_delay_ms = defaults.measure.refine_delay_ms;
        }
        self
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, TourConfigError> {
        let config: Self = toml::from_str(s).map_err(TourConfigError::Toml)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, TourConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(TourConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, TourConfigError> {
        let config: Self = serde_json::from_str(s).map_err(TourConfigError::Json)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TourConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(TourConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, TourConfigError> {
        toml::to_string_pretty(self).map_err(TourConfigError::TomlSer)
    }

    #[cfg(feature = "config")]
    fn checked(self) -> Result<Self, TourConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(TourConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Step catalogs
// ---------------------------------------------------------------------------

#[cfg(feature = "config")]
#[derive(Debug, Deserialize)]
struct StepCatalog {
    #[serde(default)]
    steps: Vec<TourStep>,
}

/// Load a step catalog from a TOML string (`[[steps]]` tables).
#[cfg(feature = "config")]
pub fn load_steps_toml(s: &str) -> Result<Vec<TourStep>, TourConfigError> {
    let catalog: StepCatalog = toml::from_str(s).map_err(TourConfigError::Toml)?;
    checked_steps(catalog.steps)
}

/// Load a step catalog from JSON: either a bare array or `{ "steps": [...] }`.
#[cfg(feature = "config")]
pub fn load_steps_json(s: &str) -> Result<Vec<TourStep>, TourConfigError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Catalog {
        Bare(Vec<TourStep>),
        Wrapped(StepCatalog),
    }

    let steps = match serde_json::from_str(s).map_err(TourConfigError::Json)? {
        Catalog::Bare(steps) => steps,
        Catalog::Wrapped(catalog) => catalog.steps,
    };
    checked_steps(steps)
}

#[cfg(feature = "config")]
fn checked_steps(steps: Vec<TourStep>) -> Result<Vec<TourStep>, TourConfigError> {
    let errors: Vec<String> = steps
        .iter()
        .enumerate()
        .filter(|(_, step)| step.target_id.trim().is_empty())
        .map(|(i, _)| format!("steps[{i}].targetId must not be empty"))
        .collect();
    if errors.is_empty() {
        Ok(steps)
    } else {
        Err(TourConfigError::Validation(errors))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading configuration or step catalogs.
#[derive(Debug)]
pub enum TourConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "config")]
    TomlSer(toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for TourConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::TomlSer(e) => write!(f, "TOML serialize error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for TourConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::TomlSer(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
