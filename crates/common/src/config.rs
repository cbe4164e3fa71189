//! Engine configuration.
//!
//! Every field is optional in JSON; missing fields take the engine
//! defaults. Caller overrides are merged on top with
//! [`HeatmapConfig::with_overrides`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HeatError, HeatResult};

/// Largest accepted `blurRadius`. Blur cost grows linearly with the radius.
pub const MAX_BLUR_RADIUS: u32 = 256;

/// How accumulated heat is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HeatShape {
    /// One filled circle per non-zero cell.
    #[serde(rename = "circle")]
    FlatCircle,
    /// One filled rectangle (90% of the cell) per non-zero cell.
    #[serde(rename = "rect")]
    FlatRect,
    /// Additive radial gradients, blurred, then color-mapped.
    #[default]
    #[serde(rename = "gradient")]
    GradientBlur,
}

impl HeatShape {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FlatCircle => "circle",
            Self::FlatRect => "rect",
            Self::GradientBlur => "gradient",
        }
    }
}

impl fmt::Display for HeatShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeatShape {
    type Err = HeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "circle" => Ok(Self::FlatCircle),
            "rect" => Ok(Self::FlatRect),
            "gradient" => Ok(Self::GradientBlur),
            other => Err(HeatError::config(format!(
                "unknown shape '{other}'. Use: circle, rect, gradient"
            ))),
        }
    }
}

/// Heatmap engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeatmapConfig {
    /// Fixed column count; cell width is `viewport_width / max_cols`.
    pub max_cols: usize,

    /// Upper bound on rows, bounding grid memory for very long documents.
    pub max_rows: usize,

    /// Cell height in document pixels.
    pub cell_height: f64,

    /// Rendering mode.
    pub shape: HeatShape,

    /// Inactivity window after which draws are paused (ms).
    pub idle_ms: u64,

    /// Minimum spacing between draws (ms).
    pub draw_interval_ms: u64,

    /// Radial gradient radius in pixels. Derived from the cell size when unset.
    pub gradient_radius: Option<f64>,

    /// Circle radius for the flat circle mode. Derived from the cell size when unset.
    pub flat_radius: Option<f64>,

    /// Box blur radius for the gradient mode, in pixels.
    pub blur_radius: u32,

    /// Multiplier applied to normalized values before color mapping.
    pub intensity: f64,

    /// When set, only the N hottest cells are drawn.
    pub top_n: Option<usize>,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "heatlens=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            max_cols: 20,
            max_rows: 100,
            cell_height: 60.0,
            shape: HeatShape::GradientBlur,
            idle_ms: 2_000,
            draw_interval_ms: 100,
            gradient_radius: None,
            flat_radius: None,
            blur_radius: 6,
            intensity: 1.0,
            top_n: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Partial configuration merged over an existing [`HeatmapConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeatmapConfigOverrides {
    pub max_cols: Option<usize>,
    pub max_rows: Option<usize>,
    pub cell_height: Option<f64>,
    pub shape: Option<HeatShape>,
    pub idle_ms: Option<u64>,
    pub draw_interval_ms: Option<u64>,
    pub gradient_radius: Option<f64>,
    pub flat_radius: Option<f64>,
    pub blur_radius: Option<u32>,
    pub intensity: Option<f64>,
    pub top_n: Option<usize>,
}

impl HeatmapConfigOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl HeatmapConfig {
    /// Load config from an explicit path, or from the standard location
    /// when `path` is `None` (falling back to defaults if absent).
    pub fn load(path: Option<&Path>) -> HeatResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let standard = config_file_path();
                if standard.exists() {
                    Self::from_file(&standard)?
                } else {
                    tracing::debug!(path = %standard.display(), "No config file, using defaults");
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without validating it.
    pub fn from_file(path: &Path) -> HeatResult<Self> {
        if !path.exists() {
            return Err(HeatError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse JSON config text. Unknown shapes surface as configuration errors.
    pub fn from_json(json: &str) -> HeatResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| HeatError::config(format!("Failed to parse config: {e}")))
    }

    /// Return a copy with every set override applied.
    pub fn with_overrides(&self, overrides: &HeatmapConfigOverrides) -> Self {
        let mut merged = self.clone();
        merged.apply_overrides(overrides);
        merged
    }

    /// Apply every set override in place.
    pub fn apply_overrides(&mut self, overrides: &HeatmapConfigOverrides) {
        if let Some(v) = overrides.max_cols {
            self.max_cols = v;
        }
        if let Some(v) = overrides.max_rows {
            self.max_rows = v;
        }
        if let Some(v) = overrides.cell_height {
            self.cell_height = v;
        }
        if let Some(v) = overrides.shape {
            self.shape = v;
        }
        if let Some(v) = overrides.idle_ms {
            self.idle_ms = v;
        }
        if let Some(v) = overrides.draw_interval_ms {
            self.draw_interval_ms = v;
        }
        if overrides.gradient_radius.is_some() {
            self.gradient_radius = overrides.gradient_radius;
        }
        if overrides.flat_radius.is_some() {
            self.flat_radius = overrides.flat_radius;
        }
        if let Some(v) = overrides.blur_radius {
            self.blur_radius = v;
        }
        if let Some(v) = overrides.intensity {
            self.intensity = v;
        }
        if overrides.top_n.is_some() {
            self.top_n = overrides.top_n;
        }
    }

    /// Check every field that would make cell geometry or normalization undefined.
    pub fn validate(&self) -> HeatResult<()> {
        if self.max_cols == 0 {
            return Err(HeatError::config("maxCols must be > 0"));
        }
        if self.max_rows == 0 {
            return Err(HeatError::config("maxRows must be > 0"));
        }
        if !self.cell_height.is_finite() || self.cell_height <= 0.0 {
            return Err(HeatError::config("cellHeight must be a positive number"));
        }
        if self.blur_radius > MAX_BLUR_RADIUS {
            return Err(HeatError::config(format!(
                "blurRadius must be <= {MAX_BLUR_RADIUS}, got {}",
                self.blur_radius
            )));
        }
        if !self.intensity.is_finite() || self.intensity < 0.0 {
            return Err(HeatError::config("intensity must be a non-negative number"));
        }
        if let Some(r) = self.gradient_radius {
            if !r.is_finite() || r <= 0.0 {
                return Err(HeatError::config("gradientRadius must be > 0"));
            }
        }
        if let Some(r) = self.flat_radius {
            if !r.is_finite() || r <= 0.0 {
                return Err(HeatError::config("flatRadius must be > 0"));
            }
        }
        if self.top_n == Some(0) {
            return Err(HeatError::config("topN must be > 0 when set"));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("heatlens").join("config.json")
}
