use layers::GlobeStyle;
use runtime::Ease;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::drag::DragSettings;
use crate::session::Mode;

pub const DEFAULT_WORLD_URL: &str = "https://s3-us-west-2.amazonaws.com/s.cdpn.io/95802/world-110m.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Everything a host can tune about the globe. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub width: f64,
    pub height: f64,
    pub world_url: String,
    /// TopoJSON object holding the countries.
    pub countries_object: String,
    pub start_mode: Mode,
    pub auto_delay_ms: f64,
    pub auto_duration_ms: f64,
    /// Pause after an auto transition before the next country is picked.
    pub dwell_ms: f64,
    pub manual_duration_ms: f64,
    pub ease: Ease,
    pub drag: DragSettings,
    pub resample_step_deg: f64,
    pub point_radius: f64,
    pub show_graticule: bool,
    pub style: GlobeStyle,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            world_url: DEFAULT_WORLD_URL.to_string(),
            countries_object: formats::COUNTRIES_OBJECT.to_string(),
            start_mode: Mode::Auto,
            auto_delay_ms: 250.0,
            auto_duration_ms: 1250.0,
            dwell_ms: 250.0,
            manual_duration_ms: 1250.0,
            ease: Ease::CubicInOut,
            drag: DragSettings::default(),
            resample_step_deg: 2.0,
            point_radius: 4.5,
            show_graticule: true,
            style: GlobeStyle::default(),
        }
    }
}

impl GlobeConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(payload)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("resample_step_deg", self.resample_step_deg)?;
        non_negative("auto_delay_ms", self.auto_delay_ms)?;
        non_negative("auto_duration_ms", self.auto_duration_ms)?;
        non_negative("dwell_ms", self.dwell_ms)?;
        non_negative("manual_duration_ms", self.manual_duration_ms)?;
        non_negative("point_radius", self.point_radius)?;
        if !self.drag.lambda_per_px.is_finite() || !self.drag.phi_per_px.is_finite() {
            return Err(ConfigError::Invalid {
                field: "drag",
                reason: "factors must be finite".to_string(),
            });
        }
        if self.countries_object.is_empty() {
            return Err(ConfigError::Invalid {
                field: "countries_object",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a non-negative number, got {value}"),
        })
    }
}
