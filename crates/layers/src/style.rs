use serde::{Deserialize, Serialize};

pub const BASE_FILL: &str = "#737368";
pub const HIGHLIGHT_FILL: &str = "red";

/// Paint settings for one drawn layer. Colours are CSS colour strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerStyle {
    pub visible: bool,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f64,
}

impl LayerStyle {
    pub fn filled(color: impl Into<String>) -> Self {
        Self {
            fill: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn stroked(color: impl Into<String>, width: f64) -> Self {
        Self {
            stroke: Some(color.into()),
            stroke_width: width,
            ..Self::default()
        }
    }

    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::default()
        }
    }

    /// Whether painting this style would put anything on screen.
    pub fn paints(&self) -> bool {
        self.visible && (self.fill.is_some() || (self.stroke.is_some() && self.stroke_width > 0.0))
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            visible: true,
            fill: None,
            stroke: None,
            stroke_width: 1.0,
        }
    }
}

/// Styles for every layer of a globe frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeStyle {
    /// Far-side land, seen through the globe.
    pub back_land: LayerStyle,
    pub back_graticule: LayerStyle,
    pub sphere: LayerStyle,
    pub land: LayerStyle,
    pub highlight: LayerStyle,
    pub graticule: LayerStyle,
    pub outline: LayerStyle,
}

impl Default for GlobeStyle {
    fn default() -> Self {
        Self {
            back_land: LayerStyle::filled("#c8c8c0"),
            back_graticule: LayerStyle::stroked("rgba(0,0,0,0.08)", 0.5),
            sphere: LayerStyle::filled("rgba(255,255,255,0.6)"),
            land: LayerStyle::filled(BASE_FILL),
            highlight: LayerStyle::filled(HIGHLIGHT_FILL),
            graticule: LayerStyle::stroked("rgba(0,0,0,0.2)", 0.5),
            outline: LayerStyle::stroked("#000", 1.0),
        }
    }
}
