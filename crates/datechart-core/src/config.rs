// File: crates/datechart-core/src/config.rs
// Summary: Serializable chart configuration with the widget's documented defaults.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ChartResult;
use crate::types::Margin;

/// `width`/`height` default to the container size minus margins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub margin: Margin,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub color_stops: Vec<Color>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            margin: Margin::default(),
            width: None,
            height: None,
            color_stops: vec![Color::RED, Color::BLUE],
        }
    }
}

impl ChartConfig {
    pub fn from_json(json: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_json(&text)?)
    }
}
