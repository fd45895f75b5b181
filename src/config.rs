use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::path_projector::StrokeStyle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub stroke_width: f32,
    pub stroke_color: [u8; 4],
    /// Fixes closer than this to the last delivered one are dropped.
    pub distance_filter_m: f64,
    pub min_region_span_m: f64,
    pub snapshot_width: u32,
    pub snapshot_height: u32,
    pub snapshot_padding: f64,
    pub background_color: [u8; 4],
    pub caption_prefix: String,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            stroke_width: 3.0,
            stroke_color: [255, 0, 0, 255],
            distance_filter_m: 1.0,
            min_region_span_m: 100.0,
            snapshot_width: 1024,
            snapshot_height: 1024,
            snapshot_padding: 0.1,
            background_color: [245, 240, 229, 255],
            caption_prefix: "My Walk2Draw drawing".to_string(),
        }
    }
}

impl DrawConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: DrawConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.stroke_width > 0.0) {
            bail!("Invalid stroke_width: {}", self.stroke_width);
        }
        if self.snapshot_width == 0 || self.snapshot_height == 0 {
            bail!(
                "Invalid snapshot size: {}x{}",
                self.snapshot_width,
                self.snapshot_height
            );
        }
        // a zero span collapses the export bounds for a single fix or a straight walk
        if !(self.min_region_span_m > 0.0) || !self.min_region_span_m.is_finite() {
            bail!("Invalid min_region_span_m: {}", self.min_region_span_m);
        }
        if self.snapshot_padding < 0.0 {
            bail!("Invalid snapshot_padding: {}", self.snapshot_padding);
        }
        Ok(())
    }

    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            width: self.stroke_width,
            rgba: self.stroke_color,
        }
    }
}
