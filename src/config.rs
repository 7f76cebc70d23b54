//! Show configuration, loaded from YAML
//!
//! Every field has a default so an empty document (or no document at all)
//! yields the stock presentation.

use serde::Deserialize;
use crate::error::{ShowError, ShowResult};

/// Top-level configuration document
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    /// Seed for the structural random source (tree shape, portrait sampling).
    /// `None` draws a fresh seed from the host on every start.
    pub seed: Option<u64>,
    pub assets: AssetConfig,
    pub timing: TimingConfig,
    pub palette: Palette,
}

/// Where the face photograph and the gallery tiles live
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub face_url: String,
    /// URL template; `{n}` is replaced by the tile number (1-based)
    pub tile_url_pattern: String,
    pub tile_count: usize,
    /// Delay between consecutive tile dispatches, in milliseconds
    pub stagger_ms: u32,
}

/// Scene timings, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub seed_duration: f32,
    pub pause_duration: f32,
    pub portrait_fade: f32,
    /// Largest time step a single tick may advance
    pub max_dt: f32,
}

/// CSS colors used by the painter
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub sky_top: String,
    pub sky_bottom: String,
    pub bark: String,
    pub glow: String,
    pub placeholder: String,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            seed: None,
            assets: AssetConfig::default(),
            timing: TimingConfig::default(),
            palette: Palette::default(),
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            face_url: "assets/face.jpg".to_string(),
            tile_url_pattern: "assets/tiles/{n}.jpg".to_string(),
            tile_count: 25,
            stagger_ms: 45,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            seed_duration: 2.4,
            pause_duration: 1.2,
            portrait_fade: 2.2,
            max_dt: 0.04,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sky_top: "#0b1026".to_string(),
            sky_bottom: "#2a1b3d".to_string(),
            bark: "#e8d9c4".to_string(),
            glow: "#ffd9a0".to_string(),
            placeholder: "#f3e6d3".to_string(),
        }
    }
}

impl ShowConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml(yaml: &str) -> ShowResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: ShowConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ShowResult<()> {
        if self.assets.tile_count == 0 {
            return Err(ShowError::Config("assets.tile_count must be at least 1".to_string()));
        }

        if !self.assets.tile_url_pattern.contains("{n}") {
            return Err(ShowError::Config(format!(
                "assets.tile_url_pattern '{}' has no {{n}} placeholder",
                self.assets.tile_url_pattern
            )));
        }

        let t = &self.timing;
        for (name, value) in [
            ("seed_duration", t.seed_duration),
            ("pause_duration", t.pause_duration),
            ("portrait_fade", t.portrait_fade),
            ("max_dt", t.max_dt),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ShowError::Config(format!(
                    "timing.{} must be positive, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

impl AssetConfig {
    /// Tile URLs in dispatch order (1..=tile_count)
    pub fn tile_urls(&self) -> Vec<String> {
        (1..=self.tile_count)
            .map(|n| self.tile_url_pattern.replace("{n}", &n.to_string()))
            .collect()
    }
}
