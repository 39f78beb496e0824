//! Client configuration, loaded from TOML with every field defaulted.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cubie::CubieMetrics;
use crate::error::{CubeError, CubeResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the puzzle engine
    pub server_url: String,
    pub user: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
    /// Layers per axis; the registry holds `puzzle_order^3` pieces
    pub puzzle_order: usize,
    /// Uniform scale applied to every piece position
    pub layout_spacing: f32,
    /// Fetch state right away when the engine rejects a move
    pub refetch_on_reject: bool,
    pub cubie: CubieSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:12345".to_string(),
            user: "guest".to_string(),
            poll_interval_ms: 500,
            request_timeout_ms: 2000,
            puzzle_order: 3,
            layout_spacing: 1.0,
            refetch_on_reject: false,
            cubie: CubieSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubieSettings {
    pub extent: f32,
    pub sticker_padding: f32,
    pub sticker_thickness: f32,
}

impl Default for CubieSettings {
    fn default() -> Self {
        let metrics = CubieMetrics::default();
        Self {
            extent: metrics.extent,
            sticker_padding: metrics.sticker_padding,
            sticker_thickness: metrics.sticker_thickness,
        }
    }
}

impl From<CubieSettings> for CubieMetrics {
    fn from(settings: CubieSettings) -> Self {
        Self {
            extent: settings.extent,
            sticker_padding: settings.sticker_padding,
            sticker_thickness: settings.sticker_thickness,
        }
    }
}

impl ClientConfig {
    pub fn from_toml(text: &str) -> CubeResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| CubeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> CubeResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CubeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> CubeResult<()> {
        if self.puzzle_order < 2 {
            return Err(CubeError::Config(format!(
                "puzzle_order must be at least 2, got {}",
                self.puzzle_order
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(CubeError::Config("poll_interval_ms must be positive".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(CubeError::Config("request_timeout_ms must be positive".into()));
        }
        if !(self.layout_spacing.is_finite() && self.layout_spacing > 0.0) {
            return Err(CubeError::Config(format!(
                "layout_spacing must be positive, got {}",
                self.layout_spacing
            )));
        }
        if self.cubie.sticker_padding * 2.0 >= self.cubie.extent {
            return Err(CubeError::Config("sticker_padding leaves no sticker".into()));
        }
        Ok(())
    }

    pub fn piece_count(&self) -> usize {
        self.puzzle_order.pow(3)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
