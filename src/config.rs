use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::svm::NoiseDimensions;
use crate::texture::NoiseParameters;

/// Largest image edge accepted by the renderer.
pub const MAX_EDGE: u32 = 8192;

/// Settings for rendering a noise texture over a rectangular region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Noise dimensionality, 1 to 4.
    pub dimensions: u32,
    #[serde(flatten)]
    pub params: NoiseParameters,
    /// Fourth coordinate (or the only one, for 1D noise).
    pub w: f32,
    /// Render the decorrelated RGB output instead of the scalar value.
    pub color: bool,
    /// Shading-space point mapped to the top-left corner. `z` is constant across the image.
    pub origin: [f32; 3],
    /// Shading-space size covered by the image along x and y.
    pub extent: [f32; 2],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            dimensions: 3,
            params: NoiseParameters::default(),
            w: 0.0,
            color: false,
            origin: [0.0, 0.0, 0.0],
            extent: [1.0, 1.0],
        }
    }
}

impl RenderConfig {
    pub fn noise_dimensions(&self) -> Result<NoiseDimensions, ConfigError> {
        NoiseDimensions::try_from(self.dimensions).map_err(ConfigError::from)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.noise_dimensions()?;
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_EDGE || self.height > MAX_EDGE {
            return Err(ConfigError::Invalid(format!(
                "image edge exceeds {MAX_EDGE} pixels: {}x{}",
                self.width, self.height
            )));
        }
        if !self.params.detail.is_finite() || self.params.detail < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "detail must be a non-negative number, got {}",
                self.params.detail
            )));
        }
        Ok(())
    }
}

/// JSON Schema of the render config, for editors and tooling.
pub fn config_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(RenderConfig)).unwrap_or_default()
}

// ── Load / save ─────────────────────────────────────────────────────

pub fn load_config(path: &Path) -> Result<RenderConfig, ConfigError> {
    let config: RenderConfig = read_json(path)?;
    config.validate()?;
    log::debug!("[noisetex] loaded config from {}", path.display());
    Ok(config)
}

pub fn save_config(path: &Path, config: &RenderConfig) -> Result<(), ConfigError> {
    write_json(path, config)
}

/// Write `data` to `path` through a temporary sibling file and a rename,
/// so readers never observe a half-written file.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<(), ConfigError> {
    let file_name = path.file_name().unwrap_or_default();
    let mut tmp_name = OsString::from(file_name);
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(&tmp_name);

    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, json.as_bytes())
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let data = fs::read_to_string(path)?;
    let value = serde_json::from_str(&data)?;
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("noisetex-{}-{name}", std::process::id()))
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: RenderConfig = serde_json::from_str(r#"{"width": 64, "detail": 4.5}"#).unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 256);
        assert_eq!(config.params.detail, 4.5);
        assert_eq!(config.params.scale, 5.0);
        assert_eq!(config.dimensions, 3);
    }

    #[test]
    fn validate_rejects_bad_dimensions() {
        let config = RenderConfig { dimensions: 5, ..RenderConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Svm(_))));
    }

    #[test]
    fn validate_rejects_empty_image() {
        let config = RenderConfig { width: 0, ..RenderConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_negative_detail() {
        let mut config = RenderConfig::default();
        config.params.detail = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("config.json");
        let config = RenderConfig {
            width: 32,
            color: true,
            dimensions: 4,
            w: 1.25,
            ..RenderConfig::default()
        };
        save_config(&path, &config).unwrap();
        let loaded = load_config(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_reports_invalid_json() {
        let path = temp_path("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let result = load_config(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn schema_lists_fields() {
        let schema = config_schema();
        let text = schema.to_string();
        assert!(text.contains("\"width\""));
        assert!(text.contains("\"detail\""));
    }
}
