//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.output.max_width == 0 {
            return Err(ConfigError::ValidationError(
                "output.max_width must be > 0".into(),
            ));
        }
        if self.output.max_height == 0 {
            return Err(ConfigError::ValidationError(
                "output.max_height must be > 0".into(),
            ));
        }
        if self.output.suffix.contains(['/', '\\']) {
            return Err(ConfigError::ValidationError(
                "output.suffix must not contain path separators".into(),
            ));
        }
        check_fraction("watermark.max_scale_width", self.watermark.max_scale_width, false)?;
        check_fraction("watermark.max_scale_height", self.watermark.max_scale_height, false)?;
        check_fraction("watermark.opacity", self.watermark.opacity, true)?;
        if self.processing.parallel_workers == 0 {
            return Err(ConfigError::ValidationError(
                "processing.parallel_workers must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Scales must be in (0, 1]; opacity may also be exactly 0.
fn check_fraction(name: &str, value: f32, allow_zero: bool) -> Result<(), ConfigError> {
    let lower_ok = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if !value.is_finite() || !lower_ok || value > 1.0 {
        let range = if allow_zero { "[0.0, 1.0]" } else { "(0.0, 1.0]" };
        return Err(ConfigError::ValidationError(format!(
            "{name} must be in {range}, got {value}"
        )));
    }
    Ok(())
}
