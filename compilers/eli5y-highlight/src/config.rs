use serde::Deserialize;

use crate::color::Color;
use crate::dialect::DialectKind;

/// Width the expression is laid out to when no config is given, in points.
pub const DEFAULT_TARGET_WIDTH: f32 = 340.0;

/// Render-side knobs. Deserialized from the `[render]` table of the tool config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Layout width handed to the external renderer.
    pub target_width: f32,
    pub dialect: DialectKind,
    /// Replaces the default macro pool when set.
    pub pool: Option<Vec<Color>>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_TARGET_WIDTH,
            dialect: DialectKind::default(),
            pool: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("target width must be a positive number, got {0}")]
    TargetWidth(f32),
    #[error("color pool must not be empty")]
    EmptyPool,
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.target_width.is_finite() || self.target_width <= 0.0 {
            return Err(ConfigError::TargetWidth(self.target_width));
        }
        if self.pool.as_ref().is_some_and(|pool| pool.is_empty()) {
            return Err(ConfigError::EmptyPool);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(RenderConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_width() {
        let config = RenderConfig {
            target_width: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TargetWidth(0.0)));

        let config = RenderConfig {
            target_width: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_pool() {
        let config = RenderConfig {
            pool: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyPool));
    }
}
