//! Configuration system
//!
//! Tunables for the collision core, loadable from `.toml` or `.ron` files.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is outside its allowed range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Name of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Collision core tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Largest distance a swept body may advance between two substep tests
    pub max_step_distance: f32,

    /// Substep budget for a single pair in one frame
    ///
    /// Pairs that would need more spend the budget inside the part of the frame
    /// where their world bounds overlap.
    pub max_substeps: u32,

    /// Squared-length threshold below which a SAT axis is treated as degenerate
    pub axis_epsilon: f32,

    /// Minimum upward push-out (Y component of the MTV) that marks a character grounded
    pub grounded_threshold: f32,

    /// Log contact enter/exit events at debug level
    pub log_contacts: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            max_step_distance: 1.0,
            max_substeps: 64,
            axis_epsilon: 1e-6,
            grounded_threshold: 0.01,
            log_contacts: false,
        }
    }
}

impl Config for CollisionConfig {}

impl CollisionConfig {
    /// Check that every tunable is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_step_distance > 0.0) || !self.max_step_distance.is_finite() {
            return Err(ConfigError::Invalid {
                field: "max_step_distance",
                reason: format!("must be a positive finite number, got {}", self.max_step_distance),
            });
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::Invalid {
                field: "max_substeps",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.axis_epsilon < 0.0 {
            return Err(ConfigError::Invalid {
                field: "axis_epsilon",
                reason: format!("must not be negative, got {}", self.axis_epsilon),
            });
        }
        if self.grounded_threshold < 0.0 {
            return Err(ConfigError::Invalid {
                field: "grounded_threshold",
                reason: format!("must not be negative, got {}", self.grounded_threshold),
            });
        }
        Ok(())
    }
}
