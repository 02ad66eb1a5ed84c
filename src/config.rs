//! Shell configuration
//!
//! One serde document covering the gesture, motion and deep-link settings.
//! Every field has a default so partial JSON is accepted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use nav_core::DeepLinkConfig;
use nav_gesture::{GestureConfig, GestureError};
use nav_motion::{MotionConfig, MotionError};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON could not be parsed
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Gesture settings out of range
    #[error("Invalid gesture configuration: {0}")]
    Gesture(#[from] GestureError),

    /// Motion settings out of range
    #[error("Invalid motion configuration: {0}")]
    Motion(#[from] MotionError),
}

/// Result type for configuration
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Navigation shell configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShellConfig {
    /// Predictive-back settings
    pub gesture: GestureConfig,
    /// Transition timing and transforms
    pub motion: MotionConfig,
    /// Accepted deep-link schemes and hosts
    pub deep_link: DeepLinkConfig,
}

impl ShellConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ShellConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the gesture settings
    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    /// Set the motion settings
    pub fn with_motion(mut self, motion: MotionConfig) -> Self {
        self.motion = motion;
        self
    }

    /// Set the deep-link settings
    pub fn with_deep_link(mut self, deep_link: DeepLinkConfig) -> Self {
        self.deep_link = deep_link;
        self
    }

    /// Set the predictive-back commit threshold
    pub fn commit_threshold(mut self, threshold: f32) -> Self {
        self.gesture.commit_threshold = threshold;
        self
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.gesture.validate()?;
        self.motion.validate()?;
        Ok(())
    }
}
