//! Canvas tuning parsed from environment variables.
//!
//! The gesture constants are empirically tuned UX values, so hosts may
//! override them without rebuilding. Every value has a default in
//! [`crate::consts`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::VarError;

use crate::consts::{
    DUPLICATE_OFFSET_PX, GROUP_RESIZE_DIVISOR_PX, MIN_FONT_SIZE_PX, TEXT_RESIZE_MIN_FONT_PX, TEXT_RESIZE_SLOPE,
};

pub const ENV_DUPLICATE_OFFSET: &str = "CANVAS_DUPLICATE_OFFSET";
pub const ENV_GROUP_RESIZE_DIVISOR: &str = "CANVAS_GROUP_RESIZE_DIVISOR";
pub const ENV_TEXT_RESIZE_SLOPE: &str = "CANVAS_TEXT_RESIZE_SLOPE";
pub const ENV_TEXT_RESIZE_MIN_FONT: &str = "CANVAS_TEXT_RESIZE_MIN_FONT";
pub const ENV_MIN_FONT_SIZE: &str = "CANVAS_MIN_FONT_SIZE";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive number, got '{value}'")]
    Invalid { var: &'static str, value: String },
    #[error("{var} is not valid unicode")]
    NotUnicode { var: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasConfig {
    /// Offset applied to both axes of a duplicate.
    pub duplicate_offset: f64,
    /// Group resize maps `dx` to `e^(dx / divisor)`.
    pub group_resize_divisor: f64,
    /// Text handle maps `dx` to `dx * slope` font pixels.
    pub text_resize_slope: f64,
    /// Floor for the text handle fast path.
    pub text_resize_min_font: f64,
    /// Floor for store writes and auto-fit.
    pub min_font_size: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            duplicate_offset: DUPLICATE_OFFSET_PX,
            group_resize_divisor: GROUP_RESIZE_DIVISOR_PX,
            text_resize_slope: TEXT_RESIZE_SLOPE,
            text_resize_min_font: TEXT_RESIZE_MIN_FONT_PX,
            min_font_size: MIN_FONT_SIZE_PX,
        }
    }
}

impl CanvasConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional (defaults in parentheses):
    /// - `CANVAS_DUPLICATE_OFFSET` (20)
    /// - `CANVAS_GROUP_RESIZE_DIVISOR` (200)
    /// - `CANVAS_TEXT_RESIZE_SLOPE` (0.4)
    /// - `CANVAS_TEXT_RESIZE_MIN_FONT` (8)
    /// - `CANVAS_MIN_FONT_SIZE` (2)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is set but is not a
    /// finite positive number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            duplicate_offset: env_parse_positive(ENV_DUPLICATE_OFFSET, defaults.duplicate_offset)?,
            group_resize_divisor: env_parse_positive(ENV_GROUP_RESIZE_DIVISOR, defaults.group_resize_divisor)?,
            text_resize_slope: env_parse_positive(ENV_TEXT_RESIZE_SLOPE, defaults.text_resize_slope)?,
            text_resize_min_font: env_parse_positive(ENV_TEXT_RESIZE_MIN_FONT, defaults.text_resize_min_font)?,
            min_font_size: env_parse_positive(ENV_MIN_FONT_SIZE, defaults.min_font_size)?,
        })
    }
}

fn env_parse_positive(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => parse_positive(var, &raw),
        Err(VarError::NotPresent) => Ok(default),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { var }),
    }
}

fn parse_positive(var: &'static str, raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ConfigError::Invalid { var, value: raw.to_string() }),
    }
}
