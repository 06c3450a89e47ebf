//! Runtime configuration.
//!
//! Every field defaults to the matching value in [`crate::constants`], so a
//! config file only needs to name what it overrides.

use crate::constants::*;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    pub serial: SerialConfig,
    pub motion: MotionConfig,
    pub effects: EffectsConfig,
    /// Virtual frames per second driven by the update loop.
    pub refresh_rate: u32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            motion: MotionConfig::default(),
            effects: EffectsConfig::default(),
            refresh_rate: REFRESH_RATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub port: String,
    pub baud: u32,
    pub timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: PORT.to_string(),
            baud: BAUD,
            timeout_ms: TIMEOUT_MS,
        }
    }
}

/// Thresholds in degrees, applied to raw pitch/roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub shake_threshold: f32,
    pub shake_count_trigger: u32,
    pub movement_threshold: f32,
    pub significant_movement: f32,
    pub extreme_tilt_threshold: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            shake_threshold: SHAKE_THRESHOLD,
            shake_count_trigger: SHAKE_COUNT_TRIGGER,
            movement_threshold: MOVEMENT_THRESHOLD,
            significant_movement: SIGNIFICANT_MOVEMENT,
            extreme_tilt_threshold: EXTREME_TILT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub trail_length: usize,
    pub trail_lifetime: i32,
    pub particle_size: f32,
    pub particle_lifetime: i32,
    /// Chance per drained sample of a decorative sparkle burst. Zero disables.
    pub sparkle_probability: f64,
    /// Seed for particle randomness; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            trail_length: TRAIL_LENGTH,
            trail_lifetime: TRAIL_LIFETIME,
            particle_size: PARTICLE_SIZE,
            particle_lifetime: PARTICLE_LIFETIME,
            sparkle_probability: SPARKLE_PROBABILITY,
            seed: None,
        }
    }
}

impl EffectsConfig {
    /// Reject values the effects engine cannot roll dice with.
    pub fn validate(&self) -> Result<()> {
        let p = self.sparkle_probability;
        if !(0.0..=1.0).contains(&p) {
            bail!("effects.sparkle_probability must be within [0, 1], got {p}");
        }
        Ok(())
    }
}

/// Load config from a TOML file, or return defaults when no file is given or
/// the file does not exist.
pub fn load_config(path: Option<&Path>) -> Result<TiltConfig> {
    let Some(path) = path else {
        log::info!("No config path given, using defaults");
        return Ok(TiltConfig::default());
    };
    if !path.exists() {
        log::info!("Config {} not found, using defaults", path.display());
        return Ok(TiltConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = parse_config(&contents)
        .with_context(|| format!("parsing config {}", path.display()))?;
    log::info!("Loaded config {}", path.display());
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<TiltConfig> {
    let config: TiltConfig = toml::from_str(contents)?;
    config.effects.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, TiltConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = parse_config(
            r#"
            refresh_rate = 30

            [serial]
            port = "COM3"

            [effects]
            sparkle_probability = 0.0
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(cfg.refresh_rate, 30);
        assert_eq!(cfg.serial.port, "COM3");
        assert_eq!(cfg.serial.baud, BAUD);
        assert_eq!(cfg.effects.sparkle_probability, 0.0);
        assert_eq!(cfg.effects.seed, Some(7));
        assert_eq!(cfg.effects.trail_length, TRAIL_LENGTH);
        assert_eq!(cfg.motion, MotionConfig::default());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(parse_config("refresh_rate = [").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load_config(Some(Path::new("/definitely/not/here/tilt.toml"))).unwrap();
        assert_eq!(cfg, TiltConfig::default());
    }

    #[test]
    fn sparkle_probability_outside_unit_range_is_rejected() {
        for bad in ["nan", "1.5", "-0.1", "inf"] {
            let doc = format!("[effects]\nsparkle_probability = {bad}\n");
            let err = parse_config(&doc).unwrap_err();
            assert!(err.to_string().contains("sparkle_probability"), "{bad}: {err}");
        }
        assert!(parse_config("[effects]\nsparkle_probability = 1.0\n").is_ok());
    }
}
