//! Configuration for plane extraction.
//!
//! `RansacSettings` carries every knob the extractor and the command-line
//! driver consume. It can be built in code, deserialized from TOML, or both
//! (load a file, then override fields with the `with_*` setters).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::estimate_iteration_count;
use crate::error::{RansacError, SettingsError};

/// Main configuration object for plane extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RansacSettings {
    /// Inlier distance threshold (epsilon). Default: 0.1
    pub inlier_threshold: f64,

    /// Number of dominant planes to extract. Default: 3
    pub pass_count: usize,

    /// Desired probability of drawing at least one all-inlier sample per
    /// pass, in (0, 1). Default: 0.99
    pub confidence: f64,

    /// Fraction of the remaining cloud assumed to lie on the next plane,
    /// in (0, 1]. Held fixed across passes. Default: 0.1
    pub assumed_inlier_ratio: f64,

    /// Random seed for reproducibility.
    /// `None` = entropy-based seed (non-deterministic).
    pub seed: Option<u64>,

    /// Stop extracting once a pass finds fewer supporting points than this.
    /// `None` = always run `pass_count` passes.
    pub min_support: Option<usize>,
}

impl Default for RansacSettings {
    fn default() -> Self {
        Self {
            inlier_threshold: 0.1,
            pass_count: 3,
            confidence: 0.99,
            assumed_inlier_ratio: 0.1,
            seed: None,
            min_support: None,
        }
    }
}

impl RansacSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Read and parse a TOML settings file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&contents)?)
    }

    pub fn with_inlier_threshold(mut self, threshold: f64) -> Self {
        self.inlier_threshold = threshold;
        self
    }

    pub fn with_pass_count(mut self, pass_count: usize) -> Self {
        self.pass_count = pass_count;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_assumed_inlier_ratio(mut self, ratio: f64) -> Self {
        self.assumed_inlier_ratio = ratio;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_min_support(mut self, min_support: usize) -> Self {
        self.min_support = Some(min_support);
        self
    }

    /// Check every numeric field, including that the iteration count derived
    /// from `confidence` and `assumed_inlier_ratio` is well defined.
    pub fn validate(&self) -> Result<(), RansacError> {
        validate_threshold(self.inlier_threshold)?;
        estimate_iteration_count(self.confidence, self.assumed_inlier_ratio, 3)?;
        Ok(())
    }
}

/// Epsilon must be a positive finite distance.
pub(crate) fn validate_threshold(threshold: f64) -> Result<(), RansacError> {
    if threshold.is_finite() && threshold > 0.0 {
        Ok(())
    } else {
        Err(RansacError::InvalidParameter {
            name: "inlier_threshold",
            value: threshold,
            reason: "must be a positive finite distance",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_reference_policy() {
        let cfg = RansacSettings::default();
        assert!((cfg.inlier_threshold - 0.1).abs() < 1e-12);
        assert_eq!(cfg.pass_count, 3);
        assert!((cfg.confidence - 0.99).abs() < 1e-12);
        assert!((cfg.assumed_inlier_ratio - 0.1).abs() < 1e-12);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.min_support, None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = RansacSettings::from_toml_str(
            r#"
            inlier_threshold = 0.25
            seed = 7
            "#,
        )
        .unwrap();
        assert!((cfg.inlier_threshold - 0.25).abs() < 1e-12);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.pass_count, 3);
        assert_eq!(cfg.min_support, None);
    }

    #[test]
    fn toml_round_trip() {
        let cfg = RansacSettings::default()
            .with_pass_count(5)
            .with_min_support(40)
            .with_seed(3);
        let text = toml::to_string(&cfg).unwrap();
        assert_eq!(RansacSettings::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad = [
            RansacSettings::default().with_inlier_threshold(0.0),
            RansacSettings::default().with_inlier_threshold(f64::NAN),
            RansacSettings::default().with_confidence(1.0),
            RansacSettings::default().with_confidence(0.0),
            RansacSettings::default().with_assumed_inlier_ratio(0.0),
            RansacSettings::default().with_assumed_inlier_ratio(1.5),
        ];
        for cfg in bad {
            assert!(
                matches!(cfg.validate(), Err(RansacError::InvalidParameter { .. })),
                "{cfg:?} should be rejected"
            );
        }
    }
}
