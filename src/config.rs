//! Configuration for detection thresholds and parallel execution.

use serde::{Deserialize, Serialize};

/// Default z-score: two-sided 99% confidence under a normal approximation.
fn default_z_score() -> f64 {
    2.57
}

/// Default value for parallel processing enabled
fn default_enabled() -> bool {
    true
}

/// Configuration of the overrepresentation detector.
///
/// A unit is flagged for a class when the class's representation exceeds
/// `1 + z_score · sqrt(variance)`. The threshold is configurable so tests
/// and callers with different confidence requirements can substitute their
/// own value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Significance threshold in null-model standard deviations
    /// (default: 2.57, i.e. 99% two-sided confidence).
    #[serde(default = "default_z_score")]
    pub z_score: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            z_score: default_z_score(),
        }
    }
}

impl DetectionConfig {
    /// Config with a custom significance threshold.
    pub fn with_z_score(z_score: f64) -> Self {
        Self { z_score }
    }
}

/// Configuration for parallel processing operations.
///
/// Controls whether the adjacency builder evaluates geometric pair tests on
/// rayon's thread pool. Results are identical either way; sequential mode is
/// useful for debugging or constrained environments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Enable parallel processing (default: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold_is_99_percent_confidence() {
        assert_eq!(DetectionConfig::default().z_score, 2.57);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let config: DetectionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DetectionConfig::default());
        let parallel: ParallelConfig = serde_json::from_str("{}").unwrap();
        assert!(parallel.enabled);
    }
}
