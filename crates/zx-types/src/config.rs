// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Scheduler Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PROOF_ID;
use crate::error::{ZxError, ZxResult};

/// Runtime configuration for the rewrite scheduler.
///
/// Holds only values injected by the evolution driver; the delta
/// formulas themselves have no tunable parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Batches with at least this many candidates are scored on the
    /// rayon pool. 0 disables parallel scoring.
    /// Default: 256.
    pub parallel_threshold: usize,

    /// Conventional phase denominator (quantization step count) of the
    /// live graph. Informational: signatures with other denominators
    /// are still scored.
    /// Default: 8.
    pub phase_quantization: u32,

    /// Emit a `warn` record for every dropped candidate.
    /// Default: true.
    pub log_drops: bool,

    /// Proof identifier attached to structural delta reports.
    pub proof_id: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 256,
            phase_quantization: 8,
            log_drops: true,
            proof_id: DEFAULT_PROOF_ID.to_string(),
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> ZxResult<()> {
        if self.phase_quantization == 0 {
            return Err(ZxError::Config(
                "phase_quantization must be >= 1".to_string(),
            ));
        }
        if self.proof_id.trim().is_empty() {
            return Err(ZxError::Config("proof_id must not be empty".to_string()));
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ZxResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ZxError::Config(format!("JSON parse error: {e}")))
    }

    /// Whether a batch of `len` candidates should be scored in parallel.
    pub fn parallel_for(&self, len: usize) -> bool {
        self.parallel_threshold > 0 && len >= self.parallel_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SchedulerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_quantization_rejected() {
        let config = SchedulerConfig {
            phase_quantization: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ZxError::Config(_))));
    }

    #[test]
    fn test_blank_proof_id_rejected() {
        let config = SchedulerConfig {
            proof_id: "  ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = SchedulerConfig::from_json(r#"{"parallel_threshold": 0}"#).unwrap();
        assert_eq!(config.parallel_threshold, 0);
        assert_eq!(config.phase_quantization, 8);
        assert!(config.log_drops);
    }

    #[test]
    fn test_from_json_garbage() {
        let err = SchedulerConfig::from_json("not json").unwrap_err();
        assert!(err.to_string().contains("JSON parse error"));
    }

    #[test]
    fn test_parallel_for() {
        let config = SchedulerConfig::default();
        assert!(!config.parallel_for(10));
        assert!(config.parallel_for(256));
        let off = SchedulerConfig {
            parallel_threshold: 0,
            ..Default::default()
        };
        assert!(!off.parallel_for(10_000));
    }
}
