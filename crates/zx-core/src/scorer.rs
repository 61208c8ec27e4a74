// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Candidate Scorer
// ─────────────────────────────────────────────────────────────────────
//! Resolves the coherence delta of a single rewrite candidate.
//!
//! Resolution order:
//! 1. A finite precomputed delta wins.
//! 2. Fusion and colour-flip candidates dispatch to their calculator.
//! 3. Everything else is an explicit `Undefined` outcome, not an error.
//!
//! Only structurally malformed signatures produce `Err`.

use zx_types::{
    DeltaOutcome, Rewrite, RewriteCandidate, SchedulerConfig, SpiderSignature, UndefinedReason,
    ZxResult,
};

use crate::delta::{color_flip_delta, fusion_delta};

/// Stateless ΔC resolver. `Send + Sync`; one instance may be shared by
/// every scoring worker.
#[derive(Debug, Clone, Default)]
pub struct CandidateScorer {
    config: SchedulerConfig,
}

impl CandidateScorer {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Resolve the ΔC of one candidate.
    pub fn resolve(&self, candidate: &RewriteCandidate) -> ZxResult<DeltaOutcome> {
        if let Some(delta) = candidate.finite_precomputed() {
            return Ok(DeltaOutcome::Scored(delta));
        }

        match &candidate.rewrite {
            Rewrite::Fusion { left, right } => {
                self.note_quantization(left);
                self.note_quantization(right);
                Ok(DeltaOutcome::from_value(fusion_delta(left, right)?))
            }
            Rewrite::ColorFlip { spider } => {
                self.note_quantization(spider);
                Ok(DeltaOutcome::from_value(color_flip_delta(spider)?))
            }
            Rewrite::GraceEmergence(_) => Ok(DeltaOutcome::Undefined(
                UndefinedReason::MissingPrecomputed(candidate.rewrite.label().to_string()),
            )),
            Rewrite::Other { label } => Ok(DeltaOutcome::Undefined(
                UndefinedReason::UnknownKind(label.clone()),
            )),
        }
    }

    /// Read-only access to config.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn note_quantization(&self, spider: &SpiderSignature) {
        if spider.phase_denominator != self.config.phase_quantization {
            log::trace!(
                "spider phase {}/{} off the {}-step quantization grid",
                spider.phase_numerator,
                spider.phase_denominator,
                self.config.phase_quantization
            );
        }
    }
}
