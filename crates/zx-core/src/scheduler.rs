// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Rewrite Scheduler
// ─────────────────────────────────────────────────────────────────────
//! Scores a batch of rewrite candidates and orders them by ΔC.
//!
//! # Ordering guarantees
//!
//! 1. **Deterministic**: identical input batches yield identical output,
//!    including the order of ties, whether scoring ran serially or on
//!    the rayon pool.
//! 2. **Stable**: candidates with exactly equal ΔC keep their submission
//!    order.
//! 3. **Contained failures**: a malformed or unscoreable candidate is
//!    dropped on its own and reported in `ScheduleReport::dropped`; the
//!    rest of the batch is unaffected.

use std::cmp::Ordering;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use zx_types::{
    DeltaOutcome, GraphSummary, RewriteCandidate, SchedulerConfig, ScoredCandidate,
    UndefinedReason, ZxResult,
};

use crate::delta::{structural_delta, StructuralDelta};
use crate::record::decode_batch;
use crate::scorer::CandidateScorer;

/// A candidate removed from the schedule, with its submission index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedCandidate {
    pub index: usize,
    pub label: String,
    pub reason: UndefinedReason,
}

/// Output of one scheduling call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    /// Scoreable candidates, ΔC descending, ties in submission order.
    pub ordered: Vec<ScoredCandidate>,
    /// Diagnostic list of dropped candidates, in submission order.
    pub dropped: Vec<DroppedCandidate>,
}

impl ScheduleReport {
    /// Highest-ΔC candidate, if any.
    pub fn best(&self) -> Option<&ScoredCandidate> {
        self.ordered.first()
    }

    pub fn submitted(&self) -> usize {
        self.ordered.len() + self.dropped.len()
    }
}

/// Batch scheduler over a shared [`CandidateScorer`].
#[derive(Debug, Clone, Default)]
pub struct RewriteScheduler {
    scorer: CandidateScorer,
}

enum Resolved {
    Scored(f64),
    Dropped(String, UndefinedReason),
}

impl RewriteScheduler {
    /// Build a scheduler without checking `config`. Use [`Self::try_new`]
    /// for configuration loaded from outside the process.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            scorer: CandidateScorer::new(config),
        }
    }

    /// Build a scheduler from a validated config.
    pub fn try_new(config: SchedulerConfig) -> ZxResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Read-only access to config.
    pub fn config(&self) -> &SchedulerConfig {
        self.scorer.config()
    }

    pub fn scorer(&self) -> &CandidateScorer {
        &self.scorer
    }

    /// Structural delta of a committed rewrite, tagged with the
    /// configured proof identifier.
    pub fn structural_delta(&self, pre: &GraphSummary, post: &GraphSummary) -> StructuralDelta {
        structural_delta(pre, post, &self.config().proof_id)
    }

    /// Score every candidate and return the scoreable ones in descending
    /// ΔC order.
    pub fn schedule(&self, candidates: Vec<RewriteCandidate>) -> ScheduleReport {
        let resolved: Vec<Resolved> = if self.config().parallel_for(candidates.len()) {
            candidates.par_iter().map(|c| self.resolve_one(c)).collect()
        } else {
            candidates.iter().map(|c| self.resolve_one(c)).collect()
        };

        let mut report = ScheduleReport::default();
        for (index, (candidate, outcome)) in candidates.into_iter().zip(resolved).enumerate() {
            match outcome {
                Resolved::Scored(delta_c) => {
                    report.ordered.push(ScoredCandidate { candidate, delta_c })
                }
                Resolved::Dropped(label, reason) => {
                    self.drop_candidate(&mut report, index, label, reason)
                }
            }
        }

        sort_descending(&mut report.ordered);
        log::debug!(
            "scheduled {} rewrite candidates ({} dropped)",
            report.ordered.len(),
            report.dropped.len()
        );
        report
    }

    /// Decode and schedule a JSON batch of candidate records.
    ///
    /// Fails only when `records` is not a sequence. Records that fail
    /// validation are dropped with [`UndefinedReason::Invalid`].
    pub fn schedule_records(&self, records: &Value) -> ZxResult<ScheduleReport> {
        let decoded = decode_batch(records)?;

        let mut invalid = Vec::new();
        let mut positions = Vec::with_capacity(decoded.len());
        let mut candidates = Vec::with_capacity(decoded.len());
        for (index, item) in decoded.into_iter().enumerate() {
            match item {
                Ok(candidate) => {
                    positions.push(index);
                    candidates.push(candidate);
                }
                Err(e) => invalid.push(DroppedCandidate {
                    index,
                    label: record_label(records, index),
                    reason: UndefinedReason::Invalid(e.to_string()),
                }),
            }
        }

        let mut report = self.schedule(candidates);
        for dropped in &mut report.dropped {
            dropped.index = positions[dropped.index];
        }
        for dropped in invalid {
            if self.config().log_drops {
                log::warn!(
                    "Dropping candidate #{} ({}): {}",
                    dropped.index,
                    dropped.label,
                    dropped.reason
                );
            }
            report.dropped.push(dropped);
        }
        report.dropped.sort_by_key(|d| d.index);
        Ok(report)
    }

    fn resolve_one(&self, candidate: &RewriteCandidate) -> Resolved {
        let label = || candidate.rewrite.label().to_string();
        match self.scorer.resolve(candidate) {
            Ok(DeltaOutcome::Scored(delta_c)) => Resolved::Scored(delta_c),
            Ok(DeltaOutcome::Undefined(reason)) => Resolved::Dropped(label(), reason),
            Err(e) => Resolved::Dropped(label(), UndefinedReason::Invalid(e.to_string())),
        }
    }

    fn drop_candidate(
        &self,
        report: &mut ScheduleReport,
        index: usize,
        label: String,
        reason: UndefinedReason,
    ) {
        if self.config().log_drops {
            log::warn!("Dropping candidate #{index} ({label}): {reason}");
        }
        report.dropped.push(DroppedCandidate {
            index,
            label,
            reason,
        });
    }
}

/// Stable sort by ΔC, highest first. All values are finite.
fn sort_descending(scored: &mut [ScoredCandidate]) {
    scored.sort_by(|a, b| {
        b.delta_c
            .partial_cmp(&a.delta_c)
            .unwrap_or(Ordering::Equal)
    });
}

fn record_label(records: &Value, index: usize) -> String {
    records
        .get(index)
        .and_then(|r| r.get("type"))
        .and_then(Value::as_str)
        .unwrap_or("record")
        .to_string()
}

/// Score and order `candidates` with the default configuration.
pub fn score_and_order(candidates: Vec<RewriteCandidate>) -> Vec<ScoredCandidate> {
    RewriteScheduler::default().schedule(candidates).ordered
}
