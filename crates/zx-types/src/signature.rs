// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Signature Model
// ─────────────────────────────────────────────────────────────────────
//! Immutable value types describing a spider's local state and a
//! graph's aggregate state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PHASE_DENOMINATOR, PI};
use crate::error::{ZxError, ZxResult};

/// Spider colour. Closed: anything other than Z or X is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpiderKind {
    Z,
    X,
}

impl SpiderKind {
    /// The opposite colour (Z ↔ X).
    pub fn flipped(self) -> Self {
        match self {
            SpiderKind::Z => SpiderKind::X,
            SpiderKind::X => SpiderKind::Z,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpiderKind::Z => "Z",
            SpiderKind::X => "X",
        }
    }
}

impl fmt::Display for SpiderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpiderKind {
    type Err = ZxError;

    fn from_str(s: &str) -> ZxResult<Self> {
        match s {
            "Z" => Ok(SpiderKind::Z),
            "X" => Ok(SpiderKind::X),
            other => Err(ZxError::Validation(format!(
                "spider kind must be Z or X, got {other:?}"
            ))),
        }
    }
}

/// Convert a rational phase `numerator · π / denominator` into radians.
///
/// The caller is responsible for a non-zero denominator.
#[inline]
pub fn phase_radians(numerator: i64, denominator: u32) -> f64 {
    PI * numerator as f64 / denominator as f64
}

/// Local state of one spider: colour, rational phase and degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpiderSignature {
    pub kind: SpiderKind,
    pub phase_numerator: i64,
    /// Must be ≥ 1. Conventionally equal to the phase-quantization step
    /// count, but any positive value is accepted.
    pub phase_denominator: u32,
    pub degree: u32,
}

impl SpiderSignature {
    /// Validated constructor.
    pub fn new(
        kind: SpiderKind,
        phase_numerator: i64,
        phase_denominator: u32,
        degree: u32,
    ) -> ZxResult<Self> {
        let sig = Self {
            kind,
            phase_numerator,
            phase_denominator,
            degree,
        };
        sig.validate()?;
        Ok(sig)
    }

    /// Spider whose phase is an integral multiple of π.
    pub fn integral(kind: SpiderKind, phase_numerator: i64, degree: u32) -> Self {
        Self {
            kind,
            phase_numerator,
            phase_denominator: DEFAULT_PHASE_DENOMINATOR,
            degree,
        }
    }

    pub fn validate(&self) -> ZxResult<()> {
        if self.phase_denominator == 0 {
            return Err(ZxError::Validation(format!(
                "phase_denominator must be >= 1 (kind {}, numerator {})",
                self.kind, self.phase_numerator
            )));
        }
        Ok(())
    }

    /// Phase in radians. Only meaningful after `validate()` succeeds.
    pub fn phase_radians(&self) -> f64 {
        phase_radians(self.phase_numerator, self.phase_denominator)
    }

    /// Same spider with its colour flipped.
    pub fn flipped(&self) -> Self {
        Self {
            kind: self.kind.flipped(),
            ..*self
        }
    }
}

/// Coarse aggregate state of a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphSummary {
    pub node_count: u64,
    /// Number of independent cycles (cyclomatic number).
    pub cycle_count: u64,
}

impl GraphSummary {
    pub fn new(node_count: u64, cycle_count: u64) -> Self {
        Self {
            node_count,
            cycle_count,
        }
    }
}

/// Parameters of a grace-emergence rewrite.
///
/// Grace formulas clamp denominators with `max(1, d)`, so a zero
/// denominator is tolerated here rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraceParams {
    pub kind: SpiderKind,
    pub phase_numerator: i64,
    pub phase_denominator: u32,
    pub source_phase_numerator: i64,
    pub source_phase_denominator: u32,
    pub new_node_count: u64,
    pub old_node_count: u64,
}

impl GraceParams {
    /// Build grace parameters for a new spider emerging from `source`,
    /// taking node counts from the pre/post graph summaries.
    pub fn from_summaries(
        emerged: &SpiderSignature,
        source: &SpiderSignature,
        pre: &GraphSummary,
        post: &GraphSummary,
    ) -> Self {
        Self {
            kind: emerged.kind,
            phase_numerator: emerged.phase_numerator,
            phase_denominator: emerged.phase_denominator,
            source_phase_numerator: source.phase_numerator,
            source_phase_denominator: source.phase_denominator,
            new_node_count: post.node_count,
            old_node_count: pre.node_count,
        }
    }

    /// Emerged spider phase in radians, denominator clamped to ≥ 1.
    pub fn phase_radians(&self) -> f64 {
        phase_radians(self.phase_numerator, self.phase_denominator.max(1))
    }

    /// Source spider phase in radians, denominator clamped to ≥ 1.
    pub fn source_phase_radians(&self) -> f64 {
        phase_radians(self.source_phase_numerator, self.source_phase_denominator.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("Z".parse::<SpiderKind>().unwrap(), SpiderKind::Z);
        assert_eq!("X".parse::<SpiderKind>().unwrap(), SpiderKind::X);
        assert!(matches!(
            "H".parse::<SpiderKind>(),
            Err(ZxError::Validation(_))
        ));
        assert!("z".parse::<SpiderKind>().is_err());
    }

    #[test]
    fn test_kind_flip_involution() {
        assert_eq!(SpiderKind::Z.flipped(), SpiderKind::X);
        assert_eq!(SpiderKind::Z.flipped().flipped(), SpiderKind::Z);
    }

    #[test]
    fn test_zero_denominator_rejected() {
        let err = SpiderSignature::new(SpiderKind::Z, 1, 0, 2).unwrap_err();
        assert!(err.to_string().contains("phase_denominator"));
    }

    #[test]
    fn test_integral_uses_default_denominator() {
        let sig = SpiderSignature::integral(SpiderKind::X, 1, 3);
        assert_eq!(sig.phase_denominator, DEFAULT_PHASE_DENOMINATOR);
        assert!((sig.phase_radians() - PI).abs() < 1e-12);
    }

    #[test]
    fn test_kind_serde_roundtrip_labels() {
        let json = serde_json::to_string(&SpiderKind::X).unwrap();
        assert_eq!(json, "\"X\"");
        assert!(serde_json::from_str::<SpiderKind>("\"Y\"").is_err());
    }

    #[test]
    fn test_grace_params_from_summaries() {
        let emerged = SpiderSignature::integral(SpiderKind::X, 0, 1);
        let source = SpiderSignature::new(SpiderKind::Z, 1, 4, 3).unwrap();
        let params = GraceParams::from_summaries(
            &emerged,
            &source,
            &GraphSummary::new(5, 1),
            &GraphSummary::new(6, 1),
        );
        assert_eq!(params.old_node_count, 5);
        assert_eq!(params.new_node_count, 6);
        assert_eq!(params.source_phase_denominator, 4);
    }

    #[test]
    fn test_grace_params_zero_denominator_clamped() {
        let params = GraceParams {
            kind: SpiderKind::Z,
            phase_numerator: 1,
            phase_denominator: 0,
            source_phase_numerator: 0,
            source_phase_denominator: 0,
            new_node_count: 1,
            old_node_count: 0,
        };
        assert!((params.phase_radians() - PI).abs() < 1e-12);
        assert_eq!(params.source_phase_radians(), 0.0);
    }
}
