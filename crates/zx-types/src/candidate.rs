// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Rewrite Candidates and Score Types
// ─────────────────────────────────────────────────────────────────────

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::NodeId;
use crate::signature::{GraceParams, SpiderSignature};

/// The local rewrite a candidate proposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rewrite {
    /// Merge two adjacent spiders of the same colour.
    Fusion {
        left: SpiderSignature,
        right: SpiderSignature,
    },
    /// Toggle a spider between Z and X.
    ColorFlip { spider: SpiderSignature },
    /// Grace-rule emergence of new structure.
    GraceEmergence(GraceParams),
    /// Externally pre-scored candidate of a kind the kernel does not model.
    Other { label: String },
}

impl Rewrite {
    /// Stable label used in logs and drop diagnostics.
    pub fn label(&self) -> &str {
        match self {
            Rewrite::Fusion { .. } => "fusion",
            Rewrite::ColorFlip { .. } => "color_flip",
            Rewrite::GraceEmergence(_) => "grace_emergence",
            Rewrite::Other { label } => label,
        }
    }

    pub fn is_grace(&self) -> bool {
        matches!(self, Rewrite::GraceEmergence(_))
    }
}

/// Location of a rewrite in the live graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteSite {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<(NodeId, NodeId)>,
}

/// One proposed rewrite, built by the evolution driver for a single
/// scheduling decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteCandidate {
    pub rewrite: Rewrite,
    /// Externally computed ΔC. Takes precedence when finite.
    #[serde(default)]
    pub precomputed_delta: Option<f64>,
    #[serde(default)]
    pub site: Option<RewriteSite>,
}

impl RewriteCandidate {
    pub fn new(rewrite: Rewrite) -> Self {
        Self {
            rewrite,
            precomputed_delta: None,
            site: None,
        }
    }

    pub fn fusion(left: SpiderSignature, right: SpiderSignature) -> Self {
        Self::new(Rewrite::Fusion { left, right })
    }

    pub fn color_flip(spider: SpiderSignature) -> Self {
        Self::new(Rewrite::ColorFlip { spider })
    }

    pub fn grace(params: GraceParams) -> Self {
        Self::new(Rewrite::GraceEmergence(params))
    }

    pub fn other(label: impl Into<String>) -> Self {
        Self::new(Rewrite::Other {
            label: label.into(),
        })
    }

    pub fn with_precomputed(mut self, delta_c: f64) -> Self {
        self.precomputed_delta = Some(delta_c);
        self
    }

    pub fn at_site(mut self, site: RewriteSite) -> Self {
        self.site = Some(site);
        self
    }

    /// The precomputed delta, if present and finite.
    pub fn finite_precomputed(&self) -> Option<f64> {
        self.precomputed_delta.filter(|d| d.is_finite())
    }
}

/// A candidate paired with its finite coherence delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: RewriteCandidate,
    pub delta_c: f64,
}

/// Why a candidate could not be scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum UndefinedReason {
    /// Kind not modelled by any calculator and no precomputed score.
    UnknownKind(String),
    /// Kind requires an externally precomputed score that was not supplied.
    MissingPrecomputed(String),
    /// A calculator produced NaN or ±Inf.
    NonFinite(f64),
    /// The candidate failed structural validation.
    Invalid(String),
}

impl fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndefinedReason::UnknownKind(kind) => {
                write!(f, "unknown candidate kind {kind:?} without precomputed score")
            }
            UndefinedReason::MissingPrecomputed(kind) => {
                write!(f, "{kind} candidate requires a precomputed score")
            }
            UndefinedReason::NonFinite(value) => write!(f, "non-finite delta {value}"),
            UndefinedReason::Invalid(msg) => write!(f, "invalid candidate: {msg}"),
        }
    }
}

/// Result of resolving a candidate's ΔC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeltaOutcome {
    Scored(f64),
    Undefined(UndefinedReason),
}

impl DeltaOutcome {
    /// Wrap a computed value, mapping NaN/Inf to `Undefined`.
    pub fn from_value(value: f64) -> Self {
        if value.is_finite() {
            DeltaOutcome::Scored(value)
        } else {
            log::warn!("non-finite coherence delta {value}, treating as undefined");
            DeltaOutcome::Undefined(UndefinedReason::NonFinite(value))
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            DeltaOutcome::Scored(v) => Some(*v),
            DeltaOutcome::Undefined(_) => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, DeltaOutcome::Scored(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::SpiderKind;

    fn spider() -> SpiderSignature {
        SpiderSignature::integral(SpiderKind::Z, 0, 2)
    }

    #[test]
    fn test_outcome_from_nan() {
        let outcome = DeltaOutcome::from_value(f64::NAN);
        assert!(!outcome.is_defined());
        assert!(matches!(
            outcome,
            DeltaOutcome::Undefined(UndefinedReason::NonFinite(_))
        ));
    }

    #[test]
    fn test_outcome_from_inf() {
        assert_eq!(DeltaOutcome::from_value(f64::NEG_INFINITY).score(), None);
    }

    #[test]
    fn test_outcome_normal() {
        assert_eq!(DeltaOutcome::from_value(-0.25).score(), Some(-0.25));
    }

    #[test]
    fn test_finite_precomputed_filters_nan() {
        let c = RewriteCandidate::fusion(spider(), spider()).with_precomputed(f64::NAN);
        assert_eq!(c.finite_precomputed(), None);
        let c = RewriteCandidate::other("pivot").with_precomputed(0.3);
        assert_eq!(c.finite_precomputed(), Some(0.3));
    }

    #[test]
    fn test_labels() {
        assert_eq!(RewriteCandidate::fusion(spider(), spider()).rewrite.label(), "fusion");
        assert_eq!(RewriteCandidate::color_flip(spider()).rewrite.label(), "color_flip");
        assert_eq!(RewriteCandidate::other("pivot").rewrite.label(), "pivot");
    }

    #[test]
    fn test_candidate_json_shape() {
        let c = RewriteCandidate::color_flip(spider());
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["rewrite"]["type"], "color_flip");
        assert_eq!(json["rewrite"]["spider"]["kind"], "Z");
        let back: RewriteCandidate = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_reason_display() {
        let r = UndefinedReason::UnknownKind("pivot".into());
        assert!(r.to_string().contains("pivot"));
    }
}
