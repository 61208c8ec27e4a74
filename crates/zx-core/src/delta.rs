// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Delta Calculators
// ─────────────────────────────────────────────────────────────────────
//! Pure coherence-delta (ΔC) formulas, one per rewrite kind.
//!
//! | rewrite      | formula |
//! |--------------|---------|
//! | fusion       | `cos|θ1−θ2| + [ln(1+d1+d2) − ln(1+d1) − ln(1+d2)] + [1/gcd(q1,q2) − 1/q1 − 1/q2]` |
//! | colour flip  | `τ(kind) · cos 2θ · ln(1+d)` with τ(Z)=+1, τ(X)=−1 |
//! | grace (rank) | `κ(kind) · (cos θ + ln(1+0.5d)) · max(0.01, s)` |
//! | grace (ΔC)   | `cos(θ−θ_src) · κ(kind) · (n_new − n_old·φ)` |
//!
//! κ(Z)=1, κ(X)=0.85. Fusion and colour flip reject zero denominators;
//! the grace formulas clamp them to 1.

use serde::{Deserialize, Serialize};

use zx_types::constants::{
    GRACE_ALT_KIND_FACTOR, GRACE_DEGREE_WEIGHT, PHI, SYNTHESIS_STRENGTH_FLOOR,
};
use zx_types::signature::phase_radians;
use zx_types::{GraceParams, GraphSummary, SpiderKind, SpiderSignature, ZxResult};

/// Greatest common divisor with `gcd(0, 0) = 1`.
pub fn gcd(a: u32, b: u32) -> u32 {
    let (mut x, mut y) = (a, b);
    while y != 0 {
        let t = y;
        y = x % y;
        x = t;
    }
    if x == 0 {
        1
    } else {
        x
    }
}

/// Grace kind factor κ.
#[inline]
fn grace_kind_factor(kind: SpiderKind) -> f64 {
    match kind {
        SpiderKind::Z => 1.0,
        SpiderKind::X => GRACE_ALT_KIND_FACTOR,
    }
}

/// ΔC for fusing two spiders.
///
/// Symmetric in its arguments. The connectivity term is never positive:
/// merging high-degree spiders has diminishing returns.
pub fn fusion_delta(s1: &SpiderSignature, s2: &SpiderSignature) -> ZxResult<f64> {
    s1.validate()?;
    s2.validate()?;

    let phase_diff = (s1.phase_radians() - s2.phase_radians()).abs();
    let phase_alignment = phase_diff.cos();

    let deg1 = f64::from(s1.degree);
    let deg2 = f64::from(s2.degree);
    // Per-spider terms are summed before subtracting so swapping the
    // arguments gives a bit-identical result.
    let connectivity_gain = (1.0 + deg1 + deg2).ln() - ((1.0 + deg1).ln() + (1.0 + deg2).ln());

    let d1 = s1.phase_denominator;
    let d2 = s2.phase_denominator;
    let simplification_gain =
        1.0 / f64::from(gcd(d1, d2)) - (1.0 / f64::from(d1) + 1.0 / f64::from(d2));

    Ok(phase_alignment + connectivity_gain + simplification_gain)
}

/// ΔC for flipping a spider's colour.
pub fn color_flip_delta(signature: &SpiderSignature) -> ZxResult<f64> {
    signature.validate()?;

    let phase_stability = (2.0 * signature.phase_radians()).cos();
    let degree_impact = (1.0 + f64::from(signature.degree)).ln();
    let type_factor = match signature.kind {
        SpiderKind::Z => 1.0,
        SpiderKind::X => -1.0,
    };

    Ok(type_factor * phase_stability * degree_impact)
}

/// Resonance used to rank grace-emergence sources. Not a scheduling ΔC.
///
/// The strength floor keeps a zero or negative strength from producing
/// a score that ranks below genuinely weak candidates.
pub fn grace_resonance(signature: &SpiderSignature, synthesis_strength: f64) -> f64 {
    let theta = phase_radians(signature.phase_numerator, signature.phase_denominator.max(1));
    let alignment = theta.cos();
    let degree_factor = (1.0 + GRACE_DEGREE_WEIGHT * f64::from(signature.degree)).ln();

    grace_kind_factor(signature.kind)
        * (alignment + degree_factor)
        * synthesis_strength.max(SYNTHESIS_STRENGTH_FLOOR)
}

/// ΔC for a grace-emergence rewrite.
///
/// Growth below the φ-scaled baseline `old_node_count · φ` scores
/// negative.
pub fn grace_delta(params: &GraceParams) -> f64 {
    let phase_alignment = (params.phase_radians() - params.source_phase_radians()).cos();
    let growth = params.new_node_count as f64 - grace_projection(params.old_node_count);

    phase_alignment * grace_kind_factor(params.kind) * growth
}

/// φ-scaled growth baseline for a graph of `nodes` spiders.
#[inline]
pub fn grace_projection(nodes: u64) -> f64 {
    nodes as f64 * PHI
}

/// Aggregate structural change between two graph summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralDelta {
    pub delta_cycles: i64,
    pub delta_nodes: i64,
    /// `|Δcycles| + |Δnodes|`: how many coherence terms the rewrite touches.
    pub coherence_terms_affected: u64,
    pub proof_id: String,
}

/// Structural delta `post − pre`.
pub fn structural_delta(
    pre: &GraphSummary,
    post: &GraphSummary,
    proof_id: &str,
) -> StructuralDelta {
    let delta_cycles = post.cycle_count as i64 - pre.cycle_count as i64;
    let delta_nodes = post.node_count as i64 - pre.node_count as i64;
    StructuralDelta {
        delta_cycles,
        delta_nodes,
        coherence_terms_affected: delta_cycles.unsigned_abs() + delta_nodes.unsigned_abs(),
        proof_id: proof_id.to_string(),
    }
}
