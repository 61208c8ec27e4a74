// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Shared Constants
// ─────────────────────────────────────────────────────────────────────
//! Numeric constants shared by every delta calculator.
//!
//! All call sites read these values from here so that scores computed in
//! different modules are bit-identical for identical inputs.

/// Golden ratio as fixed by the grace-emergence formulas.
///
/// Deliberately truncated to 12 decimals; do not replace with the exact
/// `(1 + √5) / 2`, existing scores are calibrated against this value.
#[allow(clippy::excessive_precision)]
pub const PHI: f64 = 1.618033988749;

/// π, used to convert rational phases into radians.
pub const PI: f64 = std::f64::consts::PI;

/// Denominator assumed when a phase is given as a plain multiple of π.
pub const DEFAULT_PHASE_DENOMINATOR: u32 = 1;

/// Kind factor applied to non-Z spiders in the grace formulas.
pub const GRACE_ALT_KIND_FACTOR: f64 = 0.85;

/// Lower bound applied to the synthesis strength in `grace_resonance`.
pub const SYNTHESIS_STRENGTH_FLOOR: f64 = 0.01;

/// Weight of the spider degree inside the grace resonance log term.
pub const GRACE_DEGREE_WEIGHT: f64 = 0.5;

/// Proof identifier attached to structural delta reports.
pub const DEFAULT_PROOF_ID: &str = "THM-ZX-COHERENCE-DELTA-001";
