// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all ZX Coherence Kernel failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ZxError {
    /// A signature, candidate or graph is structurally malformed
    /// (missing field, unknown spider kind, zero phase denominator).
    #[error("validation error: {0}")]
    Validation(String),

    /// The candidate batch itself is unusable (e.g. not a sequence).
    #[error("batch error: {0}")]
    Batch(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Numerical error (NaN/Inf in computation).
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Ω-signature derivation or resonance alignment failed.
    #[error("resonance error: {0}")]
    Resonance(String),
}

pub type ZxResult<T> = Result<T, ZxError>;
