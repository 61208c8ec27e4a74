// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Resonance Alignment
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Ω signature derivation and resonance alignment.
//!
//! - Ω: cycle basis + Qπ phase histogram of a reference graph
//! - Alignment: `Jaccard(cycles) × Cosine(histograms)` in [0, 1]
//!
//! Cycle-basis extraction and histogram binning are injected.

pub mod alignment;
pub mod omega;

pub use alignment::{AlignmentSummary, OmegaBinning, ResonanceConfig};
pub use omega::{
    denominator_lcm, lcm_many, minimal_qpi_bins, CycleBasisExtractor, CycleSignature,
    ExternalCycleBasis, ExternalHistogram, JaccardCosine, OmegaSignature, PhaseHistogramBinner,
    SignatureSimilarity,
};
