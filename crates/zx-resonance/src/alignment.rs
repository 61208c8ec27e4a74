// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Resonance Alignment Summary
// ─────────────────────────────────────────────────────────────────────
//! Derives an Ω signature from a reference graph and measures how well
//! another graph aligns with it, as a scalar in [0, 1].
//!
//! Alignment is reported, never scheduled on: the rewrite scheduler does
//! not read it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use zx_types::{SpiderGraph, ZxError, ZxResult};

use crate::omega::{
    denominator_lcm, minimal_qpi_bins, CycleBasisExtractor, JaccardCosine, OmegaSignature,
    PhaseHistogramBinner, SignatureSimilarity,
};

/// How Ω histograms are binned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OmegaBinning {
    /// `2 · lcm(denominators)` of the reference graph. Exact Qπ partition.
    #[default]
    MinimalQpi,
    /// Fixed bin count regardless of the graph (e.g. 128 for a GPU binner).
    Fixed(u32),
}

/// Alignment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResonanceConfig {
    /// Default: `MinimalQpi`.
    pub binning: OmegaBinning,
    /// Largest denominator LCM accepted under `MinimalQpi` binning.
    /// Bounds the histogram length.
    /// Default: 64.
    pub max_denominator: u32,
}

impl Default for ResonanceConfig {
    fn default() -> Self {
        Self {
            binning: OmegaBinning::MinimalQpi,
            max_denominator: 64,
        }
    }
}

impl ResonanceConfig {
    pub fn validate(&self) -> ZxResult<()> {
        if self.max_denominator == 0 {
            return Err(ZxError::Config("max_denominator must be >= 1".into()));
        }
        if self.binning == OmegaBinning::Fixed(0) {
            return Err(ZxError::Config("fixed bin count must be >= 1".into()));
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ZxResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ZxError::Config(format!("JSON parse error: {e}")))
    }
}

/// Ω derivation and alignment over injected structural analysis.
///
/// Holds only shared, read-only collaborators; one instance can serve
/// many threads.
pub struct AlignmentSummary {
    config: ResonanceConfig,
    cycles: Arc<dyn CycleBasisExtractor>,
    histogram: Arc<dyn PhaseHistogramBinner>,
    similarity: Arc<dyn SignatureSimilarity>,
}

impl AlignmentSummary {
    /// Summary using the default `Jaccard × Cosine` similarity.
    pub fn new(
        config: ResonanceConfig,
        cycles: Arc<dyn CycleBasisExtractor>,
        histogram: Arc<dyn PhaseHistogramBinner>,
    ) -> Self {
        Self {
            config,
            cycles,
            histogram,
            similarity: Arc::new(JaccardCosine),
        }
    }

    pub fn with_similarity(mut self, similarity: Arc<dyn SignatureSimilarity>) -> Self {
        self.similarity = similarity;
        self
    }

    /// Read-only access to config.
    pub fn config(&self) -> &ResonanceConfig {
        &self.config
    }

    /// Bin count used for an Ω derived from `graph`.
    pub fn phase_bins(&self, graph: &SpiderGraph) -> ZxResult<u32> {
        match self.config.binning {
            OmegaBinning::Fixed(0) => Err(ZxError::Config("fixed bin count must be >= 1".into())),
            OmegaBinning::Fixed(bins) => Ok(bins),
            OmegaBinning::MinimalQpi => {
                let lcm = denominator_lcm(graph)?;
                if lcm > self.config.max_denominator {
                    return Err(ZxError::Resonance(format!(
                        "phase denominator LCM {lcm} exceeds max_denominator {}",
                        self.config.max_denominator
                    )));
                }
                minimal_qpi_bins(graph)
            }
        }
    }

    /// Derive the Ω signature of a reference graph.
    pub fn derive_omega(&self, graph: &SpiderGraph) -> ZxResult<OmegaSignature> {
        let phase_bins = self.phase_bins(graph)?;
        let omega = OmegaSignature {
            cycles: self.cycles.cycle_basis(graph)?,
            phase_bins,
            phase_hist: self.histogram.histogram(graph, phase_bins)?,
        };
        omega.validate()?;
        log::debug!(
            "derived omega: {} cycles, {} phase bins",
            omega.cycles.len(),
            omega.phase_bins
        );
        Ok(omega)
    }

    /// Alignment of `graph` with `omega`, clamped to [0, 1].
    ///
    /// `graph` is binned with Ω's own bin count so histograms compare
    /// bin for bin.
    pub fn alignment(&self, graph: &SpiderGraph, omega: &OmegaSignature) -> ZxResult<f64> {
        omega.validate()?;
        let cycles = self.cycles.cycle_basis(graph)?;
        let hist = self.histogram.histogram(graph, omega.phase_bins)?;
        let raw = self
            .similarity
            .similarity(&cycles, &omega.cycles, &hist, &omega.phase_hist)?;
        if !raw.is_finite() {
            return Err(ZxError::Numerical(format!(
                "non-finite resonance similarity: {raw}"
            )));
        }
        Ok(raw.clamp(0.0, 1.0))
    }
}
