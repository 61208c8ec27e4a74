// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Ω Signature
// ─────────────────────────────────────────────────────────────────────
//! Ω signature and the structural-analysis seams it is built from.
//!
//! Cycle-basis extraction and phase histogram binning are supplied by
//! the host (graph library, GPU binner, test fixture) through
//! [`CycleBasisExtractor`] and [`PhaseHistogramBinner`]. This module
//! owns the Qπ bin arithmetic and the default similarity:
//!
//!   S = Jaccard(cycle signatures) × Cosine(phase histograms)

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use zx_types::{NodeId, SpiderGraph, ZxError, ZxResult};

/// Canonical node sequence of one fundamental cycle.
pub type CycleSignature = Vec<NodeId>;

/// Reference structure and phase distribution to align against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmegaSignature {
    pub cycles: Vec<CycleSignature>,
    pub phase_bins: u32,
    pub phase_hist: Vec<f64>,
}

impl OmegaSignature {
    pub fn validate(&self) -> ZxResult<()> {
        if self.phase_bins == 0 {
            return Err(ZxError::Resonance("omega phase_bins must be >= 1".into()));
        }
        if self.phase_hist.len() != self.phase_bins as usize {
            return Err(ZxError::Resonance(format!(
                "omega histogram has {} bins, expected {}",
                self.phase_hist.len(),
                self.phase_bins
            )));
        }
        Ok(())
    }
}

// ── Traits ──────────────────────────────────────────────────────────

/// Canonical fundamental cycle basis of a graph.
pub trait CycleBasisExtractor: Send + Sync {
    fn cycle_basis(&self, graph: &SpiderGraph) -> ZxResult<Vec<CycleSignature>>;
}

/// Normalized phase histogram of a graph in exactly `bins` bins.
pub trait PhaseHistogramBinner: Send + Sync {
    fn histogram(&self, graph: &SpiderGraph, bins: u32) -> ZxResult<Vec<f64>>;
}

/// Similarity between two (cycles, histogram) pairs.
pub trait SignatureSimilarity: Send + Sync {
    fn similarity(
        &self,
        cycles_a: &[CycleSignature],
        cycles_b: &[CycleSignature],
        hist_a: &[f64],
        hist_b: &[f64],
    ) -> ZxResult<f64>;
}

// ── Closure adapters ────────────────────────────────────────────────

type CycleFn = Box<dyn Fn(&SpiderGraph) -> ZxResult<Vec<CycleSignature>> + Send + Sync>;

/// Cycle-basis extractor backed by a closure.
pub struct ExternalCycleBasis {
    extract_fn: CycleFn,
}

impl ExternalCycleBasis {
    pub fn new(
        extract_fn: impl Fn(&SpiderGraph) -> ZxResult<Vec<CycleSignature>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            extract_fn: Box::new(extract_fn),
        }
    }
}

impl CycleBasisExtractor for ExternalCycleBasis {
    fn cycle_basis(&self, graph: &SpiderGraph) -> ZxResult<Vec<CycleSignature>> {
        (self.extract_fn)(graph)
    }
}

type HistogramFn = Box<dyn Fn(&SpiderGraph, u32) -> ZxResult<Vec<f64>> + Send + Sync>;

/// Phase histogram binner backed by a closure.
pub struct ExternalHistogram {
    bin_fn: HistogramFn,
}

impl ExternalHistogram {
    pub fn new(
        bin_fn: impl Fn(&SpiderGraph, u32) -> ZxResult<Vec<f64>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            bin_fn: Box::new(bin_fn),
        }
    }
}

impl PhaseHistogramBinner for ExternalHistogram {
    fn histogram(&self, graph: &SpiderGraph, bins: u32) -> ZxResult<Vec<f64>> {
        (self.bin_fn)(graph, bins)
    }
}

// ── Default similarity ──────────────────────────────────────────────

/// `Jaccard(cycles) × Cosine(histograms)`.
///
/// Jaccard of two empty cycle sets is 1. Cosine against a zero vector
/// is 0. Histograms must share their binning.
pub struct JaccardCosine;

impl JaccardCosine {
    pub fn jaccard(a: &[CycleSignature], b: &[CycleSignature]) -> f64 {
        let set_a: BTreeSet<&CycleSignature> = a.iter().collect();
        let set_b: BTreeSet<&CycleSignature> = b.iter().collect();
        let union = set_a.union(&set_b).count();
        if union == 0 {
            return 1.0;
        }
        set_a.intersection(&set_b).count() as f64 / union as f64
    }

    pub fn cosine(a: &[f64], b: &[f64]) -> ZxResult<f64> {
        if a.len() != b.len() {
            return Err(ZxError::Resonance(format!(
                "phase histograms must have identical binning ({} vs {})",
                a.len(),
                b.len()
            )));
        }
        let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
        let norm_b = b.iter().map(|y| y * y).sum::<f64>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return Ok(0.0);
        }
        Ok(dot / (norm_a * norm_b))
    }
}

impl SignatureSimilarity for JaccardCosine {
    fn similarity(
        &self,
        cycles_a: &[CycleSignature],
        cycles_b: &[CycleSignature],
        hist_a: &[f64],
        hist_b: &[f64],
    ) -> ZxResult<f64> {
        let cosine = Self::cosine(hist_a, hist_b)?;
        Ok(Self::jaccard(cycles_a, cycles_b) * cosine)
    }
}

// ── Qπ bin arithmetic ───────────────────────────────────────────────

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple of `values`, or `None` on overflow past `u32`.
/// The LCM of an empty set is 1.
pub fn lcm_many(values: impl IntoIterator<Item = u32>) -> Option<u32> {
    values.into_iter().try_fold(1u32, |acc, v| {
        let (a, v) = (u64::from(acc), u64::from(v));
        let g = gcd(a, v).max(1);
        u32::try_from(a / g * v).ok()
    })
}

/// LCM of the phase denominators of every labelled spider.
pub fn denominator_lcm(graph: &SpiderGraph) -> ZxResult<u32> {
    if graph.labels.is_empty() {
        return Err(ZxError::Resonance(
            "cannot derive bins: graph has no labelled nodes".into(),
        ));
    }
    if graph.labels.values().any(|l| l.phase_denominator == 0) {
        return Err(ZxError::Validation("phase_denominator must be >= 1".into()));
    }
    lcm_many(graph.labels.values().map(|l| l.phase_denominator))
        .ok_or_else(|| ZxError::Resonance("phase denominator LCM overflows u32".into()))
}

/// Smallest bin count that partitions every phase of `graph` exactly:
/// `2 · lcm(denominators)`.
pub fn minimal_qpi_bins(graph: &SpiderGraph) -> ZxResult<u32> {
    denominator_lcm(graph)?
        .checked_mul(2)
        .ok_or_else(|| ZxError::Resonance("minimal Qπ bin count overflows u32".into()))
}
