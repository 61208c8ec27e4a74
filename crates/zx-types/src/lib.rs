// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Signature model, rewrite candidates, spider graph, configuration and
//! error hierarchy for the ZX Coherence Kernel.

pub mod candidate;
pub mod config;
pub mod constants;
pub mod error;
pub mod graph;
pub mod signature;

pub use candidate::{
    DeltaOutcome, Rewrite, RewriteCandidate, RewriteSite, ScoredCandidate, UndefinedReason,
};
pub use config::SchedulerConfig;
pub use constants::PHI;
pub use error::{ZxError, ZxResult};
pub use graph::{NodeId, NodeLabel, SpiderGraph};
pub use signature::{GraceParams, GraphSummary, SpiderKind, SpiderSignature};
