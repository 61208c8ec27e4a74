// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! ΔC calculators, candidate scoring and rewrite scheduling for the
//! ZX-calculus graph evolution engine.
//!
//! The evolution driver detects candidate rewrites on its live graph,
//! hands them to [`RewriteScheduler`] and applies the best one. This
//! crate never mutates a graph.
//!
//! # Invariants
//!
//! 1. **Pure calculators**: every function in [`delta`] depends only on
//!    its arguments. Scoring is safe to fan out across threads.
//!
//! 2. **Undefined is not zero**: a candidate whose ΔC cannot be
//!    determined is dropped from the schedule, never scored as 0.0 and
//!    never reported as an error for the whole batch.
//!
//! 3. **Stable ordering**: equal ΔC keeps submission order, so the same
//!    batch always produces the same schedule.
//!
//! 4. **Notifiers cannot fail the driver**: panics inside an
//!    [`EmergenceNotifier`] are caught by [`EmergenceHook`].

pub mod delta;
pub mod emergence;
pub mod record;
pub mod scheduler;
pub mod scorer;
pub mod sites;

pub use delta::{
    color_flip_delta, fusion_delta, grace_delta, grace_projection, grace_resonance,
    structural_delta, StructuralDelta,
};
pub use emergence::{
    EmergenceHook, EmergenceNotifier, ExternalNotifier, GraceEmergenceEvent, GraceRegistry,
    LogNotifier, NoopNotifier,
};
pub use record::{decode_batch, decode_candidate};
pub use scheduler::{score_and_order, DroppedCandidate, RewriteScheduler, ScheduleReport};
pub use scorer::CandidateScorer;
pub use sites::{
    check_color_flip_preconditions, check_fusion_preconditions, detect_candidates,
    detect_color_flip_sites, detect_fusion_sites, metamirror,
};
