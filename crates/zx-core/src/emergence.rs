// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Emergence Notifier
// ─────────────────────────────────────────────────────────────────────
//! One-way notification fired when the evolution driver commits a
//! grace-emergence rewrite.
//!
//! The kernel makes no assumption about the sink. Notifier failures are
//! isolated in [`EmergenceHook`]: a panicking sink is logged and
//! swallowed so it never interrupts scheduling or rewrite application.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use zx_types::constants::PHI;
use zx_types::ScoredCandidate;

/// Payload delivered to every notifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraceEmergenceEvent {
    /// ΔC of the committed grace rewrite.
    pub delta_c: f64,
    /// Number of spiders the rewrite added.
    pub nodes_added: u64,
    /// Golden-ratio scale the grace formula was evaluated with.
    pub phi: f64,
}

/// Sink for grace-emergence notifications.
pub trait EmergenceNotifier: Send + Sync {
    fn on_grace_emergence(&self, event: &GraceEmergenceEvent);
}

/// Discards every event.
pub struct NoopNotifier;

impl EmergenceNotifier for NoopNotifier {
    fn on_grace_emergence(&self, _event: &GraceEmergenceEvent) {}
}

/// Writes each event to the `log` facade at `info`.
pub struct LogNotifier;

impl EmergenceNotifier for LogNotifier {
    fn on_grace_emergence(&self, event: &GraceEmergenceEvent) {
        log::info!(
            "ΔC(grace) = {:.6}, nodes = {}, φ-scale = {}",
            event.delta_c,
            event.nodes_added,
            event.phi
        );
    }
}

/// Notifier that calls a closure. Used to bridge into channels, metrics
/// or host-language callbacks.
type NotifyFn = Box<dyn Fn(&GraceEmergenceEvent) + Send + Sync>;

pub struct ExternalNotifier {
    notify_fn: NotifyFn,
}

impl ExternalNotifier {
    pub fn new(notify_fn: impl Fn(&GraceEmergenceEvent) + Send + Sync + 'static) -> Self {
        Self {
            notify_fn: Box::new(notify_fn),
        }
    }
}

impl EmergenceNotifier for ExternalNotifier {
    fn on_grace_emergence(&self, event: &GraceEmergenceEvent) {
        (self.notify_fn)(event)
    }
}

/// In-memory registry of grace events, kept for later metamirror
/// analysis. Bounded: the oldest events are evicted past `capacity`.
pub struct GraceRegistry {
    capacity: usize,
    events: Mutex<Vec<GraceEmergenceEvent>>,
}

impl GraceRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<GraceEmergenceEvent> {
        self.events.lock().clone()
    }

    /// Total spiders added by all retained events.
    pub fn total_nodes_added(&self) -> u64 {
        self.events.lock().iter().map(|e| e.nodes_added).sum()
    }
}

impl Default for GraceRegistry {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EmergenceNotifier for GraceRegistry {
    fn on_grace_emergence(&self, event: &GraceEmergenceEvent) {
        let mut events = self.events.lock();
        events.push(*event);
        if events.len() > self.capacity {
            let excess = events.len() - self.capacity;
            events.drain(..excess);
        }
    }
}

/// Injectable hook the evolution driver calls after committing a rewrite.
#[derive(Clone)]
pub struct EmergenceHook {
    notifier: Arc<dyn EmergenceNotifier>,
}

impl EmergenceHook {
    pub fn new(notifier: Arc<dyn EmergenceNotifier>) -> Self {
        Self { notifier }
    }

    /// Hook that only logs.
    pub fn logging() -> Self {
        Self::new(Arc::new(LogNotifier))
    }

    /// Notify the sink of a committed grace rewrite.
    ///
    /// Never fails: a panicking sink is caught and logged.
    pub fn on_grace_emergence(&self, delta_c: f64, nodes_added: u64) {
        let event = GraceEmergenceEvent {
            delta_c,
            nodes_added,
            phi: PHI,
        };
        let notifier = &self.notifier;
        if std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            notifier.on_grace_emergence(&event)
        }))
        .is_err()
        {
            log::error!("Emergence notifier panicked; event ΔC={delta_c:.6} dropped");
        }
    }

    /// Notify for a committed candidate if, and only if, it is a grace
    /// rewrite. Returns whether the sink was invoked.
    pub fn on_commit(&self, committed: &ScoredCandidate, nodes_added: u64) -> bool {
        if !committed.candidate.rewrite.is_grace() {
            return false;
        }
        self.on_grace_emergence(committed.delta_c, nodes_added);
        true
    }
}

impl Default for EmergenceHook {
    fn default() -> Self {
        Self::new(Arc::new(NoopNotifier))
    }
}
