//! Skips aggregation runs whose input was already handled.

use std::collections::HashMap;
use tracing::debug;

use textlens_core::types::Fingerprint;

/// Outcome of asking to process a fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// New input, now claimed by the caller.
    Start,
    /// Same as the last completed input.
    Completed,
    /// A run for this input is already going; carries its generation.
    InFlight(u64),
}

#[derive(Debug, Default)]
pub struct Gatekeeper {
    completed: Option<Fingerprint>,
    in_flight: HashMap<Fingerprint, u64>,
}

impl Gatekeeper {
    pub fn new() -> Self { Self::default() }

    /// False when `fp` is the last completed input or is being processed now.
    pub fn should_run(&self, fp: Fingerprint) -> bool {
        self.completed != Some(fp) && !self.in_flight.contains_key(&fp)
    }

    /// Claim `fp` for run `generation`, unless it is already handled.
    pub fn admit(&mut self, fp: Fingerprint, generation: u64) -> Admission {
        if let Some(&running) = self.in_flight.get(&fp) {
            debug!("{} already in flight as run {}", fp, running);
            return Admission::InFlight(running);
        }
        if self.completed == Some(fp) {
            debug!("{} already completed", fp);
            return Admission::Completed;
        }
        self.in_flight.insert(fp, generation);
        Admission::Start
    }

    pub fn complete(&mut self, fp: Fingerprint) {
        self.in_flight.remove(&fp);
        self.completed = Some(fp);
    }

    /// Forget `fp` entirely so the next trigger with it runs again.
    pub fn release(&mut self, fp: Fingerprint) {
        self.in_flight.remove(&fp);
        if self.completed == Some(fp) {
            self.completed = None;
        }
    }

    pub fn is_in_flight(&self, fp: Fingerprint) -> bool { self.in_flight.contains_key(&fp) }

    pub fn reset(&mut self) {
        self.completed = None;
        self.in_flight.clear();
    }
}
