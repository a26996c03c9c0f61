//! Debounced, deduplicated word-cloud runs.
//!
//! `trigger` waits for the input to settle before spawning a run. Only the
//! pending wait is cancellable; a run that has started always finishes, and
//! the gatekeeper keeps the same input from being processed twice. State and
//! results are published on `watch` channels.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use textlens_core::config::CloudSettings;
use textlens_core::traits::BatchTokenizer;
use textlens_core::types::{Document, Notice, ProcessingState};

use crate::aggregate::{AggregateOutcome, FrequencyAggregator};
use crate::fingerprint::fingerprint;
use crate::gatekeeper::{Admission, Gatekeeper};

pub struct CloudScheduler {
    inner: Arc<Inner>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

struct Inner {
    aggregator: FrequencyAggregator,
    tokenizer: Arc<dyn BatchTokenizer>,
    gatekeeper: Mutex<Gatekeeper>,
    next_generation: AtomicU64,
    /// Generation allowed to publish state and results.
    current: AtomicU64,
    debounce: Duration,
    state_tx: watch::Sender<ProcessingState>,
    results_tx: watch::Sender<Option<AggregateOutcome>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> { mutex.lock().unwrap_or_else(PoisonError::into_inner) }

impl CloudScheduler {
    pub fn new(tokenizer: Arc<dyn BatchTokenizer>, settings: CloudSettings) -> Self {
        let debounce = Duration::from_millis(settings.debounce_ms);
        let (state_tx, _) = watch::channel(ProcessingState::default());
        let (results_tx, _) = watch::channel(None);
        let inner = Inner {
            aggregator: FrequencyAggregator::new(settings),
            tokenizer,
            gatekeeper: Mutex::new(Gatekeeper::new()),
            next_generation: AtomicU64::new(0),
            current: AtomicU64::new(0),
            debounce,
            state_tx,
            results_tx,
        };
        Self { inner: Arc::new(inner), pending: Mutex::new(None) }
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ProcessingState> { self.inner.state_tx.subscribe() }

    pub fn subscribe_results(&self) -> watch::Receiver<Option<AggregateOutcome>> { self.inner.results_tx.subscribe() }

    pub fn state(&self) -> ProcessingState { self.inner.state_tx.borrow().clone() }

    pub fn latest(&self) -> Option<AggregateOutcome> { self.inner.results_tx.borrow().clone() }

    /// Schedule a run over `documents` once the debounce delay has passed.
    /// A trigger that is still waiting is replaced. Must be called from
    /// within a Tokio runtime.
    pub fn trigger(&self, documents: Vec<Document>) {
        let inner = Arc::clone(&self.inner);
        let delayed = tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            tokio::spawn(inner.execute(documents));
        });
        if let Some(previous) = lock(&self.pending).replace(delayed) {
            previous.abort();
        }
    }

    /// Run immediately, bypassing the debounce. `None` when the gatekeeper
    /// skipped the input.
    pub async fn run_now(&self, documents: Vec<Document>) -> Option<AggregateOutcome> {
        self.cancel_pending();
        Arc::clone(&self.inner).execute(documents).await
    }

    pub fn cancel_pending(&self) {
        if let Some(previous) = lock(&self.pending).take() {
            previous.abort();
        }
    }

    /// Forget processed inputs so the next trigger recomputes.
    pub fn reset(&self) { lock(&self.inner.gatekeeper).reset(); }
}

impl Drop for CloudScheduler {
    fn drop(&mut self) { self.cancel_pending(); }
}

impl Inner {
    fn is_current(&self, generation: u64) -> bool { self.current.load(Ordering::SeqCst) == generation }

    async fn execute(self: Arc<Self>, documents: Vec<Document>) -> Option<AggregateOutcome> {
        let fp = fingerprint(&documents);
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut gate = lock(&self.gatekeeper);
            match gate.admit(fp, generation) {
                Admission::Start => {
                    self.current.store(generation, Ordering::SeqCst);
                    self.state_tx.send_replace(ProcessingState::started(fp));
                }
                Admission::InFlight(running) => {
                    // The latest input is already being processed; that run publishes.
                    self.current.store(running, Ordering::SeqCst);
                    self.state_tx.send_replace(ProcessingState::started(fp));
                    return None;
                }
                Admission::Completed => {
                    // The published outcome already belongs to this input.
                    self.current.store(generation, Ordering::SeqCst);
                    self.state_tx.send_replace(ProcessingState::default());
                    return None;
                }
            }
        }
        debug!("Run {} started for {} ({} documents)", generation, fp, documents.len());

        let worker = Arc::clone(&self);
        let run = tokio::spawn(async move {
            let report = |progress: u8| {
                if worker.is_current(generation) {
                    worker.state_tx.send_modify(|state| state.progress = progress);
                }
            };
            worker.aggregator.aggregate(&documents, worker.tokenizer.as_ref(), report).await
        });
        let result = run.await;

        let mut gate = lock(&self.gatekeeper);
        let current = self.is_current(generation);
        let outcome = match result {
            Ok(outcome) => {
                if current { gate.complete(fp) } else { gate.release(fp) }
                outcome
            }
            Err(e) => {
                warn!("Word cloud run for {} failed: {}", fp, e);
                gate.release(fp);
                AggregateOutcome::empty(Notice::warning("Word cloud processing failed unexpectedly"))
            }
        };
        if current {
            self.state_tx.send_replace(ProcessingState::default());
            self.results_tx.send_replace(Some(outcome.clone()));
        } else {
            debug!("Run {} superseded, result dropped", generation);
        }
        drop(gate);
        Some(outcome)
    }
}
