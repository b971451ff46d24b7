//! Circuit breaker guarding the primary provider.
//!
//! # States
//! - Closed: normal operation, every call is permitted and recorded
//! - Open: provider assumed down, calls are refused without being recorded
//! - Half-Open: a fixed number of trial calls decide whether to close again
//!
//! # State Transitions
//! ```text
//! Closed → Open: window holds >= minimum_calls and failure rate >= threshold
//! Open → Half-Open: open_duration elapsed (checked lazily on permit_call)
//! Half-Open → Closed: every trial call succeeded (window cleared)
//! Half-Open → Open: any trial call failed (window cleared)
//! ```
//!
//! # Design Decisions
//! - One breaker per logical operation, shared via Arc by every request
//! - All bookkeeping sits behind a single mutex so a transition is always
//!   computed from a consistent window and trial slots are never double-issued
//! - The lock is never held across an await; callers hold a `CallPermit`
//!   while doing the I/O and settle it with `record_outcome`
//! - Every transition starts a new epoch. A permit only counts against the
//!   epoch that issued it, so late outcomes from an earlier state are ignored
//! - A permit dropped unsettled (request cancelled) hands its trial slot back

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

use crate::config::ResilienceConfig;
use crate::observability::metrics;

/// Breaker health state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    /// Numeric encoding used by the state gauge.
    pub fn as_gauge(&self) -> f64 {
        match self {
            CircuitState::Closed => 0.0,
            CircuitState::Open => 1.0,
            CircuitState::HalfOpen => 2.0,
        }
    }
}

/// Thresholds for a single breaker.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitBreakerSettings {
    pub window_size: usize,
    pub minimum_calls: usize,
    /// Percent, in (0, 100].
    pub failure_rate_threshold: f64,
    pub open_duration: Duration,
    pub half_open_trial_calls: u32,
}

impl Default for CircuitBreakerSettings {
    fn default() -> Self {
        Self::from(&ResilienceConfig::default())
    }
}

impl From<&ResilienceConfig> for CircuitBreakerSettings {
    fn from(config: &ResilienceConfig) -> Self {
        Self {
            window_size: config.window_size.max(1),
            minimum_calls: config.minimum_calls.max(1),
            failure_rate_threshold: config.failure_rate_threshold,
            open_duration: config.open_duration(),
            half_open_trial_calls: config.half_open_trial_calls.max(1),
        }
    }
}

/// Point-in-time view of a breaker, for admin and logging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitBreakerSnapshot {
    pub name: String,
    pub state: CircuitState,
    pub buffered_calls: usize,
    pub failed_calls: usize,
    /// Percent; `None` until the window holds `minimum_calls` outcomes.
    pub failure_rate: Option<f64>,
    pub trial_calls_remaining: Option<u32>,
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    /// true = failure.
    window: VecDeque<bool>,
    failures: usize,
    opened_at: Option<Instant>,
    epoch: u64,
    trials_issued: u32,
    trial_successes: u32,
}

impl Inner {
    fn new(window_size: usize) -> Self {
        Self {
            state: CircuitState::Closed,
            window: VecDeque::with_capacity(window_size),
            failures: 0,
            opened_at: None,
            epoch: 0,
            trials_issued: 0,
            trial_successes: 0,
        }
    }

    fn clear_window(&mut self) {
        self.window.clear();
        self.failures = 0;
    }

    fn push(&mut self, failed: bool, window_size: usize) {
        if self.window.len() == window_size {
            if let Some(true) = self.window.pop_front() {
                self.failures -= 1;
            }
        }
        self.window.push_back(failed);
        if failed {
            self.failures += 1;
        }
    }

    fn failure_rate(&self, minimum_calls: usize) -> Option<f64> {
        if self.window.len() < minimum_calls {
            return None;
        }
        Some(self.failures as f64 * 100.0 / self.window.len() as f64)
    }
}

/// Rolling-window circuit breaker for one logical operation.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    settings: CircuitBreakerSettings,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, settings: CircuitBreakerSettings) -> Self {
        let name = name.into();
        metrics::record_circuit_state(&name, CircuitState::Closed);
        Self {
            inner: Mutex::new(Inner::new(settings.window_size)),
            name,
            settings,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &CircuitBreakerSettings {
        &self.settings
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // State is always left consistent before any panic point, so a
        // poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current state, applying a pending Open → Half-Open transition.
    pub fn state(&self) -> CircuitState {
        let mut inner = self.lock();
        self.expire_open(&mut inner);
        inner.state
    }

    /// Ask to call the guarded operation.
    ///
    /// `None` means the call is refused. A granted permit is settled with
    /// [`CallPermit::record_outcome`].
    pub fn permit_call(&self) -> Option<CallPermit<'_>> {
        let mut inner = self.lock();
        self.expire_open(&mut inner);

        let permitted = match inner.state {
            CircuitState::Closed => true,
            CircuitState::Open => false,
            CircuitState::HalfOpen => {
                if inner.trials_issued < self.settings.half_open_trial_calls {
                    inner.trials_issued += 1;
                    true
                } else {
                    false
                }
            }
        };

        permitted.then(|| CallPermit {
            breaker: self,
            epoch: inner.epoch,
            settled: false,
        })
    }

    fn record(&self, epoch: u64, success: bool) {
        let mut inner = self.lock();

        if inner.epoch != epoch {
            // Admitted under an earlier state; the window it belonged to is gone.
            tracing::debug!(operation = %self.name, success, state = ?inner.state, "Ignoring stale outcome");
            return;
        }

        match inner.state {
            CircuitState::Closed => {
                inner.push(!success, self.settings.window_size);
                if let Some(rate) = inner.failure_rate(self.settings.minimum_calls) {
                    if rate >= self.settings.failure_rate_threshold {
                        tracing::warn!(
                            operation = %self.name,
                            failure_rate = rate,
                            buffered_calls = inner.window.len(),
                            "Circuit breaker opened"
                        );
                        self.transition(&mut inner, CircuitState::Open);
                    }
                }
            }
            CircuitState::HalfOpen => {
                if !success {
                    tracing::warn!(operation = %self.name, "Trial call failed, circuit breaker re-opened");
                    self.transition(&mut inner, CircuitState::Open);
                } else {
                    inner.trial_successes += 1;
                    if inner.trial_successes >= self.settings.half_open_trial_calls {
                        tracing::info!(operation = %self.name, "Trial calls succeeded, circuit breaker closed");
                        self.transition(&mut inner, CircuitState::Closed);
                    }
                }
            }
            // Open never issues permits, so no current-epoch outcome lands here.
            CircuitState::Open => {}
        }
    }

    fn release(&self, epoch: u64) {
        let mut inner = self.lock();
        if inner.epoch == epoch && inner.state == CircuitState::HalfOpen {
            inner.trials_issued = inner.trials_issued.saturating_sub(1);
            tracing::debug!(operation = %self.name, "Trial call abandoned, slot released");
        }
    }

    /// Force the breaker back to Closed with an empty window.
    pub fn reset(&self) {
        let mut inner = self.lock();
        tracing::info!(operation = %self.name, from = ?inner.state, "Circuit breaker reset");
        self.transition(&mut inner, CircuitState::Closed);
    }

    pub fn snapshot(&self) -> CircuitBreakerSnapshot {
        let mut inner = self.lock();
        self.expire_open(&mut inner);
        CircuitBreakerSnapshot {
            name: self.name.clone(),
            state: inner.state,
            buffered_calls: inner.window.len(),
            failed_calls: inner.failures,
            failure_rate: inner.failure_rate(self.settings.minimum_calls),
            trial_calls_remaining: (inner.state == CircuitState::HalfOpen)
                .then(|| self.settings.half_open_trial_calls - inner.trials_issued),
        }
    }

    fn expire_open(&self, inner: &mut Inner) {
        if inner.state != CircuitState::Open {
            return;
        }
        let expired = inner
            .opened_at
            .map(|at| at.elapsed() >= self.settings.open_duration)
            .unwrap_or(true);
        if expired {
            tracing::info!(operation = %self.name, "Open duration elapsed, circuit breaker half-open");
            self.transition(inner, CircuitState::HalfOpen);
        }
    }

    fn transition(&self, inner: &mut Inner, to: CircuitState) {
        inner.state = to;
        inner.epoch += 1;
        inner.trials_issued = 0;
        inner.trial_successes = 0;
        match to {
            CircuitState::Open => {
                inner.opened_at = Some(Instant::now());
                inner.clear_window();
            }
            CircuitState::Closed => {
                inner.opened_at = None;
                inner.clear_window();
            }
            CircuitState::HalfOpen => {}
        }
        metrics::record_circuit_state(&self.name, to);
    }
}

/// Admission to one call of the guarded operation.
///
/// Dropping it without recording an outcome leaves the window untouched and
/// returns a half-open trial slot.
#[derive(Debug)]
#[must_use = "a permit must be settled with record_outcome"]
pub struct CallPermit<'a> {
    breaker: &'a CircuitBreaker,
    epoch: u64,
    settled: bool,
}

impl CallPermit<'_> {
    /// Settle the call. Success includes an authoritative "not found".
    pub fn record_outcome(mut self, success: bool) {
        self.settled = true;
        self.breaker.record(self.epoch, success);
    }
}

impl Drop for CallPermit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.release(self.epoch);
        }
    }
}
