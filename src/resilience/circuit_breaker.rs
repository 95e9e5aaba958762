//! Per-provider circuit breakers.
//!
//! # States
//! - Closed: calls go to the backend proxy
//! - Open: provider assumed down, callers get fallback data without a call
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure_count >= failure_threshold
//! Open → Closed: a call succeeds
//! Open → Closed: cooldown elapsed since last failure (Optimistic policy)
//! Open → one trial call → Closed on success, Open on failure (SingleProbe policy)
//! ```
//!
//! Cooldown is checked lazily when the breaker is queried; there is no timer.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::data::Provider;

/// Default consecutive failures before a breaker opens
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// Default time an open breaker waits before letting traffic through again
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(5 * 60);

/// What happens when an open breaker's cooldown elapses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Close fully and resume all traffic
    #[default]
    Optimistic,
    /// Admit a single trial call; its outcome decides whether to close
    SingleProbe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerSettings {
    pub failure_threshold: u32,
    pub cooldown: Duration,
    pub reset_policy: ResetPolicy,
}

impl Default for BreakerSettings {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            cooldown: DEFAULT_COOLDOWN,
            reset_policy: ResetPolicy::Optimistic,
        }
    }
}

/// Failure bookkeeping for one provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BreakerState {
    pub failure_count: u32,
    pub last_failure: Option<Instant>,
    pub is_open: bool,
    /// When the current trial call was admitted (SingleProbe only)
    pub probe_started: Option<Instant>,
}

impl BreakerState {
    fn close(&mut self) {
        self.failure_count = 0;
        self.is_open = false;
        self.probe_started = None;
    }

    fn cooldown_elapsed(&self, now: Instant, cooldown: Duration) -> bool {
        self.last_failure
            .map_or(true, |at| now.saturating_duration_since(at) >= cooldown)
    }
}

/// Registry holding one breaker per provider
///
/// All state lives behind one mutex, so concurrent failures for the same
/// provider are counted exactly.
#[derive(Debug, Default)]
pub struct BreakerRegistry {
    states: Mutex<HashMap<Provider, BreakerState>>,
    settings: BreakerSettings,
}

impl BreakerRegistry {
    pub fn new(settings: BreakerSettings) -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            settings,
        }
    }

    pub fn settings(&self) -> BreakerSettings {
        self.settings
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Provider, BreakerState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether calls to `provider` should be skipped
    ///
    /// Closes (or admits a trial call through) an open breaker whose cooldown
    /// has elapsed since the last failure.
    pub fn is_open(&self, provider: Provider) -> bool {
        self.is_open_at(provider, Instant::now())
    }

    /// Same as [`BreakerRegistry::is_open`], evaluated at the given instant
    pub fn is_open_at(&self, provider: Provider, now: Instant) -> bool {
        let mut states = self.lock();
        let state = states.entry(provider).or_default();

        if !state.is_open {
            return false;
        }

        let cooldown = self.settings.cooldown;
        if !state.cooldown_elapsed(now, cooldown) {
            return true;
        }

        match self.settings.reset_policy {
            ResetPolicy::Optimistic => {
                state.close();
                tracing::info!(provider = %provider, "Circuit closed after cooldown");
                false
            }
            ResetPolicy::SingleProbe => {
                let probe_pending = state
                    .probe_started
                    .is_some_and(|at| now.saturating_duration_since(at) < cooldown);
                if probe_pending {
                    return true;
                }
                state.probe_started = Some(now);
                tracing::info!(provider = %provider, "Circuit admitting trial call");
                false
            }
        }
    }

    /// Counts a failed call; opens the breaker at the failure threshold
    pub fn record_failure(&self, provider: Provider) {
        self.record_failure_at(provider, Instant::now());
    }

    /// Same as [`BreakerRegistry::record_failure`], stamped with the given instant
    pub fn record_failure_at(&self, provider: Provider, now: Instant) {
        let mut states = self.lock();
        let state = states.entry(provider).or_default();

        state.failure_count = state.failure_count.saturating_add(1);
        state.last_failure = Some(now);

        if state.probe_started.take().is_some() {
            state.is_open = true;
            tracing::warn!(provider = %provider, "Trial call failed, circuit re-opened");
            return;
        }

        if !state.is_open && state.failure_count >= self.settings.failure_threshold {
            state.is_open = true;
            tracing::warn!(
                provider = %provider,
                failures = state.failure_count,
                cooldown_secs = self.settings.cooldown.as_secs(),
                "Circuit opened"
            );
        }
    }

    /// Resets the breaker after a successful call
    pub fn record_success(&self, provider: Provider) {
        let mut states = self.lock();
        let state = states.entry(provider).or_default();
        if state.is_open {
            tracing::info!(provider = %provider, "Circuit closed after successful call");
        }
        state.close();
    }

    /// Copy of the provider's current state, for diagnostics
    pub fn snapshot(&self, provider: Provider) -> BreakerState {
        self.lock().get(&provider).copied().unwrap_or_default()
    }
}
