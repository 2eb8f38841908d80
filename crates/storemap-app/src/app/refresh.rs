//! Store refresh cycles: the in-flight guard, response ordering and the
//! debounced search trigger.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::debounce::{DebounceMode, Debouncer};
use crate::error::AppError;
use crate::markers::reconcile;
use crate::view::{Alert, View};

use super::{LocatorApp, RefreshOutcome};

#[derive(Debug, Default)]
struct GateState {
    in_flight: bool,
    latest: u64,
}

/// Tracks which refresh cycle is current and whether one is in flight.
#[derive(Debug, Default)]
pub(super) struct RefreshGate {
    state: Mutex<GateState>,
}

/// One stamped refresh cycle. On drop it releases the gate, but only if no
/// newer cycle was dispatched in the meantime; the newest cycle owns the
/// release.
pub(super) struct Cycle<'a> {
    gate: &'a RefreshGate,
    seq: u64,
}

impl Cycle<'_> {
    pub(super) fn seq(&self) -> u64 {
        self.seq
    }
}

impl Drop for Cycle<'_> {
    fn drop(&mut self) {
        let mut state = self.gate.lock();
        if state.latest == self.seq {
            state.in_flight = false;
        }
    }
}

impl RefreshGate {
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a cycle unless one is already in flight.
    pub(super) fn try_enter(&self) -> Option<Cycle<'_>> {
        let mut state = self.lock();
        if state.in_flight {
            return None;
        }
        state.in_flight = true;
        state.latest += 1;
        Some(Cycle {
            gate: self,
            seq: state.latest,
        })
    }

    /// Starts a cycle regardless of the guard. Every earlier cycle becomes
    /// stale and the gate stays closed until this one ends.
    pub(super) fn supersede(&self) -> Cycle<'_> {
        let mut state = self.lock();
        state.in_flight = true;
        state.latest += 1;
        Cycle {
            gate: self,
            seq: state.latest,
        }
    }

    pub(super) fn is_latest(&self, seq: u64) -> bool {
        self.lock().latest == seq
    }
}

impl<V: View> LocatorApp<V> {
    /// Fetches stores for the current search input and reconciles the view.
    ///
    /// Only one such cycle runs at a time: a call made while another is in
    /// flight returns [`RefreshOutcome::Suppressed`] without a request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Client`] when the fetch fails. A warning is raised
    /// and the markers, table and heat layer are left as they were.
    pub async fn refresh_stores(&self) -> Result<RefreshOutcome, AppError> {
        let Some(cycle) = self.gate.try_enter() else {
            tracing::debug!("store refresh already in flight; trigger dropped");
            return Ok(RefreshOutcome::Suppressed);
        };
        self.run_refresh(&cycle).await
    }

    /// Refresh that follows a server-side change. It supersedes any cycle
    /// already running, so the change shows up even if an older response
    /// lands later. Guarded triggers made while it runs are suppressed.
    ///
    /// # Errors
    ///
    /// Same as [`LocatorApp::refresh_stores`].
    pub async fn refresh_after_mutation(&self) -> Result<RefreshOutcome, AppError> {
        let cycle = self.gate.supersede();
        self.run_refresh(&cycle).await
    }

    async fn run_refresh(&self, cycle: &Cycle<'_>) -> Result<RefreshOutcome, AppError> {
        let seq = cycle.seq();
        let query = {
            let mut state = self.lock().await;
            state.view.set_busy(true);
            state.input.clone()
        };
        tracing::debug!(seq, text = %query.text, district = %query.district, "fetching stores");

        let result = self.client.list_stores(&query).await;

        let mut guard = self.lock().await;
        let state = &mut *guard;
        if !self.gate.is_latest(seq) {
            tracing::debug!(seq, "discarding stale store response");
            return Ok(RefreshOutcome::Stale);
        }
        state.view.set_busy(false);

        match result {
            Ok(fetched) => {
                let ctx = state.modes.render_context(state.session.is_admin());
                let (report, stores) = reconcile(&mut state.markers, fetched, ctx, &mut state.view);
                state.stores = stores;
                Ok(RefreshOutcome::Applied(report))
            }
            Err(err) => {
                tracing::warn!(error = %err, "store refresh failed");
                state.alert(Alert::warning("Could not load stores. Please try again."));
                Err(AppError::Client(err))
            }
        }
    }
}

impl<V: View + 'static> LocatorApp<V> {
    /// Debounced [`LocatorApp::refresh_stores`] for the search box and the
    /// district filter. Each keystroke calls [`Debouncer::trigger`]; the
    /// refresh reads whatever input is current when it fires.
    pub fn search_trigger(self: &Arc<Self>, quiet: Duration) -> Debouncer {
        let app = Arc::clone(self);
        Debouncer::new(quiet, DebounceMode::Trailing, move || {
            let app = Arc::clone(&app);
            async move {
                if let Err(err) = app.refresh_stores().await {
                    tracing::debug!(error = %err, "debounced refresh failed");
                }
            }
        })
    }
}
