//! Collapses bursts of triggers into a single run of an async action.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;

type Action = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// When the action runs relative to a burst of triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebounceMode {
    /// Run once, `quiet` after the last trigger.
    #[default]
    Trailing,
    /// Run on the first trigger of a burst. Later triggers extend the window;
    /// with `trailing` set, one more run happens when the window closes if any
    /// trigger was swallowed.
    Leading { trailing: bool },
}

#[derive(Default)]
struct State {
    pending: Option<JoinHandle<()>>,
    generation: u64,
    window_open: bool,
    suppressed: bool,
}

/// Debounced wrapper around a zero-argument async action.
///
/// Must be triggered from within a tokio runtime. The action itself runs on
/// its own task, so cancelling only ever drops a run that has not started.
pub struct Debouncer {
    quiet: Duration,
    mode: DebounceMode,
    action: Action,
    state: Arc<Mutex<State>>,
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("quiet", &self.quiet)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Debouncer {
    pub fn new<F, Fut>(quiet: Duration, mode: DebounceMode, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let action: Action = Arc::new(move || -> BoxFuture<'static, ()> { Box::pin(action()) });
        Self {
            quiet,
            mode,
            action,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    #[must_use]
    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    pub fn trigger(&self) {
        let mut state = lock(&self.state);
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
        state.generation += 1;

        let fire_on_close = match self.mode {
            DebounceMode::Trailing => true,
            DebounceMode::Leading { trailing } => {
                if state.window_open {
                    state.suppressed = true;
                } else {
                    state.window_open = true;
                    state.suppressed = false;
                    tokio::spawn((self.action)());
                }
                trailing
            }
        };

        let generation = state.generation;
        let quiet = self.quiet;
        let mode = self.mode;
        let action = Arc::clone(&self.action);
        let shared = Arc::clone(&self.state);
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            let run = {
                let mut state = lock(&shared);
                if state.generation != generation {
                    return;
                }
                state.pending = None;
                let run = match mode {
                    DebounceMode::Trailing => true,
                    DebounceMode::Leading { .. } => fire_on_close && state.suppressed,
                };
                state.window_open = false;
                state.suppressed = false;
                run
            };
            if run {
                tokio::spawn(action());
            }
        }));
    }

    /// Drops any scheduled run and closes the current window.
    pub fn cancel(&self) {
        let mut state = lock(&self.state);
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
        state.generation += 1;
        state.window_open = false;
        state.suppressed = false;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        lock(&self.state).pending.is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(pending) = lock(&self.state).pending.take() {
            pending.abort();
        }
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
