//! The locator state machine: one owner for every piece of mutable state,
//! driven by user events and rendering into a [`View`].

mod admin;
mod auth;
mod refresh;
mod toggles;

use storemap_client::{StoreMapClient, StoreQuery};
use storemap_core::{District, DistrictStats, LatLng, Store};
use tokio::sync::{Mutex, MutexGuard};

use crate::districts::{option_names, overlay_shapes, DistrictCache};
use crate::error::AppError;
use crate::markers::{MarkerEntry, MarkerSet, ReconcileReport};
use crate::modes::ModeFlags;
use crate::session::AdminSession;
use crate::view::{Alert, View};

use self::refresh::RefreshGate;

/// Result of a store refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied(ReconcileReport),
    /// Another cycle was already in flight; nothing was sent.
    Suppressed,
    /// A newer cycle was dispatched while this one waited; its response was
    /// dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapClickOutcome {
    /// Map-add mode is off.
    Ignored,
    /// The creation form opened at the click, with the inferred district.
    FormOpened { district: Option<String> },
}

struct AppState<V> {
    view: V,
    markers: MarkerSet,
    modes: ModeFlags,
    session: AdminSession,
    input: StoreQuery,
    /// Last applied (deduplicated) store list.
    stores: Vec<Store>,
    stats: Option<DistrictStats>,
    pending: Option<LatLng>,
}

impl<V: View> AppState<V> {
    fn alert(&mut self, alert: Alert) {
        self.view.alert(alert);
    }

    /// Raises the alert matching `err` and hands it back for `?`.
    fn fail(&mut self, err: AppError) -> AppError {
        let message = err.user_message();
        let alert = match &err {
            AppError::Client(_) => Alert::danger(message),
            _ => Alert::warning(message),
        };
        self.alert(alert);
        self.view.set_busy(false);
        err
    }

    fn require_admin(&mut self) -> Result<(), AppError> {
        if self.session.is_admin() {
            Ok(())
        } else {
            Err(self.fail(AppError::PermissionDenied))
        }
    }

    fn clear_pending(&mut self) {
        self.pending = None;
        self.view.set_pending_marker(None);
    }
}

/// Store-locator client session.
///
/// All mutable state sits behind one async mutex that is never held across a
/// network call. The HTTP client and the district cache are shared.
pub struct LocatorApp<V: View> {
    client: StoreMapClient,
    districts: DistrictCache,
    gate: RefreshGate,
    state: Mutex<AppState<V>>,
}

impl<V: View> std::fmt::Debug for LocatorApp<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocatorApp")
            .field("client", &self.client)
            .field("districts", &self.districts)
            .finish_non_exhaustive()
    }
}

impl<V: View> LocatorApp<V> {
    pub fn new(client: StoreMapClient, view: V) -> Self {
        Self {
            client,
            districts: DistrictCache::new(),
            gate: RefreshGate::default(),
            state: Mutex::new(AppState {
                view,
                markers: MarkerSet::new(),
                modes: ModeFlags::default(),
                session: AdminSession::default(),
                input: StoreQuery::default(),
                stores: Vec::new(),
                stats: None,
                pending: None,
            }),
        }
    }

    async fn lock(&self) -> MutexGuard<'_, AppState<V>> {
        self.state.lock().await
    }

    /// Loads districts and stores concurrently.
    ///
    /// A district failure only degrades the overlay; the returned result is
    /// the store refresh.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Client`] if the store list could not be fetched.
    pub async fn init(&self) -> Result<RefreshOutcome, AppError> {
        let (districts, stores) = tokio::join!(self.load_districts(), self.refresh_stores());
        tracing::info!(districts = districts.len(), "locator initialised");
        stores
    }

    /// Fetches the district list on first use and renders the overlay and the
    /// filter options. Later calls return the cached list without a request.
    ///
    /// On failure the overlay and options are emptied, a warning is raised
    /// and an empty slice comes back.
    pub async fn load_districts(&self) -> &[District] {
        match self.districts.get_or_load(&self.client).await {
            Ok((districts, fresh)) => {
                if fresh {
                    let mut state = self.lock().await;
                    let visible = state.modes.districts_on;
                    state.view.render_districts(overlay_shapes(districts));
                    state.view.set_district_overlay_visible(visible);
                    state.view.set_district_options(option_names(districts));
                    tracing::debug!(count = districts.len(), "districts loaded");
                }
                districts
            }
            Err(err) => {
                tracing::warn!(error = %err, "district load failed");
                let mut state = self.lock().await;
                state.view.render_districts(Vec::new());
                state.view.set_district_options(Vec::new());
                state.alert(Alert::warning("Could not load districts."));
                &[]
            }
        }
    }

    /// Remembers the search box and district filter for the next refresh.
    pub async fn set_search_input(&self, text: impl Into<String>, district: impl Into<String>) {
        self.lock().await.input = StoreQuery::new(text, district);
    }

    pub async fn with_view<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&self.lock().await.view)
    }

    pub async fn with_view_mut<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut self.lock().await.view)
    }

    /// The last applied store list, deduplicated, in received order.
    pub async fn stores(&self) -> Vec<Store> {
        self.lock().await.stores.clone()
    }

    pub async fn marker_entry(&self, name: &str) -> Option<MarkerEntry> {
        self.lock().await.markers.get(name).cloned()
    }

    pub async fn marker_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().await.markers.names().map(str::to_string).collect();
        names.sort();
        names
    }

    pub async fn modes(&self) -> ModeFlags {
        self.lock().await.modes
    }

    pub async fn is_admin(&self) -> bool {
        self.lock().await.session.is_admin()
    }

    pub async fn pending_marker(&self) -> Option<LatLng> {
        self.lock().await.pending
    }

    #[must_use]
    pub fn districts(&self) -> &DistrictCache {
        &self.districts
    }

    #[must_use]
    pub fn client(&self) -> &StoreMapClient {
        &self.client
    }
}
