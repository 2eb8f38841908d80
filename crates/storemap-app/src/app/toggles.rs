//! Mode toggles and direct map interaction.

use storemap_core::{LatLng, StoreDraft};

use crate::error::AppError;
use crate::markers::{build_popup, heat_points};
use crate::view::{Alert, FormMode, StoreForm, View};

use super::{LocatorApp, MapClickOutcome};

impl<V: View> LocatorApp<V> {
    /// Flips the heat layer. Turning it on repopulates from the last applied
    /// store list without a request.
    pub async fn toggle_heatmap(&self) -> bool {
        let mut guard = self.lock().await;
        let state = &mut *guard;
        state.modes.heatmap_on = !state.modes.heatmap_on;
        let on = state.modes.heatmap_on;
        state.view.set_heat_points(heat_points(&state.stores, on));
        on
    }

    pub async fn toggle_districts(&self) -> bool {
        let mut state = self.lock().await;
        state.modes.districts_on = !state.modes.districts_on;
        let on = state.modes.districts_on;
        state.view.set_district_overlay_visible(on);
        on
    }

    /// Admin only. Flips marker draggability, then refreshes so popups pick
    /// up or drop the save-position action. A refresh already in flight
    /// renders with the new mode when it lands, so no second request is sent.
    ///
    /// # Errors
    ///
    /// [`AppError::PermissionDenied`] without an admin session.
    pub async fn toggle_edit_mode(&self) -> Result<bool, AppError> {
        let on = {
            let mut guard = self.lock().await;
            let state = &mut *guard;
            state.require_admin()?;
            state.modes.edit_mode = !state.modes.edit_mode;
            let on = state.modes.edit_mode;
            for handle in state.markers.handles() {
                state.view.set_draggable(handle, on);
            }
            on
        };
        tracing::info!(edit_mode = on, "edit mode toggled");
        if let Err(err) = self.refresh_stores().await {
            tracing::warn!(error = %err, "refresh after edit toggle failed");
        }
        Ok(on)
    }

    /// Admin only. Arms or disarms placing stores by clicking the map.
    /// Disarming removes the pending marker.
    ///
    /// # Errors
    ///
    /// [`AppError::PermissionDenied`] without an admin session.
    pub async fn toggle_map_add_mode(&self) -> Result<bool, AppError> {
        let mut state = self.lock().await;
        state.require_admin()?;
        state.modes.map_add_mode = !state.modes.map_add_mode;
        let on = state.modes.map_add_mode;
        if on {
            state.alert(Alert::info("Click on the map to place the new store."));
        } else {
            state.clear_pending();
        }
        Ok(on)
    }

    /// A click on the map. In map-add mode it drops a pending marker, looks up
    /// the district under it and opens the creation form prefilled with both.
    pub async fn map_click(&self, at: LatLng) -> MapClickOutcome {
        let mut state = self.lock().await;
        if !state.modes.map_add_mode {
            return MapClickOutcome::Ignored;
        }

        state.pending = Some(at);
        state.view.set_pending_marker(Some(at));

        let district = self.districts.locate(at).map(str::to_string);
        match &district {
            Some(name) => state.alert(Alert::info(format!("District: {name}"))),
            None => state.alert(Alert::warning("No district found at this location.")),
        }
        state.view.open_store_form(StoreForm {
            mode: FormMode::Create,
            draft: StoreDraft::at_position(at, district.as_deref()),
        });
        tracing::debug!(%at, district = ?district, "map click opened store form");
        MapClickOutcome::FormOpened { district }
    }

    /// End of a marker drag. Only honoured in edit mode; the new position is
    /// kept locally until [`LocatorApp::save_position`].
    pub async fn on_marker_dragged(&self, name: &str, to: LatLng) -> bool {
        let mut guard = self.lock().await;
        let state = &mut *guard;
        if !state.modes.edit_mode {
            return false;
        }
        let ctx = state.modes.render_context(state.session.is_admin());
        let Some(entry) = state.markers.record_drag(name, to) else {
            return false;
        };
        state
            .view
            .set_popup(entry.handle, build_popup(&entry.store, to, ctx));
        true
    }
}
