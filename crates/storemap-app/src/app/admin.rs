//! Admin store mutations and the cached district statistics.

use storemap_client::ClientError;
use storemap_core::{DistrictStats, StoreDraft, ValidationError};

use crate::error::AppError;
use crate::view::{Alert, FormMode, StoreForm, View};

use super::LocatorApp;

impl<V: View> LocatorApp<V> {
    /// Creates a store from the form input.
    ///
    /// # Errors
    ///
    /// - [`AppError::PermissionDenied`] without an admin session; nothing is sent.
    /// - [`AppError::Validation`] for bad input; nothing is sent.
    /// - [`AppError::Client`] when the server rejects or the request fails.
    pub async fn create_store(&self, draft: StoreDraft) -> Result<String, AppError> {
        let new_store = {
            let mut state = self.lock().await;
            state.require_admin()?;
            let new_store = draft.validate().map_err(|e| state.fail(e.into()))?;
            state.view.set_busy(true);
            new_store
        };
        let result = self.client.create_store(&new_store).await;
        self.finish_mutation(result).await
    }

    /// Opens the edit form for `name`, prefilled from the last applied list.
    ///
    /// # Errors
    ///
    /// - [`AppError::PermissionDenied`] without an admin session.
    /// - [`AppError::UnknownStore`] when no store by that name is shown.
    pub async fn edit_store(&self, name: &str) -> Result<(), AppError> {
        let mut state = self.lock().await;
        state.require_admin()?;
        let Some(store) = state.stores.iter().find(|s| s.name == name).cloned() else {
            return Err(state.fail(AppError::UnknownStore(name.to_string())));
        };
        let form = StoreForm {
            draft: StoreDraft::from_store(&store),
            mode: FormMode::Edit {
                original_name: store.name,
            },
        };
        state.view.open_store_form(form);
        Ok(())
    }

    /// Replaces the store currently named `original_name`. Without a new
    /// photo the existing one is kept.
    ///
    /// # Errors
    ///
    /// Same as [`LocatorApp::create_store`].
    pub async fn update_store(
        &self,
        original_name: &str,
        draft: StoreDraft,
    ) -> Result<String, AppError> {
        let new_store = {
            let mut state = self.lock().await;
            state.require_admin()?;
            let mut new_store = draft.validate().map_err(|e| state.fail(e.into()))?;
            if new_store.image.is_none() {
                new_store.image = state
                    .stores
                    .iter()
                    .find(|s| s.name == original_name)
                    .and_then(|s| s.image.clone());
            }
            state.view.set_busy(true);
            new_store
        };
        let result = self.client.update_store(original_name, &new_store).await;
        self.finish_mutation(result).await
    }

    /// # Errors
    ///
    /// - [`AppError::PermissionDenied`] without an admin session.
    /// - [`AppError::Validation`] for a blank name.
    /// - [`AppError::Client`] when the server rejects or the request fails.
    pub async fn delete_store(&self, name: &str) -> Result<String, AppError> {
        let name = name.trim();
        {
            let mut state = self.lock().await;
            state.require_admin()?;
            if name.is_empty() {
                return Err(state.fail(ValidationError::MissingField("name").into()));
            }
            state.view.set_busy(true);
        }
        let result = self.client.delete_store(name).await;
        self.finish_mutation(result).await
    }

    /// Persists a dragged marker's position.
    ///
    /// # Errors
    ///
    /// - [`AppError::PermissionDenied`] without an admin session.
    /// - [`AppError::UnknownStore`] when no marker carries that name.
    /// - [`AppError::Client`] when the server rejects or the request fails.
    pub async fn save_position(&self, name: &str) -> Result<String, AppError> {
        let (to, original) = {
            let mut state = self.lock().await;
            state.require_admin()?;
            let Some(positions) = state.markers.get(name).map(|e| (e.current, e.original)) else {
                return Err(state.fail(AppError::UnknownStore(name.to_string())));
            };
            state.view.set_busy(true);
            positions
        };
        let result = self.client.move_store(name, to, original).await;
        self.finish_mutation(result).await
    }

    async fn finish_mutation(&self, result: Result<String, ClientError>) -> Result<String, AppError> {
        match result {
            Ok(message) => {
                {
                    let mut state = self.lock().await;
                    state.alert(Alert::success(message.clone()));
                    state.stats = None;
                    state.view.close_store_form();
                    state.clear_pending();
                    state.view.set_busy(false);
                }
                if let Err(err) = self.refresh_after_mutation().await {
                    tracing::warn!(error = %err, "refresh after mutation failed");
                }
                Ok(message)
            }
            Err(err) => {
                tracing::warn!(error = %err, "store mutation failed");
                Err(self.lock().await.fail(AppError::Client(err)))
            }
        }
    }

    /// Branch count per district, fetched once and reused until the next
    /// successful mutation.
    ///
    /// # Errors
    ///
    /// [`AppError::Client`] when `GET /api/stats` fails.
    pub async fn district_stats(&self) -> Result<DistrictStats, AppError> {
        if let Some(stats) = self.lock().await.stats.clone() {
            return Ok(stats);
        }
        match self.client.district_stats().await {
            Ok(stats) => {
                self.lock().await.stats = Some(stats.clone());
                Ok(stats)
            }
            Err(err) => {
                tracing::warn!(error = %err, "stats load failed");
                Err(self.lock().await.fail(AppError::Client(err)))
            }
        }
    }
}
