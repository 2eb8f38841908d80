//! Admin login, logout and password change.

use crate::error::AppError;
use crate::view::{Alert, View};

use super::LocatorApp;

impl<V: View> LocatorApp<V> {
    /// Starts an admin session and refreshes so the table shows row actions.
    ///
    /// # Errors
    ///
    /// - [`AppError::MissingCredential`] for a blank field; nothing is sent.
    /// - [`AppError::Client`] when the credentials are rejected or the request
    ///   fails.
    /// - [`AppError::NotAdmin`] when the account lacks admin rights.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AppError> {
        let username = username.trim();
        {
            let mut state = self.lock().await;
            if username.is_empty() {
                return Err(state.fail(AppError::MissingCredential("username")));
            }
            if password.is_empty() {
                return Err(state.fail(AppError::MissingCredential("password")));
            }
            state.view.set_busy(true);
        }

        let outcome = self.client.login(username, password).await;

        {
            let mut state = self.lock().await;
            match outcome {
                Ok(outcome) if outcome.is_admin => {
                    state.session.begin(username);
                    state.view.set_admin_controls(true);
                    state.alert(Alert::success(format!("Logged in as {username}.")));
                    state.view.set_busy(false);
                }
                Ok(_) => return Err(state.fail(AppError::NotAdmin)),
                Err(err) => {
                    tracing::warn!(%username, error = %err, "login failed");
                    if err.api_message().is_none() {
                        state.alert(Alert::danger("Login failed: invalid username or password."));
                        state.view.set_busy(false);
                        return Err(AppError::Client(err));
                    }
                    return Err(state.fail(AppError::Client(err)));
                }
            }
        }

        if let Err(err) = self.refresh_stores().await {
            tracing::warn!(error = %err, "refresh after login failed");
        }
        Ok(())
    }

    /// Ends the admin session and drops every admin-only mode.
    pub async fn logout(&self) {
        {
            let mut guard = self.lock().await;
            let state = &mut *guard;
            let Some(username) = state.session.username().map(str::to_string) else {
                return;
            };
            state.session.end();
            state.modes.disarm_admin();
            state.clear_pending();
            for handle in state.markers.handles() {
                state.view.set_draggable(handle, false);
            }
            state.view.close_store_form();
            state.view.set_admin_controls(false);
            state.alert(Alert::info("Logged out."));
            tracing::info!(%username, "logged out");
        }
        if let Err(err) = self.refresh_stores().await {
            tracing::warn!(error = %err, "refresh after logout failed");
        }
    }

    /// Changes the logged-in admin's password.
    ///
    /// # Errors
    ///
    /// - [`AppError::PermissionDenied`] without an admin session.
    /// - [`AppError::MissingCredential`] for a blank field; nothing is sent.
    /// - [`AppError::Client`] with the server's message on rejection.
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<String, AppError> {
        let username = {
            let mut state = self.lock().await;
            state.require_admin()?;
            if old_password.is_empty() {
                return Err(state.fail(AppError::MissingCredential("current password")));
            }
            if new_password.is_empty() {
                return Err(state.fail(AppError::MissingCredential("new password")));
            }
            state.view.set_busy(true);
            state.session.username().map(str::to_string).unwrap_or_default()
        };

        match self
            .client
            .change_password(&username, old_password, new_password)
            .await
        {
            Ok(message) => {
                let mut state = self.lock().await;
                state.alert(Alert::success(message.clone()));
                state.view.set_busy(false);
                Ok(message)
            }
            Err(err) => {
                tracing::warn!(%username, error = %err, "password change failed");
                Err(self.lock().await.fail(AppError::Client(err)))
            }
        }
    }
}
