//! Login and password endpoints.

use reqwest::Method;

use crate::client::StoreMapClient;
use crate::error::ClientError;
use crate::types::{ChangePasswordRequest, ChangePasswordResponse, LoginOutcome, LoginRequest, LoginResponse};

impl StoreMapClient {
    /// Verifies credentials. A rejected login comes back as
    /// [`ClientError::Api`] (`"success": false`) or a 401 status.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] when the server rejects the credentials.
    /// - [`ClientError::UnexpectedStatus`] for 4xx/5xx responses.
    /// - [`ClientError::Http`] on network failure.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, ClientError> {
        let url = self.endpoint("login", &[])?;
        let body = LoginRequest { username, password };
        let resp: LoginResponse = self.send_json(Method::POST, url, Some(&body)).await?;
        if !resp.success {
            return Err(ClientError::Api("login rejected".to_string()));
        }
        tracing::info!(%username, is_admin = resp.is_admin, "login accepted");
        Ok(LoginOutcome {
            is_admin: resp.is_admin,
        })
    }

    /// Changes `username`'s password; returns the server's confirmation.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] with the server's message (e.g. wrong old password).
    /// - [`ClientError::UnexpectedStatus`] / [`ClientError::Http`] on transport failure.
    pub async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<String, ClientError> {
        let url = self.endpoint("change-password", &[])?;
        let body = ChangePasswordRequest {
            username,
            old_password,
            new_password,
        };
        let resp: ChangePasswordResponse = self.send_json(Method::POST, url, Some(&body)).await?;
        tracing::info!(%username, "password changed");
        Ok(resp
            .message
            .unwrap_or_else(|| "Password changed successfully".to_string()))
    }
}
