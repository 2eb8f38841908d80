//! Request and response bodies for the store-locator API.
//!
//! Store and district records live in `storemap-core`; this module only
//! models the envelopes around them.

use serde::{Deserialize, Serialize};
use storemap_core::NewStore;

/// Search filters for `GET /api/stores`. Empty fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreQuery {
    /// Case-insensitive substring of the store name.
    pub text: String,
    /// Exact district name.
    pub district: String,
}

impl StoreQuery {
    #[must_use]
    pub fn new(text: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            district: district.into(),
        }
    }

    pub(crate) fn params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::with_capacity(2);
        let text = self.text.trim();
        if !text.is_empty() {
            params.push(("q", text));
        }
        let district = self.district.trim();
        if !district.is_empty() {
            params.push(("district", district));
        }
        params
    }
}

/// `{ "message": "..." }` returned by the store mutation endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageResponse {
    pub(crate) fn into_message(self, fallback: &str) -> String {
        self.message.unwrap_or_else(|| fallback.to_string())
    }
}

/// `PUT /api/stores` full update: the new fields plus the name to match on.
#[derive(Debug, Serialize)]
pub(crate) struct UpdateStoreRequest<'a> {
    #[serde(flatten)]
    pub store: &'a NewStore,
    pub original_name: &'a str,
}

/// `PUT /api/stores` position-only update after a marker drag.
///
/// The original coordinates travel with the request so the server can tell a
/// stale drag from a fresh one.
#[derive(Debug, Serialize)]
pub(crate) struct MoveStoreRequest<'a> {
    pub name: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub original_name: &'a str,
    #[serde(rename = "originalLat")]
    pub original_lat: f64,
    #[serde(rename = "originalLng")]
    pub original_lng: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub success: bool,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
}

/// Result of a successful `POST /api/login`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginOutcome {
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChangePasswordRequest<'a> {
    pub username: &'a str,
    #[serde(rename = "oldPassword")]
    pub old_password: &'a str,
    #[serde(rename = "newPassword")]
    pub new_password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChangePasswordResponse {
    #[serde(default)]
    pub message: Option<String>,
}
