//! Store, district, and stats endpoints.

use reqwest::Method;
use storemap_core::{District, DistrictStats, LatLng, NewStore, Store};

use crate::client::StoreMapClient;
use crate::error::ClientError;
use crate::types::{MessageResponse, MoveStoreRequest, StoreQuery, UpdateStoreRequest};

impl StoreMapClient {
    /// Fetches every district with its boundary.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] after retries.
    /// - [`ClientError::Deserialize`] if a district or geometry is malformed.
    pub async fn list_districts(&self) -> Result<Vec<District>, ClientError> {
        let url = self.endpoint("districts", &[])?;
        self.get_json(url).await
    }

    /// Fetches the stores matching `query`. The list may contain duplicate
    /// names; callers dedupe before rendering.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] after retries.
    /// - [`ClientError::Api`] if the body carries an `error` field.
    /// - [`ClientError::Deserialize`] if any record misses a required field.
    pub async fn list_stores(&self, query: &StoreQuery) -> Result<Vec<Store>, ClientError> {
        let url = self.endpoint("stores", &query.params())?;
        self.get_json(url).await
    }

    /// Branch count per district.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] after retries.
    /// - [`ClientError::Deserialize`] if the body is not a name → count map.
    pub async fn district_stats(&self) -> Result<DistrictStats, ClientError> {
        let url = self.endpoint("stats", &[])?;
        self.get_json(url).await
    }

    /// Creates a store and returns the server's confirmation message.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] with the server's message (e.g. missing fields).
    /// - [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] on transport failure.
    pub async fn create_store(&self, store: &NewStore) -> Result<String, ClientError> {
        let url = self.endpoint("stores", &[])?;
        let resp: MessageResponse = self.send_json(Method::POST, url, Some(store)).await?;
        tracing::info!(store = %store.name, "store created");
        Ok(resp.into_message("Store created"))
    }

    /// Replaces the store currently named `original_name`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] with the server's message.
    /// - [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] on transport failure.
    pub async fn update_store(
        &self,
        original_name: &str,
        store: &NewStore,
    ) -> Result<String, ClientError> {
        let url = self.endpoint("stores", &[])?;
        let body = UpdateStoreRequest {
            store,
            original_name,
        };
        let resp: MessageResponse = self.send_json(Method::PUT, url, Some(&body)).await?;
        tracing::info!(store = %original_name, renamed_to = %store.name, "store updated");
        Ok(resp.into_message("Store updated"))
    }

    /// Position-only update for a dragged marker.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] with the server's message.
    /// - [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] on transport failure.
    pub async fn move_store(
        &self,
        name: &str,
        to: LatLng,
        original: LatLng,
    ) -> Result<String, ClientError> {
        let url = self.endpoint("stores", &[])?;
        let body = MoveStoreRequest {
            name,
            latitude: to.lat,
            longitude: to.lng,
            original_name: name,
            original_lat: original.lat,
            original_lng: original.lng,
        };
        let resp: MessageResponse = self.send_json(Method::PUT, url, Some(&body)).await?;
        tracing::info!(store = %name, from = %original, to = %to, "store moved");
        Ok(resp.into_message("Store updated"))
    }

    /// Deletes the store named `name`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] with the server's message.
    /// - [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] on transport failure
    ///   (including 404 for an unknown name).
    pub async fn delete_store(&self, name: &str) -> Result<String, ClientError> {
        let url = self.endpoint("stores", &[("name", name)])?;
        let resp: MessageResponse = self.send_json::<(), _>(Method::DELETE, url, None).await?;
        tracing::info!(store = %name, "store deleted");
        Ok(resp.into_message("Store deleted"))
    }
}
