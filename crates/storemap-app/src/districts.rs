//! Session-resident district boundaries.

use storemap_client::{ClientError, StoreMapClient};
use storemap_core::{locate_district, District, LatLng};
use tokio::sync::OnceCell;

use crate::view::DistrictShape;

/// Loads the district list once and keeps it for the rest of the session.
///
/// A failed load leaves the cache empty so a later call can try again.
#[derive(Debug, Default)]
pub struct DistrictCache {
    cell: OnceCell<Vec<District>>,
}

impl DistrictCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached list, or `None` before the first successful load.
    #[must_use]
    pub fn get(&self) -> Option<&[District]> {
        self.cell.get().map(Vec::as_slice)
    }

    /// Returns the cached list, fetching it on first use. The flag is `true`
    /// when this call performed the fetch.
    ///
    /// # Errors
    ///
    /// Propagates the [`ClientError`] from `GET /api/districts`.
    pub async fn get_or_load(
        &self,
        client: &StoreMapClient,
    ) -> Result<(&[District], bool), ClientError> {
        let mut fresh = false;
        let loaded = &mut fresh;
        let districts = self
            .cell
            .get_or_try_init(|| async move {
                *loaded = true;
                client.list_districts().await
            })
            .await?;
        Ok((districts.as_slice(), fresh))
    }

    /// Name of the district containing `at`. `None` when nothing is cached or
    /// the point falls outside every boundary.
    #[must_use]
    pub fn locate(&self, at: LatLng) -> Option<&str> {
        let districts = self.get()?;
        locate_district(districts, at).map(|d| d.name.as_str())
    }
}

/// Overlay shapes, one per district, labelled with its name.
#[must_use]
pub fn overlay_shapes(districts: &[District]) -> Vec<DistrictShape> {
    districts
        .iter()
        .map(|d| DistrictShape {
            name: d.name.clone(),
            outlines: d.outlines(),
        })
        .collect()
}

/// Entries for the district filter control.
#[must_use]
pub fn option_names(districts: &[District]) -> Vec<String> {
    districts.iter().map(|d| d.name.clone()).collect()
}
