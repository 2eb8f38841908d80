//! Store (branch) records as exchanged with the locator API.

use std::collections::HashMap;

use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::ValidationError;

/// A WGS84 position. Latitude first, as the map widgets expect it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// A retail branch. `name` doubles as the identifier everywhere in the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub name: String,
    #[serde(deserialize_with = "nullable_text")]
    pub address: String,
    #[serde(deserialize_with = "nullable_text")]
    pub phone: String,
    #[serde(deserialize_with = "nullable_text")]
    pub open_hours: String,
    #[serde(deserialize_with = "nullable_text")]
    pub district: String,
    pub latitude: f64,
    pub longitude: f64,
    /// URL or `data:` URI of the storefront photo.
    #[serde(default)]
    pub image: Option<String>,
}

impl Store {
    #[must_use]
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

/// Text columns are required keys but the backend stores them nullable.
fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Collapses duplicate names so each name appears once.
///
/// The last occurrence of a name wins, but it keeps the slot where the name
/// first appeared, so the list order stays stable.
#[must_use]
pub fn dedupe_by_name(stores: Vec<Store>) -> Vec<Store> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(stores.len());
    let mut unique: Vec<Store> = Vec::with_capacity(stores.len());
    for store in stores {
        if let Some(&idx) = slots.get(&store.name) {
            unique[idx] = store;
        } else {
            slots.insert(store.name.clone(), unique.len());
            unique.push(store);
        }
    }
    unique
}

/// A photo attached from the admin form. Only JPEG and PNG are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreImage {
    mime: &'static str,
    bytes: Vec<u8>,
}

impl StoreImage {
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsupportedImage`] for anything other than
    /// `image/jpeg` or `image/png`.
    pub fn new(mime: &str, bytes: Vec<u8>) -> Result<Self, ValidationError> {
        let mime = match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => "image/jpeg",
            "image/png" => "image/png",
            other => return Err(ValidationError::UnsupportedImage(other.to_string())),
        };
        Ok(Self { mime, bytes })
    }

    /// Picks the MIME type from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsupportedImage`] for unknown extensions.
    pub fn from_file_name(file_name: &str, bytes: Vec<u8>) -> Result<Self, ValidationError> {
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => Self::new("image/jpeg", bytes),
            "png" => Self::new("image/png", bytes),
            _ => Err(ValidationError::UnsupportedImage(file_name.to_string())),
        }
    }

    #[must_use]
    pub fn mime(&self) -> &'static str {
        self.mime
    }

    #[must_use]
    pub fn to_data_uri(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{encoded}", self.mime)
    }
}

/// Raw admin form input. Coordinates stay text until [`StoreDraft::validate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreDraft {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub open_hours: String,
    pub district: String,
    pub latitude: String,
    pub longitude: String,
    pub image: Option<StoreImage>,
}

impl StoreDraft {
    /// Prefills the form from an existing store, as the edit dialog does.
    #[must_use]
    pub fn from_store(store: &Store) -> Self {
        Self {
            name: store.name.clone(),
            address: store.address.clone(),
            phone: store.phone.clone(),
            open_hours: store.open_hours.clone(),
            district: store.district.clone(),
            latitude: store.latitude.to_string(),
            longitude: store.longitude.to_string(),
            image: None,
        }
    }

    /// Prefills coordinates (six decimals) and district for a map click.
    #[must_use]
    pub fn at_position(position: LatLng, district: Option<&str>) -> Self {
        Self {
            latitude: format!("{:.6}", position.lat),
            longitude: format!("{:.6}", position.lng),
            district: district.unwrap_or_default().to_string(),
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// - [`ValidationError::MissingField`] when the name or a coordinate is blank.
    /// - [`ValidationError::NotNumeric`] when a coordinate does not parse.
    /// - [`ValidationError::OutOfRange`] when a coordinate is off the globe.
    pub fn validate(&self) -> Result<NewStore, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        let latitude = parse_coordinate("latitude", &self.latitude, 90)?;
        let longitude = parse_coordinate("longitude", &self.longitude, 180)?;

        Ok(NewStore {
            name: name.to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            open_hours: self.open_hours.trim().to_string(),
            district: self.district.trim().to_string(),
            latitude,
            longitude,
            image: self.image.as_ref().map(StoreImage::to_data_uri),
        })
    }
}

fn parse_coordinate(field: &'static str, raw: &str, bound: i16) -> Result<f64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    let value: f64 = raw.parse().map_err(|_| ValidationError::NotNumeric {
        field,
        value: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ValidationError::NotNumeric {
            field,
            value: raw.to_string(),
        });
    }
    if value.abs() > f64::from(bound) {
        return Err(ValidationError::OutOfRange {
            field,
            value: raw.to_string(),
            min: -bound,
            max: bound,
        });
    }
    Ok(value)
}

/// A validated store ready to be sent to `POST`/`PUT /api/stores`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewStore {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub open_hours: String,
    pub district: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
