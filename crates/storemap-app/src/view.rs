//! The surface the locator renders into.
//!
//! Everything handed to a [`View`] is structured data. Popups and rows carry
//! field values, never pre-rendered markup, so store text cannot inject into
//! whatever the view builds from them.

use storemap_core::{LatLng, Outline, StoreDraft};

/// Opaque identity of a marker owned by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Info,
    Warning,
    Danger,
}

/// A transient user-facing banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_level(AlertLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(AlertLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(AlertLevel::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::with_level(AlertLevel::Danger, message)
    }

    fn with_level(level: AlertLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopupAction {
    /// Directions from the visitor to the store.
    Route { to: LatLng },
    /// Persist a dragged marker. Offered to admins in edit mode only.
    SavePosition { store: String, original: LatLng },
}

/// Marker popup content.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    pub address: String,
    pub phone: String,
    pub open_hours: String,
    pub district: String,
    pub position: LatLng,
    pub image: Option<String>,
    pub actions: Vec<PopupAction>,
}

/// One line of the store table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRow {
    /// 1-based position in the current result set; not an identifier.
    pub ordinal: usize,
    pub name: String,
    pub address: String,
    pub district: String,
    /// Edit and delete buttons are shown.
    pub editable: bool,
}

/// A district boundary for the overlay layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictShape {
    pub name: String,
    pub outlines: Vec<Outline>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub at: LatLng,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { original_name: String },
}

/// The create/edit dialog, prefilled.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreForm {
    pub mode: FormMode,
    pub draft: StoreDraft,
}

/// Rendering target for [`crate::LocatorApp`].
///
/// Implementations only draw; they never call back into the app. User
/// events (clicks, drags, input) are fed to the app by whoever owns the view.
pub trait View: Send + Sync {
    fn add_marker(&mut self, at: LatLng, draggable: bool, popup: Popup) -> MarkerHandle;
    fn move_marker(&mut self, marker: MarkerHandle, at: LatLng);
    fn set_popup(&mut self, marker: MarkerHandle, popup: Popup);
    fn remove_marker(&mut self, marker: MarkerHandle);
    fn set_draggable(&mut self, marker: MarkerHandle, draggable: bool);

    /// Replaces the heat layer; an empty vector clears it.
    fn set_heat_points(&mut self, points: Vec<HeatPoint>);

    fn render_districts(&mut self, shapes: Vec<DistrictShape>);
    fn set_district_overlay_visible(&mut self, visible: bool);
    fn set_district_options(&mut self, names: Vec<String>);

    fn render_rows(&mut self, rows: Vec<StoreRow>);

    /// The temporary marker shown while picking a spot in map-add mode.
    fn set_pending_marker(&mut self, at: Option<LatLng>);
    fn open_store_form(&mut self, form: StoreForm);
    fn close_store_form(&mut self);
    fn set_admin_controls(&mut self, visible: bool);

    fn alert(&mut self, alert: Alert);
    fn set_busy(&mut self, busy: bool);
}
