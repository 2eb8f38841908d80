//! In-memory [`View`] used by the command line front-end and tests.

use std::collections::HashMap;

use storemap_core::LatLng;

use crate::view::{
    Alert, AlertLevel, DistrictShape, HeatPoint, MarkerHandle, Popup, StoreForm, StoreRow, View,
};

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessMarker {
    pub position: LatLng,
    pub draggable: bool,
    pub popup: Popup,
}

/// Records everything rendered so it can be printed or inspected.
#[derive(Debug, Default)]
pub struct HeadlessView {
    next_marker: u64,
    pub markers: HashMap<MarkerHandle, HeadlessMarker>,
    pub heat: Vec<HeatPoint>,
    pub districts: Vec<DistrictShape>,
    pub district_overlay_visible: bool,
    pub district_options: Vec<String>,
    pub rows: Vec<StoreRow>,
    pub pending_marker: Option<LatLng>,
    pub form: Option<StoreForm>,
    pub admin_controls: bool,
    pub alerts: Vec<Alert>,
    pub busy: bool,
}

impl HeadlessView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn last_alert(&self) -> Option<&Alert> {
        self.alerts.last()
    }

    pub fn alerts_at(&self, level: AlertLevel) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(move |a| a.level == level)
    }

    /// Drains recorded alerts, oldest first.
    pub fn take_alerts(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.alerts)
    }
}

impl View for HeadlessView {
    fn add_marker(&mut self, at: LatLng, draggable: bool, popup: Popup) -> MarkerHandle {
        self.next_marker += 1;
        let handle = MarkerHandle::new(self.next_marker);
        self.markers.insert(
            handle,
            HeadlessMarker {
                position: at,
                draggable,
                popup,
            },
        );
        handle
    }

    fn move_marker(&mut self, marker: MarkerHandle, at: LatLng) {
        if let Some(m) = self.markers.get_mut(&marker) {
            m.position = at;
        }
    }

    fn set_popup(&mut self, marker: MarkerHandle, popup: Popup) {
        if let Some(m) = self.markers.get_mut(&marker) {
            m.popup = popup;
        }
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        self.markers.remove(&marker);
    }

    fn set_draggable(&mut self, marker: MarkerHandle, draggable: bool) {
        if let Some(m) = self.markers.get_mut(&marker) {
            m.draggable = draggable;
        }
    }

    fn set_heat_points(&mut self, points: Vec<HeatPoint>) {
        self.heat = points;
    }

    fn render_districts(&mut self, shapes: Vec<DistrictShape>) {
        self.districts = shapes;
    }

    fn set_district_overlay_visible(&mut self, visible: bool) {
        self.district_overlay_visible = visible;
    }

    fn set_district_options(&mut self, names: Vec<String>) {
        self.district_options = names;
    }

    fn render_rows(&mut self, rows: Vec<StoreRow>) {
        self.rows = rows;
    }

    fn set_pending_marker(&mut self, at: Option<LatLng>) {
        self.pending_marker = at;
    }

    fn open_store_form(&mut self, form: StoreForm) {
        self.form = Some(form);
    }

    fn close_store_form(&mut self) {
        self.form = None;
    }

    fn set_admin_controls(&mut self, visible: bool) {
        self.admin_controls = visible;
    }

    fn alert(&mut self, alert: Alert) {
        match alert.level {
            AlertLevel::Warning | AlertLevel::Danger => {
                tracing::warn!(message = %alert.message, "alert");
            }
            AlertLevel::Success | AlertLevel::Info => {
                tracing::info!(message = %alert.message, "alert");
            }
        }
        self.alerts.push(alert);
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}
