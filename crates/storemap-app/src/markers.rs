//! Reconciles the on-screen markers, table and heat layer with a freshly
//! fetched store list.

use std::collections::{HashMap, HashSet};

use storemap_core::{dedupe_by_name, LatLng, Store};

use crate::view::{HeatPoint, MarkerHandle, Popup, PopupAction, StoreRow, View};

/// One marker on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerEntry {
    pub handle: MarkerHandle,
    /// Where the server last placed the store.
    pub original: LatLng,
    /// Where the marker sits now; differs from `original` after a drag.
    pub current: LatLng,
    pub store: Store,
}

/// Markers keyed by store name.
#[derive(Debug, Default)]
pub struct MarkerSet {
    entries: HashMap<String, MarkerEntry>,
}

impl MarkerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MarkerEntry> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn handles(&self) -> impl Iterator<Item = MarkerHandle> + '_ {
        self.entries.values().map(|e| e.handle)
    }

    /// Records a drag and returns the entry so its popup can be refreshed.
    /// `None` when no marker carries that name.
    pub fn record_drag(&mut self, name: &str, to: LatLng) -> Option<&MarkerEntry> {
        let entry = self.entries.get_mut(name)?;
        entry.current = to;
        Some(entry)
    }
}

/// Mode flags that change how markers and rows are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub edit_mode: bool,
    pub is_admin: bool,
    pub heatmap_on: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub rows: usize,
}

/// Brings `markers` and `view` in line with `fetched`.
///
/// Duplicate names collapse to their last occurrence. Markers whose name
/// survives keep their handle and are moved in place; unseen names get a new
/// marker; names that disappeared are removed. The table is rebuilt in the
/// received order and the heat layer follows `ctx.heatmap_on`.
///
/// Returns the report together with the deduplicated list.
pub fn reconcile<V: View + ?Sized>(
    markers: &mut MarkerSet,
    fetched: Vec<Store>,
    ctx: RenderContext,
    view: &mut V,
) -> (ReconcileReport, Vec<Store>) {
    let stores = dedupe_by_name(fetched);
    let mut report = ReconcileReport::default();
    let seen: HashSet<&str> = stores.iter().map(|s| s.name.as_str()).collect();

    let stale: Vec<String> = markers
        .entries
        .keys()
        .filter(|name| !seen.contains(name.as_str()))
        .cloned()
        .collect();
    for name in stale {
        if let Some(entry) = markers.entries.remove(&name) {
            view.remove_marker(entry.handle);
            report.removed += 1;
        }
    }

    for store in &stores {
        let at = store.position();
        let popup = build_popup(store, at, ctx);
        if let Some(entry) = markers.entries.get_mut(&store.name) {
            view.move_marker(entry.handle, at);
            view.set_popup(entry.handle, popup);
            entry.original = at;
            entry.current = at;
            entry.store = store.clone();
            report.updated += 1;
        } else {
            let handle = view.add_marker(at, ctx.edit_mode, popup);
            markers.entries.insert(
                store.name.clone(),
                MarkerEntry {
                    handle,
                    original: at,
                    current: at,
                    store: store.clone(),
                },
            );
            report.added += 1;
        }
    }

    let rows = build_rows(&stores, ctx.is_admin);
    report.rows = rows.len();
    view.render_rows(rows);
    view.set_heat_points(heat_points(&stores, ctx.heatmap_on));

    tracing::debug!(
        added = report.added,
        updated = report.updated,
        removed = report.removed,
        "markers reconciled"
    );
    (report, stores)
}

/// Popup for `store` with the marker sitting at `at`.
#[must_use]
pub fn build_popup(store: &Store, at: LatLng, ctx: RenderContext) -> Popup {
    let mut actions = vec![PopupAction::Route { to: at }];
    if ctx.is_admin && ctx.edit_mode {
        actions.push(PopupAction::SavePosition {
            store: store.name.clone(),
            original: store.position(),
        });
    }
    Popup {
        title: store.name.clone(),
        address: store.address.clone(),
        phone: store.phone.clone(),
        open_hours: store.open_hours.clone(),
        district: store.district.clone(),
        position: at,
        image: store.image.clone(),
        actions,
    }
}

fn build_rows(stores: &[Store], editable: bool) -> Vec<StoreRow> {
    stores
        .iter()
        .enumerate()
        .map(|(idx, store)| StoreRow {
            ordinal: idx + 1,
            name: store.name.clone(),
            address: store.address.clone(),
            district: store.district.clone(),
            editable,
        })
        .collect()
}

/// Unit-weight heat points, or nothing when the layer is off.
#[must_use]
pub fn heat_points(stores: &[Store], heatmap_on: bool) -> Vec<HeatPoint> {
    if !heatmap_on {
        return Vec::new();
    }
    stores
        .iter()
        .map(|s| HeatPoint {
            at: s.position(),
            weight: 1.0,
        })
        .collect()
}

#[cfg(test)]
#[path = "markers_test.rs"]
mod tests;
