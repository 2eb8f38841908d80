//! Store-locator session logic: search, reconciliation of the map and table
//! with the server's store list, district lookup and admin editing.

mod app;
pub mod debounce;
pub mod districts;
pub mod error;
pub mod headless;
pub mod markers;
pub mod modes;
pub mod session;
pub mod view;

pub use app::{LocatorApp, MapClickOutcome, RefreshOutcome};
pub use debounce::{DebounceMode, Debouncer};
pub use districts::DistrictCache;
pub use error::AppError;
pub use headless::HeadlessView;
pub use markers::{MarkerEntry, ReconcileReport};
pub use modes::ModeFlags;
pub use view::{Alert, AlertLevel, View};
