pub mod app_config;
pub mod config;
pub mod district;
pub mod error;
pub mod store;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use district::{locate_district, District, DistrictStats, Geometry, Outline};
pub use error::{ConfigError, ValidationError};
pub use store::{dedupe_by_name, LatLng, NewStore, Store, StoreDraft, StoreImage};
