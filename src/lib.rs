pub mod app;
pub mod classify;
pub mod config;
pub mod entitlements;
pub mod errors;
pub mod feed;
pub mod handlers;
pub mod models;
pub mod state;
pub mod store;
pub mod ui;
pub mod validate;
pub mod window;

pub use app::router;
pub use classify::{classify, classify_four_tier, Severity, Status, StatusColor, ThresholdScheme};
pub use config::Config;
pub use state::AppState;
pub use validate::validate_reading;
pub use window::{window, Series, SeriesPoint};
