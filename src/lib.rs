//! Inventory Service - in-memory inventory tracking over HTTP
//!
//! The crate exposes:
//! - a seeded in-memory item store with list/create/update/delete
//! - inventory analysis (totals, categories, low stock)
//! - shelf-scan reconciliation against the store
//! - an axum router serving all of the above as JSON

pub mod analysis;
pub mod app;
pub mod config;
pub mod http;
pub mod reconcile;
pub mod store;
pub mod util;

pub use app::AppState;
pub use config::Config;
pub use http::build_router;
