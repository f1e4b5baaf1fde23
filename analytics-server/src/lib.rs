//! # Analytics Server
//!
//! Aggregates trade logs from the broker services, stores them per user
//! and serves performance metrics with generated insights.

pub mod insight;
pub mod routes;
pub mod settings;
pub mod state;
pub mod store;

pub use routes::router;
pub use settings::Settings;
pub use state::AppState;
