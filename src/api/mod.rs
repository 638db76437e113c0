//! API endpoint modules.

pub mod health;
pub mod openapi;
pub mod runs;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use runs::configure_routes as configure_run_routes;
