//! HTTP API handlers for fb-rv

pub mod health;
pub mod reviews;

pub use health::health_routes;
pub use reviews::review_routes;
