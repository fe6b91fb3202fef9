//! HTTP server implementation
//!
//! Thin actix-web surface over the monitor and the propagator, plus the
//! service wiring used by the binary.

pub mod builder;
pub mod routes;
pub mod server;
pub mod state;


pub use builder::{Service, ServiceBuilder, run_service};
pub use server::HttpServer;
pub use state::AppState;
