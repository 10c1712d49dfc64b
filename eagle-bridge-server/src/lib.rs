//! # Eagle Bridge Server
//!
//! HTTP surface of the gateway: library discovery and switching, image
//! delivery by item id, and pass-through listings from the Eagle host
//! application.
//!
//! The binary (`eagle-bridge`) loads [`infra::config::Config`], discovers
//! libraries, and serves the router built by [`routes::create_app`].

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use routes::create_app;
