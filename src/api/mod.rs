//! API module
//!
//! This module contains all HTTP-facing functionality.

pub mod handlers;
pub mod routes;

pub use routes::configure;
