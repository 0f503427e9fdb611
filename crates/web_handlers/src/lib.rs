//! # Web Handlers for the Service Listings Backend
//!
//! This crate provides the actix-web handlers for the service listings API.

/// Health check handlers
mod health_handlers;
pub use health_handlers::*;

/// Handlers for the service listing endpoints
mod service_handlers;
pub use service_handlers::*;
