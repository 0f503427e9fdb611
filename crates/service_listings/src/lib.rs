//! # Service Listings
//!
//! This crate provides types and services for managing service listings.
//! It handles creation, editing, removal, and paginated browsing of listings,
//! enforcing the role and ownership rules from `auth_services`.

/// Types for service listing operations
mod types;
pub use types::*;

/// Pagination parameters for browsing listings
mod pagination;
pub use pagination::*;

/// Storage ports for listings and user accounts
mod store;
pub use store::*;

/// PostgreSQL implementation of the storage ports
mod pg_store;
pub use pg_store::*;

/// In-memory implementation of the storage ports
#[cfg(any(test, feature = "test-support"))]
mod memory;
#[cfg(any(test, feature = "test-support"))]
pub use memory::*;

/// Service for handling listing operations
mod listing_service;
pub use listing_service::*;
