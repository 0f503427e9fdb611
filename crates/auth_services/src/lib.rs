//! # Auth Services
//!
//! This crate provides caller authentication and authorization for the service listings backend.
//! It includes JWT verification, the role-based access policy, and the request extractor
//! that hands handlers the verified caller.

/// Request extractor resolving the caller identity from the `Authorization` header.
pub mod extractor;
/// JWT token verification and issuance.
pub mod jwt;
/// Access policy mapping (operation, role, ownership) to allow/deny.
pub mod policy;
/// Types and structures used in authentication services.
pub mod types;
