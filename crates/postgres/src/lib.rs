//! # Postgres
//!
//! This crate provides PostgreSQL connectivity for the service listings backend:
//! pool creation, a startup probe, and the embedded schema migrations.

/// Database client for the service listings backend.
pub mod database;
