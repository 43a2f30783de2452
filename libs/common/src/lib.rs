//! Common library for the POS API
//!
//! This crate provides shared infrastructure used by the POS service:
//! PostgreSQL connection pooling, the Redis-backed token blacklist store,
//! and shared error types.

pub mod cache;
pub mod database;
pub mod error;
