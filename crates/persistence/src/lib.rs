//! Persistence layer for the city governance backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations with explicit transaction threading

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
