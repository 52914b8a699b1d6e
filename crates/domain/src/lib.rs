//! Domain layer for the city governance backend.
//!
//! This crate contains:
//! - Domain models (Country, City, Governor, Invite)
//! - Role policy and event publishing contracts
//! - The domain error taxonomy

pub mod error;
pub mod models;
pub mod services;
