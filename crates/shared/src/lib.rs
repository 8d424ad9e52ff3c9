//! Shared types, auth, and configuration for Arqo.
//!
//! This crate provides common pieces used across all other crates:
//! - Configuration loading (files + `ARQO__`-prefixed environment)
//! - JWT claims and token validation
//! - Business-day helpers (register days follow the store timezone)
//! - Pagination types for list endpoints

pub mod auth;
pub mod config;
pub mod jwt;
pub mod time;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use jwt::{JwtError, JwtService};
