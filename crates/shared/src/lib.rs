//! Shared types, errors, and configuration for Midyear.
//!
//! This crate provides common types used across all other crates:
//! - Money formatting with decimal precision
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - Bearer token claims and verification

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, UserRole};
pub use config::AppConfig;
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};
