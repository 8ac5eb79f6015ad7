//! Shared types, errors, and configuration for SleepDash.
//!
//! This crate provides common types used across all other crates:
//! - Admin auth payloads and JWT handling
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{AdminLoginRequest, AdminLoginResponse, AdminProfile, AdminRole, Claims};
pub use config::AppConfig;
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};
