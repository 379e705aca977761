//! Shared configuration and errors for audioqr.
//!
//! This crate provides common types used across all other crates:
//! - Environment-driven application configuration
//! - Application-wide error taxonomy mapped onto HTTP status codes

pub mod config;
pub mod error;

pub use config::{AppConfig, CloudinaryConfig};
pub use error::{AppError, AppResult};
