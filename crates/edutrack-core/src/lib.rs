//! # Edutrack Core
//!
//! Core types, errors, and utilities for the Edutrack API.
//!
//! This crate provides foundational types used throughout the Edutrack application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: `skip`/`limit` pagination for list endpoints
//! - [`password`]: Password hashing and verification
//! - [`serde`]: Custom serde deserialization helpers for query strings and partial updates
//!
//! # Example
//!
//! ```ignore
//! use edutrack_core::errors::AppError;
//! use edutrack_core::pagination::{PaginationMeta, PaginationParams};
//! use edutrack_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Student not found"));
//!
//! let hash = hash_password("secure_password")?;
//!
//! let params = PaginationParams::default();
//! let meta = PaginationMeta::new(42, &params);
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
