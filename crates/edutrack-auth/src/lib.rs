//! # Edutrack Auth
//!
//! Authentication types and JWT utilities for the Edutrack API.
//!
//! - [`claims`]: JWT claim structure for access tokens
//! - [`jwt`]: Token creation and verification
//!
//! # Example
//!
//! ```ignore
//! use edutrack_auth::{create_access_token, verify_token};
//! use edutrack_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "jdoe", "admin", &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.username, "jdoe");
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
