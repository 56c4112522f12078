//! # Edutrack Models
//!
//! Domain models and DTOs for the Edutrack API.
//!
//! Each module holds one entity: the record as stored in the database (which
//! doubles as the response schema), its enumerated fields, the Create/Update
//! request DTOs, a `*Detail` response embedding related records, and the
//! filter parameters accepted by its list endpoint.
//!
//! # Modules
//!
//! - [`ids`]: Typed integer ids, one per entity
//! - [`auth`]: Login request and response
//! - [`users`]: Accounts and roles
//! - [`parents`] / [`teachers`]: People profiles, optionally linked to a user
//! - [`levels`] / [`classrooms`] / [`subjects`]: School structure
//! - [`students`]: Enrolled pupils
//! - [`grades`] / [`payments`] / [`attendance`]: Per-student records
//! - [`notifications`]: Messages addressed to users
//!
//! # Example
//!
//! ```ignore
//! use edutrack_models::students::{CreateStudentDto, Gender};
//! use edutrack_models::ids::{ClassroomId, ParentId};
//! use validator::Validate;
//!
//! let dto = CreateStudentDto {
//!     first_name: "Amina".into(),
//!     last_name: "Diallo".into(),
//!     birth_date: chrono::NaiveDate::from_ymd_opt(2015, 4, 2).unwrap(),
//!     gender: Gender::Female,
//!     enrollment_status: None,
//!     enrollment_date: None,
//!     parent_id: ParentId::new(1),
//!     class_id: ClassroomId::new(1),
//! };
//! dto.validate()?;
//! ```

pub mod attendance;
pub mod auth;
pub mod classrooms;
pub mod grades;
pub mod ids;
pub mod levels;
pub mod notifications;
pub mod parents;
pub mod payments;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;
mod validation;

// Re-export commonly used types at crate root for convenience
pub use auth::{LoginRequest, LoginResponse};
pub use users::{User, UserRole};
