//! Strongly-typed ID newtypes for domain entities.
//!
//! Every table uses a `BIGSERIAL` primary key. Wrapping the raw `i64` in one
//! newtype per entity prevents passing a `ClassroomId` where a `StudentId` is
//! expected, while serializing and binding exactly like the inner integer.
//!
//! # Example
//!
//! ```ignore
//! use edutrack_models::ids::{ClassroomId, StudentId};
//!
//! fn get_student(id: StudentId) { /* ... */ }
//!
//! let student_id = StudentId::from(1);
//! let classroom_id = ClassroomId::from(1);
//!
//! get_student(student_id);      // OK
//! // get_student(classroom_id); // Compile error! Type mismatch.
//! ```

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use utoipa::ToSchema;

/// Defines a strongly-typed `i64` ID newtype with the trait implementations
/// needed for SQLx binding/decoding, serde, path extraction and OpenAPI docs.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
        #[schema(value_type = i64)]
        pub struct $name(pub i64);

        impl $name {
            #[inline]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Get the inner integer value.
            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            #[inline]
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            #[inline]
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <i64 as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <i64 as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <i64 as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                <i64 as Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        impl PgHasArrayType for $name {
            fn array_type_info() -> PgTypeInfo {
                <i64 as PgHasArrayType>::array_type_info()
            }
        }

        // Transparent: accepts the bare integer, as in `{"student_id": 1}`.
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                i64::deserialize(deserializer).map(Self)
            }
        }
    };
}

define_id!(
    /// Strongly-typed ID for User entities.
    UserId
);

define_id!(
    /// Strongly-typed ID for Parent entities.
    ParentId
);

define_id!(
    /// Strongly-typed ID for Teacher entities.
    TeacherId
);

define_id!(
    /// Strongly-typed ID for Level entities.
    LevelId
);

define_id!(
    /// Strongly-typed ID for Classroom entities.
    ClassroomId
);

define_id!(
    /// Strongly-typed ID for Student entities.
    StudentId
);

define_id!(
    /// Strongly-typed ID for Subject entities.
    SubjectId
);

define_id!(
    /// Strongly-typed ID for Grade entities.
    GradeId
);

define_id!(
    /// Strongly-typed ID for Payment entities.
    PaymentId
);

define_id!(
    /// Strongly-typed ID for Attendance entities.
    AttendanceId
);

define_id!(
    /// Strongly-typed ID for Notification entities.
    NotificationId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_debug() {
        let id = StudentId::new(12);
        assert_eq!(format!("{:?}", id), "StudentId(12)");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(ClassroomId::new(3).to_string(), "3");
    }

    #[test]
    fn test_id_from_str() {
        let id: ParentId = "42".parse().unwrap();
        assert_eq!(id.into_inner(), 42);
        assert!("forty-two".parse::<ParentId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_integer() {
        let json = serde_json::to_string(&PaymentId::new(9)).unwrap();
        assert_eq!(json, "9");
    }

    #[test]
    fn test_id_deserializes_from_integer() {
        let id: SubjectId = serde_json::from_str("5").unwrap();
        assert_eq!(id, SubjectId::new(5));
        assert!(serde_json::from_str::<SubjectId>(r#""5""#).is_err());
    }

    #[test]
    fn test_id_conversion_roundtrip() {
        let id: GradeId = 77.into();
        let raw: i64 = id.into();
        assert_eq!(raw, 77);
    }

    #[test]
    fn test_id_ordering() {
        assert!(UserId::new(1) < UserId::new(2));
    }
}
