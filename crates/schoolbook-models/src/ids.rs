//! Typed UUID identifiers.
//!
//! Each table gets its own newtype so a `TermId` can never be bound where a
//! `StudentId` is expected:
//!
//! ```compile_fail
//! use schoolbook_models::ids::{StudentId, TermId};
//!
//! fn load_student(_id: StudentId) {}
//! load_student(TermId::new());
//! ```

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Declares a `Uuid` newtype that binds, decodes, (de)serializes and documents
/// exactly like a bare UUID.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
        #[serde(transparent)]
        #[schema(value_type = String, format = "uuid")]
        pub struct $name(pub Uuid);

        impl $name {
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[inline]
            pub const fn from_u128(v: u128) -> Self {
                Self(Uuid::from_u128(v))
            }

            #[inline]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <Uuid as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <Uuid as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <Uuid as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                <Uuid as Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        impl PgHasArrayType for $name {
            fn array_type_info() -> PgTypeInfo {
                <Uuid as PgHasArrayType>::array_type_info()
            }
        }
    };
}

define_id!(AcademicSessionId);
define_id!(TermId);
define_id!(
    /// A class arm, e.g. JSS 1 Alpha.
    ClassId
);
define_id!(StudentId);
define_id!(SubjectId);
define_id!(ExamTypeId);
define_id!(
    /// One stored score for a (student, term, subject, exam type) tuple.
    ResultId
);
define_id!(TermReportId);
define_id!(ReportCommentId);
define_id!(FeeCategoryId);
define_id!(FeeItemId);
define_id!(FeeStructureId);
define_id!(FeeStructureItemId);
define_id!(InvoiceId);
define_id!(InvoiceLineItemId);
define_id!(PaymentId);

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: u128 = 0x0b9e4c1a_5d2f_4e61_9a7b_3c8d2e1f0a44;

    #[test]
    fn test_json_is_a_bare_uuid() {
        let id = InvoiceId::from_u128(RAW);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""0b9e4c1a-5d2f-4e61-9a7b-3c8d2e1f0a44""#);
        let back: InvoiceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_parse_and_display() {
        let id: StudentId = "0b9e4c1a-5d2f-4e61-9a7b-3c8d2e1f0a44".parse().unwrap();
        assert_eq!(id.into_inner(), Uuid::from_u128(RAW));
        assert_eq!(id.to_string(), "0b9e4c1a-5d2f-4e61-9a7b-3c8d2e1f0a44");
        assert!(format!("{id:?}").starts_with("StudentId("));
        assert!("not-a-uuid".parse::<TermId>().is_err());
    }

    #[test]
    fn test_new_ids_are_distinct() {
        assert_ne!(PaymentId::new(), PaymentId::new());
    }
}
