//! Academic calendar, classes, students and subjects.
//!
//! These are the reference rows the grade and finance modules hang off. They
//! are seeded by the CLI and only read by the API.

use crate::ids::{AcademicSessionId, ClassId, StudentId, SubjectId, TermId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// A school year, e.g. `2025/2026`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AcademicSession {
    pub id: AcademicSessionId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Term {
    pub id: TermId,
    pub academic_session_id: AcademicSessionId,
    /// `First Term`, `Second Term` or `Third Term`
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Term joined with its academic session.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TermWithSession {
    pub id: TermId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
    pub academic_session_id: AcademicSessionId,
    pub session_name: String,
}

/// Stream a class is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ClassArm {
    Alpha,
    Beta,
    Gamma,
    Delta,
}

impl ClassArm {
    pub const ALL: [ClassArm; 4] = [Self::Alpha, Self::Beta, Self::Gamma, Self::Delta];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alpha => "Alpha",
            Self::Beta => "Beta",
            Self::Gamma => "Gamma",
            Self::Delta => "Delta",
        }
    }

    pub const fn initial(&self) -> char {
        match self {
            Self::Alpha => 'A',
            Self::Beta => 'B',
            Self::Gamma => 'G',
            Self::Delta => 'D',
        }
    }
}

impl fmt::Display for ClassArm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassArm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|arm| arm.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown class arm: {s}"))
    }
}

impl TryFrom<String> for ClassArm {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SchoolClass {
    pub id: ClassId,
    /// e.g. `JSS 1`
    pub name: String,
    /// e.g. `J1`
    pub short_name: String,
    pub level: i16,
    #[sqlx(try_from = "Option<String>")]
    pub arm: OptionalArm,
}

/// Nullable `classes.arm` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct OptionalArm(pub Option<ClassArm>);

impl TryFrom<Option<String>> for OptionalArm {
    type Error = String;

    fn try_from(value: Option<String>) -> Result<Self, Self::Error> {
        value.map(ClassArm::try_from).transpose().map(OptionalArm)
    }
}

impl SchoolClass {
    /// `JSS 1 Alpha`, or just the name when there is no arm.
    pub fn full_name(&self) -> String {
        match self.arm.0 {
            Some(arm) => format!("{} {}", self.name, arm),
            None => self.name.clone(),
        }
    }

    /// `J1A`, or just the short name when there is no arm.
    pub fn display_code(&self) -> String {
        match self.arm.0 {
            Some(arm) => format!("{}{}", self.short_name, arm.initial()),
            None => self.short_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub current_class_id: Option<ClassId>,
    pub is_active: bool,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(arm: Option<ClassArm>) -> SchoolClass {
        SchoolClass {
            id: ClassId::new(),
            name: "JSS 1".into(),
            short_name: "J1".into(),
            level: 1,
            arm: OptionalArm(arm),
        }
    }

    #[test]
    fn test_class_names_with_arm() {
        let c = class(Some(ClassArm::Gamma));
        assert_eq!(c.full_name(), "JSS 1 Gamma");
        assert_eq!(c.display_code(), "J1G");
    }

    #[test]
    fn test_class_names_without_arm() {
        let c = class(None);
        assert_eq!(c.full_name(), "JSS 1");
        assert_eq!(c.display_code(), "J1");
    }

    #[test]
    fn test_arm_parsing() {
        assert_eq!("beta".parse::<ClassArm>(), Ok(ClassArm::Beta));
        assert!("Omega".parse::<ClassArm>().is_err());
        assert_eq!(OptionalArm::try_from(None), Ok(OptionalArm(None)));
        assert_eq!(
            OptionalArm::try_from(Some("Delta".to_string())),
            Ok(OptionalArm(Some(ClassArm::Delta)))
        );
    }
}
