//! Seed rows and the knobs that control how many of them are generated.

use rust_decimal::Decimal;
use schoolbook_models::ids::{ClassId, ExamTypeId, StudentId, SubjectId};

pub struct StudentSeed {
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub class_id: ClassId,
}

pub struct ResultSeed {
    pub student_id: StudentId,
    pub subject_id: SubjectId,
    pub exam_type_id: ExamTypeId,
    pub score: Decimal,
}

/// An exam type as the result generator needs it.
#[derive(Clone, Copy)]
pub struct ExamTypeSeed {
    pub id: ExamTypeId,
    pub max_score: Decimal,
}

#[derive(Clone)]
pub struct SeedConfig {
    /// Class levels, JSS 1 upwards (at most 6)
    pub levels: usize,
    /// Arms per level (at most 4)
    pub arms_per_level: usize,
    pub students_per_class: usize,
    /// Subjects taken from the built-in list
    pub subjects: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            levels: 6,
            arms_per_level: 2,
            students_per_class: 25,
            subjects: 8,
        }
    }
}

impl SeedConfig {
    pub fn with_classes(mut self, levels: usize, arms_per_level: usize) -> Self {
        self.levels = levels;
        self.arms_per_level = arms_per_level;
        self
    }

    pub fn with_students_per_class(mut self, students: usize) -> Self {
        self.students_per_class = students;
        self
    }

    pub fn with_subjects(mut self, subjects: usize) -> Self {
        self.subjects = subjects;
        self
    }

    pub fn total_classes(&self) -> usize {
        self.levels.min(6) * self.arms_per_level.min(4)
    }

    pub fn total_students(&self) -> usize {
        self.total_classes() * self.students_per_class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_are_capped_by_available_levels_and_arms() {
        let config = SeedConfig::default()
            .with_classes(10, 9)
            .with_students_per_class(20);
        assert_eq!(config.total_classes(), 24);
        assert_eq!(config.total_students(), 480);
    }

    #[test]
    fn test_default_totals() {
        let config = SeedConfig::default();
        assert_eq!(config.total_classes(), 12);
        assert_eq!(config.total_students(), 300);
    }
}
