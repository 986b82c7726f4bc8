use thiserror::Error;

use crate::model::category::Category;

/// Domain errors raised by services and parsers. The grade engine itself never fails.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradeDeskError {
    #[error("Weight for {category} must be between 0 and 100 (got {weight})")]
    WeightOutOfRange { category: Category, weight: i32 },

    #[error("Category weights must total 100% (got {0}%)")]
    WeightsDoNotSum(i32),

    #[error("{kind} matching '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Ambiguous {kind} id '{prefix}' matches {count} entries")]
    AmbiguousId {
        kind: &'static str,
        prefix: String,
        count: usize,
    },

    #[error("Unknown category: '{0}' (expected HW, Quiz, Midterm or Final)")]
    UnknownCategory(String),

    #[error("Unknown status: '{0}' (expected nothing, started, submitted or late)")]
    UnknownStatus(String),

    #[error("Unknown grade: '{0}'")]
    UnknownGrade(String),

    #[error("Invalid number for {key}: '{value}'")]
    InvalidNumber { key: String, value: String },
}
