//! Weighted-category grade computation.
//!
//! Assignments are summed per category into earned/total points, category
//! percentages are combined by weight into an overall percentage, and the
//! percentage is looked up on a fixed letter scale. Every function here is pure.

use crate::model::assignment::Assignment;
use crate::model::category::{Category, CATEGORIES};
use crate::model::grade::{CategoryGrade, CategoryGrades, LetterGrade, OverallGrade};
use crate::model::weights::CategoryWeights;

/// Inclusive `(letter, min, max)` bands, checked in order.
pub const GRADE_SCALE: [(LetterGrade, f64, f64); 13] = [
    (LetterGrade::APlus, 97.0, 100.0),
    (LetterGrade::A, 93.0, 96.99),
    (LetterGrade::AMinus, 90.0, 92.99),
    (LetterGrade::BPlus, 87.0, 89.99),
    (LetterGrade::B, 83.0, 86.99),
    (LetterGrade::BMinus, 80.0, 82.99),
    (LetterGrade::CPlus, 77.0, 79.99),
    (LetterGrade::C, 73.0, 76.99),
    (LetterGrade::CMinus, 70.0, 72.99),
    (LetterGrade::DPlus, 67.0, 69.99),
    (LetterGrade::D, 63.0, 66.99),
    (LetterGrade::DMinus, 60.0, 62.99),
    (LetterGrade::F, 0.0, 59.99),
];

/// Returns the first band containing `percentage`, or `NotApplicable` outside the scale.
pub fn classify_letter_grade(percentage: f64) -> LetterGrade {
    GRADE_SCALE
        .iter()
        .find(|(_, min, max)| percentage >= *min && percentage <= *max)
        .map(|(letter, _, _)| *letter)
        .unwrap_or(LetterGrade::NotApplicable)
}

/// Sums grades and points per requested category. Every requested category gets an
/// entry, and assignments outside the requested categories are ignored.
pub fn aggregate_by_category(assignments: &[Assignment], categories: &[Category]) -> CategoryGrades {
    categories
        .iter()
        .map(|category| {
            let (earned, total) = assignments
                .iter()
                .filter(|a| a.category == *category)
                .fold((0.0, 0.0), |(earned, total), a| {
                    (earned + or_zero(a.grade), total + or_zero(Some(a.points)))
                });

            let percentage = if total > 0.0 { earned / total * 100.0 } else { 0.0 };
            (*category, CategoryGrade { earned, total, percentage })
        })
        .collect()
}

/// Weighted average of the graded categories. Categories with no points on record
/// drop out of both the sum and the divisor, so their weight is shared by the rest.
pub fn compute_overall_grade(grades: &CategoryGrades, weights: &CategoryWeights) -> OverallGrade {
    let mut weighted_sum = 0.0;
    let mut applicable_weight = 0.0;
    let mut any_graded = false;

    for category in CATEGORIES {
        if let Some(grade) = grades.get(&category) {
            if grade.is_graded() {
                any_graded = true;
                let weight = weights.get(category) as f64;
                weighted_sum += grade.percentage * weight;
                applicable_weight += weight;
            }
        }
    }

    if !any_graded {
        return OverallGrade::default();
    }

    // Graded work under zero total weight still classifies as 0%
    let percentage = if applicable_weight > 0.0 {
        weighted_sum / applicable_weight
    } else {
        0.0
    };

    OverallGrade {
        percentage,
        letter: classify_letter_grade(percentage),
    }
}

/// Grade point used by the semester rollup: whole points at 90/80/70/60.
pub fn grade_point_for_percentage(percentage: f64) -> f64 {
    if percentage >= 90.0 {
        4.0
    } else if percentage >= 80.0 {
        3.0
    } else if percentage >= 70.0 {
        2.0
    } else if percentage >= 60.0 {
        1.0
    } else {
        0.0
    }
}

fn or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if !v.is_nan() => v,
        _ => 0.0,
    }
}
