use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

use crate::grading::{aggregate_by_category, compute_overall_grade};
use crate::model::category::{Category, CATEGORIES};
use crate::model::course::SemesterCourse;
use crate::model::grade::{CategoryGrades, OverallGrade};

/// A course together with everything the reports and dashboard derive from it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CourseReport {
    pub course: SemesterCourse,
    pub category_grades: CategoryGrades,
    pub overall: OverallGrade,
    pub assignment_counts: BTreeMap<Category, usize>,
}

impl CourseReport {
    pub fn from_entity(course: SemesterCourse) -> Self {
        let category_grades = aggregate_by_category(&course.assignments, &CATEGORIES);
        let overall = compute_overall_grade(&category_grades, &course.weights);

        let mut assignment_counts: BTreeMap<Category, usize> =
            CATEGORIES.iter().map(|c| (*c, 0)).collect();
        for assignment in &course.assignments {
            *assignment_counts.entry(assignment.category).or_default() += 1;
        }

        Self {
            course,
            category_grades,
            overall,
            assignment_counts,
        }
    }

    /// True once any category has points on record.
    pub fn has_grades(&self) -> bool {
        self.category_grades.values().any(|g| g.is_graded())
    }
}
