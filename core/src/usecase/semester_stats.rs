use crate::grading::grade_point_for_percentage;
use crate::model::grade::LetterGrade;
use crate::repository::SemesterCourseRepository;
use crate::service::dto::CourseReport;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CourseStanding {
    pub course_id: Uuid,
    pub name: String,
    pub credits: u32,
    pub percentage: f64,
    pub letter: LetterGrade,
    pub grade_point: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SemesterStats {
    pub gpa: f64,
    pub total_credits: u32,
    pub courses: Vec<CourseStanding>,
}

pub struct SemesterStatsUseCase<'a, R: SemesterCourseRepository> {
    course_repo: &'a R,
}

impl<'a, R: SemesterCourseRepository> SemesterStatsUseCase<'a, R> {
    pub fn new(course_repo: &'a R) -> Self {
        Self { course_repo }
    }

    pub fn calculate(&self) -> Result<SemesterStats> {
        let reports: Vec<CourseReport> = self
            .course_repo
            .list()?
            .into_iter()
            .map(CourseReport::from_entity)
            .collect();
        Ok(summarize(&reports))
    }
}

/// Credit-weighted GPA of the current semester. Every course's credits count,
/// including courses with nothing graded yet (grade point 0).
pub fn summarize(reports: &[CourseReport]) -> SemesterStats {
    let mut total_credits = 0u32;
    let mut total_grade_points = 0.0;
    let mut courses = Vec::with_capacity(reports.len());

    for report in reports {
        let credits = report.course.course.credits;
        let grade_point = grade_point_for_percentage(report.overall.percentage);

        total_credits += credits;
        total_grade_points += grade_point * credits as f64;

        courses.push(CourseStanding {
            course_id: report.course.id,
            name: report.course.course.display_name(),
            credits,
            percentage: report.overall.percentage,
            letter: report.overall.letter,
            grade_point,
        });
    }

    let gpa = if total_credits > 0 {
        total_grade_points / total_credits as f64
    } else {
        0.0
    };

    SemesterStats {
        gpa,
        total_credits,
        courses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::assignment::Assignment;
    use crate::model::category::Category;
    use crate::model::course::{CourseInfo, SemesterCourse};
    use crate::model::weights::CategoryWeights;

    struct MockCourseRepo {
        courses: Vec<SemesterCourse>,
    }

    impl SemesterCourseRepository for MockCourseRepo {
        fn create(&self, _course: SemesterCourse) -> Result<SemesterCourse> { unimplemented!() }
        fn get(&self, _id: &Uuid) -> Result<SemesterCourse> { unimplemented!() }
        fn update(&self, _course: &SemesterCourse) -> Result<()> { unimplemented!() }
        fn delete(&self, _id: &Uuid) -> Result<()> { unimplemented!() }
        fn list(&self) -> Result<Vec<SemesterCourse>> { Ok(self.courses.clone()) }
    }

    fn course_at(name: &str, credits: u32, percent: Option<f64>) -> SemesterCourse {
        let mut course = SemesterCourse::new(CourseInfo::new(name.to_string(), credits), CategoryWeights::default());
        if let Some(p) = percent {
            let mut hw = Assignment::new("HW".to_string(), Category::Homework);
            hw.grade = Some(p);
            hw.points = 100.0;
            course.assignments.push(hw);
        }
        course
    }

    #[test]
    fn test_gpa_weighted_by_credits() {
        let repo = MockCourseRepo {
            courses: vec![course_at("Calculus", 4, Some(92.0)), course_at("History", 2, Some(75.0))],
        };
        let stats = SemesterStatsUseCase::new(&repo).calculate().unwrap();

        assert_eq!(stats.total_credits, 6);
        // (4.0*4 + 2.0*2) / 6
        assert!((stats.gpa - 20.0 / 6.0).abs() < 1e-9);
        assert_eq!(stats.courses[0].letter, LetterGrade::AMinus);
        assert_eq!(stats.courses[1].grade_point, 2.0);
    }

    #[test]
    fn test_ungraded_course_still_counts_credits() {
        let repo = MockCourseRepo {
            courses: vec![course_at("Calculus", 3, Some(100.0)), course_at("New", 3, None)],
        };
        let stats = SemesterStatsUseCase::new(&repo).calculate().unwrap();
        assert_eq!(stats.total_credits, 6);
        assert_eq!(stats.gpa, 2.0);
        assert_eq!(stats.courses[1].letter, LetterGrade::NotApplicable);
    }

    #[test]
    fn test_empty_semester_and_zero_credits() {
        let stats = summarize(&[]);
        assert_eq!(stats, SemesterStats::default());

        let repo = MockCourseRepo {
            courses: vec![course_at("Seminar", 0, Some(95.0))],
        };
        let stats = SemesterStatsUseCase::new(&repo).calculate().unwrap();
        assert_eq!(stats.gpa, 0.0);
        assert_eq!(stats.total_credits, 0);
    }
}
