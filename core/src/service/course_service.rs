use crate::error::GradeDeskError;
use crate::model::assignment::{Assignment, AssignmentPatch, AssignmentStatus};
use crate::model::category::Category;
use crate::model::course::{CourseInfo, SemesterCourse};
use crate::model::legacy::LegacySemesterCourse;
use crate::model::weights::CategoryWeights;
use crate::repository::SemesterCourseRepository;
use crate::service::dto::CourseReport;
use crate::service::lookup::find_by_prefix;
use anyhow::Result;
use tracing::info;
use uuid::Uuid;

pub struct SemesterCourseService<R: SemesterCourseRepository> {
    repo: R,
}

impl<R: SemesterCourseRepository> SemesterCourseService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_course(&self, course: CourseInfo, weights: CategoryWeights) -> Result<SemesterCourse> {
        weights.validate()?;
        self.repo.create(SemesterCourse::new(course, weights))
    }

    /// Stores an imported course as-is. Its weights are not validated, matching
    /// what the original record already holds.
    pub fn import_course(&self, legacy: LegacySemesterCourse) -> Result<SemesterCourse> {
        let course = legacy.into_course();
        info!(
            "Importing course {} with {} assignments",
            course.course.name,
            course.assignments.len()
        );
        self.repo.create(course)
    }

    pub fn list_courses(&self) -> Result<Vec<SemesterCourse>> {
        self.repo.list()
    }

    pub fn get_course(&self, id: &Uuid) -> Result<SemesterCourse> {
        self.repo.get(id)
    }

    pub fn find_course(&self, id_prefix: &str) -> Result<SemesterCourse> {
        let courses = self.repo.list()?;
        let course = find_by_prefix(&courses, id_prefix, "Course", |c| c.id)?;
        Ok(course.clone())
    }

    pub fn update_course_info(&self, id: &Uuid, info: CourseInfo) -> Result<SemesterCourse> {
        let mut course = self.repo.get(id)?;
        course.course = info;
        self.repo.update(&course)?;
        Ok(course)
    }

    pub fn update_weights(&self, id: &Uuid, weights: CategoryWeights) -> Result<SemesterCourse> {
        weights.validate()?;
        let mut course = self.repo.get(id)?;
        course.weights = weights;
        self.repo.update(&course)?;
        info!("Updated weights for course {}", id);
        Ok(course)
    }

    pub fn delete_course(&self, id: &Uuid) -> Result<()> {
        self.repo.delete(id)
    }

    pub fn course_report(&self, id: &Uuid) -> Result<CourseReport> {
        Ok(CourseReport::from_entity(self.repo.get(id)?))
    }

    pub fn course_reports(&self) -> Result<Vec<CourseReport>> {
        Ok(self
            .repo
            .list()?
            .into_iter()
            .map(CourseReport::from_entity)
            .collect())
    }

    // Assignment management. Every mutation is keyed on the assignment id.

    pub fn add_assignment(&self, course_id: &Uuid, assignment: Assignment) -> Result<Assignment> {
        let mut course = self.repo.get(course_id)?;
        course.assignments.push(assignment.clone());
        self.repo.update(&course)?;
        info!("Added assignment {} to course {}", assignment.id, course_id);
        Ok(assignment)
    }

    pub fn update_assignment(
        &self,
        course_id: &Uuid,
        assignment_id: &Uuid,
        patch: AssignmentPatch,
    ) -> Result<Assignment> {
        let mut course = self.repo.get(course_id)?;
        let assignment = course
            .assignments
            .iter_mut()
            .find(|a| a.id == *assignment_id)
            .ok_or_else(|| assignment_not_found(assignment_id))?;

        assignment.apply(patch);
        let updated = assignment.clone();
        self.repo.update(&course)?;
        Ok(updated)
    }

    pub fn set_status(
        &self,
        course_id: &Uuid,
        assignment_id: &Uuid,
        status: AssignmentStatus,
    ) -> Result<Assignment> {
        self.update_assignment(
            course_id,
            assignment_id,
            AssignmentPatch {
                status: Some(status),
                ..Default::default()
            },
        )
    }

    pub fn delete_assignment(&self, course_id: &Uuid, assignment_id: &Uuid) -> Result<()> {
        let mut course = self.repo.get(course_id)?;
        let initial_len = course.assignments.len();
        course.assignments.retain(|a| a.id != *assignment_id);

        if course.assignments.len() == initial_len {
            return Err(assignment_not_found(assignment_id).into());
        }

        self.repo.update(&course)?;
        info!("Deleted assignment {} from course {}", assignment_id, course_id);
        Ok(())
    }
}

fn assignment_not_found(id: &Uuid) -> GradeDeskError {
    GradeDeskError::NotFound {
        kind: "Assignment",
        id: id.to_string(),
    }
}

pub fn find_assignment<'a>(course: &'a SemesterCourse, id_prefix: &str) -> Result<&'a Assignment> {
    Ok(find_by_prefix(&course.assignments, id_prefix, "Assignment", |a| a.id)?)
}

/// Assignments of `category` (all categories when `None`) whose name or
/// description contains `term`, ignoring case. An empty term matches everything.
pub fn filter_assignments<'a>(
    assignments: &'a [Assignment],
    category: Option<Category>,
    term: &str,
) -> Vec<&'a Assignment> {
    let term = term.trim().to_lowercase();
    assignments
        .iter()
        .filter(|a| category.map_or(true, |c| a.category == c))
        .filter(|a| {
            term.is_empty()
                || a.name.to_lowercase().contains(&term)
                || a.description.to_lowercase().contains(&term)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::grade::LetterGrade;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MockCourseRepo {
        courses: RefCell<Vec<SemesterCourse>>,
    }

    impl SemesterCourseRepository for MockCourseRepo {
        fn create(&self, course: SemesterCourse) -> Result<SemesterCourse> {
            self.courses.borrow_mut().push(course.clone());
            Ok(course)
        }
        fn get(&self, id: &Uuid) -> Result<SemesterCourse> {
            self.courses
                .borrow()
                .iter()
                .find(|c| c.id == *id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("missing"))
        }
        fn list(&self) -> Result<Vec<SemesterCourse>> {
            Ok(self.courses.borrow().clone())
        }
        fn update(&self, course: &SemesterCourse) -> Result<()> {
            let mut courses = self.courses.borrow_mut();
            let pos = courses.iter().position(|c| c.id == course.id).ok_or_else(|| anyhow::anyhow!("missing"))?;
            courses[pos] = course.clone();
            Ok(())
        }
        fn delete(&self, id: &Uuid) -> Result<()> {
            self.courses.borrow_mut().retain(|c| c.id != *id);
            Ok(())
        }
    }

    fn service_with_course() -> (SemesterCourseService<MockCourseRepo>, Uuid) {
        let service = SemesterCourseService::new(MockCourseRepo::default());
        let course = service
            .create_course(CourseInfo::new("Algorithms".to_string(), 3), CategoryWeights::default())
            .unwrap();
        (service, course.id)
    }

    fn graded(name: &str, category: Category, grade: f64, points: f64) -> Assignment {
        let mut a = Assignment::new(name.to_string(), category);
        a.grade = Some(grade);
        a.points = points;
        a
    }

    #[test]
    fn test_create_course_validates_weights() {
        let service = SemesterCourseService::new(MockCourseRepo::default());
        let err = service
            .create_course(CourseInfo::new("Bad".to_string(), 3), CategoryWeights::new(50, 50, 50, 50))
            .unwrap_err();
        assert_eq!(err.downcast_ref::<GradeDeskError>(), Some(&GradeDeskError::WeightsDoNotSum(200)));
        assert!(service.list_courses().unwrap().is_empty());
    }

    #[test]
    fn test_update_weights_rejects_out_of_range() {
        let (service, id) = service_with_course();
        assert!(service.update_weights(&id, CategoryWeights::new(110, -10, 0, 0)).is_err());
        let updated = service.update_weights(&id, CategoryWeights::new(40, 10, 20, 30)).unwrap();
        assert_eq!(updated.weights.homework, 40);
        assert_eq!(service.get_course(&id).unwrap().weights.homework, 40);
    }

    #[test]
    fn test_assignment_lifecycle_drives_report() {
        let (service, id) = service_with_course();
        let hw1 = service.add_assignment(&id, graded("HW1", Category::Homework, 9.0, 10.0)).unwrap();
        service.add_assignment(&id, graded("HW2", Category::Homework, 18.0, 20.0)).unwrap();

        let report = service.course_report(&id).unwrap();
        assert!((report.overall.percentage - 90.0).abs() < 1e-9);
        assert_eq!(report.overall.letter, LetterGrade::AMinus);

        service
            .update_assignment(&id, &hw1.id, AssignmentPatch { grade: Some(10.0), ..Default::default() })
            .unwrap();
        let report = service.course_report(&id).unwrap();
        assert_eq!(report.category_grades[&Category::Homework].earned, 28.0);

        service.delete_assignment(&id, &hw1.id).unwrap();
        let course = service.get_course(&id).unwrap();
        assert_eq!(course.assignments.len(), 1);
        assert!(service.delete_assignment(&id, &hw1.id).is_err());
    }

    #[test]
    fn test_duplicate_content_assignments_are_independent() {
        let (service, id) = service_with_course();
        let first = service.add_assignment(&id, graded("Quiz", Category::Quiz, 5.0, 10.0)).unwrap();
        let mut twin = first.clone();
        twin.id = Uuid::new_v4();
        service.add_assignment(&id, twin.clone()).unwrap();

        service.set_status(&id, &twin.id, AssignmentStatus::Late).unwrap();
        service.delete_assignment(&id, &first.id).unwrap();

        let course = service.get_course(&id).unwrap();
        assert_eq!(course.assignments.len(), 1);
        assert_eq!(course.assignments[0].id, twin.id);
        assert_eq!(course.assignments[0].status, AssignmentStatus::Late);
    }

    #[test]
    fn test_find_course_and_assignment_by_prefix() {
        let (service, id) = service_with_course();
        let found = service.find_course(&id.to_string()[..6]).unwrap();
        assert_eq!(found.id, id);

        let added = service.add_assignment(&id, graded("Midterm", Category::Midterm, 80.0, 100.0)).unwrap();
        let course = service.get_course(&id).unwrap();
        assert_eq!(find_assignment(&course, &added.short_id()).unwrap().id, added.id);
        assert!(find_assignment(&course, "zzzz").is_err());
    }

    #[test]
    fn test_filter_assignments() {
        let mut reading = Assignment::new("Reading".to_string(), Category::Homework);
        reading.description = "Chapter 3 of the Textbook".to_string();
        let assignments = vec![
            reading,
            Assignment::new("Problem Set".to_string(), Category::Homework),
            Assignment::new("Pop quiz".to_string(), Category::Quiz),
        ];

        assert_eq!(filter_assignments(&assignments, Some(Category::Homework), "").len(), 2);
        assert_eq!(filter_assignments(&assignments, Some(Category::Homework), "textbook").len(), 1);
        assert_eq!(filter_assignments(&assignments, None, "P").len(), 3);
        assert_eq!(filter_assignments(&assignments, Some(Category::Final), "").len(), 0);
    }

    #[test]
    fn test_import_keeps_original_weights() {
        let service = SemesterCourseService::new(MockCourseRepo::default());
        let legacy: LegacySemesterCourse = serde_json::from_str(
            r#"{ "course": { "name": "Legacy", "credits": "2" }, "weights": [ { "HW": 60, "Quiz": 60, "Midterm": 0, "Final": 0 } ], "assignments": "[]" }"#,
        )
        .unwrap();
        let course = service.import_course(legacy).unwrap();
        assert_eq!(course.weights.total(), 120);
        assert_eq!(service.list_courses().unwrap().len(), 1);
    }
}
