use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use gradedesk_core::input::{
    parse_integer, parse_number, ASSIGNMENT_KEYS, COURSE_KEYS, PROFILE_KEYS, TRANSCRIPT_KEYS,
};
use gradedesk_core::model::legacy::LegacySemesterCourse;
use gradedesk_core::usecase::degree_progress::DegreeProgressUseCase;
use gradedesk_core::usecase::semester_stats::SemesterStatsUseCase;
use gradedesk_core::{
    filter_assignments, find_assignment, normalize_metadata, parse_args, parse_due_date, Assignment,
    AssignmentPatch, AssignmentStatus, Category, CategoryWeights, CourseInfo, FileProfileRepository,
    FileSemesterCourseRepository, ProfilePatch, SemesterCourseService, TranscriptCourse,
    TranscriptGrade, TranscriptService, CATEGORIES,
};
use tracing::{debug, warn};

use crate::report;

/// File-backed stores and the services built on them for one data directory.
pub struct Workspace {
    course_repo: FileSemesterCourseRepository,
    profile_repo: FileProfileRepository,
    pub courses: SemesterCourseService<FileSemesterCourseRepository>,
    pub transcript: TranscriptService<FileProfileRepository>,
}

impl Workspace {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let course_repo = FileSemesterCourseRepository::new(data_dir)?;
        let profile_repo = FileProfileRepository::new(data_dir)?;
        Ok(Self {
            courses: SemesterCourseService::new(course_repo.clone()),
            transcript: TranscriptService::new(profile_repo.clone()),
            course_repo,
            profile_repo,
        })
    }

    // --- Courses ---

    pub fn add_course(&self, args: &[String]) -> Result<()> {
        let parsed = parse_args(args);
        if parsed.name.is_empty() {
            return Err(anyhow!("Course name is required."));
        }
        let meta = normalized(parsed.metadata, COURSE_KEYS);

        let mut info = CourseInfo::new(parsed.name, 0);
        if let Some(credits) = meta.get("credits") {
            info.credits = parse_credits(credits)?;
        }
        info.code = meta.get("code").cloned();
        info.description = meta.get("description").cloned();

        let weights = apply_weights(CategoryWeights::default(), &meta)?;
        let course = self.courses.create_course(info, weights)?;

        println!("Course added: {} (ID: {})", course.course.display_name(), course.short_id());
        println!("  Credits: {}", course.course.credits);
        println!("  Weights: {}", report::format_weights(&course.weights));
        Ok(())
    }

    pub fn list_courses(&self) -> Result<()> {
        let reports = self.courses.course_reports()?;
        report::print_course_list(&reports);
        Ok(())
    }

    pub fn show_course(&self, course: &str) -> Result<()> {
        let course = self.courses.find_course(course)?;
        let report = self.courses.course_report(&course.id)?;
        report::print_course_detail(&report);
        Ok(())
    }

    pub fn update_course(&self, course: &str, args: &[String]) -> Result<()> {
        let course = self.courses.find_course(course)?;
        let parsed = parse_args(args);
        let meta = normalized(parsed.metadata, COURSE_KEYS);

        let mut info = course.course.clone();
        if !parsed.name.is_empty() {
            info.name = parsed.name;
        }
        if let Some(credits) = meta.get("credits") {
            info.credits = parse_credits(credits)?;
        }
        if let Some(code) = meta.get("code") {
            info.code = Some(code.clone());
        }
        if let Some(desc) = meta.get("description") {
            info.description = Some(desc.clone());
        }
        if CATEGORIES.iter().any(|c| meta.contains_key(&c.label().to_lowercase())) {
            warn!("Weights are changed with `course weights`, not `course set`");
        }
        if info == course.course {
            return Err(anyhow!("Nothing to change. Use key:value pairs such as credits:4."));
        }

        let updated = self.courses.update_course_info(&course.id, info)?;
        println!(
            "Course updated: {} ({} credits)",
            updated.course.display_name(),
            updated.course.credits
        );
        Ok(())
    }

    pub fn set_weights(&self, course: &str, args: &[String]) -> Result<()> {
        let course = self.courses.find_course(course)?;
        let meta = normalized(parse_args(args).metadata, COURSE_KEYS);
        let weights = apply_weights(course.weights, &meta)?;

        let updated = self.courses.update_weights(&course.id, weights)?;
        println!(
            "Weights for {}: {}",
            updated.course.display_name(),
            report::format_weights(&updated.weights)
        );
        Ok(())
    }

    pub fn remove_course(&self, course: &str) -> Result<()> {
        let course = self.courses.find_course(course)?;
        self.courses.delete_course(&course.id)?;
        println!("Course removed: {}", course.course.display_name());
        Ok(())
    }

    pub fn import_course(&self, file: &Path) -> Result<()> {
        let content = fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let legacy: LegacySemesterCourse = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a course export", file.display()))?;

        let course = self.courses.import_course(legacy)?;
        if course.weights.validate().is_err() {
            warn!(
                "Imported weights for {} total {}%",
                course.course.name,
                course.weights.total()
            );
        }
        println!(
            "Imported {} with {} assignments (ID: {})",
            course.course.display_name(),
            course.assignments.len(),
            course.short_id()
        );
        Ok(())
    }

    // --- Assignments ---

    pub fn add_assignment(&self, course: &str, args: &[String]) -> Result<()> {
        let course = self.courses.find_course(course)?;
        let parsed = parse_args(args);
        let meta = normalized(parsed.metadata, ASSIGNMENT_KEYS);

        let name = meta.get("name").cloned().unwrap_or(parsed.name);
        if name.is_empty() {
            return Err(anyhow!("Assignment name is required."));
        }

        let mut assignment = Assignment::new(name, Category::default());
        assignment.apply(assignment_patch(&meta)?);

        let added = self.courses.add_assignment(&course.id, assignment)?;
        println!("Assignment added: {} (ID: {})", added.name, added.short_id());
        println!("  Category: {}", added.category.title());
        println!("  Score: {}", report::format_score(&added));
        println!("  Due: {}", added.due_date);
        Ok(())
    }

    pub fn update_assignment(&self, course: &str, assignment: &str, args: &[String]) -> Result<()> {
        let course = self.courses.find_course(course)?;
        let id = find_assignment(&course, assignment)?.id;

        let parsed = parse_args(args);
        let meta = normalized(parsed.metadata, ASSIGNMENT_KEYS);
        let mut patch = assignment_patch(&meta)?;
        if patch.name.is_none() && !parsed.name.is_empty() {
            patch.name = Some(parsed.name);
        }
        if patch.is_empty() {
            return Err(anyhow!("Nothing to change. Use key:value pairs such as grade:18."));
        }

        let updated = self.courses.update_assignment(&course.id, &id, patch)?;
        println!("Assignment updated: {} ({})", updated.name, report::format_score(&updated));
        Ok(())
    }

    pub fn set_status(&self, course: &str, assignment: &str, status: &str) -> Result<()> {
        let course = self.courses.find_course(course)?;
        let id = find_assignment(&course, assignment)?.id;
        let status: AssignmentStatus = status.parse()?;

        let updated = self.courses.set_status(&course.id, &id, status)?;
        println!("{} is now {}", updated.name, updated.status.label());
        Ok(())
    }

    pub fn remove_assignment(&self, course: &str, assignment: &str) -> Result<()> {
        let course = self.courses.find_course(course)?;
        let found = find_assignment(&course, assignment)?;
        self.courses.delete_assignment(&course.id, &found.id)?;
        println!("Assignment removed: {}", found.name);
        Ok(())
    }

    pub fn list_assignments(&self, course: &str, category: Option<&str>, search: Option<&str>) -> Result<()> {
        let course = self.courses.find_course(course)?;
        let category = category.map(str::parse::<Category>).transpose()?;
        let matches = filter_assignments(&course.assignments, category, search.unwrap_or(""));
        report::print_assignments(&matches);
        Ok(())
    }

    // --- Semester, transcript and profile ---

    pub fn semester(&self) -> Result<()> {
        let stats = SemesterStatsUseCase::new(&self.course_repo).calculate()?;
        report::print_semester(&stats);
        Ok(())
    }

    pub fn show_transcript(&self) -> Result<()> {
        report::print_transcript(&self.transcript.profile()?);
        Ok(())
    }

    pub fn add_transcript_course(&self, args: &[String]) -> Result<()> {
        let parsed = parse_args(args);
        if parsed.name.is_empty() {
            return Err(anyhow!("Course name is required."));
        }
        let meta = normalized(parsed.metadata, TRANSCRIPT_KEYS);

        let credits = match meta.get("credits") {
            Some(v) => parse_number("credits", v)?,
            None => 0.0,
        };
        let grade = meta.get("grade").map(|g| g.parse::<TranscriptGrade>()).transpose()?;

        let mut course = TranscriptCourse::new(parsed.name, credits, grade);
        course.description = meta.get("description").cloned();

        let profile = self.transcript.add_course(course)?;
        println!("Transcript updated. GPA {:.2}, {} credits completed", profile.gpa, profile.credits_completed);
        Ok(())
    }

    pub fn grade_transcript_course(&self, course: &str, grade: &str) -> Result<()> {
        let grade = match grade.trim() {
            "-" | "" => None,
            g => Some(g.parse::<TranscriptGrade>()?),
        };
        let profile = self.transcript.set_course_grade(course, grade)?;
        println!("Transcript updated. GPA {:.2}, {} credits completed", profile.gpa, profile.credits_completed);
        Ok(())
    }

    pub fn remove_transcript_course(&self, course: &str) -> Result<()> {
        let profile = self.transcript.remove_course(course)?;
        println!("Transcript updated. GPA {:.2}, {} credits completed", profile.gpa, profile.credits_completed);
        Ok(())
    }

    pub fn show_profile(&self) -> Result<()> {
        report::print_profile(&self.transcript.profile()?);
        Ok(())
    }

    pub fn update_profile(&self, args: &[String]) -> Result<()> {
        let meta = normalized(parse_args(args).metadata, PROFILE_KEYS);
        let patch = profile_patch(&meta)?;
        if patch == ProfilePatch::default() {
            return Err(anyhow!("Nothing to change. Use key:value pairs such as major:Computer_Science."));
        }
        let profile = self.transcript.update_profile(patch)?;
        report::print_profile(&profile);
        Ok(())
    }

    pub fn progress(&self) -> Result<()> {
        let progress = DegreeProgressUseCase::new(&self.profile_repo).calculate()?;
        report::print_progress(&progress);
        Ok(())
    }
}

fn normalized(metadata: HashMap<String, String>, candidates: &[&str]) -> HashMap<String, String> {
    let (meta, warnings) = normalize_metadata(metadata, candidates);
    for warning in warnings {
        warn!("{}", warning);
    }
    debug!("Metadata: {:?}", meta);
    meta
}

fn parse_credits(value: &str) -> Result<u32> {
    let credits = parse_integer("credits", value)?;
    u32::try_from(credits).map_err(|_| anyhow!("Credits cannot be negative: {}", credits))
}

/// Overrides the weights named in `meta` (`hw`, `quiz`, `midterm`, `final`).
fn apply_weights(mut weights: CategoryWeights, meta: &HashMap<String, String>) -> Result<CategoryWeights> {
    for category in CATEGORIES {
        let key = category.label().to_lowercase();
        if let Some(value) = meta.get(&key) {
            weights.set(category, parse_integer(&key, value)?);
        }
    }
    Ok(weights)
}

fn assignment_patch(meta: &HashMap<String, String>) -> Result<AssignmentPatch> {
    let mut patch = AssignmentPatch {
        name: meta.get("name").cloned(),
        description: meta.get("description").cloned(),
        ..Default::default()
    };

    if let Some(v) = meta.get("category") {
        patch.category = Some(v.parse()?);
    }
    if let Some(v) = meta.get("grade") {
        patch.grade = Some(parse_number("grade", v)?);
    }
    if let Some(v) = meta.get("points") {
        patch.points = Some(parse_number("points", v)?);
    }
    if let Some(v) = meta.get("status") {
        patch.status = Some(v.parse()?);
    }
    if let Some(v) = meta.get("due") {
        patch.due_date = Some(parse_due_date(v).with_context(|| format!("Invalid due date '{}'", v))?);
    }
    Ok(patch)
}

fn profile_patch(meta: &HashMap<String, String>) -> Result<ProfilePatch> {
    let current_semester = match meta.get("semester") {
        Some(v) => {
            let semester = parse_integer("semester", v)?;
            Some(u32::try_from(semester).map_err(|_| anyhow!("Semester must be positive: {}", semester))?)
        }
        None => None,
    };

    Ok(ProfilePatch {
        first_name: meta.get("first").cloned(),
        last_name: meta.get("last").cloned(),
        email: meta.get("email").cloned(),
        major: meta.get("major").cloned(),
        emphasis: meta.get("emphasis").cloned(),
        current_semester,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradedesk_core::GradeDeskError;
    use std::env;
    use uuid::Uuid;

    fn meta(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_apply_weights_overrides_only_given() {
        let weights = apply_weights(CategoryWeights::default(), &meta(&[("hw", "40"), ("final", "15")])).unwrap();
        assert_eq!(weights, CategoryWeights::new(40, 15, 30, 15));

        let err = apply_weights(CategoryWeights::default(), &meta(&[("quiz", "lots")])).unwrap_err();
        assert!(matches!(err.downcast_ref::<GradeDeskError>(), Some(GradeDeskError::InvalidNumber { .. })));
    }

    #[test]
    fn test_assignment_patch_from_metadata() {
        let patch = assignment_patch(&meta(&[
            ("category", "quiz"),
            ("grade", "8.5"),
            ("points", "10"),
            ("status", "submitted"),
            ("due", "2025-03-01"),
        ]))
        .unwrap();

        assert_eq!(patch.category, Some(Category::Quiz));
        assert_eq!(patch.grade, Some(8.5));
        assert_eq!(patch.points, Some(10.0));
        assert_eq!(patch.status, Some(AssignmentStatus::Submitted));
        assert_eq!(patch.due_date.map(|d| d.to_string()), Some("2025-03-01".to_string()));

        assert!(assignment_patch(&meta(&[("grade", "NaN")])).is_err());
        assert!(assignment_patch(&meta(&[("category", "lab")])).is_err());
        assert!(assignment_patch(&meta(&[])).unwrap().is_empty());
    }

    #[test]
    fn test_profile_patch_rejects_negative_semester() {
        let patch = profile_patch(&meta(&[("first", "Ada"), ("semester", "3")])).unwrap();
        assert_eq!(patch.first_name.as_deref(), Some("Ada"));
        assert_eq!(patch.current_semester, Some(3));
        assert!(profile_patch(&meta(&[("semester", "-1")])).is_err());
    }

    #[test]
    fn test_workspace_round_trip_on_disk() {
        let dir = env::temp_dir().join(format!("gradedesk-cli-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let workspace = Workspace::open(&dir).unwrap();

        workspace
            .add_course(&args(&["Operating", "Systems", "credits:4", "hw:40", "quiz:10", "midterm:20"]))
            .unwrap();
        let course = workspace.courses.list_courses().unwrap().remove(0);
        assert_eq!(course.course.name, "Operating Systems");
        assert_eq!(course.weights, CategoryWeights::new(40, 10, 20, 30));

        let prefix = course.short_id();
        workspace
            .add_assignment(&prefix, &args(&["Shell", "lab", "cat:HW", "grade:45", "points:50"]))
            .unwrap();
        let report = workspace.courses.course_report(&course.id).unwrap();
        assert!((report.category_grades[&Category::Homework].percentage - 90.0).abs() < 1e-9);

        // Weights that no longer sum to 100 are refused and nothing changes
        assert!(workspace.set_weights(&prefix, &args(&["hw:50"])).is_err());
        assert_eq!(workspace.courses.get_course(&course.id).unwrap().weights.homework, 40);

        workspace.update_course(&prefix, &args(&["code:CS330", "credits:3"])).unwrap();
        let renamed = workspace.courses.get_course(&course.id).unwrap();
        assert_eq!(renamed.course.display_name(), "CS330 Operating Systems");
        assert_eq!(renamed.course.credits, 3);
        assert!(workspace.update_course(&prefix, &args(&[])).is_err());

        workspace.remove_course(&prefix).unwrap();
        assert!(workspace.courses.list_courses().unwrap().is_empty());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_transcript_commands_update_totals() {
        let dir = env::temp_dir().join(format!("gradedesk-cli-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let workspace = Workspace::open(&dir).unwrap();

        workspace.add_transcript_course(&args(&["Linear", "Algebra", "grade:B+", "credits:3"])).unwrap();
        let profile = workspace.transcript.profile().unwrap();
        assert!((profile.gpa - 3.3).abs() < 1e-9);
        assert_eq!(profile.credits_completed, 3.0);

        let id = profile.transcript.courses[0].short_id();
        workspace.grade_transcript_course(&id, "W").unwrap();
        assert_eq!(workspace.transcript.profile().unwrap().credits_completed, 0.0);

        fs::remove_dir_all(&dir).ok();
    }
}
