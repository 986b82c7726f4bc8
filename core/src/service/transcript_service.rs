use crate::model::profile::{canonical_major, offers_emphasis, Profile, ProfilePatch};
use crate::model::transcript::{TranscriptCourse, TranscriptGrade};
use crate::repository::ProfileRepository;
use crate::service::lookup::find_by_prefix;
use anyhow::Result;
use tracing::{info, warn};

/// Owns the student profile and its transcript. GPA and completed credits are
/// recomputed from the transcript on every save.
pub struct TranscriptService<R: ProfileRepository> {
    repo: R,
}

impl<R: ProfileRepository> TranscriptService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn profile(&self) -> Result<Profile> {
        self.repo.load()
    }

    pub fn update_profile(&self, patch: ProfilePatch) -> Result<Profile> {
        let mut profile = self.repo.load()?;

        if let Some(major) = patch.major {
            match canonical_major(&major) {
                Some(known) => profile.major = Some(known.to_string()),
                None => {
                    warn!("'{}' is not in the list of known majors", major);
                    profile.major = Some(major);
                }
            }
        }
        if let Some(v) = patch.first_name {
            profile.first_name = v;
        }
        if let Some(v) = patch.last_name {
            profile.last_name = v;
        }
        if let Some(v) = patch.email {
            profile.email = Some(v);
        }
        if let Some(v) = patch.emphasis {
            if let Some(major) = profile.major.as_deref() {
                if offers_emphasis(major, &v) == Some(false) {
                    warn!("'{}' is not an emphasis offered for {}", v, major);
                }
            }
            profile.emphasis = Some(v);
        }
        if let Some(v) = patch.current_semester {
            profile.current_semester = v.max(1);
        }

        self.save(profile)
    }

    pub fn add_course(&self, course: TranscriptCourse) -> Result<Profile> {
        let mut profile = self.repo.load()?;
        info!("Adding {} to transcript", course.name);
        profile.transcript.courses.push(course);
        self.save(profile)
    }

    pub fn set_course_grade(&self, id_prefix: &str, grade: Option<TranscriptGrade>) -> Result<Profile> {
        let mut profile = self.repo.load()?;
        let id = find_by_prefix(&profile.transcript.courses, id_prefix, "Transcript course", |c| c.id)?.id;
        if let Some(course) = profile.transcript.courses.iter_mut().find(|c| c.id == id) {
            course.grade = grade;
        }
        self.save(profile)
    }

    pub fn remove_course(&self, id_prefix: &str) -> Result<Profile> {
        let mut profile = self.repo.load()?;
        let id = find_by_prefix(&profile.transcript.courses, id_prefix, "Transcript course", |c| c.id)?.id;
        profile.transcript.courses.retain(|c| c.id != id);
        info!("Removed {} from transcript", id);
        self.save(profile)
    }

    fn save(&self, mut profile: Profile) -> Result<Profile> {
        profile.refresh_totals();
        self.repo.save(&profile)?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MockProfileRepo {
        profile: RefCell<Option<Profile>>,
    }

    impl ProfileRepository for MockProfileRepo {
        fn load(&self) -> Result<Profile> {
            Ok(self.profile.borrow().clone().unwrap_or_default())
        }
        fn save(&self, profile: &Profile) -> Result<()> {
            *self.profile.borrow_mut() = Some(profile.clone());
            Ok(())
        }
    }

    fn course(name: &str, credits: f64, grade: &str) -> TranscriptCourse {
        TranscriptCourse::new(name.to_string(), credits, Some(grade.parse().unwrap()))
    }

    #[test]
    fn test_totals_follow_transcript_edits() {
        let service = TranscriptService::new(MockProfileRepo::default());
        service.add_course(course("Calculus I", 4.0, "A")).unwrap();
        let profile = service.add_course(course("Composition", 3.0, "B")).unwrap();

        assert!((profile.gpa - (16.0 + 9.0) / 7.0).abs() < 1e-9);
        assert_eq!(profile.credits_completed, 7.0);

        let composition = profile.transcript.courses[1].short_id();
        let profile = service.remove_course(&composition).unwrap();
        assert_eq!(profile.gpa, 4.0);
        assert_eq!(profile.credits_completed, 4.0);
        assert_eq!(service.profile().unwrap(), profile);
    }

    #[test]
    fn test_set_grade_and_unknown_course() {
        let service = TranscriptService::new(MockProfileRepo::default());
        let profile = service
            .add_course(TranscriptCourse::new("Ethics".to_string(), 3.0, None))
            .unwrap();
        assert_eq!(profile.credits_completed, 0.0);

        let id = profile.transcript.courses[0].short_id();
        let profile = service.set_course_grade(&id, Some("C+".parse().unwrap())).unwrap();
        assert!((profile.gpa - 2.3).abs() < 1e-9);
        assert_eq!(profile.credits_completed, 3.0);

        assert!(service.remove_course("ffffffff").is_err());
    }

    #[test]
    fn test_update_profile_patch() {
        let service = TranscriptService::new(MockProfileRepo::default());
        let profile = service
            .update_profile(ProfilePatch {
                first_name: Some("Grace".to_string()),
                major: Some("Astrology".to_string()),
                current_semester: Some(0),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(profile.first_name, "Grace");
        // Unknown majors are kept, only logged
        assert_eq!(profile.major.as_deref(), Some("Astrology"));
        assert_eq!(profile.current_semester, 1);
    }

    #[test]
    fn test_major_stored_with_catalog_spelling() {
        let service = TranscriptService::new(MockProfileRepo::default());
        let profile = service
            .update_profile(ProfilePatch {
                major: Some("computer science".to_string()),
                emphasis: Some("Data Science".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(profile.major.as_deref(), Some("Computer Science"));
        assert_eq!(profile.emphasis.as_deref(), Some("Data Science"));
        assert_eq!(offers_emphasis(profile.major.as_deref().unwrap(), "Data Science"), Some(true));
    }
}
