use crate::model::profile::Profile;
use crate::repository::ProfileRepository;
use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const DEGREE_CREDITS: f64 = 120.0;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DegreeProgress {
    pub student: String,
    pub major: Option<String>,
    pub emphasis: Option<String>,
    pub current_semester: u32,
    pub gpa: f64,
    pub credits_completed: f64,
    pub credits_remaining: f64,
    /// Whole percent of the degree completed; may exceed 100.
    pub progress_percent: u32,
    pub recommendations: Vec<String>,
}

pub struct DegreeProgressUseCase<'a, R: ProfileRepository> {
    profile_repo: &'a R,
}

impl<'a, R: ProfileRepository> DegreeProgressUseCase<'a, R> {
    pub fn new(profile_repo: &'a R) -> Self {
        Self { profile_repo }
    }

    pub fn calculate(&self) -> Result<DegreeProgress> {
        Ok(progress_for(&self.profile_repo.load()?))
    }
}

pub fn progress_percent(credits_completed: f64) -> u32 {
    if credits_completed > 0.0 {
        (credits_completed / DEGREE_CREDITS * 100.0).round() as u32
    } else {
        0
    }
}

pub fn progress_for(profile: &Profile) -> DegreeProgress {
    let recommendations = match &profile.major {
        Some(major) => vec![
            format!("Complete core requirements for {}", major),
            "Consider taking advanced courses in your field".to_string(),
            "Meet with your academic advisor to plan next semester".to_string(),
        ],
        None => vec!["Select a major in your profile to get personalized recommendations".to_string()],
    };

    DegreeProgress {
        student: profile.full_name(),
        major: profile.major.clone(),
        emphasis: profile.emphasis.clone(),
        current_semester: profile.current_semester,
        gpa: profile.gpa,
        credits_completed: profile.credits_completed,
        credits_remaining: (DEGREE_CREDITS - profile.credits_completed).max(0.0),
        progress_percent: progress_percent(profile.credits_completed),
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockProfileRepo(Profile);

    impl ProfileRepository for MockProfileRepo {
        fn load(&self) -> Result<Profile> { Ok(self.0.clone()) }
        fn save(&self, _profile: &Profile) -> Result<()> { unimplemented!() }
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0.0), 0);
        assert_eq!(progress_percent(-3.0), 0);
        assert_eq!(progress_percent(30.0), 25);
        assert_eq!(progress_percent(61.0), 51);
        assert_eq!(progress_percent(130.0), 108);
    }

    #[test]
    fn test_progress_from_profile() {
        let mut profile = Profile::default();
        profile.first_name = "Alan".to_string();
        profile.major = Some("Computer Science".to_string());
        profile.credits_completed = 45.0;

        let progress = DegreeProgressUseCase::new(&MockProfileRepo(profile)).calculate().unwrap();
        assert_eq!(progress.student, "Alan");
        assert_eq!(progress.progress_percent, 38);
        assert_eq!(progress.credits_remaining, 75.0);
        assert!(progress.recommendations[0].contains("Computer Science"));
    }

    #[test]
    fn test_progress_without_major() {
        let mut profile = Profile::default();
        profile.credits_completed = 150.0;
        let progress = progress_for(&profile);
        assert_eq!(progress.credits_remaining, 0.0);
        assert_eq!(progress.recommendations.len(), 1);
    }
}
