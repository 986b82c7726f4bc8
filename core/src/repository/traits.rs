use crate::model::course::SemesterCourse;
use crate::model::profile::Profile;
use anyhow::Result;
use uuid::Uuid;

pub trait SemesterCourseRepository {
    fn create(&self, course: SemesterCourse) -> Result<SemesterCourse>;
    fn get(&self, id: &Uuid) -> Result<SemesterCourse>;
    fn list(&self) -> Result<Vec<SemesterCourse>>;
    fn update(&self, course: &SemesterCourse) -> Result<()>;
    fn delete(&self, id: &Uuid) -> Result<()>;
}

pub trait ProfileRepository {
    /// Returns the stored profile, or a default one when nothing has been saved yet.
    fn load(&self) -> Result<Profile>;
    fn save(&self, profile: &Profile) -> Result<()>;
}
