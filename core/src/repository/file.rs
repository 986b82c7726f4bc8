use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::GradeDeskError;
use crate::model::course::SemesterCourse;
use crate::repository::traits::SemesterCourseRepository;

const DEFAULT_FILE_NAME: &str = "courses.json";

#[derive(Clone)]
pub struct FileSemesterCourseRepository {
    file_path: PathBuf,
}

impl FileSemesterCourseRepository {
    /// Opens `courses.json` inside `data_dir`, writing an empty list if it does not exist yet.
    pub fn new(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(DEFAULT_FILE_NAME);

        if !path.exists() {
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &Vec::<SemesterCourse>::new())?;
            writer.flush()?;
        }

        Ok(FileSemesterCourseRepository { file_path: path })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_courses(&self) -> Result<Vec<SemesterCourse>> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let courses: Vec<SemesterCourse> = serde_json::from_reader(reader)?;
        debug!("Read {} courses from {}", courses.len(), self.file_path.display());
        Ok(courses)
    }

    fn write_courses(&self, courses: &[SemesterCourse]) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, courses)?;
        writer.flush()?;
        debug!("Wrote {} courses to {}", courses.len(), self.file_path.display());
        Ok(())
    }
}

fn not_found(id: &Uuid) -> GradeDeskError {
    GradeDeskError::NotFound {
        kind: "Course",
        id: id.to_string(),
    }
}

impl SemesterCourseRepository for FileSemesterCourseRepository {
    fn create(&self, course: SemesterCourse) -> Result<SemesterCourse> {
        let mut courses = self.read_courses()?;
        courses.push(course.clone());
        self.write_courses(&courses)?;
        info!("Created course {} ({})", course.course.name, course.id);
        Ok(course)
    }

    fn get(&self, id: &Uuid) -> Result<SemesterCourse> {
        self.read_courses()?
            .into_iter()
            .find(|c| c.id == *id)
            .ok_or_else(|| not_found(id).into())
    }

    fn list(&self) -> Result<Vec<SemesterCourse>> {
        self.read_courses()
    }

    fn update(&self, course: &SemesterCourse) -> Result<()> {
        let mut courses = self.read_courses()?;
        if let Some(pos) = courses.iter().position(|c| c.id == course.id) {
            courses[pos] = course.clone();
            self.write_courses(&courses)?;
            Ok(())
        } else {
            Err(not_found(&course.id).into())
        }
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let mut courses = self.read_courses()?;
        let initial_len = courses.len();
        courses.retain(|c| c.id != *id);

        if courses.len() == initial_len {
            return Err(not_found(id).into());
        }

        self.write_courses(&courses)?;
        info!("Deleted course {}", id);
        Ok(())
    }
}
