pub mod config;
pub mod error;
pub mod grading;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use error::GradeDeskError;
pub use grading::{aggregate_by_category, classify_letter_grade, compute_overall_grade};
pub use model::assignment::{Assignment, AssignmentPatch, AssignmentStatus};
pub use model::category::{Category, CATEGORIES};
pub use model::course::{CourseInfo, SemesterCourse};
pub use model::grade::{CategoryGrade, CategoryGrades, LetterGrade, OverallGrade};
pub use model::profile::{Profile, ProfilePatch};
pub use model::transcript::{Transcript, TranscriptCourse, TranscriptGrade};
pub use model::weights::CategoryWeights;
pub use repository::{FileProfileRepository, FileSemesterCourseRepository, ProfileRepository, SemesterCourseRepository};
pub use input::{parse_args, expand_key, normalize_metadata, ParsedInput};
pub use time::parse_due_date;
pub use service::course_service::{SemesterCourseService, filter_assignments, find_assignment};
pub use service::transcript_service::TranscriptService;
pub use service::dto::CourseReport;
