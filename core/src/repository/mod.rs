pub mod file;
pub mod profile;
pub mod traits;

pub use file::FileSemesterCourseRepository;
pub use profile::FileProfileRepository;
pub use traits::{ProfileRepository, SemesterCourseRepository};
