pub mod assignment;
pub mod category;
pub mod course;
pub mod grade;
pub mod legacy;
pub mod profile;
pub mod transcript;
pub mod weights;
