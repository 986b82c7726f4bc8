pub mod degree_progress;
pub mod semester_stats;
