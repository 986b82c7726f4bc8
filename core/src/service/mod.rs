pub mod course_service;
pub mod dto;
pub mod lookup;
pub mod transcript_service;
