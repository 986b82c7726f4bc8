use serde::{Deserialize, Serialize};

use crate::model::transcript::Transcript;

pub const MAJORS: &[&str] = &[
    "Computer Science",
    "Mathematics",
    "Engineering",
    "Biology",
    "Chemistry",
    "Physics",
    "Business",
    "Economics",
    "Psychology",
    "Sociology",
    "English",
    "History",
];

pub fn emphases_for(major: &str) -> &'static [&'static str] {
    match major {
        "Computer Science" => &[
            "Software Engineering",
            "Data Science",
            "Computer Security",
            "Artificial Intelligence",
            "Systems",
        ],
        "Mathematics" => &[
            "Pure Mathematics",
            "Applied Mathematics",
            "Statistics",
            "Data Science",
        ],
        "Engineering" => &[
            "Civil Engineering",
            "Mechanical Engineering",
            "Electrical Engineering",
            "Chemical Engineering",
        ],
        _ => &[],
    }
}

/// Catalog spelling of `major`, matched without regard to case.
pub fn canonical_major(major: &str) -> Option<&'static str> {
    let major = major.trim();
    MAJORS.iter().copied().find(|m| m.eq_ignore_ascii_case(major))
}

pub fn is_known_major(major: &str) -> bool {
    canonical_major(major).is_some()
}

/// Whether a catalog major offers `emphasis`; `None` for majors outside the catalog.
pub fn offers_emphasis(major: &str, emphasis: &str) -> Option<bool> {
    let major = canonical_major(major)?;
    let emphasis = emphasis.trim();
    Some(emphases_for(major).iter().any(|e| e.eq_ignore_ascii_case(emphasis)))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub emphasis: Option<String>,
    #[serde(default = "first_semester")]
    pub current_semester: u32,

    // Derived from the transcript on every save.
    #[serde(default)]
    pub gpa: f64,
    #[serde(default)]
    pub credits_completed: f64,

    #[serde(default)]
    pub transcript: Transcript,
}

fn first_semester() -> u32 {
    1
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: None,
            major: None,
            emphasis: None,
            current_semester: first_semester(),
            gpa: 0.0,
            credits_completed: 0.0,
            transcript: Transcript::default(),
        }
    }
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn refresh_totals(&mut self) {
        self.gpa = self.transcript.gpa();
        self.credits_completed = self.transcript.credits_completed();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub major: Option<String>,
    pub emphasis: Option<String>,
    pub current_semester: Option<u32>,
}
