use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::assignment::Assignment;
use crate::model::weights::CategoryWeights;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CourseInfo {
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub credits: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl CourseInfo {
    pub fn new(name: String, credits: u32) -> Self {
        Self {
            name,
            credits,
            ..Default::default()
        }
    }

    pub fn display_name(&self) -> String {
        match &self.code {
            Some(code) if !code.is_empty() => format!("{} {}", code, self.name),
            _ => self.name.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SemesterCourse {
    pub id: Uuid,
    pub course: CourseInfo,
    #[serde(default)]
    pub weights: CategoryWeights,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    pub created_at: DateTime<Utc>,
}

impl SemesterCourse {
    pub fn new(course: CourseInfo, weights: CategoryWeights) -> Self {
        Self {
            id: Uuid::new_v4(),
            course,
            weights,
            assignments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn short_id(&self) -> String {
        self.id.to_string()[..8].to_string()
    }
}
