//! Course records in the shape the web dashboard stored them: weights wrapped in a
//! list, assignments as a JSON-encoded string, and no assignment identifiers.

use serde::Deserialize;
use serde_json::Value;
use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::model::assignment::{Assignment, AssignmentStatus};
use crate::model::course::{CourseInfo, SemesterCourse};
use crate::model::weights::CategoryWeights;

#[derive(Deserialize, Debug, Clone)]
pub struct LegacySemesterCourse {
    pub course: LegacyCourse,
    #[serde(default)]
    pub weights: Vec<CategoryWeights>,
    #[serde(default)]
    pub assignments: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LegacyCourse {
    #[serde(default)]
    pub id: Option<Value>,
    pub name: String,
    #[serde(default)]
    pub credits: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct LegacyAssignment {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    grade: Option<f64>,
    #[serde(default)]
    points: Option<f64>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    date_created: Option<String>,
}

impl LegacySemesterCourse {
    pub fn into_course(self) -> SemesterCourse {
        let weights = self.weights.first().copied().unwrap_or_default();
        let info = CourseInfo {
            code: self.course.id.as_ref().and_then(value_to_code),
            name: self.course.name,
            credits: self.course.credits.as_ref().map(parse_credits).unwrap_or(0),
            description: self.course.description,
            prerequisites: self.course.prerequisites,
        };

        let mut course = SemesterCourse::new(info, weights);
        course.assignments = parse_assignments(self.assignments.as_deref().unwrap_or("[]"));
        course
    }
}

/// Parses the encoded assignment list. A malformed list is logged and treated as empty.
pub fn parse_assignments(encoded: &str) -> Vec<Assignment> {
    let raw: Vec<LegacyAssignment> = match serde_json::from_str(encoded) {
        Ok(list) => list,
        Err(e) => {
            warn!("Failed to parse assignments: {}", e);
            return Vec::new();
        }
    };

    raw.into_iter().filter_map(convert_assignment).collect()
}

fn convert_assignment(raw: LegacyAssignment) -> Option<Assignment> {
    let category = match raw.kind.parse() {
        Ok(c) => c,
        Err(_) => {
            warn!("Dropping assignment '{}' with unknown type '{}'", raw.name, raw.kind);
            return None;
        }
    };

    let status = raw
        .status
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(AssignmentStatus::Nothing);

    let created_at = raw
        .date_created
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let due_date = raw
        .due_date
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok())
        .unwrap_or_else(|| Local::now().date_naive());

    Some(Assignment {
        id: Uuid::new_v4(),
        category,
        name: raw.name,
        description: raw.description,
        grade: raw.grade,
        points: raw.points.unwrap_or(0.0),
        due_date,
        status,
        created_at,
    })
}

fn parse_credits(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n.as_f64().map(|f| f.max(0.0) as u32).unwrap_or(0),
        Value::String(s) => {
            // Leading integer, like parseInt("3 credits")
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

fn value_to_code(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
