use serde::{Deserialize, Serialize};
use chrono::{DateTime, Local, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::GradeDeskError;
use crate::model::category::Category;

pub const DEFAULT_POINTS: f64 = 100.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Nothing,
    Started,
    Submitted,
    Late,
}

impl Default for AssignmentStatus {
    fn default() -> Self {
        AssignmentStatus::Nothing
    }
}

impl AssignmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AssignmentStatus::Nothing => "Not Started",
            AssignmentStatus::Started => "In Progress",
            AssignmentStatus::Submitted => "Submitted",
            AssignmentStatus::Late => "Late",
        }
    }

    /// Order used when cycling through statuses from the dashboard.
    pub fn cycle(&self) -> AssignmentStatus {
        match self {
            AssignmentStatus::Nothing => AssignmentStatus::Started,
            AssignmentStatus::Started => AssignmentStatus::Submitted,
            AssignmentStatus::Submitted => AssignmentStatus::Late,
            AssignmentStatus::Late => AssignmentStatus::Nothing,
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AssignmentStatus {
    type Err = GradeDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nothing" | "none" | "todo" | "not-started" => Ok(AssignmentStatus::Nothing),
            "started" | "start" | "wip" => Ok(AssignmentStatus::Started),
            "submitted" | "submit" | "done" => Ok(AssignmentStatus::Submitted),
            "late" => Ok(AssignmentStatus::Late),
            _ => Err(GradeDeskError::UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Assignment {
    pub id: Uuid,
    pub category: Category,
    pub name: String,
    #[serde(default)]
    pub description: String,

    // Ungraded work stays `None` and counts as zero earned points.
    #[serde(default)]
    pub grade: Option<f64>,
    #[serde(default)]
    pub points: f64,

    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    pub fn new(name: String, category: Category) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            name,
            description: String::new(),
            grade: None,
            points: DEFAULT_POINTS,
            due_date: Local::now().date_naive(),
            status: AssignmentStatus::default(),
            created_at: Utc::now(),
        }
    }

    pub fn short_id(&self) -> String {
        self.id.to_string()[..8].to_string()
    }

    pub fn apply(&mut self, patch: AssignmentPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(grade) = patch.grade {
            self.grade = Some(grade);
        }
        if let Some(points) = patch.points {
            self.points = points;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Partial edit of an assignment; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub grade: Option<f64>,
    pub points: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<AssignmentStatus>,
}

impl AssignmentPatch {
    pub fn is_empty(&self) -> bool {
        *self == AssignmentPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assignment_defaults() {
        let a = Assignment::new("Problem Set 1".to_string(), Category::Homework);
        assert_eq!(a.points, DEFAULT_POINTS);
        assert_eq!(a.grade, None);
        assert_eq!(a.status, AssignmentStatus::Nothing);
        assert_eq!(a.short_id().len(), 8);
    }

    #[test]
    fn test_ids_are_unique_for_identical_content() {
        let a = Assignment::new("Quiz".to_string(), Category::Quiz);
        let mut b = a.clone();
        b.id = Uuid::new_v4();
        let c = Assignment::new("Quiz".to_string(), Category::Quiz);
        assert_ne!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_apply_patch_only_touches_given_fields() {
        let mut a = Assignment::new("Lab".to_string(), Category::Homework);
        let before = a.clone();
        a.apply(AssignmentPatch {
            grade: Some(42.0),
            status: Some(AssignmentStatus::Submitted),
            ..Default::default()
        });
        assert_eq!(a.grade, Some(42.0));
        assert_eq!(a.status, AssignmentStatus::Submitted);
        assert_eq!(a.name, before.name);
        assert_eq!(a.points, before.points);
        assert_eq!(a.id, before.id);
    }

    #[test]
    fn test_status_parse_and_cycle() {
        assert_eq!("submitted".parse::<AssignmentStatus>().unwrap(), AssignmentStatus::Submitted);
        assert!("graded".parse::<AssignmentStatus>().is_err());
        assert_eq!(AssignmentStatus::Late.cycle(), AssignmentStatus::Nothing);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&AssignmentStatus::Started).unwrap();
        assert_eq!(json, "\"started\"");
    }
}
