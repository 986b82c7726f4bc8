use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GradeDeskError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "HW")]
    Homework,
    Quiz,
    Midterm,
    Final,
}

/// Canonical category order used by every grade computation.
pub const CATEGORIES: [Category; 4] = [
    Category::Homework,
    Category::Quiz,
    Category::Midterm,
    Category::Final,
];

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Homework => "HW",
            Category::Quiz => "Quiz",
            Category::Midterm => "Midterm",
            Category::Final => "Final",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Homework => "Homework",
            Category::Quiz => "Quizzes",
            Category::Midterm => "Midterm Exams",
            Category::Final => "Final Exam",
        }
    }

    pub fn next(&self) -> Category {
        match self {
            Category::Homework => Category::Quiz,
            Category::Quiz => Category::Midterm,
            Category::Midterm => Category::Final,
            Category::Final => Category::Homework,
        }
    }

    pub fn previous(&self) -> Category {
        match self {
            Category::Homework => Category::Final,
            Category::Quiz => Category::Homework,
            Category::Midterm => Category::Quiz,
            Category::Final => Category::Midterm,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Homework
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = GradeDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hw" | "homework" => Ok(Category::Homework),
            "quiz" | "q" => Ok(Category::Quiz),
            "midterm" | "mid" | "exam" => Ok(Category::Midterm),
            "final" | "fin" => Ok(Category::Final),
            _ => Err(GradeDeskError::UnknownCategory(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("HW".parse::<Category>().unwrap(), Category::Homework);
        assert_eq!("homework".parse::<Category>().unwrap(), Category::Homework);
        assert_eq!("mid".parse::<Category>().unwrap(), Category::Midterm);
        assert_eq!("Final".parse::<Category>().unwrap(), Category::Final);
        assert!("lab".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_labels_match_storage_format() {
        let json = serde_json::to_string(&CATEGORIES).unwrap();
        assert_eq!(json, r#"["HW","Quiz","Midterm","Final"]"#);
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(Category::Final.next(), Category::Homework);
        assert_eq!(Category::Homework.previous(), Category::Final);
    }
}
