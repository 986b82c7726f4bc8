use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::model::category::Category;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D+")]
    DPlus,
    D,
    #[serde(rename = "D-")]
    DMinus,
    F,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl LetterGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::AMinus => "A-",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::BMinus => "B-",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::CMinus => "C-",
            LetterGrade::DPlus => "D+",
            LetterGrade::D => "D",
            LetterGrade::DMinus => "D-",
            LetterGrade::F => "F",
            LetterGrade::NotApplicable => "N/A",
        }
    }

    /// Transcript grade points on the 4.0 scale. `None` for `N/A`.
    pub fn grade_points(&self) -> Option<f64> {
        match self {
            LetterGrade::APlus | LetterGrade::A => Some(4.0),
            LetterGrade::AMinus => Some(3.7),
            LetterGrade::BPlus => Some(3.3),
            LetterGrade::B => Some(3.0),
            LetterGrade::BMinus => Some(2.7),
            LetterGrade::CPlus => Some(2.3),
            LetterGrade::C => Some(2.0),
            LetterGrade::CMinus => Some(1.7),
            LetterGrade::DPlus => Some(1.3),
            LetterGrade::D => Some(1.0),
            LetterGrade::DMinus => Some(0.7),
            LetterGrade::F => Some(0.0),
            LetterGrade::NotApplicable => None,
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryGrade {
    pub earned: f64,
    pub total: f64,
    pub percentage: f64,
}

impl CategoryGrade {
    /// A category counts towards the overall grade only once it has points on record.
    pub fn is_graded(&self) -> bool {
        self.total > 0.0
    }
}

pub type CategoryGrades = BTreeMap<Category, CategoryGrade>;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct OverallGrade {
    pub percentage: f64,
    pub letter: LetterGrade,
}

impl Default for OverallGrade {
    fn default() -> Self {
        Self {
            percentage: 0.0,
            letter: LetterGrade::NotApplicable,
        }
    }
}
