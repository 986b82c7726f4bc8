use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::GradeDeskError;
use crate::model::grade::LetterGrade;

/// Final grade recorded on a transcript. Pass, withdrawal and incomplete carry no grade points.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum TranscriptGrade {
    Letter(LetterGrade),
    Pass,
    Withdrawn,
    Incomplete,
}

impl TranscriptGrade {
    pub fn grade_points(&self) -> Option<f64> {
        match self {
            TranscriptGrade::Letter(letter) => letter.grade_points(),
            _ => None,
        }
    }

    pub fn earns_credit(&self) -> bool {
        !matches!(self, TranscriptGrade::Withdrawn | TranscriptGrade::Incomplete)
    }
}

impl fmt::Display for TranscriptGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptGrade::Letter(letter) => write!(f, "{}", letter),
            TranscriptGrade::Pass => f.write_str("P"),
            TranscriptGrade::Withdrawn => f.write_str("W"),
            TranscriptGrade::Incomplete => f.write_str("I"),
        }
    }
}

impl FromStr for TranscriptGrade {
    type Err = GradeDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letter = match s.trim().to_uppercase().as_str() {
            "A+" => LetterGrade::APlus,
            "A" => LetterGrade::A,
            "A-" => LetterGrade::AMinus,
            "B+" => LetterGrade::BPlus,
            "B" => LetterGrade::B,
            "B-" => LetterGrade::BMinus,
            "C+" => LetterGrade::CPlus,
            "C" => LetterGrade::C,
            "C-" => LetterGrade::CMinus,
            "D+" => LetterGrade::DPlus,
            "D" => LetterGrade::D,
            "D-" => LetterGrade::DMinus,
            "F" => LetterGrade::F,
            "P" => return Ok(TranscriptGrade::Pass),
            "W" => return Ok(TranscriptGrade::Withdrawn),
            "I" => return Ok(TranscriptGrade::Incomplete),
            _ => return Err(GradeDeskError::UnknownGrade(s.to_string())),
        };
        Ok(TranscriptGrade::Letter(letter))
    }
}

impl TryFrom<String> for TranscriptGrade {
    type Error = GradeDeskError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TranscriptGrade> for String {
    fn from(grade: TranscriptGrade) -> Self {
        grade.to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TranscriptCourse {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub grade: Option<TranscriptGrade>,
    #[serde(default)]
    pub credits: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl TranscriptCourse {
    pub fn new(name: String, credits: f64, grade: Option<TranscriptGrade>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            grade,
            credits,
            description: None,
            prerequisites: Vec::new(),
        }
    }

    pub fn short_id(&self) -> String {
        self.id.to_string()[..8].to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Transcript {
    #[serde(default)]
    pub courses: Vec<TranscriptCourse>,
}

impl Transcript {
    /// Credit-weighted GPA over courses with a letter grade; 0 when none qualify.
    pub fn gpa(&self) -> f64 {
        let (points, credits) = self
            .courses
            .iter()
            .filter(|c| c.credits > 0.0)
            .filter_map(|c| c.grade.and_then(|g| g.grade_points()).map(|p| (p * c.credits, c.credits)))
            .fold((0.0, 0.0), |(p, cr), (dp, dc)| (p + dp, cr + dc));

        if credits > 0.0 {
            points / credits
        } else {
            0.0
        }
    }

    pub fn credits_completed(&self) -> f64 {
        self.courses
            .iter()
            .filter(|c| c.grade.map(|g| g.earns_credit()).unwrap_or(false))
            .map(|c| c.credits.max(0.0))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(name: &str, credits: f64, grade: &str) -> TranscriptCourse {
        TranscriptCourse::new(name.to_string(), credits, Some(grade.parse().unwrap()))
    }

    #[test]
    fn test_grade_parse_round_trip_labels() {
        assert_eq!("a-".parse::<TranscriptGrade>().unwrap(), TranscriptGrade::Letter(LetterGrade::AMinus));
        assert_eq!("P".parse::<TranscriptGrade>().unwrap(), TranscriptGrade::Pass);
        assert!("E".parse::<TranscriptGrade>().is_err());
        assert_eq!(TranscriptGrade::Letter(LetterGrade::BPlus).to_string(), "B+");
    }

    #[test]
    fn test_gpa_is_credit_weighted() {
        let transcript = Transcript {
            courses: vec![course("Calculus", 4.0, "A"), course("Writing", 2.0, "C")],
        };
        // (4*4 + 2*2) / 6
        assert!((transcript.gpa() - 20.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_pass_withdraw_incomplete_excluded_from_gpa() {
        let transcript = Transcript {
            courses: vec![
                course("Seminar", 1.0, "P"),
                course("Chemistry", 4.0, "W"),
                course("Physics", 4.0, "I"),
                course("Biology", 3.0, "B"),
            ],
        };
        assert_eq!(transcript.gpa(), 3.0);
        // P and B earn credit, W and I do not
        assert_eq!(transcript.credits_completed(), 4.0);
    }

    #[test]
    fn test_empty_transcript() {
        let transcript = Transcript::default();
        assert_eq!(transcript.gpa(), 0.0);
        assert_eq!(transcript.credits_completed(), 0.0);
    }

    #[test]
    fn test_grade_serializes_as_label() {
        let c = course("Art", 3.0, "A+");
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["grade"], "A+");
        let back: TranscriptCourse = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }
}
