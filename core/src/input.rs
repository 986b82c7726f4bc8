use std::collections::HashMap;
use anyhow::{anyhow, Result};

use crate::error::GradeDeskError;

pub const COURSE_KEYS: &[&str] = &["code", "credits", "description", "hw", "quiz", "midterm", "final"];
pub const ASSIGNMENT_KEYS: &[&str] = &["category", "grade", "points", "due", "description", "status", "name"];
pub const PROFILE_KEYS: &[&str] = &["first", "last", "email", "major", "emphasis", "semester"];
pub const TRANSCRIPT_KEYS: &[&str] = &["grade", "credits", "description"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

/// Splits `key:value` tokens from the free-text words that make up a name.
/// Underscores in values stand for spaces (`desc:read_chapter_3`).
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() && !key.contains(' ') {
                metadata.insert(key.to_lowercase(), value.replace('_', " "));
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Expands every metadata key against `candidates`. Keys that cannot be resolved
/// are returned as warnings instead of failing the whole command.
pub fn normalize_metadata(
    metadata: HashMap<String, String>,
    candidates: &[&str],
) -> (HashMap<String, String>, Vec<String>) {
    let mut normalized = HashMap::new();
    let mut warnings = Vec::new();

    for (key, value) in metadata {
        match expand_key(&key, candidates) {
            Ok(full_key) => {
                normalized.insert(full_key, value);
            }
            Err(e) => warnings.push(e.to_string()),
        }
    }

    (normalized, warnings)
}

pub fn parse_number(key: &str, value: &str) -> Result<f64, GradeDeskError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GradeDeskError::InvalidNumber {
            key: key.to_string(),
            value: value.to_string(),
        })
}

pub fn parse_integer(key: &str, value: &str) -> Result<i32, GradeDeskError> {
    value.trim().parse::<i32>().map_err(|_| GradeDeskError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}
