use uuid::Uuid;

use crate::error::GradeDeskError;

/// Finds the single item whose UUID starts with `prefix` (case-insensitive).
/// An exact full-id match always wins over prefix matches.
pub fn find_by_prefix<'a, T>(
    items: &'a [T],
    prefix: &str,
    kind: &'static str,
    id_of: impl Fn(&T) -> Uuid,
) -> Result<&'a T, GradeDeskError> {
    let needle = prefix.trim().to_lowercase();
    if needle.is_empty() {
        return Err(GradeDeskError::NotFound {
            kind,
            id: prefix.to_string(),
        });
    }

    if let Some(exact) = items.iter().find(|item| id_of(item).to_string() == needle) {
        return Ok(exact);
    }

    let matches: Vec<&T> = items
        .iter()
        .filter(|item| id_of(item).to_string().starts_with(&needle))
        .collect();

    match matches.len() {
        1 => Ok(matches[0]),
        0 => Err(GradeDeskError::NotFound {
            kind,
            id: prefix.to_string(),
        }),
        count => Err(GradeDeskError::AmbiguousId {
            kind,
            prefix: prefix.to_string(),
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_resolution() {
        let a = Uuid::parse_str("aaaa1111-0000-4000-8000-000000000000").unwrap();
        let b = Uuid::parse_str("aaaa2222-0000-4000-8000-000000000000").unwrap();
        let ids = vec![a, b];

        assert_eq!(*find_by_prefix(&ids, "AAAA1", "Course", |u| *u).unwrap(), a);
        assert_eq!(*find_by_prefix(&ids, &b.to_string(), "Course", |u| *u).unwrap(), b);
        assert_eq!(
            find_by_prefix(&ids, "aaaa", "Course", |u| *u),
            Err(GradeDeskError::AmbiguousId {
                kind: "Course",
                prefix: "aaaa".to_string(),
                count: 2
            })
        );
        assert!(matches!(
            find_by_prefix(&ids, "ffff", "Course", |u| *u),
            Err(GradeDeskError::NotFound { .. })
        ));
        assert!(find_by_prefix(&ids, "  ", "Course", |u| *u).is_err());
    }
}
