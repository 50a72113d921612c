//! # String utilities
//!
//! Helpers for names and free text arriving from API clients.

use serde::Deserialize;

/// Trims an optional value, mapping blank input to `None`.
///
/// ```rust,ignore
/// assert_eq!(clean_optional_string(Some("  Notes ".to_string())), Some("Notes".to_string()));
/// assert_eq!(clean_optional_string(Some("   ".to_string())), None);
/// ```
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// serde `deserialize_with` helper applying [`clean_optional_string`].
///
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct Request {
///     #[serde(default, deserialize_with = "deserialize_optional_string")]
///     notes: Option<String>,
/// }
/// ```
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// First of the forenames, which may be separated by spaces or commas.
pub fn first_forename(forenames: &str) -> &str {
    forenames
        .split([' ', ','])
        .find(|part| !part.is_empty())
        .unwrap_or("")
}

/// Remaining forenames after the first, joined by a space.
pub fn other_forenames(forenames: &str) -> Option<String> {
    let rest: Vec<&str> = forenames
        .split([' ', ','])
        .filter(|part| !part.is_empty())
        .skip(1)
        .collect();
    if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    }
}

/// Splits a comma separated query parameter, dropping blank entries.
pub fn split_comma_separated(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("Hello".to_string())), Some("Hello".to_string()));
        assert_eq!(clean_optional_string(Some("  World  ".to_string())), Some("World".to_string()));
        assert_eq!(clean_optional_string(Some("".to_string())), None);
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_deserialize_optional_string() {
        #[derive(Deserialize)]
        struct TestStruct {
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            notes: Option<String>,
        }

        let parsed: TestStruct = serde_json::from_str(r#"{"notes": "  Hello World  "}"#).unwrap();
        assert_eq!(parsed.notes, Some("Hello World".to_string()));

        let parsed: TestStruct = serde_json::from_str(r#"{"notes": "   "}"#).unwrap();
        assert_eq!(parsed.notes, None);

        let parsed: TestStruct = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.notes, None);
    }

    #[test]
    fn test_forenames_split_on_space_or_comma() {
        assert_eq!(first_forename("Sheila Linda"), "Sheila");
        assert_eq!(first_forename("Sheila,Linda"), "Sheila");
        assert_eq!(first_forename(" John"), "John");
        assert_eq!(first_forename(""), "");

        assert_eq!(other_forenames("Sheila, Linda Mary"), Some("Linda Mary".to_string()));
        assert_eq!(other_forenames("John"), None);
    }

    #[test]
    fn test_split_comma_separated() {
        assert_eq!(split_comma_separated("ETCP, CRSAPT,"), vec!["ETCP", "CRSAPT"]);
        assert!(split_comma_separated(" , ").is_empty());
    }
}
