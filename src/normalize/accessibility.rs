//! Accessibility inference

use crate::source::SourceFeature;
use crate::types::AttributeValue;

/// Columns that may carry an accessibility flag, in priority order
pub const ACCESSIBILITY_FIELDS: &[&str] = &["ACCESSIBLE", "ADA", "WHEELCHAIR", "accessible"];

const TRUTHY: &[&str] = &["true", "1", "yes", "y"];
const FALSY: &[&str] = &["false", "0", "no", "n"];

/// Decide whether a room is accessible
///
/// The first listed column holding a recognized token decides. Columns with
/// unrecognized values are passed over. Rooms are accessible by default.
pub fn determine_accessibility(feature: &SourceFeature) -> bool {
    ACCESSIBILITY_FIELDS
        .iter()
        .filter_map(|field| feature.field(field))
        .find_map(parse_flag)
        .unwrap_or(true)
}

/// Parse a boolean-like attribute value, case-insensitively
pub fn parse_flag(value: &AttributeValue) -> Option<bool> {
    let text = value.as_text()?.trim().to_lowercase();
    if TRUTHY.contains(&text.as_str()) {
        Some(true)
    } else if FALSY.contains(&text.as_str()) {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(fields: &[(&str, AttributeValue)]) -> SourceFeature {
        let fields = fields.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        SourceFeature::new(0, None, fields)
    }

    #[test]
    fn test_default_is_accessible() {
        assert!(determine_accessibility(&feature(&[])));
        assert!(determine_accessibility(&feature(&[("ACCESSIBLE", AttributeValue::Null)])));
    }

    #[test]
    fn test_no_in_any_case_is_not_accessible() {
        for token in ["No", "NO", "no", "n"] {
            assert!(!determine_accessibility(&feature(&[("ADA", AttributeValue::from(token))])));
        }
    }

    #[test]
    fn test_numeric_and_logical_flags() {
        assert!(!determine_accessibility(&feature(&[("WHEELCHAIR", AttributeValue::Integer(0))])));
        assert!(!determine_accessibility(&feature(&[("ACCESSIBLE", AttributeValue::Bool(false))])));
        assert!(determine_accessibility(&feature(&[("ACCESSIBLE", AttributeValue::Float(1.0))])));
    }

    #[test]
    fn test_unrecognized_value_falls_through() {
        let feature = feature(&[
            ("ACCESSIBLE", AttributeValue::from("partial")),
            ("WHEELCHAIR", AttributeValue::from("N")),
        ]);
        assert!(!determine_accessibility(&feature));
    }

    #[test]
    fn test_first_recognized_field_wins() {
        let feature = feature(&[
            ("ACCESSIBLE", AttributeValue::from("Yes")),
            ("ADA", AttributeValue::from("no")),
        ]);
        assert!(determine_accessibility(&feature));
    }
}
