use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use validator::{ValidationError, ValidationErrors};

/// Maximum number of characters allowed in a record name
pub const NAME_MAX_LENGTH: usize = 255;

/// Trim surrounding whitespace from string input; blank strings become `null`
pub fn normalize_input(value: Value) -> Value {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Value::Null
            } else if trimmed.len() == text.len() {
                Value::String(text)
            } else {
                Value::String(trimmed.to_owned())
            }
        }
        other => other,
    }
}

/// Deserializer for optional fields where an explicit `null` must be told
/// apart from an absent key.
///
/// Use together with `#[serde(default)]`: absent becomes `None`, `null` (or
/// a blank string) becomes `Some(Value::Null)`.
pub fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer)
        .map(normalize_input)
        .map(Some)
}

/// Deserializer for fields where `null` means absent. Strings are trimmed
/// and a blank string counts as `null`.
///
/// Use together with `#[serde(default)]`.
pub fn trimmed<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| match normalize_input(value) {
        Value::Null => None,
        other => Some(other),
    })
}

/// `name` rule: a string of at most [`NAME_MAX_LENGTH`] characters
pub fn name(value: &Value) -> Result<(), ValidationError> {
    let text = value.as_str().ok_or_else(|| ValidationError::new("string"))?;

    if text.chars().count() > NAME_MAX_LENGTH {
        let mut error = ValidationError::new("max");
        error.add_param(Cow::from("max"), &NAME_MAX_LENGTH);
        return Err(error);
    }

    Ok(())
}

/// Optional text rule: either `null` or a string
pub fn nullable_string(value: &Value) -> Result<(), ValidationError> {
    match value {
        Value::Null | Value::String(_) => Ok(()),
        _ => Err(ValidationError::new("string")),
    }
}

/// Boolean rule: accepts `true`, `false`, `1`, `0`, `"1"` and `"0"`
pub fn boolean(value: &Value) -> Result<(), ValidationError> {
    as_boolean(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("boolean"))
}

pub fn as_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.as_str() {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Text value with empty strings collapsed to `None`
pub fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Render validation failures as `{field: [message, ...]}`
pub fn render_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let messages = field_errors
                .iter()
                .map(|error| message_for(&field, error))
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

fn message_for(field: &str, error: &ValidationError) -> String {
    let attribute = field.replace('_', " ");

    match error.code.as_ref() {
        "required" => format!("The {} field is required.", attribute),
        "string" => format!("The {} must be a string.", attribute),
        "max" => {
            let max = error
                .params
                .get("max")
                .and_then(Value::as_u64)
                .unwrap_or(NAME_MAX_LENGTH as u64);
            format!(
                "The {} may not be greater than {} characters.",
                attribute, max
            )
        }
        "boolean" => format!("The {} field must be true or false.", attribute),
        _ => error
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("The {} is invalid.", attribute)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_rule() {
        assert!(name(&json!("Action")).is_ok());
        assert!(name(&json!("a".repeat(NAME_MAX_LENGTH))).is_ok());

        let too_long = name(&json!("a".repeat(NAME_MAX_LENGTH + 1))).unwrap_err();
        assert_eq!(too_long.code, "max");

        let not_text = name(&json!(42)).unwrap_err();
        assert_eq!(not_text.code, "string");
    }

    #[test]
    fn test_name_counts_characters_not_bytes() {
        // 255 two-byte characters
        assert!(name(&json!("é".repeat(NAME_MAX_LENGTH))).is_ok());
    }

    #[test]
    fn test_boolean_rule() {
        for accepted in [json!(true), json!(false), json!(1), json!(0), json!("1"), json!("0")] {
            assert!(boolean(&accepted).is_ok(), "{} should be accepted", accepted);
        }
        for rejected in [json!("a"), json!("true"), json!(2), json!([]), json!({})] {
            assert_eq!(boolean(&rejected).unwrap_err().code, "boolean");
        }
        assert_eq!(as_boolean(&json!("0")), Some(false));
        assert_eq!(as_boolean(&json!(1)), Some(true));
    }

    #[test]
    fn test_nullable_string_rule() {
        assert!(nullable_string(&Value::Null).is_ok());
        assert!(nullable_string(&json!("")).is_ok());
        assert!(nullable_string(&json!(false)).is_err());
    }

    #[derive(Debug, Deserialize)]
    struct Input {
        #[serde(default, deserialize_with = "trimmed")]
        name: Option<Value>,
        #[serde(default, deserialize_with = "present")]
        description: Option<Value>,
    }

    fn input(body: Value) -> Input {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_normalize_input() {
        assert_eq!(normalize_input(json!("  Action ")), json!("Action"));
        assert_eq!(normalize_input(json!("Action")), json!("Action"));
        assert_eq!(normalize_input(json!("")), Value::Null);
        assert_eq!(normalize_input(json!(" \t\n ")), Value::Null);
        assert_eq!(normalize_input(json!(1)), json!(1));
    }

    #[test]
    fn test_trimmed_treats_blank_as_absent() {
        assert_eq!(input(json!({})).name, None);
        assert_eq!(input(json!({ "name": null })).name, None);
        assert_eq!(input(json!({ "name": "" })).name, None);
        assert_eq!(input(json!({ "name": "   " })).name, None);
        assert_eq!(input(json!({ "name": " Drama " })).name, Some(json!("Drama")));
        assert_eq!(input(json!({ "name": 7 })).name, Some(json!(7)));
    }

    #[test]
    fn test_present_keeps_blank_as_null() {
        assert_eq!(input(json!({})).description, None);
        assert_eq!(input(json!({ "description": null })).description, Some(Value::Null));
        assert_eq!(input(json!({ "description": "  " })).description, Some(Value::Null));
        assert_eq!(
            input(json!({ "description": " Text " })).description,
            Some(json!("Text"))
        );
    }

    #[test]
    fn test_non_empty_string() {
        assert_eq!(non_empty_string(&json!("")), None);
        assert_eq!(non_empty_string(&json!("  ")), None);
        assert_eq!(non_empty_string(&Value::Null), None);
        assert_eq!(non_empty_string(&json!("text")), Some("text".to_string()));
    }

    #[test]
    fn test_render_errors_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("name", ValidationError::new("required"));
        let mut max = ValidationError::new("max");
        max.add_param(Cow::from("max"), &NAME_MAX_LENGTH);
        errors.add("name", max);
        errors.add("is_active", ValidationError::new("boolean"));

        let rendered = render_errors(&errors);
        assert_eq!(
            rendered["name"],
            vec![
                "The name field is required.".to_string(),
                "The name may not be greater than 255 characters.".to_string(),
            ]
        );
        assert_eq!(
            rendered["is_active"],
            vec!["The is active field must be true or false.".to_string()]
        );
        assert!(!rendered.contains_key("description"));
    }
}
