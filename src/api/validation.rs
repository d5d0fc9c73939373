use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::ApiError;
use super::types::FieldError;
use crate::models::prompt::{Category, NewPrompt};

static MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("<[^>]*>").expect("markup regex is valid"));

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromptRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub prompt_text: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

fn check_length(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min {
        errors.push(FieldError {
            field,
            message: format!("must be at least {min} characters"),
        });
    } else if len > max {
        errors.push(FieldError {
            field,
            message: format!("must be at most {max} characters"),
        });
    }
}

fn check_markup(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if MARKUP_RE.is_match(value) {
        errors.push(FieldError {
            field,
            message: "must not contain markup".to_string(),
        });
    }
}

/// Validates a prompt submission, collecting every field failure rather than
/// stopping at the first. Inputs are trimmed before length checks.
pub fn validate_new_prompt(request: &CreatePromptRequest) -> Result<NewPrompt, ApiError> {
    let title = request.title.trim();
    let prompt_text = request.prompt_text.trim();
    let description = request.description.trim();

    let mut errors = Vec::new();

    check_length(&mut errors, "title", title, 3, 100);
    check_markup(&mut errors, "title", title);
    check_length(&mut errors, "promptText", prompt_text, 10, 2000);
    check_length(&mut errors, "description", description, 5, 500);
    check_markup(&mut errors, "description", description);

    let category = Category::parse(&request.category);
    if category.is_none() {
        errors.push(FieldError {
            field: "category",
            message: format!("must be one of: {}", category_list()),
        });
    }

    match category {
        Some(category) if errors.is_empty() => Ok(NewPrompt {
            title: title.to_string(),
            prompt_text: prompt_text.to_string(),
            description: description.to_string(),
            category,
        }),
        _ => Err(ApiError::ValidationError { details: errors }),
    }
}

fn category_list() -> String {
    Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, prompt_text: &str, description: &str, category: &str) -> CreatePromptRequest {
        CreatePromptRequest {
            title: title.to_string(),
            prompt_text: prompt_text.to_string(),
            description: description.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_valid_prompt_passes() {
        let req = request(
            "Test Scene",
            "a quiet lake at dawn, soft light",
            "calm lake view",
            "nature",
        );
        let prompt = validate_new_prompt(&req).unwrap();
        assert_eq!(prompt.title, "Test Scene");
        assert_eq!(prompt.category, Category::Nature);
    }

    #[test]
    fn test_trims_before_length_check() {
        let req = request(
            "  ab  ",
            "a quiet lake at dawn, soft light",
            "calm lake view",
            "nature",
        );
        // "ab" is below the 3-char minimum after trimming
        assert!(validate_new_prompt(&req).is_err());
    }

    #[test]
    fn test_rejects_markup_in_title_and_description() {
        let req = request(
            "Nice <script>x</script>",
            "a quiet lake at dawn, soft light",
            "calm lake view",
            "nature",
        );
        assert!(validate_new_prompt(&req).is_err());

        let req = request(
            "Test Scene",
            "a quiet lake at dawn, soft light",
            "calm <b>lake</b> view",
            "nature",
        );
        assert!(validate_new_prompt(&req).is_err());
    }

    #[test]
    fn test_markup_allowed_in_prompt_text() {
        let req = request(
            "Test Scene",
            "render a <neon sign> glowing in the rain",
            "calm lake view",
            "nature",
        );
        assert!(validate_new_prompt(&req).is_ok());
    }

    #[test]
    fn test_rejects_unknown_category() {
        let req = request(
            "Test Scene",
            "a quiet lake at dawn, soft light",
            "calm lake view",
            "landscape",
        );
        assert!(validate_new_prompt(&req).is_err());
    }

    #[test]
    fn test_collects_all_field_errors() {
        let req = request("ab", "short", "x", "bogus");
        let err = validate_new_prompt(&req).unwrap_err();
        match err {
            ApiError::ValidationError { details } => {
                let fields: Vec<&str> = details.iter().map(|d| d.field).collect();
                assert!(fields.contains(&"title"));
                assert!(fields.contains(&"promptText"));
                assert!(fields.contains(&"description"));
                assert!(fields.contains(&"category"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_boundary_lengths() {
        let req = request(
            "abc",
            &"x".repeat(10),
            "12345",
            "art",
        );
        assert!(validate_new_prompt(&req).is_ok());

        let req = request(
            &"t".repeat(100),
            &"x".repeat(2000),
            &"d".repeat(500),
            "art",
        );
        assert!(validate_new_prompt(&req).is_ok());

        let req = request(
            &"t".repeat(101),
            &"x".repeat(10),
            "12345",
            "art",
        );
        assert!(validate_new_prompt(&req).is_err());
    }
}
