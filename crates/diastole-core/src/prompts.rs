use crate::errors::RunError;
use crate::model::Prompt;
use std::collections::HashSet;
use std::path::Path;

/// Load `{"prompts": [...]}` from disk. Order is preserved; it is the run order.
pub fn load_prompts(path: &Path) -> Result<Vec<Prompt>, RunError> {
    let raw = std::fs::read_to_string(path).map_err(|e| RunError::from_read(path, &e))?;
    parse_prompts(&raw, &path.display().to_string())
}

pub fn parse_prompts(raw: &str, origin: &str) -> Result<Vec<Prompt>, RunError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| RunError::input_parse(origin, e.to_string()))?;

    let list = value
        .get("prompts")
        .filter(|v| v.is_array())
        .cloned()
        .ok_or_else(|| {
            RunError::input_parse(origin, "top-level key 'prompts' must be a list")
        })?;

    let prompts: Vec<Prompt> = serde_json::from_value(list)
        .map_err(|e| RunError::input_parse(origin, e.to_string()))?;

    validate_prompts(&prompts).map_err(|detail| RunError::input_parse(origin, detail))?;
    Ok(prompts)
}

fn validate_prompts(prompts: &[Prompt]) -> Result<(), String> {
    if prompts.is_empty() {
        return Err("prompt list is empty".to_string());
    }

    let mut seen = HashSet::new();
    for p in prompts {
        check_id(p)?;
        if p.text.trim().is_empty() {
            return Err(format!("prompt {} has empty text", p.id));
        }
        if !seen.insert(p.id.as_str()) {
            return Err(format!("duplicate prompt id {}", p.id));
        }
    }
    Ok(())
}

/// Ids are the category letter followed by a positive index: `F1`, `D12`.
fn check_id(p: &Prompt) -> Result<(), String> {
    let mut chars = p.id.chars();
    let prefix = chars.next();
    let index = chars.as_str();
    if prefix != Some(p.category.prefix()) {
        return Err(format!(
            "prompt id {} does not start with '{}' for category {}",
            p.id,
            p.category.prefix(),
            p.category
        ));
    }
    match index.parse::<u32>() {
        Ok(n) if n >= 1 && !index.starts_with('0') => Ok(()),
        _ => Err(format!(
            "prompt id {} must end in a positive index (e.g. {}1)",
            p.id,
            p.category.prefix()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RunErrorKind;
    use crate::model::Category;

    #[test]
    fn parses_prompt_list_in_file_order() {
        let raw = r#"{"prompts": [
            {"id": "F1", "category": "FACTUAL", "prompt": "How far is the moon?"},
            {"id": "E1", "category": "EMOTIONAL", "prompt": "I failed my exam."},
            {"id": "D2", "category": "DECISION", "text": "Should I move cities?"}
        ]}"#;
        let prompts = parse_prompts(raw, "prompts.json").unwrap();
        let ids: Vec<_> = prompts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["F1", "E1", "D2"]);
        assert_eq!(prompts[1].category, Category::Emotional);
    }

    #[test]
    fn missing_prompts_key_is_malformed() {
        let err = parse_prompts(r#"{"items": []}"#, "prompts.json").unwrap_err();
        assert_eq!(err.kind, RunErrorKind::InputParse);
        assert!(err.message.contains("'prompts' must be a list"));

        let err = parse_prompts(r#"{"prompts": {"F1": "x"}}"#, "prompts.json").unwrap_err();
        assert!(err.message.contains("'prompts' must be a list"));
    }

    #[test]
    fn rejects_unknown_category_and_bad_json() {
        let raw = r#"{"prompts": [{"id": "X1", "category": "TRIVIA", "prompt": "?"}]}"#;
        assert_eq!(
            parse_prompts(raw, "p").unwrap_err().kind,
            RunErrorKind::InputParse
        );
        assert_eq!(
            parse_prompts("{not json", "p").unwrap_err().kind,
            RunErrorKind::InputParse
        );
    }

    #[test]
    fn rejects_duplicates_empty_lists_and_mismatched_ids() {
        let dup = r#"{"prompts": [
            {"id": "F1", "category": "FACTUAL", "prompt": "a"},
            {"id": "F1", "category": "FACTUAL", "prompt": "b"}
        ]}"#;
        assert!(parse_prompts(dup, "p")
            .unwrap_err()
            .message
            .contains("duplicate prompt id F1"));

        assert!(parse_prompts(r#"{"prompts": []}"#, "p")
            .unwrap_err()
            .message
            .contains("empty"));

        let wrong_prefix = r#"{"prompts": [{"id": "C1", "category": "FACTUAL", "prompt": "a"}]}"#;
        assert!(parse_prompts(wrong_prefix, "p").is_err());

        for bad in ["F", "F0", "F01", "Fx"] {
            let raw = format!(
                r#"{{"prompts": [{{"id": "{bad}", "category": "FACTUAL", "prompt": "a"}}]}}"#
            );
            assert!(parse_prompts(&raw, "p").is_err(), "{bad} should be rejected");
        }

        let blank = r#"{"prompts": [{"id": "F1", "category": "FACTUAL", "prompt": "   "}]}"#;
        assert!(parse_prompts(blank, "p").is_err());
    }

    #[test]
    fn missing_file_is_reported_as_missing_input() {
        let err = load_prompts(Path::new("/definitely/not/here/prompts.json")).unwrap_err();
        assert_eq!(err.kind, RunErrorKind::MissingInput);
    }
}
