// Cross-cutting prompt fragments. Feature prompts live next to their feature.

/// System prompt that pins the model to a single JSON object.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    Respond with one valid JSON object and nothing else. \
    Do not use markdown code fences. \
    Do not add explanations.";

/// Appends a JSON output contract to a prompt body.
pub fn with_json_contract(body: &str, schema: &str) -> String {
    format!("{body}\n\nReturn JSON exactly matching this shape:\n{schema}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_json_contract_appends_schema() {
        let prompt = with_json_contract("Do things.", "{\"a\": \"string\"}");
        assert!(prompt.starts_with("Do things."));
        assert!(prompt.ends_with("{\"a\": \"string\"}"));
    }
}
