use crate::llm_client::prompts::with_json_contract;

use super::KeywordRequest;

const SUGGEST_SCHEMA: &str = r#"{"suggestedKeywords": "comma, separated, keywords"}"#;

pub fn suggest_keywords_prompt(request: &KeywordRequest) -> String {
    let body = format!(
        "You are an expert resume optimization specialist. Suggest relevant keywords \
         the candidate can add to their resume to target specific roles.\n\
         Consider the career objective, skills, work experience and education below.\n\n\
         Career Objective: {}\n\
         Skills: {}\n\
         Work Experience:\n{}\n\
         Education:\n{}\n\
         Existing Keywords: {}\n\n\
         Put the suggestions in `suggestedKeywords` as one comma-separated string. \
         Use an empty string if nothing relevant can be added.",
        request.career_objective,
        request.skills,
        request.work_experience,
        request.education,
        request.keywords,
    );
    with_json_contract(&body, SUGGEST_SCHEMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_every_field() {
        let request = KeywordRequest {
            career_objective: "Ship compilers".to_string(),
            skills: "Rust, LLVM".to_string(),
            work_experience: "Engineer at Acme: parsing".to_string(),
            education: "BSc from MIT (2019)".to_string(),
            keywords: "Compilers".to_string(),
        };
        let prompt = suggest_keywords_prompt(&request);
        for needle in [
            "Ship compilers",
            "Rust, LLVM",
            "Engineer at Acme: parsing",
            "BSc from MIT (2019)",
            "Existing Keywords: Compilers",
            "suggestedKeywords",
        ] {
            assert!(prompt.contains(needle), "missing {needle}");
        }
    }
}
