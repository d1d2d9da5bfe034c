//! Keyword advisor: asks an external model for keywords and folds them into
//! the document's comma-delimited keyword list.

pub mod advisor;
pub mod handlers;
pub mod prompts;

use std::collections::HashSet;
use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::document::session::ResumeSession;
use crate::models::resume::{split_list, EducationEntry, ResumeDocument, WorkExperienceEntry};

pub use advisor::{
    AdvisorError, KeywordAdvisor, KeywordSuggestion, LlmKeywordAdvisor, UnconfiguredAdvisor,
};

// ────────────────────────────────────────────────────────────────────────────
// Request shaping
// ────────────────────────────────────────────────────────────────────────────

/// Everything the advisor sees, flattened to text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRequest {
    pub career_objective: String,
    pub skills: String,
    pub work_experience: String,
    pub education: String,
    pub keywords: String,
}

impl KeywordRequest {
    pub fn from_document(doc: &ResumeDocument) -> Self {
        Self {
            career_objective: doc.career_objective.clone(),
            skills: doc.skills.clone(),
            work_experience: doc
                .work_experience
                .iter()
                .map(work_line)
                .collect::<Vec<_>>()
                .join("\n"),
            education: doc
                .education
                .iter()
                .map(education_line)
                .collect::<Vec<_>>()
                .join("\n"),
            keywords: doc.keywords.clone(),
        }
    }
}

/// `"{jobTitle} at {companyName}: {responsibilities, …}"`
fn work_line(e: &WorkExperienceEntry) -> String {
    format!(
        "{} at {}: {}",
        e.job_title,
        e.company_name,
        e.responsibilities.join(", ")
    )
}

/// `"{degreeTitle} from {universityName} ({graduationYear})"`
fn education_line(e: &EducationEntry) -> String {
    format!(
        "{} from {} ({})",
        e.degree_title, e.university_name, e.graduation_year
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Merge
// ────────────────────────────────────────────────────────────────────────────

/// How two keywords are judged to be the same.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeywordMatching {
    /// Keywords are the same only when their strings are identical.
    #[default]
    Exact,
    CaseInsensitive,
}

impl FromStr for KeywordMatching {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "case-insensitive" | "caseinsensitive" | "insensitive" => Ok(Self::CaseInsensitive),
            "exact" | "case-sensitive" => Ok(Self::Exact),
            other => Err(format!(
                "unknown keyword matching '{other}' (expected 'case-insensitive' or 'exact')"
            )),
        }
    }
}

impl KeywordMatching {
    fn key(self, keyword: &str) -> String {
        match self {
            Self::CaseInsensitive => keyword.to_lowercase(),
            Self::Exact => keyword.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMerge {
    /// The merged list, joined with `", "`.
    pub keywords: String,
    /// Suggested keywords that were not already present, in suggestion order.
    pub added: Vec<String>,
}

/// Existing keywords first, then first occurrences of new suggestions.
/// The first spelling seen wins.
pub fn merge_keywords(existing: &str, suggested: &str, matching: KeywordMatching) -> KeywordMerge {
    let mut seen = HashSet::new();
    let mut merged: Vec<&str> = Vec::new();

    for keyword in split_list(existing) {
        if seen.insert(matching.key(keyword)) {
            merged.push(keyword);
        }
    }

    let mut added = Vec::new();
    for keyword in split_list(suggested) {
        if seen.insert(matching.key(keyword)) {
            merged.push(keyword);
            added.push(keyword.to_string());
        }
    }

    KeywordMerge {
        keywords: merged.join(", "),
        added,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Suggestion flow
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionOutcome {
    Added { keywords: String, added: Vec<String> },
    NoNewKeywords,
}

/// Asks the advisor about the current document and merges the answer in.
///
/// The merge runs against the document as it is when the answer arrives, so
/// edits made while the advisor was thinking are kept.
pub async fn suggest_keywords(
    session: &ResumeSession,
    advisor: &dyn KeywordAdvisor,
    matching: KeywordMatching,
) -> Result<SuggestionOutcome, AdvisorError> {
    let request = KeywordRequest::from_document(&session.snapshot());
    let suggestion = advisor.suggest(&request).await?;
    Ok(fold_suggestion(session, &suggestion.suggested_keywords, matching).await)
}

async fn fold_suggestion(
    session: &ResumeSession,
    suggested: &str,
    matching: KeywordMatching,
) -> SuggestionOutcome {
    let committed = session
        .update(|doc| {
            let merge = merge_keywords(&doc.keywords, suggested, matching);
            if merge.added.is_empty() {
                return Ok::<_, Infallible>(None);
            }
            let mut next = doc.clone();
            next.keywords = merge.keywords.clone();
            Ok(Some((next, merge)))
        })
        .await;
    let committed = match committed {
        Ok(committed) => committed,
        Err(never) => match never {},
    };

    match committed {
        Some((_, merge)) => {
            info!(added = merge.added.len(), "Merged suggested keywords");
            SuggestionOutcome::Added {
                keywords: merge.keywords,
                added: merge.added,
            }
        }
        None => SuggestionOutcome::NoNewKeywords,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::document::edit::Edit;
    use crate::storage::{MemoryStore, PersistenceAdapter};

    struct FixedAdvisor(&'static str);

    #[async_trait]
    impl KeywordAdvisor for FixedAdvisor {
        async fn suggest(&self, _request: &KeywordRequest) -> Result<KeywordSuggestion, AdvisorError> {
            Ok(KeywordSuggestion {
                suggested_keywords: self.0.to_string(),
            })
        }
    }

    async fn session_with_keywords(keywords: &str) -> ResumeSession {
        let session = ResumeSession::open(PersistenceAdapter::new(Arc::new(MemoryStore::default())));
        session
            .apply(&Edit::Set {
                path: "keywords".to_string(),
                value: keywords.into(),
            })
            .await
            .unwrap();
        session
    }

    #[test]
    fn test_merge_exact_by_default() {
        let merge = merge_keywords("Java, SQL", "SQL, Leadership, Java", KeywordMatching::default());
        assert_eq!(merge.keywords, "Java, SQL, Leadership");
        assert_eq!(merge.added, vec!["Leadership"]);
    }

    #[test]
    fn test_merge_exact_keeps_case_variants() {
        let merge = merge_keywords("Rust", "rust", KeywordMatching::default());
        assert_eq!(merge.keywords, "Rust, rust");
        assert_eq!(merge.added, vec!["rust"]);

        let merge = merge_keywords("Java, SQL", "sql, Leadership, Java", KeywordMatching::Exact);
        assert_eq!(merge.keywords, "Java, SQL, sql, Leadership");
    }

    #[test]
    fn test_merge_case_insensitive_opt_in() {
        let merge = merge_keywords(
            "Java, SQL",
            "sql, Leadership, Java",
            KeywordMatching::CaseInsensitive,
        );
        assert_eq!(merge.keywords, "Java, SQL, Leadership");
        assert_eq!(merge.added, vec!["Leadership"]);
    }

    #[test]
    fn test_merge_trims_drops_empties_and_dedupes_existing() {
        let merge = merge_keywords(" Rust ,, Rust", " , Go,go ,", KeywordMatching::CaseInsensitive);
        assert_eq!(merge.keywords, "Rust, Go");
        assert_eq!(merge.added, vec!["Go"]);
    }

    #[test]
    fn test_merge_into_empty() {
        let merge = merge_keywords("", "A, B", KeywordMatching::CaseInsensitive);
        assert_eq!(merge.keywords, "A, B");
    }

    #[test]
    fn test_matching_from_str() {
        assert_eq!("exact".parse::<KeywordMatching>(), Ok(KeywordMatching::Exact));
        assert_eq!(
            "Case-Insensitive".parse::<KeywordMatching>(),
            Ok(KeywordMatching::CaseInsensitive)
        );
        assert!("fuzzy".parse::<KeywordMatching>().is_err());
    }

    #[test]
    fn test_request_flattening() {
        let mut doc = ResumeDocument::default();
        doc.work_experience.push(WorkExperienceEntry {
            job_title: "Engineer".to_string(),
            company_name: "Acme".to_string(),
            responsibilities: vec!["Build".to_string(), "Test".to_string()],
            ..Default::default()
        });
        doc.work_experience.push(WorkExperienceEntry {
            job_title: "Intern".to_string(),
            company_name: "Initech".to_string(),
            ..Default::default()
        });
        doc.education.push(EducationEntry {
            degree_title: "BSc".to_string(),
            university_name: "MIT".to_string(),
            graduation_year: "2019".to_string(),
            ..Default::default()
        });
        let request = KeywordRequest::from_document(&doc);
        assert_eq!(request.work_experience, "Engineer at Acme: Build, Test\nIntern at Initech: ");
        assert_eq!(request.education, "BSc from MIT (2019)");
    }

    #[tokio::test]
    async fn test_suggest_adds_new_keywords() {
        let session = session_with_keywords("Java, SQL").await;
        let outcome = suggest_keywords(
            &session,
            &FixedAdvisor("sql, Leadership, Java"),
            KeywordMatching::CaseInsensitive,
        )
        .await
        .unwrap();
        assert_eq!(
            outcome,
            SuggestionOutcome::Added {
                keywords: "Java, SQL, Leadership".to_string(),
                added: vec!["Leadership".to_string()],
            }
        );
        assert_eq!(session.snapshot().keywords, "Java, SQL, Leadership");
    }

    #[tokio::test]
    async fn test_empty_or_redundant_suggestion_leaves_document() {
        let session = session_with_keywords("Java, SQL").await;
        let before = session.snapshot();
        for suggestion in ["", "  ", "Java, SQL", " SQL ,Java"] {
            let advisor = FixedAdvisor(suggestion);
            let outcome = suggest_keywords(&session, &advisor, KeywordMatching::default())
                .await
                .unwrap();
            assert_eq!(outcome, SuggestionOutcome::NoNewKeywords);
        }
        assert!(Arc::ptr_eq(&before, &session.snapshot()));
    }

    #[tokio::test]
    async fn test_advisor_failure_leaves_keywords() {
        let session = session_with_keywords("Java").await;
        let err = suggest_keywords(&session, &UnconfiguredAdvisor, KeywordMatching::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisorError::Unavailable));
        assert_eq!(session.snapshot().keywords, "Java");
    }
}
