use anyhow::{bail, Context, Result};

use crate::keywords::KeywordMatching;

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// `file://<dir>`, a bare directory, `redis://…` or `memory://`.
    pub store_url: String,
    /// Keyword suggestions are disabled when unset.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub keyword_matching: KeywordMatching,
    /// Rasterizer pixels per page unit for PDF export (1 to 4).
    pub export_scale: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let keyword_matching = match var("KEYWORD_MATCHING") {
            Some(raw) => raw
                .parse::<KeywordMatching>()
                .map_err(anyhow::Error::msg)
                .context("KEYWORD_MATCHING is invalid")?,
            None => KeywordMatching::default(),
        };

        let export_scale = match var("EXPORT_SCALE") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .context("EXPORT_SCALE must be a whole number")?,
            None => 2,
        };
        if !(1..=4).contains(&export_scale) {
            bail!("EXPORT_SCALE must be between 1 and 4, got {export_scale}");
        }

        Ok(Config {
            store_url: var("STORE_URL").unwrap_or_else(|| "file://./data".to_string()),
            anthropic_api_key: var("ANTHROPIC_API_KEY"),
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            keyword_matching,
            export_scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.store_url, "file://./data");
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert!(config.anthropic_api_key.is_none());
        assert_eq!(config.keyword_matching, KeywordMatching::Exact);
        assert_eq!(config.export_scale, 2);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("STORE_URL", "memory://"),
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("PORT", "3000"),
            ("KEYWORD_MATCHING", "case-insensitive"),
            ("EXPORT_SCALE", "3"),
        ])
        .unwrap();
        assert_eq!(config.store_url, "memory://");
        assert_eq!(config.anthropic_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.port, 3000);
        assert_eq!(config.keyword_matching, KeywordMatching::CaseInsensitive);
        assert_eq!(config.export_scale, 3);
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let config = config(&[("ANTHROPIC_API_KEY", "  ")]).unwrap();
        assert!(config.anthropic_api_key.is_none());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("EXPORT_SCALE", "9")]).is_err());
        assert!(config(&[("EXPORT_SCALE", "0")]).is_err());
        assert!(config(&[("KEYWORD_MATCHING", "fuzzy")]).is_err());
    }
}
