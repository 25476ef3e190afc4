use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::delegate::I18n;
use crate::i18n::{DirLoader, LanguageTag, DEFAULT_QUERY_PARAM};

#[derive(Debug, Clone)]
pub struct Config {
    // Languages
    pub languages: Vec<LanguageTag>,
    pub default_language: Option<LanguageTag>,

    // Catalogs
    pub catalog_dir: PathBuf,

    // Negotiation
    pub query_param: String,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Languages - first one is the default unless overridden
            languages: parse_languages(
                &std::env::var("I18N_LANGUAGES").unwrap_or_else(|_| "en,de".to_string()),
            )
            .context("I18N_LANGUAGES is not a list of language tags")?,
            default_language: match std::env::var("I18N_DEFAULT_LANGUAGE") {
                Ok(raw) if !raw.trim().is_empty() => Some(
                    LanguageTag::parse(&raw).context("I18N_DEFAULT_LANGUAGE is not a language tag")?,
                ),
                _ => None,
            },

            // Catalogs
            catalog_dir: std::env::var("I18N_CATALOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("localize")),

            // Negotiation
            query_param: std::env::var("I18N_QUERY_PARAM")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_QUERY_PARAM.to_string()),

            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        })
    }

    /// The i18n configuration described by this config, logging through
    /// `tracing`.
    pub fn i18n(&self) -> I18n {
        let mut builder = I18n::builder()
            .languages(self.languages.iter().cloned())
            .loader(DirLoader::new(self.catalog_dir.clone()))
            .query_param(&self.query_param)
            .default_logger();
        if let Some(default) = &self.default_language {
            builder = builder.default_language(default.clone());
        }
        builder.build()
    }
}

/// Parse a comma-separated list of language tags, skipping blanks.
fn parse_languages(raw: &str) -> Result<Vec<LanguageTag>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| LanguageTag::parse(s).with_context(|| format!("Invalid language tag: '{}'", s)))
        .collect()
}
