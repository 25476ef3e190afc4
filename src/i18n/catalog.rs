//! Translation engine: message catalogs with a per-language fallback chain.
//!
//! # Invariants
//!
//! 1. **Default is supported**: the default language is always a member of
//!    the supported set.
//!
//! 2. **Immutable after construction**: `Translator` is `Send + Sync` and
//!    never mutated once built, so one instance serves every request.
//!
//! 3. **Fallback chain terminates**: a lookup for `de-AT` tries `de-AT`,
//!    then `de`, then the default language, each at most once.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | Key not in any catalog of the chain | `MessageNotFound`, output is the key |
//! | Bad message | Catalog message fails to render | `Template`, output is the raw message |
//! | Foreign catalog | Loader yields an unsupported language | Skipped with a warning |

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::{LoadError, TranslateError};
use crate::i18n::logger::SharedLogger;
use crate::i18n::{template, LanguageTag};

/// Messages of one language, keyed by message id.
pub type Messages = HashMap<String, String>;

/// A source of message catalogs.
pub trait Loader: Send + Sync {
    /// Produce `(language, messages)` pairs. A language may appear more than
    /// once; later entries override earlier ones key by key.
    fn load(&self) -> Result<Vec<(LanguageTag, Messages)>, LoadError>;
}

/// In-memory catalogs, mostly useful for tests and embedded messages.
///
/// # Example
///
/// ```
/// use axum_localize::{LanguageTag, MapLoader};
///
/// let loader = MapLoader::new()
///     .with_messages(LanguageTag::ENGLISH, [("welcome", "hello")])
///     .with_messages(LanguageTag::GERMAN, [("welcome", "hallo")]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapLoader {
    catalogs: Vec<(LanguageTag, Messages)>,
}

impl MapLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add messages for a language.
    pub fn with_messages<I, K, V>(mut self, language: LanguageTag, messages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let messages = messages
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.catalogs.push((language, messages));
        self
    }
}

impl Loader for MapLoader {
    fn load(&self) -> Result<Vec<(LanguageTag, Messages)>, LoadError> {
        Ok(self.catalogs.clone())
    }
}

/// Loads every `<tag>.json` file in a directory (e.g. `localize/de.json`).
///
/// Each file holds a JSON object whose leaves are strings. Nested objects
/// flatten to dotted keys: `{"menu": {"open": "Open"}}` defines `menu.open`.
#[derive(Debug, Clone)]
pub struct DirLoader {
    dir: PathBuf,
}

impl DirLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Loader for DirLoader {
    fn load(&self) -> Result<Vec<(LanguageTag, Messages)>, LoadError> {
        let io_err = |source| LoadError::Io {
            path: self.dir.clone(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        paths.into_iter().map(|path| load_file(&path)).collect()
    }
}

fn load_file(path: &Path) -> Result<(LanguageTag, Messages), LoadError> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let language = LanguageTag::parse(&stem).map_err(|source| LoadError::FileName {
        path: path.to_path_buf(),
        source,
    })?;

    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut messages = Messages::new();
    flatten(path, "", &value, &mut messages)?;
    Ok((language, messages))
}

fn flatten(path: &Path, prefix: &str, value: &Value, out: &mut Messages) -> Result<(), LoadError> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let full = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(path, &full, child, out)?;
            }
            Ok(())
        }
        Value::String(message) if !prefix.is_empty() => {
            out.insert(prefix.to_string(), message.clone());
            Ok(())
        }
        _ => Err(LoadError::Shape {
            path: path.to_path_buf(),
            key: prefix.to_string(),
        }),
    }
}

/// Construction options for a [`Translator`].
#[derive(Clone, Default)]
pub struct TranslatorOptions {
    /// Supported languages in preference order. Empty means English only.
    pub languages: Vec<LanguageTag>,
    /// Default language; the first supported language when unset.
    pub default_language: Option<LanguageTag>,
    pub loaders: Vec<Arc<dyn Loader>>,
    pub logger: Option<SharedLogger>,
}

impl fmt::Debug for TranslatorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorOptions")
            .field("languages", &self.languages)
            .field("default_language", &self.default_language)
            .field("loaders", &self.loaders.len())
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

/// Message lookup engine shared by all requests.
pub struct Translator {
    languages: Vec<LanguageTag>,
    default_language: LanguageTag,
    catalogs: HashMap<LanguageTag, Messages>,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("languages", &self.languages)
            .field("default_language", &self.default_language)
            .field("catalogs", &self.catalogs.len())
            .finish_non_exhaustive()
    }
}

impl Translator {
    /// Build the engine, running every loader once.
    pub fn new(options: TranslatorOptions) -> Result<Self, LoadError> {
        let TranslatorOptions {
            languages: requested,
            default_language,
            loaders,
            logger,
        } = options;

        let mut languages: Vec<LanguageTag> = Vec::with_capacity(requested.len() + 1);
        for tag in requested {
            if !languages.contains(&tag) {
                languages.push(tag);
            }
        }

        let default_language = default_language
            .or_else(|| languages.first().cloned())
            .unwrap_or_else(LanguageTag::canonical);
        if !languages.contains(&default_language) {
            languages.insert(0, default_language.clone());
        }

        let mut catalogs: HashMap<LanguageTag, Messages> = HashMap::new();
        for loader in &loaders {
            for (language, messages) in loader.load()? {
                if !languages.contains(&language) {
                    let message = "skipping catalog for unsupported language";
                    match &logger {
                        Some(logger) => logger.warn(message, &[("lng", language.as_str())]),
                        None => debug!(lng = %language, "{}", message),
                    }
                    continue;
                }
                catalogs.entry(language).or_default().extend(messages);
            }
        }

        debug!(
            languages = ?languages,
            default = %default_language,
            catalogs = catalogs.len(),
            "translator ready"
        );

        Ok(Self {
            languages,
            default_language,
            catalogs,
        })
    }

    /// Translate `key` into `language`, walking the fallback chain.
    ///
    /// On failure the error's [`TranslateError::output`] is the text to show.
    pub fn translate(
        &self,
        language: &LanguageTag,
        key: &str,
        data: Option<&Value>,
    ) -> Result<String, TranslateError> {
        for candidate in self.fallback_chain(language) {
            let Some(raw) = self.catalogs.get(&candidate).and_then(|m| m.get(key)) else {
                continue;
            };

            return template::render(raw, data).map_err(|source| TranslateError::Template {
                language: candidate.clone(),
                key: key.to_string(),
                raw: raw.clone(),
                source,
            });
        }

        debug!(lng = %language, msg_id = key, "message not found in any catalog");
        Err(TranslateError::MessageNotFound {
            language: language.clone(),
            key: key.to_string(),
        })
    }

    /// Supported languages, default first only if it was listed first.
    pub fn supported_languages(&self) -> &[LanguageTag] {
        &self.languages
    }

    pub fn default_language(&self) -> &LanguageTag {
        &self.default_language
    }

    /// Whether `language` is the default or one of the supported languages.
    pub fn is_supported(&self, language: &LanguageTag) -> bool {
        *language == self.default_language || self.languages.contains(language)
    }

    /// Languages tried for a lookup in `language`, in order, without repeats.
    pub fn fallback_chain(&self, language: &LanguageTag) -> Vec<LanguageTag> {
        let mut chain = vec![language.clone()];
        let mut current = language.parent();
        while let Some(parent) = current {
            current = parent.parent();
            if !chain.contains(&parent) {
                chain.push(parent);
            }
        }
        if !chain.contains(&self.default_language) {
            chain.push(self.default_language.clone());
        }
        chain
    }
}
