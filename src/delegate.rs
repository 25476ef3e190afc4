//! Translation delegate: per-request translation on top of the engine.
//!
//! [`I18n`] is the long-lived configuration (supported languages, catalog
//! loaders, extraction strategy, logger). [`Negotiator`] is the handle the
//! middleware places into each request; it remembers the language resolved
//! for that request. The free functions at the bottom are the call surface
//! handlers use, and they never fail: without middleware they fall back to
//! rendering the message key itself.

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing::debug;

use crate::context::{self, RequestScope};
use crate::i18n::{
    fallback_render, DefaultLanguageExtractor, LanguageExtractor, LanguageTag, Loader, Logger,
    SharedLogger, TracingLogger, TranslatorOptions,
};

/// Language negotiation and translation configuration.
///
/// Build one with [`I18n::builder`], then turn it into middleware with
/// [`I18n::localize`].
pub struct I18n {
    extractor: Arc<dyn LanguageExtractor>,
    options: TranslatorOptions,
    logger: Option<SharedLogger>,
}

impl fmt::Debug for I18n {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I18n")
            .field("options", &self.options)
            .field("logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new()
    }
}

impl I18n {
    /// English only, default extractor, no logger.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> I18nBuilder {
        I18nBuilder::default()
    }

    pub fn logger(&self) -> Option<&SharedLogger> {
        self.logger.as_ref()
    }

    /// Engine options with the logger attached, as used by the middleware.
    pub(crate) fn engine_options(&self) -> TranslatorOptions {
        TranslatorOptions {
            logger: self.logger.clone(),
            ..self.options.clone()
        }
    }

    /// Translate `key` for the request in `scope`.
    ///
    /// Falls back to rendering `key` when no engine is installed. A lookup
    /// failure is logged (when a logger is configured) and the engine's own
    /// failure text is returned.
    pub fn translate<S>(&self, scope: &S, key: &str, data: Option<&Value>) -> String
    where
        S: RequestScope + ?Sized,
    {
        let Some(engine) = context::engine(scope) else {
            return fallback_render(key, data);
        };

        let language = self.current_language(scope);
        match engine.translate(&language, key, data) {
            Ok(message) => message,
            Err(err) => {
                if let Some(logger) = &self.logger {
                    logger.warn(&format!("translation: {}", err), &[("msgID", key)]);
                }
                err.output().to_string()
            }
        }
    }

    /// The language for the request in `scope`.
    ///
    /// Uses the request's cached answer when this instance is the one the
    /// middleware installed, otherwise resolves afresh.
    pub fn current_language<S>(&self, scope: &S) -> LanguageTag
    where
        S: RequestScope + ?Sized,
    {
        match context::negotiator(scope) {
            Some(negotiator) if std::ptr::eq(negotiator.i18n(), self) => {
                negotiator.current_language(scope)
            }
            _ => self.negotiate(scope),
        }
    }

    fn negotiate<S>(&self, scope: &S) -> LanguageTag
    where
        S: RequestScope + ?Sized,
    {
        let signals = context::signals(scope);
        let raw = self.extractor.extract_language(&signals);
        LanguageTag::parse(&raw).unwrap_or_else(|e| {
            debug!("extracted language '{}' is not a language tag: {}", raw, e);
            signals
                .engine()
                .map(|engine| engine.default_language().clone())
                .unwrap_or_else(LanguageTag::canonical)
        })
    }
}

/// Builder for [`I18n`].
#[derive(Default)]
pub struct I18nBuilder {
    languages: Vec<LanguageTag>,
    default_language: Option<LanguageTag>,
    loaders: Vec<Arc<dyn Loader>>,
    extractor: Option<Arc<dyn LanguageExtractor>>,
    query_param: Option<String>,
    logger: Option<SharedLogger>,
}

impl I18nBuilder {
    /// Supported languages; the first becomes the default unless
    /// [`default_language`](Self::default_language) is set.
    pub fn languages<I>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = LanguageTag>,
    {
        self.languages.extend(languages);
        self
    }

    pub fn default_language(mut self, language: LanguageTag) -> Self {
        self.default_language = Some(language);
        self
    }

    /// Add a catalog source. Loaders run once, when the middleware is built.
    pub fn loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loaders.push(Arc::new(loader));
        self
    }

    /// Name of the override query parameter (default `lng`). Ignored when a
    /// custom extractor is set.
    pub fn query_param(mut self, name: impl Into<String>) -> Self {
        self.query_param = Some(name.into());
        self
    }

    /// Replace the language extraction strategy.
    pub fn language_extractor(mut self, extractor: impl LanguageExtractor) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    pub fn logger(mut self, logger: impl Logger) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Log warnings through `tracing`.
    pub fn default_logger(self) -> Self {
        self.logger(TracingLogger)
    }

    pub fn build(self) -> I18n {
        let extractor = self.extractor.unwrap_or_else(|| {
            let query_param = self
                .query_param
                .unwrap_or_else(|| crate::i18n::DEFAULT_QUERY_PARAM.to_string());
            Arc::new(DefaultLanguageExtractor::new(query_param))
        });

        I18n {
            extractor,
            options: TranslatorOptions {
                languages: self.languages,
                default_language: self.default_language,
                loaders: self.loaders,
                logger: None,
            },
            logger: self.logger,
        }
    }
}

/// Per-request negotiator handle.
///
/// Created fresh by the middleware for every request, so the cached
/// language never leaks between requests.
#[derive(Clone)]
pub struct Negotiator {
    i18n: Arc<I18n>,
    resolved: Arc<OnceLock<LanguageTag>>,
}

impl fmt::Debug for Negotiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Negotiator")
            .field("resolved", &self.resolved.get())
            .finish_non_exhaustive()
    }
}

impl Negotiator {
    pub(crate) fn new(i18n: Arc<I18n>) -> Self {
        Self {
            i18n,
            resolved: Arc::new(OnceLock::new()),
        }
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    /// Resolve once, then answer from the cache for the rest of the request.
    pub fn current_language<S>(&self, scope: &S) -> LanguageTag
    where
        S: RequestScope + ?Sized,
    {
        self.resolved
            .get_or_init(|| self.i18n.negotiate(scope))
            .clone()
    }

    pub fn translate<S>(&self, scope: &S, key: &str, data: Option<&Value>) -> String
    where
        S: RequestScope + ?Sized,
    {
        self.i18n.translate(scope, key, data)
    }
}

/// Translate `key` for the request in `scope`.
///
/// Without the middleware, `key` itself is rendered as a template over
/// `data` (or returned verbatim if that fails).
pub fn translate<S>(scope: &S, key: &str, data: Option<&Value>) -> String
where
    S: RequestScope + ?Sized,
{
    match context::negotiator(scope) {
        Some(negotiator) => negotiator.translate(scope, key, data),
        None => fallback_render(key, data),
    }
}

/// Whether `candidate` is the default or a supported language. Always
/// `false` without the middleware or for a malformed tag.
pub fn has_language<S>(scope: &S, candidate: &str) -> bool
where
    S: RequestScope + ?Sized,
{
    let Some(engine) = context::engine(scope) else {
        return false;
    };
    LanguageTag::parse(candidate)
        .map(|tag| engine.is_supported(&tag))
        .unwrap_or(false)
}

/// The configured default language, or English without the middleware.
pub fn default_language<S>(scope: &S) -> LanguageTag
where
    S: RequestScope + ?Sized,
{
    context::engine(scope)
        .map(|engine| engine.default_language().clone())
        .unwrap_or_else(LanguageTag::canonical)
}

/// The language resolved for the request, or English without the
/// middleware.
pub fn current_language<S>(scope: &S) -> LanguageTag
where
    S: RequestScope + ?Sized,
{
    context::negotiator(scope)
        .map(|negotiator| negotiator.current_language(scope))
        .unwrap_or_else(LanguageTag::canonical)
}
