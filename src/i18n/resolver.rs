//! Language resolution: from request signals to a single language tag.
//!
//! Priority, highest first:
//!
//! 1. an explicit `?lng=` query override (any well-formed tag),
//! 2. the first `Accept-Language` entry the engine supports,
//! 3. the engine's default language.
//!
//! Without an engine the answer is always English.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::{HeaderMap, Uri};
use tracing::debug;

use crate::i18n::accept::parse_accept_language;
use crate::i18n::{LanguageTag, Translator};

/// Query parameter consulted for an explicit language override.
pub const DEFAULT_QUERY_PARAM: &str = "lng";

/// The parts of a request that language resolution may look at.
#[derive(Debug, Clone, Copy)]
pub struct RequestSignals<'a> {
    uri: &'a Uri,
    headers: &'a HeaderMap,
    engine: Option<&'a Translator>,
}

impl<'a> RequestSignals<'a> {
    pub fn new(uri: &'a Uri, headers: &'a HeaderMap, engine: Option<&'a Translator>) -> Self {
        Self {
            uri,
            headers,
            engine,
        }
    }

    /// Percent-decoded value of a query parameter.
    pub fn query_value(&self, name: &str) -> Option<String> {
        let Query(mut params) = Query::<HashMap<String, String>>::try_from_uri(self.uri).ok()?;
        params.remove(name)
    }

    /// A header value, if present and valid visible ASCII.
    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn accept_language(&self) -> Option<&'a str> {
        self.headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
    }

    /// The translation engine installed for this request, if any.
    pub fn engine(&self) -> Option<&'a Translator> {
        self.engine
    }
}

/// Strategy that picks the raw language string for a request.
///
/// Implemented by [`DefaultLanguageExtractor`] and by any
/// `Fn(&RequestSignals) -> String` closure. Output that does not parse as a
/// language tag resolves to the default language.
pub trait LanguageExtractor: Send + Sync + 'static {
    fn extract_language(&self, signals: &RequestSignals<'_>) -> String;
}

impl<F> LanguageExtractor for F
where
    F: Fn(&RequestSignals<'_>) -> String + Send + Sync + 'static,
{
    fn extract_language(&self, signals: &RequestSignals<'_>) -> String {
        self(signals)
    }
}

/// Query override, then `Accept-Language`, then the default language.
#[derive(Debug, Clone)]
pub struct DefaultLanguageExtractor {
    query_param: String,
}

impl Default for DefaultLanguageExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_PARAM)
    }
}

impl DefaultLanguageExtractor {
    /// Use `query_param` instead of `lng` for the explicit override.
    pub fn new(query_param: impl Into<String>) -> Self {
        Self {
            query_param: query_param.into(),
        }
    }

    pub fn query_param(&self) -> &str {
        &self.query_param
    }

    /// Resolve the language for a request.
    ///
    /// The result is the override, a supported language, or the default.
    pub fn resolve(&self, signals: &RequestSignals<'_>) -> LanguageTag {
        let Some(engine) = signals.engine() else {
            return LanguageTag::canonical();
        };

        if let Some(raw) = signals.query_value(&self.query_param) {
            if !raw.trim().is_empty() {
                match LanguageTag::parse(&raw) {
                    Ok(tag) => {
                        debug!(lng = %tag, "language from query override");
                        return tag;
                    }
                    Err(e) => debug!("ignoring query override '{}': {}", raw, e),
                }
            }
        }

        if let Some(header) = signals.accept_language() {
            match parse_accept_language(header) {
                Some(candidates) => {
                    if let Some(tag) = candidates.into_iter().find(|t| engine.is_supported(t)) {
                        debug!(lng = %tag, "language from Accept-Language");
                        return tag;
                    }
                }
                None => debug!("ignoring unusable Accept-Language '{}'", header),
            }
        }

        engine.default_language().clone()
    }
}

impl LanguageExtractor for DefaultLanguageExtractor {
    fn extract_language(&self, signals: &RequestSignals<'_>) -> String {
        self.resolve(signals).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{MapLoader, TranslatorOptions};
    use axum::http::HeaderValue;
    use std::sync::Arc;

    fn engine() -> Translator {
        Translator::new(TranslatorOptions {
            languages: vec![LanguageTag::ENGLISH, LanguageTag::GERMAN],
            loaders: vec![Arc::new(MapLoader::new())],
            ..Default::default()
        })
        .unwrap()
    }

    fn headers(accept: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(accept) = accept {
            headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(accept).unwrap());
        }
        headers
    }

    fn resolve(uri: &str, accept: Option<&str>) -> String {
        let engine = engine();
        let uri: Uri = uri.parse().unwrap();
        let headers = headers(accept);
        let signals = RequestSignals::new(&uri, &headers, Some(&engine));
        DefaultLanguageExtractor::default().resolve(&signals).to_string()
    }

    // ==================== Accept-Language Tests ====================

    #[test]
    fn test_supported_header_language() {
        assert_eq!(resolve("/", Some("de")), "de");
        assert_eq!(resolve("/", Some("en")), "en");
    }

    #[test]
    fn test_first_supported_candidate_wins() {
        assert_eq!(resolve("/", Some("fr, de;q=0.8, en;q=0.5")), "de");
        assert_eq!(resolve("/", Some("en;q=0.2, de;q=0.9")), "de");
    }

    #[test]
    fn test_unsupported_header_uses_default() {
        assert_eq!(resolve("/", Some("fr")), "en");
        assert_eq!(resolve("/", Some("de-AT")), "en");
    }

    #[test]
    fn test_malformed_header_uses_default() {
        assert_eq!(resolve("/", Some("de;q=banana")), "en");
        assert_eq!(resolve("/", Some("")), "en");
    }

    #[test]
    fn test_no_header_uses_default() {
        assert_eq!(resolve("/", None), "en");
    }

    // ==================== Query Override Tests ====================

    #[test]
    fn test_query_override_beats_header() {
        assert_eq!(resolve("/?lng=de", Some("en")), "de");
    }

    #[test]
    fn test_query_override_is_not_checked_for_support() {
        assert_eq!(resolve("/?lng=fr-ca", Some("de")), "fr-CA");
    }

    #[test]
    fn test_empty_query_override_is_ignored() {
        assert_eq!(resolve("/?lng=", Some("de")), "de");
        assert_eq!(resolve("/?lng=%20", Some("de")), "de");
    }

    #[test]
    fn test_invalid_query_override_is_ignored() {
        assert_eq!(resolve("/?lng=%21%21", Some("de")), "de");
    }

    #[test]
    fn test_structurally_invalid_override_is_ignored() {
        assert_eq!(resolve("/?lng=en-12", Some("de")), "de");
        assert_eq!(resolve("/?lng=de-DE-AT-CH", None), "en");
    }

    #[test]
    fn test_query_override_is_percent_decoded() {
        assert_eq!(resolve("/?page=2&lng=zh%2DHans", None), "zh-Hans");
    }

    #[test]
    fn test_custom_query_param() {
        let engine = engine();
        let uri: Uri = "/?locale=de&lng=fr".parse().unwrap();
        let headers = headers(None);
        let signals = RequestSignals::new(&uri, &headers, Some(&engine));
        let extractor = DefaultLanguageExtractor::new("locale");
        assert_eq!(extractor.query_param(), "locale");
        assert_eq!(extractor.resolve(&signals), LanguageTag::GERMAN);
    }

    // ==================== No Engine Tests ====================

    #[test]
    fn test_no_engine_is_english() {
        let uri: Uri = "/?lng=de".parse().unwrap();
        let headers = headers(Some("de"));
        let signals = RequestSignals::new(&uri, &headers, None);
        assert_eq!(
            DefaultLanguageExtractor::default().extract_language(&signals),
            "en"
        );
    }

    // ==================== Extractor Trait Tests ====================

    #[test]
    fn test_closure_extractor() {
        let extractor = |signals: &RequestSignals<'_>| {
            signals.header("x-language").unwrap_or("en").to_string()
        };
        let uri: Uri = "/".parse().unwrap();
        let mut headers = headers(None);
        headers.insert("x-language", HeaderValue::from_static("de"));
        let signals = RequestSignals::new(&uri, &headers, None);
        assert_eq!(extractor.extract_language(&signals), "de");
    }
}
