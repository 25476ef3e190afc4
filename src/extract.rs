//! `Localizer` extractor for axum handlers.

use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap, Uri};
use serde_json::Value;

use crate::context::{self, RequestScope};
use crate::delegate;
use crate::i18n::LanguageTag;

/// Owned request scope for handlers.
///
/// Carries the request's URI, headers and the two i18n slots, so a handler
/// can translate without holding the whole request:
///
/// ```ignore
/// async fn index(l: Localizer) -> String {
///     l.t("welcome")
/// }
/// ```
///
/// The negotiator handle is shared with the request, so the language
/// resolved here is the one every other reader of the request sees.
#[derive(Debug, Clone)]
pub struct Localizer {
    uri: Uri,
    headers: HeaderMap,
    extensions: Extensions,
}

impl Localizer {
    pub fn from_parts(parts: &Parts) -> Self {
        let mut extensions = Extensions::new();
        context::copy_slots(&parts.extensions, &mut extensions);
        Self {
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            extensions,
        }
    }

    /// Translate a message without template data.
    pub fn t(&self, key: &str) -> String {
        delegate::translate(self, key, None)
    }

    /// Translate a message with template data.
    pub fn t_with(&self, key: &str, data: &Value) -> String {
        delegate::translate(self, key, Some(data))
    }

    pub fn current_language(&self) -> LanguageTag {
        delegate::current_language(self)
    }

    pub fn default_language(&self) -> LanguageTag {
        delegate::default_language(self)
    }

    pub fn has_language(&self, candidate: &str) -> bool {
        delegate::has_language(self, candidate)
    }
}

impl RequestScope for Localizer {
    fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    fn uri(&self) -> &Uri {
        &self.uri
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Localizer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}
