//! Language tag: normalized, validated language identifier.
//!
//! This module provides the `LanguageTag` type, a BCP 47 style identifier
//! with canonical casing applied at parse time, so two tags compare equal
//! whenever they name the same language.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::error::LanguageTagError;

/// A validated language tag (e.g. `en`, `de-AT`, `zh-Hans`).
///
/// Construct one with [`LanguageTag::parse`] or through `FromStr`. The
/// stored form is canonical: language lowercase, script titlecase, region
/// uppercase, variants lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageTag(Cow<'static, str>);

impl LanguageTag {
    /// English, the canonical fallback language.
    pub const ENGLISH: LanguageTag = LanguageTag(Cow::Borrowed("en"));

    /// German.
    pub const GERMAN: LanguageTag = LanguageTag(Cow::Borrowed("de"));

    /// Parse and normalize a language tag.
    ///
    /// Both `-` and `_` are accepted as subtag separators. Surrounding
    /// whitespace is ignored. Extension and private-use subtags are rejected.
    ///
    /// # Example
    /// ```
    /// use axum_localize::LanguageTag;
    ///
    /// let tag = LanguageTag::parse("zh_hans_cn").unwrap();
    /// assert_eq!(tag.as_str(), "zh-Hans-CN");
    /// ```
    pub fn parse(input: &str) -> Result<Self, LanguageTagError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LanguageTagError::Empty);
        }

        let identifier = trimmed
            .parse::<LanguageIdentifier>()
            .map_err(|err| LanguageTagError::Invalid {
                tag: trimmed.to_string(),
                reason: err.to_string(),
            })?;

        Ok(LanguageTag(Cow::Owned(identifier.to_string())))
    }

    /// The canonical language (English).
    pub fn canonical() -> LanguageTag {
        Self::ENGLISH
    }

    /// The tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The tag with its last subtag removed, or `None` for a bare language.
    ///
    /// `zh-Hans-CN` -> `zh-Hans` -> `zh` -> `None`.
    pub fn parent(&self) -> Option<LanguageTag> {
        self.0
            .rfind('-')
            .map(|end| LanguageTag(Cow::Owned(self.0[..end].to_string())))
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LanguageTag {
    type Err = LanguageTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LanguageTag {
    type Error = LanguageTagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for LanguageTag {
    type Error = LanguageTagError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        tag.0.into_owned()
    }
}

impl AsRef<str> for LanguageTag {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
