//! Internationalization (i18n) building blocks.
//!
//! Everything here is request-agnostic: language tags, header parsing,
//! resolution strategy, the translation engine and its catalogs. The
//! request-scoped layer on top lives in [`crate::context`],
//! [`crate::delegate`] and [`crate::middleware`].
//!
//! # Architecture
//!
//! - `language`: `LanguageTag`, the normalized language identifier
//! - `accept`: `Accept-Language` parsing with quality weights
//! - `resolver`: request signals and the language extraction strategy
//! - `template`: minimal `{{ .field }}` renderer
//! - `catalog`: `Translator` engine and catalog loaders
//! - `logger`: warning sink capability
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use axum_localize::i18n::{LanguageTag, MapLoader, Translator, TranslatorOptions};
//!
//! let engine = Translator::new(TranslatorOptions {
//!     languages: vec![LanguageTag::ENGLISH, LanguageTag::GERMAN],
//!     loaders: vec![Arc::new(
//!         MapLoader::new().with_messages(LanguageTag::GERMAN, [("welcome", "hallo")]),
//!     )],
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! assert_eq!(engine.translate(&LanguageTag::GERMAN, "welcome", None).unwrap(), "hallo");
//! ```

pub mod accept;
mod catalog;
mod language;
mod logger;
mod resolver;
pub mod template;

pub use accept::parse_accept_language;
pub use catalog::{DirLoader, Loader, MapLoader, Messages, Translator, TranslatorOptions};
pub use language::LanguageTag;
pub use logger::{format_fields, Logger, SharedLogger, TracingLogger};
pub use resolver::{
    DefaultLanguageExtractor, LanguageExtractor, RequestSignals, DEFAULT_QUERY_PARAM,
};
pub use template::fallback_render;
