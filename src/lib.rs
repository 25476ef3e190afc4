//! Per-request language negotiation and message translation for axum.
//!
//! Install the middleware once, then translate from any handler:
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use axum_localize::{DirLoader, I18n, LanguageTag, Localizer};
//!
//! # fn app() -> Result<Router, axum_localize::error::LoadError> {
//! let layer = I18n::builder()
//!     .languages([LanguageTag::ENGLISH, LanguageTag::GERMAN])
//!     .loader(DirLoader::new("localize"))
//!     .build()
//!     .localize()?;
//!
//! Ok(Router::new()
//!     .route("/", get(|l: Localizer| async move { l.t("welcome") }))
//!     .layer(layer))
//! # }
//! ```
//!
//! The language comes from the `lng` query parameter, then the
//! `Accept-Language` header, then the configured default. Every call has a
//! defined answer even without the middleware: `translate` renders the key
//! itself and the language queries report English.

pub mod config;
pub mod context;
pub mod delegate;
pub mod error;
pub mod extract;
pub mod i18n;
pub mod middleware;

pub use context::RequestScope;
pub use delegate::{
    current_language, default_language, has_language, translate, I18n, I18nBuilder, Negotiator,
};
pub use extract::Localizer;
pub use i18n::{
    DefaultLanguageExtractor, DirLoader, LanguageExtractor, LanguageTag, Loader, Logger,
    MapLoader, RequestSignals, TracingLogger, Translator,
};
pub use middleware::{Localize, LocalizeLayer};
