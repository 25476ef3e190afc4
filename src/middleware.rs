//! Middleware adapter.
//!
//! [`LocalizeLayer`] owns the single translation engine built from an
//! [`I18n`] configuration. For every request, [`Localize`] writes the engine
//! handle and a fresh negotiator handle into the request extensions and
//! then hands the request to the inner service untouched.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::Request;
use tower::{Layer, Service};
use tracing::info;

use crate::context::{self, RequestScope};
use crate::delegate::{I18n, Negotiator};
use crate::error::LoadError;
use crate::i18n::Translator;

impl I18n {
    /// Build the engine and return the middleware layer.
    ///
    /// Catalog loaders run here, once; every request served by the layer
    /// shares the resulting engine.
    pub fn localize(self) -> Result<LocalizeLayer, LoadError> {
        LocalizeLayer::new(Arc::new(self))
    }
}

/// Layer that installs i18n state into each request.
#[derive(Debug, Clone)]
pub struct LocalizeLayer {
    i18n: Arc<I18n>,
    engine: Arc<Translator>,
}

impl LocalizeLayer {
    pub fn new(i18n: Arc<I18n>) -> Result<Self, LoadError> {
        let engine = Translator::new(i18n.engine_options())?;
        info!(
            "i18n middleware ready: languages={:?} default={}",
            engine
                .supported_languages()
                .iter()
                .map(|tag| tag.as_str())
                .collect::<Vec<_>>(),
            engine.default_language()
        );

        Ok(Self {
            i18n,
            engine: Arc::new(engine),
        })
    }

    pub fn i18n(&self) -> &Arc<I18n> {
        &self.i18n
    }

    pub fn engine(&self) -> &Arc<Translator> {
        &self.engine
    }

    /// Write both request slots. Runs before any handler reads them.
    pub fn install<S: RequestScope + ?Sized>(&self, scope: &mut S) {
        context::set_engine(scope, Arc::clone(&self.engine));
        context::set_negotiator(scope, Negotiator::new(Arc::clone(&self.i18n)));
    }
}

impl<S> Layer<S> for LocalizeLayer {
    type Service = Localize<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Localize {
            inner,
            layer: self.clone(),
        }
    }
}

/// Service produced by [`LocalizeLayer`].
#[derive(Debug, Clone)]
pub struct Localize<S> {
    inner: S,
    layer: LocalizeLayer,
}

impl<S, B> Service<Request<B>> for Localize<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        self.layer.install(&mut request);
        self.inner.call(request)
    }
}
