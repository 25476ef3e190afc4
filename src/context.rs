//! Request context store.
//!
//! Two typed slots live in each request's `http::Extensions`: the engine
//! handle and the negotiator handle. The middleware writes both before the
//! handler chain runs; everything downstream only reads them. Because the
//! slots belong to one request's extensions, concurrent requests never see
//! each other's values even though they share the engine by reference.
//!
//! Reads return `None` when the middleware never ran, which is what sends
//! translation down the fallback path.

use std::sync::Arc;

use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap, Request, Uri};

use crate::delegate::Negotiator;
use crate::i18n::{RequestSignals, Translator};

/// Anything that carries a request's extensions, URI and headers.
///
/// Implemented for `Request<B>`, `request::Parts` and [`crate::Localizer`].
pub trait RequestScope {
    fn extensions(&self) -> &Extensions;
    fn extensions_mut(&mut self) -> &mut Extensions;
    fn uri(&self) -> &Uri;
    fn headers(&self) -> &HeaderMap;
}

impl<B> RequestScope for Request<B> {
    fn extensions(&self) -> &Extensions {
        Request::extensions(self)
    }

    fn extensions_mut(&mut self) -> &mut Extensions {
        Request::extensions_mut(self)
    }

    fn uri(&self) -> &Uri {
        Request::uri(self)
    }

    fn headers(&self) -> &HeaderMap {
        Request::headers(self)
    }
}

impl RequestScope for Parts {
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

// Private key types: nothing outside this module can collide with or
// overwrite the slots by inserting an `Arc<Translator>` of its own.
#[derive(Clone)]
struct EngineSlot(Arc<Translator>);

#[derive(Clone)]
struct NegotiatorSlot(Negotiator);

pub fn set_engine<S: RequestScope + ?Sized>(scope: &mut S, engine: Arc<Translator>) {
    scope.extensions_mut().insert(EngineSlot(engine));
}

pub fn engine<S: RequestScope + ?Sized>(scope: &S) -> Option<&Arc<Translator>> {
    scope.extensions().get::<EngineSlot>().map(|slot| &slot.0)
}

pub fn set_negotiator<S: RequestScope + ?Sized>(scope: &mut S, negotiator: Negotiator) {
    scope.extensions_mut().insert(NegotiatorSlot(negotiator));
}

pub fn negotiator<S: RequestScope + ?Sized>(scope: &S) -> Option<&Negotiator> {
    scope.extensions().get::<NegotiatorSlot>().map(|slot| &slot.0)
}

/// Copy both slots (when present) from one extensions map to another.
pub(crate) fn copy_slots(from: &Extensions, to: &mut Extensions) {
    if let Some(slot) = from.get::<EngineSlot>() {
        to.insert(slot.clone());
    }
    if let Some(slot) = from.get::<NegotiatorSlot>() {
        to.insert(slot.clone());
    }
}

/// The resolution inputs of a request.
pub fn signals<S: RequestScope + ?Sized>(scope: &S) -> RequestSignals<'_> {
    RequestSignals::new(
        scope.uri(),
        scope.headers(),
        engine(scope).map(|engine| engine.as_ref()),
    )
}
