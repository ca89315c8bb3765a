//! The request side of the override boundary.
//!
//! [`RequestView`] is everything the resolver needs from an inbound request. It is
//! implemented for [`http::Request`] and [`http::request::Parts`], where the cached
//! original method, the decoded query and the parsed body travel in the request
//! extensions:
//! - [`OriginalMethod`]: inserted by the resolver on first use
//! - [`QueryParams`]: inserted by an upstream query parser, decoded from the uri otherwise
//! - [`ParsedBody`]: inserted by an upstream body parser

use std::borrow::Cow;

use http::request::Parts;
use http::{Extensions, HeaderMap, Method, Request, Uri};
use tracing::trace;

use crate::body::ParsedBody;
use crate::query::QueryParams;

/// The method the request was transported with, before any override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalMethod(pub Method);

pub trait RequestView {
    /// The effective method seen by routing.
    fn method(&self) -> &Method;

    fn set_method(&mut self, method: Method);

    fn original_method(&self) -> Option<&Method>;

    fn set_original_method(&mut self, method: Method);

    fn headers(&self) -> &HeaderMap;

    fn query(&self) -> Cow<'_, QueryParams>;

    fn body(&self) -> Option<&ParsedBody>;

    /// Returns the original method, recording the current method as the original if
    /// none was recorded yet. Later calls never overwrite it.
    fn ensure_original_method(&mut self) -> Method {
        if let Some(method) = self.original_method() {
            return method.clone();
        }

        let method = self.method().clone();
        self.set_original_method(method.clone());
        method
    }
}

impl<B> RequestView for Request<B> {
    fn method(&self) -> &Method {
        Request::method(self)
    }

    fn set_method(&mut self, method: Method) {
        *self.method_mut() = method;
    }

    fn original_method(&self) -> Option<&Method> {
        self.extensions().get::<OriginalMethod>().map(|m| &m.0)
    }

    fn set_original_method(&mut self, method: Method) {
        self.extensions_mut().insert(OriginalMethod(method));
    }

    fn headers(&self) -> &HeaderMap {
        Request::headers(self)
    }

    fn query(&self) -> Cow<'_, QueryParams> {
        query_of(self.extensions(), self.uri())
    }

    fn body(&self) -> Option<&ParsedBody> {
        self.extensions().get::<ParsedBody>()
    }
}

impl RequestView for Parts {
    fn method(&self) -> &Method {
        &self.method
    }

    fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    fn original_method(&self) -> Option<&Method> {
        self.extensions.get::<OriginalMethod>().map(|m| &m.0)
    }

    fn set_original_method(&mut self, method: Method) {
        self.extensions.insert(OriginalMethod(method));
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn query(&self) -> Cow<'_, QueryParams> {
        query_of(&self.extensions, &self.uri)
    }

    fn body(&self) -> Option<&ParsedBody> {
        self.extensions.get::<ParsedBody>()
    }
}

fn query_of<'a>(extensions: &'a Extensions, uri: &Uri) -> Cow<'a, QueryParams> {
    if let Some(params) = extensions.get::<QueryParams>() {
        return Cow::Borrowed(params);
    }

    let raw = uri.query().unwrap_or_default();
    match QueryParams::parse(raw) {
        Ok(params) => Cow::Owned(params),
        Err(e) => {
            trace!(cause = %e, "undecodable query string, treating as empty");
            Cow::Owned(QueryParams::new())
        }
    }
}
