//! Override token extraction strategies.

use http::HeaderName;

use crate::config::{TokenLookup, TokenSource};
use crate::query::FieldValue;
use crate::request::RequestView;
use crate::response::ResponseView;

/// One of the three extraction strategies, bound once from a [`TokenLookup`].
#[derive(Debug, Clone)]
pub enum TokenExtractor {
    /// Reads a header. `vary` keeps the configured spelling for the `Vary` header.
    Header { name: HeaderName, vary: String },
    Query { key: String },
    Form { key: String },
}

impl TokenExtractor {
    /// Returns the candidate sequence, or `None` when the source has no such field.
    ///
    /// The header strategy always records its header name on `resp`.
    pub fn extract<R, S>(&self, req: &R, resp: &mut S) -> Option<FieldValue>
    where
        R: RequestView + ?Sized,
        S: ResponseView + ?Sized,
    {
        match self {
            TokenExtractor::Header { name, vary } => {
                resp.append_vary(vary);
                header_candidates(req, name)
            }
            TokenExtractor::Query { key } => req.query().get(key).cloned(),
            TokenExtractor::Form { key } => req.body().and_then(|body| body.get(key)).cloned(),
        }
    }

    pub fn source(&self) -> TokenSource {
        match self {
            TokenExtractor::Header { .. } => TokenSource::Header,
            TokenExtractor::Query { .. } => TokenSource::Query,
            TokenExtractor::Form { .. } => TokenSource::Form,
        }
    }
}

impl From<&TokenLookup> for TokenExtractor {
    fn from(lookup: &TokenLookup) -> Self {
        let field = lookup.field();
        match lookup.source() {
            TokenSource::Query => TokenExtractor::Query { key: field.to_string() },
            TokenSource::Form => TokenExtractor::Form { key: field.to_string() },
            TokenSource::Header => match HeaderName::from_bytes(field.as_bytes()) {
                Ok(name) => TokenExtractor::Header { name, vary: field.to_string() },
                Err(_) => TokenExtractor::from(&TokenLookup::default()),
            },
        }
    }
}

/// Every line of the header, split on commas and trimmed, in order.
fn header_candidates<R: RequestView + ?Sized>(req: &R, name: &HeaderName) -> Option<FieldValue> {
    let mut candidates = vec![];
    let mut seen = false;

    for value in req.headers().get_all(name) {
        seen = true;
        let Ok(value) = value.to_str() else {
            continue;
        };
        candidates.extend(value.split(',').map(|s| s.trim().to_string()));
    }

    seen.then(|| FieldValue::from(candidates))
}
