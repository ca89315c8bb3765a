//! The response side of the override boundary: appending to `Vary`.

use http::header::VARY;
use http::{HeaderMap, HeaderValue, Response};

/// A response the resolver can record `Vary` fields on.
#[cfg_attr(test, mockall::automock)]
pub trait ResponseView {
    fn append_vary(&mut self, field: &str);
}

impl ResponseView for HeaderMap {
    fn append_vary(&mut self, field: &str) {
        vary(self, field);
    }
}

impl<B> ResponseView for Response<B> {
    fn append_vary(&mut self, field: &str) {
        vary(self.headers_mut(), field);
    }
}

/// Collects `Vary` fields before a response exists, see [`PendingVary::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingVary {
    fields: Vec<String>,
}

impl PendingVary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn apply<R: ResponseView + ?Sized>(&self, resp: &mut R) {
        for field in &self.fields {
            resp.append_vary(field);
        }
    }
}

impl ResponseView for PendingVary {
    fn append_vary(&mut self, field: &str) {
        if !self.fields.iter().any(|f| f.eq_ignore_ascii_case(field)) {
            self.fields.push(field.to_string());
        }
    }
}

/// Merges `field` into the `Vary` header of `headers`.
///
/// A `*` value already covers every field; a field that is already listed, ignoring
/// case, is not repeated. Several `Vary` lines are folded into one.
pub fn vary(headers: &mut HeaderMap, field: &str) {
    let field = field.trim();
    if field.is_empty() {
        return;
    }

    let mut listed: Vec<&str> = vec![];
    for value in headers.get_all(VARY) {
        let Ok(value) = value.to_str() else {
            continue;
        };
        listed.extend(value.split(',').map(str::trim).filter(|s| !s.is_empty()));
    }

    if listed.iter().any(|f| *f == "*" || f.eq_ignore_ascii_case(field)) {
        return;
    }

    let joined = if listed.is_empty() { field.to_string() } else { format!("{}, {field}", listed.join(", ")) };

    match HeaderValue::from_str(&joined) {
        Ok(value) => {
            headers.insert(VARY, value);
        }
        Err(_) => {
            if let Ok(value) = HeaderValue::from_str(field) {
                headers.append(VARY, value);
            }
        }
    }
}
