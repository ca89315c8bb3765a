//! The vocabulary of HTTP method names an override token may resolve to.

use std::collections::HashSet;

use http::Method;
use once_cell::sync::Lazy;

/// Registered method names, always uppercase.
pub const STANDARD_METHODS: &[&str] = &[
    "ACL",
    "BIND",
    "CHECKOUT",
    "CONNECT",
    "COPY",
    "DELETE",
    "GET",
    "HEAD",
    "LINK",
    "LOCK",
    "M-SEARCH",
    "MERGE",
    "MKACTIVITY",
    "MKCALENDAR",
    "MKCOL",
    "MOVE",
    "NOTIFY",
    "OPTIONS",
    "PATCH",
    "POST",
    "PROPFIND",
    "PROPPATCH",
    "PURGE",
    "PUT",
    "QUERY",
    "REBIND",
    "REPORT",
    "SEARCH",
    "SOURCE",
    "SUBSCRIBE",
    "TRACE",
    "UNBIND",
    "UNLINK",
    "UNLOCK",
    "UNSUBSCRIBE",
];

static STANDARD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STANDARD_METHODS.iter().copied().collect());

/// Validates override tokens against the registered method names plus any
/// extension methods the host recognizes.
#[derive(Debug, Clone, Default)]
pub struct MethodRegistry {
    extensions: Vec<Method>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an extension method. The name is uppercased; names that are not
    /// valid method tokens are ignored.
    pub fn register(&mut self, name: &str) -> bool {
        let upper = name.to_ascii_uppercase();
        if self.contains(&upper) {
            return true;
        }

        match Method::from_bytes(upper.as_bytes()) {
            Ok(method) => {
                self.extensions.push(method);
                true
            }
            Err(_) => false,
        }
    }

    /// Returns true if `upper` is a registered method name. The check is case sensitive.
    pub fn contains(&self, upper: &str) -> bool {
        STANDARD_SET.contains(upper) || self.extensions.iter().any(|m| m.as_str() == upper)
    }

    /// Uppercases the token and returns the matching [`Method`] if it is registered.
    pub fn lookup(&self, token: &str) -> Option<Method> {
        let upper = token.to_ascii_uppercase();
        if !self.contains(&upper) {
            return None;
        }
        Method::from_bytes(upper.as_bytes()).ok()
    }

    pub fn extensions(&self) -> &[Method] {
        &self.extensions
    }
}
