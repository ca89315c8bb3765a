//! Construction time configuration.
//!
//! Raw [`Options`] (usually deserialized from json) are merged over the defaults into
//! an immutable [`MethodOverrideConfig`]. Nothing in this module fails on malformed
//! values: unusable entries fall back to the defaults and are reported with `warn!`.

use std::fmt;
use std::str::FromStr;

use http::{HeaderName, Method};
use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigError;

pub const DEFAULT_HEADER: &str = "X-HTTP-Method-Override";
pub const DEFAULT_TOKEN_LOOKUP: &str = "header:X-HTTP-Method-Override";

/// Where the override token is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Header,
    Query,
    Form,
}

impl TokenSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSource::Header => "header",
            TokenSource::Query => "query",
            TokenSource::Form => "form",
        }
    }
}

/// A parsed `"<kind>:<field>"` lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLookup {
    source: TokenSource,
    field: String,
}

impl TokenLookup {
    pub fn header(name: impl Into<String>) -> Self {
        Self::new(TokenSource::Header, name)
    }

    pub fn query(key: impl Into<String>) -> Self {
        Self::new(TokenSource::Query, key)
    }

    pub fn form(key: impl Into<String>) -> Self {
        Self::new(TokenSource::Form, key)
    }

    /// Parses a lookup string, never failing.
    ///
    /// An unknown kind reads the field from a header. A missing `:`, an empty field or
    /// a header field that is not a legal header name yields the default lookup.
    pub fn parse(str: &str) -> Self {
        let Some((kind, field)) = str.split_once(':') else {
            warn!(token_lookup = str, "token lookup has no `kind:field` separator, using default");
            return Self::default();
        };

        if field.is_empty() {
            warn!(token_lookup = str, "token lookup has an empty field, using default");
            return Self::default();
        }

        let source = match kind {
            "header" => TokenSource::Header,
            "query" => TokenSource::Query,
            "form" => TokenSource::Form,
            other => {
                warn!(kind = other, "unknown token lookup kind, falling back to header");
                TokenSource::Header
            }
        };

        if source == TokenSource::Header && HeaderName::from_bytes(field.as_bytes()).is_err() {
            warn!(header = field, "token lookup header is not a valid header name, using default");
            return Self::default();
        }

        Self::new(source, field)
    }

    pub fn source(&self) -> TokenSource {
        self.source
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    fn new(source: TokenSource, field: impl Into<String>) -> Self {
        Self { source, field: field.into() }
    }
}

impl Default for TokenLookup {
    fn default() -> Self {
        Self::header(DEFAULT_HEADER)
    }
}

impl FromStr for TokenLookup {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for TokenLookup {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for TokenLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source.as_str(), self.field)
    }
}

/// Caller supplied options, every field optional.
///
/// ```
/// # use micro_method_override::Options;
/// let options = Options::from_json(r#"{ "methods": ["POST", "PUT"], "tokenLookup": "query:_method" }"#).unwrap();
/// let config = options.into_config();
/// assert_eq!(config.lookup().to_string(), "query:_method");
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    pub methods: Option<Vec<String>>,
    /// Legacy single method form, ignored when `methods` is present.
    pub method: Option<String>,
    pub token_lookup: Option<String>,
    pub extension_methods: Vec<String>,
}

impl Options {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_config(self) -> MethodOverrideConfig {
        let Options { methods, method, token_lookup, extension_methods } = self;

        let mut config = MethodOverrideConfig::default();

        let methods = methods.or_else(|| method.map(|m| vec![m]));
        if let Some(methods) = methods {
            config.allowed_methods = parse_methods(&methods);
        }

        if let Some(token_lookup) = token_lookup {
            config.token_lookup = TokenLookup::parse(&token_lookup);
        }

        config.extension_methods = extension_methods;
        config
    }
}

impl From<Options> for MethodOverrideConfig {
    fn from(options: Options) -> Self {
        options.into_config()
    }
}

/// The immutable configuration a resolver is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodOverrideConfig {
    allowed_methods: Vec<Method>,
    token_lookup: TokenLookup,
    extension_methods: Vec<String>,
}

impl Default for MethodOverrideConfig {
    fn default() -> Self {
        Self { allowed_methods: vec![Method::POST], token_lookup: TokenLookup::default(), extension_methods: vec![] }
    }
}

impl MethodOverrideConfig {
    /// Transport methods eligible for override, compared case sensitively.
    pub fn methods<I: IntoIterator<Item = Method>>(mut self, methods: I) -> Self {
        self.allowed_methods = methods.into_iter().collect();
        self
    }

    pub fn token_lookup(mut self, token_lookup: impl Into<TokenLookup>) -> Self {
        self.token_lookup = token_lookup.into();
        self
    }

    pub fn extension_method(mut self, name: impl Into<String>) -> Self {
        self.extension_methods.push(name.into());
        self
    }

    pub fn allowed_methods(&self) -> &[Method] {
        &self.allowed_methods
    }

    pub fn lookup(&self) -> &TokenLookup {
        &self.token_lookup
    }

    pub fn extension_methods(&self) -> &[String] {
        &self.extension_methods
    }
}

fn parse_methods(methods: &[String]) -> Vec<Method> {
    methods
        .iter()
        .filter_map(|m| match Method::from_bytes(m.as_bytes()) {
            Ok(method) => Some(method),
            Err(_) => {
                warn!(method = %m, "ignoring allowed method which is not a valid method token");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_lookup_parse() {
        assert_eq!(TokenLookup::parse("query:_method"), TokenLookup::query("_method"));
        assert_eq!(TokenLookup::parse("form:_method"), TokenLookup::form("_method"));
        assert_eq!(TokenLookup::parse("header:X-Method"), TokenLookup::header("X-Method"));
    }

    #[test]
    fn test_token_lookup_unknown_kind_reads_header() {
        assert_eq!(TokenLookup::parse("cookie:X-Method"), TokenLookup::header("X-Method"));
    }

    #[test]
    fn test_token_lookup_malformed_uses_default() {
        assert_eq!(TokenLookup::parse("header"), TokenLookup::default());
        assert_eq!(TokenLookup::parse("query:"), TokenLookup::default());
        assert_eq!(TokenLookup::parse("header:not a header"), TokenLookup::default());
        assert_eq!(TokenLookup::parse(""), TokenLookup::default());
    }

    #[test]
    fn test_token_lookup_display() {
        assert_eq!(TokenLookup::default().to_string(), DEFAULT_TOKEN_LOOKUP);
        assert_eq!("form:_method".parse::<TokenLookup>().unwrap().to_string(), "form:_method");
    }

    #[test]
    fn test_default_config() {
        let config = MethodOverrideConfig::default();
        assert_eq!(config.allowed_methods(), &[Method::POST]);
        assert_eq!(config.lookup(), &TokenLookup::header(DEFAULT_HEADER));
        assert!(config.extension_methods().is_empty());
    }

    #[test]
    fn test_options_merge_over_defaults() {
        let config = Options::default().into_config();
        assert_eq!(config, MethodOverrideConfig::default());

        let config = Options { token_lookup: Some("query:_method".into()), ..Options::default() }.into_config();
        assert_eq!(config.allowed_methods(), &[Method::POST]);
        assert_eq!(config.lookup(), &TokenLookup::query("_method"));
    }

    #[test]
    fn test_options_legacy_method() {
        let config = Options { method: Some("PUT".into()), ..Options::default() }.into_config();
        assert_eq!(config.allowed_methods(), &[Method::PUT]);

        let config =
            Options { method: Some("PUT".into()), methods: Some(vec!["PATCH".into()]), ..Options::default() }
                .into_config();
        assert_eq!(config.allowed_methods(), &[Method::PATCH]);
    }

    #[test]
    fn test_options_drop_invalid_methods() {
        let config = Options { methods: Some(vec!["POST".into(), "NOT VALID".into()]), ..Options::default() }
            .into_config();
        assert_eq!(config.allowed_methods(), &[Method::POST]);
    }

    #[test]
    fn test_options_from_json() {
        let options = Options::from_json(
            r#"{"methods":["POST","PUT"],"tokenLookup":"form:_method","extensionMethods":["FROBNICATE"]}"#,
        )
        .unwrap();
        let config = MethodOverrideConfig::from(options);

        assert_eq!(config.allowed_methods(), &[Method::POST, Method::PUT]);
        assert_eq!(config.lookup(), &TokenLookup::form("_method"));
        assert_eq!(config.extension_methods(), &["FROBNICATE".to_string()]);
    }

    #[test]
    fn test_options_from_invalid_json() {
        let result = Options::from_json("{ methods: ");
        assert!(matches!(result, Err(ConfigError::InvalidJson { .. })));
    }

    #[test]
    fn test_config_builder() {
        let config = MethodOverrideConfig::default()
            .methods([Method::POST, Method::PUT])
            .token_lookup("query:_method")
            .extension_method("FROBNICATE");

        assert_eq!(config.allowed_methods(), &[Method::POST, Method::PUT]);
        assert_eq!(config.lookup().source(), TokenSource::Query);
        assert_eq!(config.lookup().field(), "_method");
    }
}
