//! Already parsed request body fields.
//!
//! The resolver only ever reads a [`ParsedBody`], found in the request extensions;
//! turning raw bytes into one is the job of an upstream body parser, which may build
//! it field by field with [`ParsedBody::insert`]. The constructors below are
//! convenience helpers for such parsers, the tests and the demo. The resolver never
//! calls them:
//! - [`ParsedBody::from_form`]: `application/x-www-form-urlencoded` payloads
//! - [`ParsedBody::from_json`]: `application/json` payloads whose root is an object
//! - [`ParsedBody::parse`]: picks one of the above from a `Content-Type` value

use std::collections::HashMap;

use mime::Mime;
use serde_json::Value;

use crate::error::BodyError;
use crate::query::{FieldValue, QueryParams};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBody {
    fields: HashMap<String, FieldValue>,
}

impl ParsedBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parses an urlencoded form, repeated keys become [`FieldValue::Multi`].
    pub fn from_form(bytes: &[u8]) -> Result<Self, BodyError> {
        let pairs = serde_urlencoded::from_bytes::<Vec<(String, String)>>(bytes).map_err(BodyError::invalid_form)?;
        let params: QueryParams = pairs.into_iter().collect();

        let mut body = ParsedBody::new();
        for (key, value) in params {
            body.insert(key, value);
        }
        Ok(body)
    }

    /// Parses a json object body.
    ///
    /// Strings map to [`FieldValue::Single`], arrays to [`FieldValue::Multi`] with
    /// non-string elements kept as their json text. Numbers and booleans become their
    /// text; `null` and nested objects are dropped.
    pub fn from_json(bytes: &[u8]) -> Result<Self, BodyError> {
        let value = serde_json::from_slice::<Value>(bytes).map_err(BodyError::invalid_json)?;
        let Value::Object(map) = value else {
            return Err(BodyError::NotAnObject);
        };

        let mut body = ParsedBody::new();
        for (key, value) in map {
            let field = match value {
                Value::String(s) => FieldValue::Single(s),
                Value::Array(values) => FieldValue::Multi(values.into_iter().map(json_text).collect()),
                Value::Number(n) => FieldValue::Single(n.to_string()),
                Value::Bool(b) => FieldValue::Single(b.to_string()),
                Value::Null | Value::Object(_) => continue,
            };
            body.insert(key, field);
        }
        Ok(body)
    }

    /// Parses `bytes` according to the `Content-Type` header value.
    pub fn parse(content_type: &str, bytes: &[u8]) -> Result<Self, BodyError> {
        let Ok(mime) = content_type.parse::<Mime>() else {
            return Err(BodyError::unsupported_content_type(content_type));
        };

        if mime.type_() == mime::APPLICATION && mime.subtype() == mime::WWW_FORM_URLENCODED {
            return Self::from_form(bytes);
        }

        if mime.type_() == mime::APPLICATION && (mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON)) {
            return Self::from_json(bytes);
        }

        Err(BodyError::unsupported_content_type(content_type))
    }
}

fn json_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
