//! The method override resolver.
//!
//! [`MethodOverride`] runs before routing and, for eligible requests, replaces the
//! effective method with a validated override token:
//! 1. record the original transport method once
//! 2. stop unless the original method is one of the allowed transport methods
//! 3. extract the candidate sequence from the configured source
//! 4. take the first candidate
//! 5. uppercase it and check it against the registered methods
//! 6. set the effective method
//!
//! Every way an override can fail to apply leaves the request untouched; the
//! returned [`Resolution`] only tells the caller why.

use http::Method;
use tracing::trace;

use crate::config::{MethodOverrideConfig, TokenSource};
use crate::extract::TokenExtractor;
use crate::method::MethodRegistry;
use crate::query::FieldValue;
use crate::request::RequestView;
use crate::response::ResponseView;

/// Why no override was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The original method is not an allowed transport method.
    IneligibleMethod,
    /// The source carried no token, or an empty one.
    MissingToken,
    /// The token is not a registered method name.
    UnknownMethod,
}

/// The outcome of [`MethodOverride::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Overridden { from: Method, to: Method },
    Skipped(SkipReason),
}

impl Resolution {
    pub fn is_overridden(&self) -> bool {
        matches!(self, Resolution::Overridden { .. })
    }
}

/// A stateless, shareable method override step.
#[derive(Debug, Clone)]
pub struct MethodOverride {
    methods: Vec<Method>,
    extractor: TokenExtractor,
    registry: MethodRegistry,
}

impl Default for MethodOverride {
    fn default() -> Self {
        Self::new(MethodOverrideConfig::default())
    }
}

impl MethodOverride {
    pub fn new(config: MethodOverrideConfig) -> Self {
        let mut registry = MethodRegistry::new();
        for name in config.extension_methods() {
            if !registry.register(name) {
                tracing::warn!(method = %name, "ignoring extension method which is not a valid method token");
            }
        }

        Self {
            methods: config.allowed_methods().to_vec(),
            extractor: TokenExtractor::from(config.lookup()),
            registry,
        }
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn source(&self) -> TokenSource {
        self.extractor.source()
    }

    pub fn resolve<R, S>(&self, req: &mut R, resp: &mut S) -> Resolution
    where
        R: RequestView + ?Sized,
        S: ResponseView + ?Sized,
    {
        let original = req.ensure_original_method();

        if !self.methods.contains(&original) {
            trace!(original = %original, "method not eligible for override");
            return Resolution::Skipped(SkipReason::IneligibleMethod);
        }

        let candidates = self.extractor.extract(req, resp);
        let token = match candidates.as_ref().and_then(FieldValue::first) {
            Some(token) if !token.is_empty() => token,
            _ => {
                trace!(original = %original, "no override token");
                return Resolution::Skipped(SkipReason::MissingToken);
            }
        };

        let Some(method) = self.registry.lookup(token) else {
            trace!(original = %original, token, "ignoring unknown override method");
            return Resolution::Skipped(SkipReason::UnknownMethod);
        };

        trace!(original = %original, method = %method, "override method");
        req.set_method(method.clone());
        Resolution::Overridden { from: original, to: method }
    }
}
