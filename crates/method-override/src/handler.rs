//! Plugging the resolver into a request pipeline.
//!
//! [`MethodOverrideLayer`] wraps any [`Handler`] into a [`MethodOverrideHandler`],
//! which resolves the override before the inner handler (usually a router) sees the
//! request, and adds the collected `Vary` fields to whatever response it returns.

use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use http::{Request, Response};
use http_body::Body;
use tower_layer::Layer;

use crate::resolver::MethodOverride;
use crate::response::PendingVary;

/// The host pipeline contract: an async function from request to response.
///
/// Routers and endpoints implement it, and [`MethodOverrideHandler`] wraps one to run
/// the override before it.
#[async_trait]
pub trait Handler<ReqBody> {
    type RespBody: Body;
    type Error: Into<Box<dyn Error + Send + Sync>>;

    async fn call(&self, req: Request<ReqBody>) -> Result<Response<Self::RespBody>, Self::Error>;
}

/// A [`Handler`] backed by an async fn, see [`make_handler`].
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<ReqBody, RespBody, Err, F, Fut> Handler<ReqBody> for HandlerFn<F>
where
    RespBody: Body,
    ReqBody: Send + 'static,
    F: Fn(Request<ReqBody>) -> Fut + Send + Sync,
    Err: Into<Box<dyn Error + Send + Sync>>,
    Fut: Future<Output = Result<Response<RespBody>, Err>> + Send,
{
    type RespBody = RespBody;
    type Error = Err;

    async fn call(&self, req: Request<ReqBody>) -> Result<Response<Self::RespBody>, Self::Error> {
        (self.f)(req).await
    }
}

/// Turns `async fn(Request<ReqBody>) -> Result<Response<RespBody>, Err>` into a [`Handler`].
pub fn make_handler<F, ReqBody, RespBody, Err, Ret>(f: F) -> HandlerFn<F>
where
    RespBody: Body,
    Err: Into<Box<dyn Error + Send + Sync>>,
    Ret: Future<Output = Result<Response<RespBody>, Err>>,
    F: Fn(Request<ReqBody>) -> Ret,
{
    HandlerFn { f }
}

/// A [`Layer`] applying a shared [`MethodOverride`] in front of a handler.
#[derive(Debug, Clone)]
pub struct MethodOverrideLayer {
    resolver: Arc<MethodOverride>,
}

impl MethodOverrideLayer {
    pub fn new(resolver: MethodOverride) -> Self {
        Self { resolver: Arc::new(resolver) }
    }
}

impl Default for MethodOverrideLayer {
    fn default() -> Self {
        Self::new(MethodOverride::default())
    }
}

impl<H> Layer<H> for MethodOverrideLayer {
    type Service = MethodOverrideHandler<H>;

    fn layer(&self, inner: H) -> Self::Service {
        MethodOverrideHandler { inner, resolver: Arc::clone(&self.resolver) }
    }
}

#[derive(Debug, Clone)]
pub struct MethodOverrideHandler<H> {
    inner: H,
    resolver: Arc<MethodOverride>,
}

impl<H> MethodOverrideHandler<H> {
    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn resolver(&self) -> &MethodOverride {
        &self.resolver
    }
}

#[async_trait]
impl<H, ReqBody> Handler<ReqBody> for MethodOverrideHandler<H>
where
    H: Handler<ReqBody> + Send + Sync,
    ReqBody: Send + 'static,
{
    type RespBody = H::RespBody;
    type Error = H::Error;

    async fn call(&self, mut req: Request<ReqBody>) -> Result<Response<Self::RespBody>, Self::Error> {
        let mut vary = PendingVary::new();
        self.resolver.resolve(&mut req, &mut vary);

        let mut resp = self.inner.call(req).await?;
        vary.apply(&mut resp);
        Ok(resp)
    }
}
