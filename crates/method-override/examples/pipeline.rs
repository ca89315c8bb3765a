//! Runs a few browser style requests through a body parser, the method override
//! layer and a method based router, logging what each route saw.

use std::convert::Infallible;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, VARY};
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use micro_method_override::{Handler, MethodOverride, MethodOverrideLayer, Options, ParsedBody, make_handler};
use tower_layer::Layer;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let options = match Options::from_json(r#"{ "methods": ["POST"], "tokenLookup": "form:_method" }"#) {
        Ok(options) => options,
        Err(e) => {
            warn!(cause = %e, "invalid options, using defaults");
            Options::default()
        }
    };

    let form_handler = MethodOverrideLayer::new(MethodOverride::new(options.into_config())).layer(make_handler(route));
    let header_handler = MethodOverrideLayer::default().layer(make_handler(route));

    let requests = vec![
        Request::post("/items/1")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Full::new(Bytes::from_static(b"_method=delete")))
            .unwrap(),
        Request::post("/items/1")
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from_static(br#"{"_method":"bogus"}"#)))
            .unwrap(),
    ];
    for req in requests {
        let req = parse_body(req).await;
        let resp = form_handler.call(req).await.unwrap();
        info!(status = %resp.status(), body = %resp.body(), "form lookup");
    }

    let req = Request::post("/items/1").header("X-HTTP-Method-Override", "PUT").body(Full::new(Bytes::new())).unwrap();
    let resp = header_handler.call(req).await.unwrap();
    info!(status = %resp.status(), body = %resp.body(), vary = ?resp.headers().get(VARY), "header lookup");
}

async fn parse_body(req: Request<Full<Bytes>>) -> Request<Full<Bytes>> {
    let (mut parts, body) = req.into_parts();
    let bytes = body.collect().await.map(|c| c.to_bytes()).unwrap_or_default();

    let content_type = parts.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    if let Some(content_type) = content_type {
        match ParsedBody::parse(content_type, &bytes) {
            Ok(parsed) => {
                parts.extensions.insert(parsed);
            }
            Err(e) => warn!(cause = %e, "failed to parse request body"),
        }
    }

    Request::from_parts(parts, Full::new(bytes))
}

async fn route(req: Request<Full<Bytes>>) -> Result<Response<String>, Infallible> {
    let (status, body) = match req.method().as_str() {
        "GET" => (StatusCode::OK, "show item"),
        "PUT" => (StatusCode::OK, "replace item"),
        "DELETE" => (StatusCode::NO_CONTENT, "delete item"),
        "POST" => (StatusCode::CREATED, "create item"),
        _ => (StatusCode::METHOD_NOT_ALLOWED, "method not allowed"),
    };

    Ok(Response::builder().status(status).body(body.to_string()).unwrap())
}
