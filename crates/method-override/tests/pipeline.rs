use std::convert::Infallible;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, VARY};
use http::{Method, Request, Response};
use http_body_util::{BodyExt, Full};
use micro_method_override::{
    Handler, MethodOverride, MethodOverrideConfig, MethodOverrideLayer, Options, ParsedBody, RequestView,
    make_handler,
};
use tower_layer::Layer;

async fn got_method(req: Request<Full<Bytes>>) -> Result<Response<String>, Infallible> {
    let resp = Response::builder().header("X-Got-Method", req.method().as_str()).body(String::new()).unwrap();
    Ok(resp)
}

/// Stands in for the upstream body parser of a host pipeline.
async fn parse_body(req: Request<Full<Bytes>>) -> Request<Full<Bytes>> {
    let (mut parts, body) = req.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();

    if let Some(content_type) = parts.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        if let Ok(parsed) = ParsedBody::parse(content_type, &bytes) {
            parts.extensions.insert(parsed);
        }
    }

    Request::from_parts(parts, Full::new(bytes))
}

async fn send<H>(handler: &H, req: Request<Full<Bytes>>) -> Response<String>
where
    H: Handler<Full<Bytes>, RespBody = String, Error = Infallible>,
{
    let req = parse_body(req).await;
    handler.call(req).await.unwrap()
}

fn layered(resolver: MethodOverride) -> impl Handler<Full<Bytes>, RespBody = String, Error = Infallible> {
    MethodOverrideLayer::new(resolver).layer(make_handler(got_method))
}

fn got(resp: &Response<String>) -> &str {
    resp.headers().get("X-Got-Method").unwrap().to_str().unwrap()
}

fn empty() -> Full<Bytes> {
    Full::new(Bytes::new())
}

#[tokio::test]
async fn get_is_untouched_by_default() {
    let handler = layered(MethodOverride::default());
    let resp = send(&handler, Request::get("/").body(empty()).unwrap()).await;
    assert_eq!(got(&resp), "GET");
}

#[tokio::test]
async fn header_patch_in_lowercase() {
    let handler = layered(MethodOverride::default());
    let req = Request::post("/").header("X-HTTP-Method-Override", "patch").body(empty()).unwrap();

    let resp = send(&handler, req).await;
    assert_eq!(got(&resp), "PATCH");
    assert_eq!(resp.headers().get(VARY).unwrap(), "X-HTTP-Method-Override");
}

#[tokio::test]
async fn header_varies_even_without_override() {
    let handler = layered(MethodOverride::default());

    for value in [None, Some("BOGUS"), Some("")] {
        let mut builder = Request::post("/");
        if let Some(value) = value {
            builder = builder.header("X-HTTP-Method-Override", value);
        }

        let resp = send(&handler, builder.body(empty()).unwrap()).await;
        assert_eq!(got(&resp), "POST");
        assert_eq!(resp.headers().get(VARY).unwrap(), "X-HTTP-Method-Override");
    }
}

#[tokio::test]
async fn header_list_selects_first() {
    let handler = layered(MethodOverride::default());
    let req = Request::post("/").header("X-HTTP-Method-Override", "DELETE, PUT").body(empty()).unwrap();

    let resp = send(&handler, req).await;
    assert_eq!(got(&resp), "DELETE");
}

#[tokio::test]
async fn delete_transport_is_ineligible() {
    let handler = layered(MethodOverride::default());
    let req = Request::delete("/").header("X-HTTP-Method-Override", "PATCH").body(empty()).unwrap();

    let resp = send(&handler, req).await;
    assert_eq!(got(&resp), "DELETE");
}

#[tokio::test]
async fn query_lookup() {
    let resolver = MethodOverride::new(MethodOverrideConfig::default().token_lookup("query:_method"));
    let handler = layered(resolver);

    let cases = [
        (Method::POST, "/", "POST"),
        (Method::POST, "/?_method=DELete", "DELETE"),
        (Method::POST, "/?_method=BOGUS", "POST"),
        (Method::POST, "/?_method=DELETE&_method=PUT", "DELETE"),
        (Method::DELETE, "/?_method=PATCH", "DELETE"),
    ];

    for (method, uri, expected) in cases {
        let req = Request::builder().method(method).uri(uri).body(empty()).unwrap();
        let resp = send(&handler, req).await;
        assert_eq!(got(&resp), expected, "{uri}");
        assert!(resp.headers().get(VARY).is_none());
    }
}

#[tokio::test]
async fn form_lookup_with_urlencoded_body() {
    let options = Options::from_json(r#"{"tokenLookup":"form:_method"}"#).unwrap();
    let handler = layered(MethodOverride::new(options.into_config()));

    let req = Request::post("/")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Full::new(Bytes::from_static(b"name=micro&_method=put")))
        .unwrap();

    let resp = send(&handler, req).await;
    assert_eq!(got(&resp), "PUT");
}

#[tokio::test]
async fn form_lookup_with_json_array() {
    let options = Options::from_json(r#"{"tokenLookup":"form:_method"}"#).unwrap();
    let handler = layered(MethodOverride::new(options.into_config()));

    let req = Request::post("/")
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(br#"{"_method":["delete","put"]}"#)))
        .unwrap();

    let resp = send(&handler, req).await;
    assert_eq!(got(&resp), "DELETE");
}

#[tokio::test]
async fn form_lookup_without_body() {
    let options = Options::from_json(r#"{"tokenLookup":"form:_method"}"#).unwrap();
    let handler = layered(MethodOverride::new(options.into_config()));

    let resp = send(&handler, Request::post("/?_method=PUT").body(empty()).unwrap()).await;
    assert_eq!(got(&resp), "POST");
}

#[tokio::test]
async fn legacy_method_option() {
    let options = Options::from_json(r#"{"method":"PUT"}"#).unwrap();
    let handler = layered(MethodOverride::new(options.into_config()));

    let req = Request::put("/").header("X-HTTP-Method-Override", "delete").body(empty()).unwrap();
    assert_eq!(got(&send(&handler, req).await), "DELETE");

    let req = Request::post("/").header("X-HTTP-Method-Override", "delete").body(empty()).unwrap();
    assert_eq!(got(&send(&handler, req).await), "POST");
}

#[tokio::test]
async fn unknown_lookup_kind_reads_header() {
    let options = Options::from_json(r#"{"tokenLookup":"cookie:X-Method"}"#).unwrap();
    let handler = layered(MethodOverride::new(options.into_config()));

    let req = Request::post("/").header("X-Method", "OPTIONS").body(empty()).unwrap();
    let resp = send(&handler, req).await;
    assert_eq!(got(&resp), "OPTIONS");
    assert_eq!(resp.headers().get(VARY).unwrap(), "X-Method");
}

#[test]
fn original_method_is_recorded_once() {
    let resolver = MethodOverride::default();
    let mut req = Request::post("/").header("X-HTTP-Method-Override", "PUT").body(()).unwrap();
    let mut headers = http::HeaderMap::new();

    for _ in 0..3 {
        resolver.resolve(&mut req, &mut headers);
        assert_eq!(req.original_method(), Some(&Method::POST));
        assert_eq!(req.method(), Method::PUT);
    }
    assert_eq!(headers.get_all(VARY).iter().count(), 1);
}

#[test]
fn resolver_is_shared_across_threads() {
    let resolver = std::sync::Arc::new(MethodOverride::default());

    let handles: Vec<_> = ["PUT", "PATCH", "DELETE", "BOGUS"]
        .into_iter()
        .map(|token| {
            let resolver = std::sync::Arc::clone(&resolver);
            std::thread::spawn(move || {
                let mut req = Request::post("/").header("X-HTTP-Method-Override", token).body(()).unwrap();
                resolver.resolve(&mut req, &mut http::HeaderMap::new());
                req.method().clone()
            })
        })
        .collect();

    let methods: Vec<Method> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(methods, vec![Method::PUT, Method::PATCH, Method::DELETE, Method::POST]);
}
