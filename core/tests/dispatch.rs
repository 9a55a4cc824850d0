//! Dispatcher behavior against an in-process transport.
//!
//! `CannedTransport` records every request it is handed and answers with a
//! fixed response or a fixed I/O failure, so each scenario exercises the full
//! build -> send -> classify path without a network.

use std::error::Error as _;
use std::io;
use std::sync::{Arc, Mutex};

use formstack_core::{
    ApiError, Auth, ClientConfig, Dispatcher, ErrorPolicy, HttpMethod, HttpRequest, HttpResponse,
    Reply, Request, Transport, TransportError,
};
use serde_json::json;

struct CannedTransport {
    answer: Result<HttpResponse, io::ErrorKind>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl CannedTransport {
    fn respond(status: u16, reason: &str, body: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(HttpResponse::new(status, reason, body)),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn fail(kind: io::ErrorKind) -> Arc<Self> {
        Arc::new(Self {
            answer: Err(kind),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl Transport for CannedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        match &self.answer {
            Ok(response) => Ok(response.clone()),
            Err(kind) => Err(io::Error::new(*kind, "simulated transport failure").into()),
        }
    }
}

fn forms_config() -> ClientConfig {
    ClientConfig::forms("forms.example.test", "tok")
}

fn dispatcher(transport: &Arc<CannedTransport>, config: ClientConfig) -> Dispatcher<Arc<CannedTransport>> {
    Dispatcher::with_transport(config, Arc::clone(transport)).unwrap()
}

#[test]
fn post_created_returns_body() {
    let transport = CannedTransport::respond(201, "Created", r#"{"id": 42, "name": "test"}"#);
    let d = dispatcher(&transport, forms_config());

    let reply = d
        .execute(Request::post("form.json").with_body(json!({"name": "test"})))
        .unwrap();
    assert_eq!(reply, Reply::Json(json!({"id": 42, "name": "test"})));

    let sent = transport.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, HttpMethod::Post);
    assert_eq!(sent[0].url, "https://forms.example.test/api/v2/form.json");
}

#[test]
fn success_range_returns_any_json_shape() {
    for (status, body, expected) in [
        (200, r#"[1, 2, 3]"#, json!([1, 2, 3])),
        (204, r#""ok""#, json!("ok")),
        (299, r#"{"nested": {"a": [true, null]}}"#, json!({"nested": {"a": [true, null]}})),
    ] {
        let transport = CannedTransport::respond(status, "", body);
        let reply = dispatcher(&transport, forms_config())
            .get("form.json", None)
            .unwrap();
        assert_eq!(reply, Reply::Json(expected), "status {status}");
    }
}

#[test]
fn not_found_raises_request_error_by_default() {
    let transport = CannedTransport::respond(404, "Not Found", r#"{"status":"error"}"#);
    let err = dispatcher(&transport, forms_config())
        .get("form/999.json", None)
        .unwrap_err();

    match err {
        ApiError::Request {
            status,
            reason,
            message,
        } => {
            assert_eq!(status, 404);
            assert_eq!(reason, "Not Found");
            assert_eq!(message, "Not Found - The resource requested could not be found");
        }
        other => panic!("expected request error, got {other:?}"),
    }
}

#[test]
fn not_found_returns_message_when_configured() {
    let transport = CannedTransport::respond(404, "Not Found", r#"{"status":"error"}"#);
    let config = forms_config().with_error_policy(ErrorPolicy::ReturnMessage);
    let reply = dispatcher(&transport, config).get("form/999.json", None).unwrap();

    assert_eq!(
        reply,
        Reply::Message("Not Found - The resource requested could not be found".to_string())
    );
}

#[test]
fn failure_never_leaks_raw_body() {
    for status in [199, 300, 301, 400, 401, 429, 500, 503] {
        let transport = CannedTransport::respond(status, "Nope", r#"{"secret":"body"}"#);
        let config = forms_config().with_error_policy(ErrorPolicy::ReturnMessage);
        let reply = dispatcher(&transport, config).get("form.json", None).unwrap();
        assert!(reply.as_json().is_none(), "status {status} leaked a body");
        assert!(!reply.message().unwrap().contains("secret"));
    }
}

#[test]
fn connection_refused_is_transport_error() {
    let transport = CannedTransport::fail(io::ErrorKind::ConnectionRefused);
    let err = dispatcher(&transport, forms_config())
        .get("form.json", None)
        .unwrap_err();

    assert!(matches!(err, ApiError::Transport { method: HttpMethod::Get, .. }));
    let cause = err.source().unwrap().downcast_ref::<io::Error>().unwrap();
    assert_eq!(cause.kind(), io::ErrorKind::ConnectionRefused);
}

#[test]
fn transport_error_ignores_error_policy() {
    let transport = CannedTransport::fail(io::ErrorKind::TimedOut);
    let config = forms_config().with_error_policy(ErrorPolicy::ReturnMessage);
    let err = dispatcher(&transport, config).get("form.json", None).unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }));
}

#[test]
fn malformed_json_is_decode_error() {
    let transport = CannedTransport::respond(200, "OK", "not json{");
    let err = dispatcher(&transport, forms_config())
        .get("form.json", None)
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode { status: 200, .. }));
    assert!(err.source().unwrap().downcast_ref::<serde_json::Error>().is_some());
}

#[test]
fn malformed_json_on_failure_is_still_decode_error() {
    let transport = CannedTransport::respond(502, "Bad Gateway", "<html>gateway</html>");
    let config = forms_config().with_error_policy(ErrorPolicy::ReturnMessage);
    let err = dispatcher(&transport, config).get("form.json", None).unwrap_err();
    assert!(matches!(err, ApiError::Decode { status: 502, .. }));
}

#[test]
fn invalid_request_never_reaches_transport() {
    let transport = CannedTransport::respond(200, "OK", "{}");
    let d = dispatcher(&transport, forms_config());

    assert!(matches!(d.get("", None), Err(ApiError::InvalidPath)));
    assert!(matches!(
        d.get("form.json", Some(json!("page=2"))),
        Err(ApiError::InvalidParams(_))
    ));
    assert!(transport.requests().is_empty());
}

#[test]
fn auth_header_matches_configured_scheme() {
    let bearer = CannedTransport::respond(200, "OK", "{}");
    dispatcher(&bearer, forms_config()).get("form.json", None).unwrap();

    let basic = CannedTransport::respond(200, "OK", "{}");
    let docs = ClientConfig::new(
        "https://docs.example.test/",
        Auth::Basic {
            key: "key".to_string(),
            secret: "secret".to_string(),
        },
    );
    dispatcher(&basic, docs).get("api/documents", None).unwrap();

    for (transport, prefix) in [(&bearer, "Bearer "), (&basic, "Basic ")] {
        let sent = transport.requests();
        let auth: Vec<&str> = sent[0]
            .headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("authorization"))
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(auth.len(), 1);
        assert!(auth[0].starts_with(prefix), "{} should start with {prefix}", auth[0]);
    }
}

#[test]
fn params_and_password_reach_the_transport() {
    let transport = CannedTransport::respond(200, "OK", r#"{"submissions": []}"#);
    let d = dispatcher(&transport, forms_config());

    d.execute(
        Request::get("form/7/submission.json")
            .with_params(json!({"data": true, "per_page": 25}))
            .with_encryption_password("hunter2"),
    )
    .unwrap();

    let sent = transport.requests();
    assert_eq!(
        sent[0].query,
        vec![
            ("data".to_string(), "true".to_string()),
            ("per_page".to_string(), "25".to_string()),
        ]
    );
    assert_eq!(sent[0].header("X-FS-ENCRYPTION-PASSWORD"), Some("hunter2"));
}

#[test]
fn delete_with_body_keeps_the_body() {
    let transport = CannedTransport::respond(200, "OK", r#"{"success": 1}"#);
    dispatcher(&transport, forms_config())
        .delete("portal/3/form/9", None, Some(json!({"force": true})))
        .unwrap();

    let sent = transport.requests();
    assert_eq!(sent[0].method, HttpMethod::Delete);
    assert_eq!(sent[0].body.as_deref(), Some(r#"{"force":true}"#));
}

#[test]
fn calls_are_independent() {
    let transport = CannedTransport::respond(200, "OK", r#"{"id": 1}"#);
    let d = dispatcher(&transport, forms_config());
    let first = d.get("form/1.json", None).unwrap();
    let second = d.get("form/1.json", None).unwrap();
    assert_eq!(first, second);
    assert_eq!(transport.requests()[0], transport.requests()[1]);
}
