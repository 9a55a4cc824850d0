//! The request dispatcher shared by every endpoint client.
//!
//! # Design
//! `Dispatcher` holds an immutable `ClientConfig`, the pre-rendered
//! `authorization` value and a `Transport`. A call is split in three steps:
//! `build_request` turns a `Request` into an `HttpRequest`, the transport
//! performs the round-trip, and `parse_response` turns the `HttpResponse`
//! into an `Outcome`. `execute` chains them, logs around the round-trip and
//! applies the configured `ErrorPolicy` to a failed outcome. There is no
//! state between calls.

use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;
use tracing::{debug, error};

use crate::config::{Auth, ClientConfig, ErrorPolicy};
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::status;
use crate::transport::{Transport, UreqTransport};

/// Header carrying the password for encrypted form fields.
pub const ENCRYPTION_PASSWORD_HEADER: &str = "X-FS-ENCRYPTION-PASSWORD";

/// One call to make through a dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: HttpMethod,
    /// Relative to the configured base URL.
    pub path: String,
    /// Flat JSON object rendered as the query string.
    pub params: Option<Value>,
    pub body: Option<Value>,
    pub extra_header: Option<(String, String)>,
}

impl Request {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: None,
            body: None,
            extra_header: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_header = Some((name.into(), value.into()));
        self
    }

    /// Attaches the field decryption password. An empty password adds nothing.
    pub fn with_encryption_password(self, password: &str) -> Self {
        if password.is_empty() {
            return self;
        }
        self.with_header(ENCRYPTION_PASSWORD_HEADER, password)
    }
}

/// Result of one round-trip before the error policy is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { status: u16, body: Value },
    Failure { status: u16, reason: String },
}

/// What `execute` hands back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Decoded body of a 2xx response, exactly as the service sent it.
    Json(Value),
    /// Classification of a failed response, only under `ErrorPolicy::ReturnMessage`.
    Message(String),
}

impl Reply {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Reply::Json(value) => Some(value),
            Reply::Message(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Reply::Json(value) => Some(value),
            Reply::Message(_) => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Reply::Json(_) => None,
            Reply::Message(message) => Some(message),
        }
    }

    /// Flattens the reply into JSON; a message becomes a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            Reply::Json(value) => value,
            Reply::Message(message) => Value::String(message),
        }
    }
}

/// Performs one synchronous round-trip per call and normalizes the result.
pub struct Dispatcher<T = UreqTransport> {
    config: ClientConfig,
    authorization: String,
    transport: T,
}

impl Dispatcher<UreqTransport> {
    /// Creates a dispatcher with a ureq transport honoring `config.tls_verify`.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let transport = UreqTransport::new(config.tls_verify);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> ApiResult<Self> {
        let authorization = authorization_value(&config.auth)?;
        Ok(Self {
            config,
            authorization,
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.config.error_policy
    }

    pub fn build_request(&self, request: &Request) -> ApiResult<HttpRequest> {
        let url = join_url(&self.config.base_url, &request.path)?;
        let query = match &request.params {
            Some(params) => query_pairs(params)?,
            None => Vec::new(),
        };

        let mut headers = vec![
            ("accept".to_string(), "application/json".to_string()),
            ("authorization".to_string(), self.authorization.clone()),
        ];
        let body = match &request.body {
            Some(body) => {
                headers.push(("content-type".to_string(), "application/json".to_string()));
                Some(serde_json::to_string(body)?)
            }
            None => None,
        };
        if let Some((name, value)) = &request.extra_header {
            if name.eq_ignore_ascii_case("authorization") {
                return Err(ApiError::InvalidHeader(
                    "authorization is set by the client configuration".to_string(),
                ));
            }
            check_header_name(name)?;
            check_header_value(value)?;
            headers.push((name.clone(), value.clone()));
        }

        Ok(HttpRequest {
            method: request.method,
            url,
            query,
            headers,
            body,
        })
    }

    /// Decodes the body first, so a non-JSON body is a `Decode` error for any status.
    pub fn parse_response(&self, response: &HttpResponse) -> ApiResult<Outcome> {
        let body: Value = serde_json::from_slice(&response.body).map_err(|source| ApiError::Decode {
            status: response.status,
            source,
        })?;
        if status::is_success(response.status) {
            return Ok(Outcome::Success {
                status: response.status,
                body,
            });
        }
        Ok(Outcome::Failure {
            status: response.status,
            reason: response.reason.clone(),
        })
    }

    pub fn execute(&self, request: Request) -> ApiResult<Reply> {
        let http = self.build_request(&request)?;
        let params = request
            .params
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_else(|| "null".to_string());
        debug!(method = %http.method, url = %http.url, params = %params, "sending request");

        let response = match self.transport.send(&http) {
            Ok(response) => response,
            Err(source) => {
                error!(method = %http.method, url = %http.url, error = %source, "request failed");
                return Err(ApiError::Transport {
                    method: http.method,
                    url: http.url,
                    source,
                });
            }
        };

        let outcome = match self.parse_response(&response) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(
                    method = %http.method,
                    url = %http.url,
                    params = %params,
                    success = false,
                    status_code = response.status,
                    error = %err,
                    "undecodable response"
                );
                return Err(err);
            }
        };

        match outcome {
            Outcome::Success { status, body } => {
                debug!(
                    method = %http.method,
                    url = %http.url,
                    params = %params,
                    success = true,
                    status_code = status,
                    reason = %response.reason,
                    "request completed"
                );
                Ok(Reply::Json(body))
            }
            Outcome::Failure { status, reason } => {
                error!(
                    method = %http.method,
                    url = %http.url,
                    params = %params,
                    success = false,
                    status_code = status,
                    reason = %reason,
                    "request rejected"
                );
                let message = status::describe(status, &reason);
                match self.config.error_policy {
                    ErrorPolicy::Raise => Err(ApiError::Request {
                        status,
                        reason,
                        message,
                    }),
                    ErrorPolicy::ReturnMessage => Ok(Reply::Message(message)),
                }
            }
        }
    }

    pub fn get(&self, path: &str, params: Option<Value>) -> ApiResult<Reply> {
        self.execute(Request {
            params,
            ..Request::get(path)
        })
    }

    pub fn post(&self, path: &str, params: Option<Value>, body: Option<Value>) -> ApiResult<Reply> {
        self.execute(Request {
            params,
            body,
            ..Request::post(path)
        })
    }

    pub fn put(&self, path: &str, params: Option<Value>, body: Option<Value>) -> ApiResult<Reply> {
        self.execute(Request {
            params,
            body,
            ..Request::put(path)
        })
    }

    pub fn delete(&self, path: &str, params: Option<Value>, body: Option<Value>) -> ApiResult<Reply> {
        self.execute(Request {
            params,
            body,
            ..Request::delete(path)
        })
    }
}

fn authorization_value(auth: &Auth) -> ApiResult<String> {
    let value = match auth {
        Auth::Bearer { token } => format!("Bearer {token}"),
        Auth::Basic { key, secret } => {
            let encoded = general_purpose::STANDARD.encode(format!("{key}:{secret}"));
            format!("Basic {encoded}")
        }
    };
    check_header_value(&value)?;
    Ok(value)
}

// Visible ASCII and tabs only; anything else would be rejected by the transport.
fn check_header_value(value: &str) -> ApiResult<()> {
    if value.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b)) {
        return Ok(());
    }
    Err(ApiError::InvalidHeader(
        "header values must be printable ASCII".to_string(),
    ))
}

fn check_header_name(name: &str) -> ApiResult<()> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        return Ok(());
    }
    Err(ApiError::InvalidHeader(format!("`{name}` is not a valid header name")))
}

fn join_url(base: &str, path: &str) -> ApiResult<String> {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return Err(ApiError::InvalidPath);
    }
    Ok(format!("{}/{}", base.trim_end_matches('/'), path))
}

/// Flattens a JSON object into query pairs. Nulls are skipped and arrays
/// repeat their key.
fn query_pairs(params: &Value) -> ApiResult<Vec<(String, String)>> {
    let map = match params {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        _ => {
            return Err(ApiError::InvalidParams(
                "expected a JSON object".to_string(),
            ))
        }
    };

    let mut pairs = Vec::new();
    for (key, value) in map {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(item) = scalar(key, item)? {
                        pairs.push((key.clone(), item));
                    }
                }
            }
            other => {
                if let Some(value) = scalar(key, other)? {
                    pairs.push((key.clone(), value));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar(key: &str, value: &Value) -> ApiResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => Err(ApiError::InvalidParams(format!(
            "`{key}` must be a string, number or boolean"
        ))),
    }
}
