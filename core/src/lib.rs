//! Synchronous client for the Formstack Forms, SCIM and Documents REST APIs.
//!
//! # Overview
//! Every endpoint method is a thin mapping onto one `Dispatcher::execute`
//! call. The dispatcher builds the URL, attaches the configured credential,
//! serializes the JSON body, performs one blocking round-trip through a
//! `Transport`, and classifies the outcome.
//!
//! # Design
//! - `Dispatcher` is stateless apart from its immutable `ClientConfig`.
//! - Requests and responses are plain data (`HttpRequest`/`HttpResponse`), so
//!   the build and classify steps run without a network.
//! - A non-2xx response is either an `ApiError::Request` or a
//!   `Reply::Message`, chosen per client by `ErrorPolicy`.
//! - No retries, caching or pagination: each call is one round-trip.

pub mod config;
pub mod dispatcher;
pub mod docs;
pub mod error;
pub mod forms;
pub mod http;
pub mod scim;
pub mod status;
pub mod transport;

pub use config::{Auth, ClientConfig, ErrorPolicy};
pub use dispatcher::{Dispatcher, Outcome, Reply, Request, ENCRYPTION_PASSWORD_HEADER};
pub use docs::DocsClient;
pub use error::{ApiError, ApiResult};
pub use forms::FormsClient;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use scim::ScimClient;
pub use status::{describe, is_success, FailureKind};
pub use transport::{Transport, TransportError, UreqTransport};
