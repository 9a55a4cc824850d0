//! Documents API client: documents, data routes, merges and PDF tools.
//!
//! Uses Basic auth with an API key and secret instead of a bearer token.
//! Merges are the only two-step calls: the merge URL embeds the resource's
//! `key`, which is looked up first.

use serde_json::Value;

use crate::config::ClientConfig;
use crate::dispatcher::{Dispatcher, Reply};
use crate::error::{ApiError, ApiResult};
use crate::transport::{Transport, UreqTransport};

pub struct DocsClient<T = UreqTransport> {
    dispatcher: Dispatcher<T>,
}

impl DocsClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            dispatcher: Dispatcher::new(config)?,
        })
    }
}

impl<T: Transport> DocsClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> ApiResult<Self> {
        Ok(Self {
            dispatcher: Dispatcher::with_transport(config, transport)?,
        })
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    // -----------------------------------------------------------------------
    // Documents
    // -----------------------------------------------------------------------

    pub fn get_documents(&self) -> ApiResult<Reply> {
        self.dispatcher.get("api/documents", None)
    }

    /// `detail` selects a sub-resource such as `fields`; pass `""` for the document itself.
    pub fn get_document(&self, id: u64, detail: &str) -> ApiResult<Reply> {
        let path = if detail.is_empty() {
            format!("api/documents/{id}")
        } else {
            format!("api/documents/{id}/{detail}")
        };
        self.dispatcher.get(&path, None)
    }

    pub fn create_document(&self, data: Value) -> ApiResult<Reply> {
        self.dispatcher.post("api/documents", None, Some(data))
    }

    pub fn update_document(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .put(&format!("api/documents/{id}"), None, Some(data))
    }

    pub fn copy_document(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .post(&format!("api/documents/{id}/copy"), None, Some(data))
    }

    pub fn delete_document(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher
            .delete(&format!("api/documents/{id}"), None, None)
    }

    pub fn create_delivery(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .post(&format!("api/documents/{id}/deliveries"), None, Some(data))
    }

    /// Merges `data` into the document, looking up its merge key first.
    pub fn merge_document(&self, id: u64, data: Value) -> ApiResult<Reply> {
        let key = match self.dispatcher.get(&format!("api/documents/{id}"), None)? {
            Reply::Json(document) => merge_key(&document, "document", id)?,
            message @ Reply::Message(_) => return Ok(message),
        };
        self.dispatcher
            .post(&format!("merge/{id}/{key}"), None, Some(data))
    }

    // -----------------------------------------------------------------------
    // Data routes
    // -----------------------------------------------------------------------

    pub fn get_data_routes(&self) -> ApiResult<Reply> {
        self.dispatcher.get("api/routes", None)
    }

    pub fn get_data_route(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher.get(&format!("api/routes/{id}"), None)
    }

    pub fn create_data_route(&self, data: Value) -> ApiResult<Reply> {
        self.dispatcher.post("api/routes", None, Some(data))
    }

    pub fn update_data_route(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .put(&format!("api/routes/{id}"), None, Some(data))
    }

    pub fn merge_data_route(&self, id: u64, data: Value) -> ApiResult<Reply> {
        let key = match self.dispatcher.get(&format!("api/routes/{id}"), None)? {
            Reply::Json(route) => merge_key(&route, "data route", id)?,
            message @ Reply::Message(_) => return Ok(message),
        };
        self.dispatcher
            .post(&format!("route/{id}/{key}"), None, Some(data))
    }

    // -----------------------------------------------------------------------
    // PDF tools
    // -----------------------------------------------------------------------

    pub fn combine_files(&self, data: Value) -> ApiResult<Reply> {
        self.tool("combine", data)
    }

    pub fn convert_to_pdf(&self, data: Value) -> ApiResult<Reply> {
        self.tool("convert_to_pdf", data)
    }

    pub fn compress_pdf(&self, data: Value) -> ApiResult<Reply> {
        self.tool("compress_pdf", data)
    }

    pub fn encrypt_pdf(&self, data: Value) -> ApiResult<Reply> {
        self.tool("encrypt_pdf", data)
    }

    pub fn split_pdf(&self, data: Value) -> ApiResult<Reply> {
        self.tool("split_pdf", data)
    }

    fn tool(&self, name: &str, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .post(&format!("api/tools/{name}"), None, Some(data))
    }
}

fn merge_key(resource: &Value, kind: &'static str, id: u64) -> ApiResult<String> {
    resource
        .get("key")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ApiError::MissingKey { resource: kind, id })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn merge_key_reads_string_key() {
        let key = merge_key(&json!({"id": 7, "key": "abc12"}), "document", 7).unwrap();
        assert_eq!(key, "abc12");
    }

    #[test]
    fn merge_key_missing_or_not_a_string() {
        for resource in [json!({"id": 7}), json!({"key": 12}), json!([])] {
            let err = merge_key(&resource, "document", 7).unwrap_err();
            assert!(matches!(err, ApiError::MissingKey { resource: "document", id: 7 }));
        }
    }
}
