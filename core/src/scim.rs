//! Directory-sync (SCIM) client for user, group, form and folder provisioning.

use serde_json::Value;

use crate::config::ClientConfig;
use crate::dispatcher::{Dispatcher, Reply};
use crate::error::ApiResult;
use crate::transport::{Transport, UreqTransport};

pub struct ScimClient<T = UreqTransport> {
    dispatcher: Dispatcher<T>,
}

impl ScimClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            dispatcher: Dispatcher::new(config)?,
        })
    }
}

impl<T: Transport> ScimClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> ApiResult<Self> {
        Ok(Self {
            dispatcher: Dispatcher::with_transport(config, transport)?,
        })
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    // Users

    pub fn get_users(&self, params: Option<Value>) -> ApiResult<Reply> {
        self.dispatcher.get("Users", params)
    }

    pub fn create_user(&self, data: Value) -> ApiResult<Reply> {
        self.dispatcher.post("Users", None, Some(data))
    }

    pub fn get_user(&self, id: &str) -> ApiResult<Reply> {
        self.dispatcher.get(&format!("Users/{id}"), None)
    }

    pub fn update_user(&self, id: &str, data: Value) -> ApiResult<Reply> {
        self.dispatcher.put(&format!("Users/{id}"), None, Some(data))
    }

    pub fn delete_user(&self, id: &str) -> ApiResult<Reply> {
        self.dispatcher.delete(&format!("Users/{id}"), None, None)
    }

    // Groups

    pub fn get_groups(&self, params: Option<Value>) -> ApiResult<Reply> {
        self.dispatcher.get("Groups", params)
    }

    pub fn create_group(&self, data: Value) -> ApiResult<Reply> {
        self.dispatcher.post("Groups", None, Some(data))
    }

    pub fn get_group(&self, id: &str) -> ApiResult<Reply> {
        self.dispatcher.get(&format!("Groups/{id}"), None)
    }

    pub fn update_group(&self, id: &str, data: Value) -> ApiResult<Reply> {
        self.dispatcher.put(&format!("Groups/{id}"), None, Some(data))
    }

    pub fn delete_group(&self, id: &str) -> ApiResult<Reply> {
        self.dispatcher.delete(&format!("Groups/{id}"), None, None)
    }

    // Forms and folders are read-only here.

    pub fn get_forms(&self, params: Option<Value>) -> ApiResult<Reply> {
        self.dispatcher.get("Forms", params)
    }

    pub fn get_form(&self, id: &str) -> ApiResult<Reply> {
        self.dispatcher.get(&format!("Forms/{id}"), None)
    }

    pub fn get_folders(&self, params: Option<Value>) -> ApiResult<Reply> {
        self.dispatcher.get("Folders", params)
    }

    pub fn get_folder(&self, id: &str) -> ApiResult<Reply> {
        self.dispatcher.get(&format!("Folders/{id}"), None)
    }
}
