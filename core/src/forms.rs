//! Forms REST API (v2) client.
//!
//! Every method maps one resource path and verb onto a single dispatcher
//! call and returns the decoded body untouched.

use serde_json::Value;

use crate::config::ClientConfig;
use crate::dispatcher::{Dispatcher, Reply, Request};
use crate::error::ApiResult;
use crate::transport::{Transport, UreqTransport};

pub struct FormsClient<T = UreqTransport> {
    dispatcher: Dispatcher<T>,
}

impl FormsClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            dispatcher: Dispatcher::new(config)?,
        })
    }
}

impl<T: Transport> FormsClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> ApiResult<Self> {
        Ok(Self {
            dispatcher: Dispatcher::with_transport(config, transport)?,
        })
    }

    /// Raw access for endpoints without a dedicated method.
    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    // -----------------------------------------------------------------------
    // Forms
    // -----------------------------------------------------------------------

    pub fn get_forms(&self, params: Option<Value>) -> ApiResult<Reply> {
        self.dispatcher.get("form.json", params)
    }

    /// `detail` selects a sub-view such as `basic`; pass `""` for the full form.
    pub fn get_form(&self, id: u64, detail: &str, params: Option<Value>) -> ApiResult<Reply> {
        let path = if detail.is_empty() {
            format!("form/{id}.json")
        } else {
            format!("form/{id}/{detail}.json")
        };
        self.dispatcher.get(&path, params)
    }

    pub fn create_form(&self, params: Option<Value>, data: Value) -> ApiResult<Reply> {
        self.dispatcher.post("form.json", params, Some(data))
    }

    pub fn update_form(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher.put(&format!("form/{id}.json"), None, Some(data))
    }

    pub fn delete_form(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher.delete(&format!("form/{id}.json"), None, None)
    }

    // -----------------------------------------------------------------------
    // Fields
    // -----------------------------------------------------------------------

    pub fn get_field(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher.get(&format!("field/{id}.json"), None)
    }

    pub fn update_field(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher.put(&format!("field/{id}.json"), None, Some(data))
    }

    pub fn delete_field(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher.delete(&format!("field/{id}.json"), None, None)
    }

    pub fn get_form_fields(&self, form_id: u64) -> ApiResult<Reply> {
        self.dispatcher.get(&format!("form/{form_id}/field.json"), None)
    }

    pub fn create_form_field(&self, form_id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .post(&format!("form/{form_id}/field.json"), None, Some(data))
    }

    // -----------------------------------------------------------------------
    // Folders
    // -----------------------------------------------------------------------

    pub fn get_folders(&self, params: Option<Value>) -> ApiResult<Reply> {
        self.dispatcher.get("folder.json", params)
    }

    pub fn get_folder(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher.get(&format!("folder/{id}.json"), None)
    }

    pub fn create_folder(&self, data: Value) -> ApiResult<Reply> {
        self.dispatcher.post("folder.json", None, Some(data))
    }

    pub fn update_folder(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher.put(&format!("folder/{id}.json"), None, Some(data))
    }

    pub fn delete_folder(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher.delete(&format!("folder/{id}.json"), None, None)
    }

    // -----------------------------------------------------------------------
    // Submissions
    // -----------------------------------------------------------------------

    /// `enc_password` unlocks encrypted fields; `""` sends no password header.
    pub fn get_submission(
        &self,
        id: u64,
        params: Option<Value>,
        enc_password: &str,
    ) -> ApiResult<Reply> {
        self.dispatcher.execute(
            Request {
                params,
                ..Request::get(format!("submission/{id}.json"))
            }
            .with_encryption_password(enc_password),
        )
    }

    pub fn update_submission(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .put(&format!("submission/{id}.json"), None, Some(data))
    }

    pub fn delete_submission(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher
            .delete(&format!("submission/{id}.json"), None, None)
    }

    pub fn get_form_submissions(
        &self,
        form_id: u64,
        params: Option<Value>,
        enc_password: &str,
    ) -> ApiResult<Reply> {
        self.dispatcher.execute(
            Request {
                params,
                ..Request::get(format!("form/{form_id}/submission.json"))
            }
            .with_encryption_password(enc_password),
        )
    }

    pub fn create_form_submission(&self, form_id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .post(&format!("form/{form_id}/submission.json"), None, Some(data))
    }

    /// Fetches an uploaded file attached to a submission field.
    pub fn download_submission_file(&self, submission_id: u64, field_id: u64) -> ApiResult<Reply> {
        self.dispatcher
            .post(&format!("download/{submission_id}/{field_id}.json"), None, None)
    }

    // -----------------------------------------------------------------------
    // Partial submissions
    // -----------------------------------------------------------------------

    pub fn get_form_partial_submissions(
        &self,
        form_id: u64,
        params: Option<Value>,
    ) -> ApiResult<Reply> {
        self.dispatcher
            .get(&format!("form/{form_id}/partialsubmission.json"), params)
    }

    pub fn get_partial_submission(&self, id: u64, params: Option<Value>) -> ApiResult<Reply> {
        self.dispatcher
            .get(&format!("partialsubmission/{id}.json"), params)
    }

    pub fn delete_partial_submission(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher
            .delete(&format!("partialsubmission/{id}.json"), None, None)
    }

    // -----------------------------------------------------------------------
    // Confirmations, notifications, webhooks
    // -----------------------------------------------------------------------

    pub fn create_confirmation(&self, form_id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .post(&format!("form/{form_id}/confirmation.json"), None, Some(data))
    }

    pub fn get_confirmation(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher.get(&format!("confirmation/{id}.json"), None)
    }

    pub fn update_confirmation(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .put(&format!("confirmation/{id}.json"), None, Some(data))
    }

    pub fn delete_confirmation(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher
            .delete(&format!("confirmation/{id}.json"), None, None)
    }

    pub fn create_notification(&self, form_id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .post(&format!("form/{form_id}/notification.json"), None, Some(data))
    }

    pub fn get_notification(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher.get(&format!("notification/{id}.json"), None)
    }

    pub fn update_notification(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .put(&format!("notification/{id}.json"), None, Some(data))
    }

    pub fn delete_notification(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher
            .delete(&format!("notification/{id}.json"), None, None)
    }

    pub fn create_webhook(&self, form_id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .post(&format!("form/{form_id}/webhook.json"), None, Some(data))
    }

    pub fn get_webhook(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher.get(&format!("webhook/{id}.json"), None)
    }

    pub fn update_webhook(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .put(&format!("webhook/{id}.json"), None, Some(data))
    }

    pub fn delete_webhook(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher
            .delete(&format!("webhook/{id}.json"), None, None)
    }

    // -----------------------------------------------------------------------
    // Portals
    // -----------------------------------------------------------------------

    pub fn get_portals(&self) -> ApiResult<Reply> {
        self.dispatcher.get("portal", None)
    }

    pub fn get_portal(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher.get(&format!("portal/{id}"), None)
    }

    pub fn update_portal(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher.put(&format!("portal/{id}"), None, Some(data))
    }

    pub fn delete_portal(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher.delete(&format!("portal/{id}"), None, None)
    }

    pub fn copy_portal(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher.post(&format!("portal/{id}/copy"), None, None)
    }

    pub fn create_portal_avatar(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .post(&format!("portal/{id}/avatar"), None, Some(data))
    }

    pub fn delete_portal_avatar(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher.delete(&format!("portal/{id}/avatar"), None, None)
    }

    pub fn create_portal_user(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher.post(&format!("portal/{id}/user"), None, Some(data))
    }

    pub fn update_portal_user(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher.put(&format!("portal/{id}/user"), None, Some(data))
    }

    pub fn delete_portal_user(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher.delete(&format!("portal/{id}/user"), None, None)
    }

    pub fn add_portal_form(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher.post(&format!("portal/{id}/form"), None, Some(data))
    }

    pub fn update_portal_form(&self, id: u64, form_id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .put(&format!("portal/{id}/form/{form_id}"), None, Some(data))
    }

    pub fn delete_portal_form(&self, id: u64, form_id: u64) -> ApiResult<Reply> {
        self.dispatcher
            .delete(&format!("portal/{id}/form/{form_id}"), None, None)
    }

    // -----------------------------------------------------------------------
    // Smartlists
    // -----------------------------------------------------------------------

    pub fn get_smartlists(&self, params: Option<Value>) -> ApiResult<Reply> {
        self.dispatcher.get("smartlist", params)
    }

    pub fn create_smartlist(&self, data: Value) -> ApiResult<Reply> {
        self.dispatcher.post("smartlist", None, Some(data))
    }

    pub fn get_smartlist(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher.get(&format!("smartlist/{id}"), None)
    }

    pub fn update_smartlist(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher.put(&format!("smartlist/{id}"), None, Some(data))
    }

    pub fn delete_smartlist(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher.delete(&format!("smartlist/{id}"), None, None)
    }

    pub fn get_smartlist_options(&self, id: u64, params: Option<Value>) -> ApiResult<Reply> {
        self.dispatcher.get(&format!("smartlist/{id}/option"), params)
    }

    pub fn update_smartlist_options(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .put(&format!("smartlist/{id}/option"), None, Some(data))
    }

    pub fn get_smartlist_option(&self, id: u64, option_id: u64) -> ApiResult<Reply> {
        self.dispatcher
            .get(&format!("smartlist/{id}/option/{option_id}"), None)
    }

    pub fn update_smartlist_option(&self, id: u64, option_id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .put(&format!("smartlist/{id}/option/{option_id}"), None, Some(data))
    }

    pub fn delete_smartlist_option(&self, id: u64, option_id: u64) -> ApiResult<Reply> {
        self.dispatcher
            .delete(&format!("smartlist/{id}/option/{option_id}"), None, None)
    }

    pub fn update_smartlist_option_image(
        &self,
        id: u64,
        option_id: u64,
        data: Value,
    ) -> ApiResult<Reply> {
        self.dispatcher.put(
            &format!("smartlist/{id}/option/{option_id}/image"),
            None,
            Some(data),
        )
    }

    pub fn delete_smartlist_option_image(&self, id: u64, option_id: u64) -> ApiResult<Reply> {
        self.dispatcher
            .delete(&format!("smartlist/{id}/option/{option_id}/image"), None, None)
    }

    /// Removes every option of the smartlist.
    pub fn delete_smartlist_options(&self, id: u64) -> ApiResult<Reply> {
        self.dispatcher
            .put(&format!("smartlist/{id}/alloptions"), None, None)
    }

    pub fn update_smartlist_options_bulk(&self, id: u64, data: Value) -> ApiResult<Reply> {
        self.dispatcher
            .put(&format!("smartlist/{id}/bulkoptions"), None, Some(data))
    }
}
