//! Permissions service: raw Drive permission endpoints.

use crate::client::RequestExecutor;
use crate::errors::DriveResult;
use crate::transport::{HttpMethod, RequestBody};
use crate::types::{CreatePermissionRequest, Permission, PermissionList};
use std::sync::Arc;

/// Service for raw permission operations.
pub struct PermissionsService {
    executor: Arc<RequestExecutor>,
}

impl PermissionsService {
    /// Creates a new permissions service.
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Lists permissions on a file. Returns a single page.
    pub async fn list(&self, file_id: &str, fields: &str) -> DriveResult<PermissionList> {
        let path = format!(
            "files/{}/permissions",
            RequestExecutor::encode_path_segment(file_id)
        );
        let url = self.executor.endpoint(&path, &[("fields", fields)])?;
        self.executor
            .execute(HttpMethod::Get, url, RequestBody::Empty)
            .await
    }

    /// Creates a permission on a file.
    ///
    /// Notification settings ride as query parameters; the message is only
    /// meaningful when notifications are on, which the caller enforces.
    pub async fn create(
        &self,
        file_id: &str,
        request: &CreatePermissionRequest,
        notify: bool,
        email_message: Option<&str>,
        fields: &str,
    ) -> DriveResult<Permission> {
        let path = format!(
            "files/{}/permissions",
            RequestExecutor::encode_path_segment(file_id)
        );

        let notify_value = if notify { "true" } else { "false" };
        let mut query: Vec<(&str, &str)> = vec![
            ("sendNotificationEmail", notify_value),
            ("fields", fields),
        ];
        if let Some(message) = email_message {
            query.push(("emailMessage", message));
        }

        let url = self.executor.endpoint(&path, &query)?;
        let body = RequestBody::json(request)?;
        self.executor.execute(HttpMethod::Post, url, body).await
    }

    /// Deletes a permission from a file.
    pub async fn delete(&self, file_id: &str, permission_id: &str) -> DriveResult<()> {
        let path = format!(
            "files/{}/permissions/{}",
            RequestExecutor::encode_path_segment(file_id),
            RequestExecutor::encode_path_segment(permission_id)
        );
        let url = self.executor.endpoint(&path, &[])?;
        self.executor
            .execute_empty(HttpMethod::Delete, url, RequestBody::Empty)
            .await
    }
}
