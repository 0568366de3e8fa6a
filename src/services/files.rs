//! Files service: raw Drive file endpoints.
//!
//! Thin wrappers around `/files`, one HTTP call per method. Defaults,
//! validation, and outcome shaping live in the facade on top.

use crate::client::RequestExecutor;
use crate::errors::DriveResult;
use crate::transport::{ByteStream, HttpMethod, MultipartBody, RequestBody};
use crate::types::{CreateFileRequest, DriveFile, FileList};
use bytes::Bytes;
use std::sync::Arc;

/// Service for raw file operations.
pub struct FilesService {
    executor: Arc<RequestExecutor>,
}

impl FilesService {
    /// Creates a new files service.
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Fetches file metadata with the given field projection.
    pub async fn get(&self, file_id: &str, fields: &str) -> DriveResult<DriveFile> {
        let path = format!("files/{}", RequestExecutor::encode_path_segment(file_id));
        let url = self.executor.endpoint(&path, &[("fields", fields)])?;
        self.executor
            .execute(HttpMethod::Get, url, RequestBody::Empty)
            .await
    }

    /// Lists files matching a query. Returns a single page.
    pub async fn list(&self, query: &str, fields: &str) -> DriveResult<FileList> {
        let url = self
            .executor
            .endpoint("files", &[("q", query), ("fields", fields)])?;
        self.executor
            .execute(HttpMethod::Get, url, RequestBody::Empty)
            .await
    }

    /// Creates a file from metadata only.
    pub async fn create(
        &self,
        request: &CreateFileRequest,
        fields: &str,
    ) -> DriveResult<DriveFile> {
        let url = self.executor.endpoint("files", &[("fields", fields)])?;
        let body = RequestBody::json(request)?;
        self.executor.execute(HttpMethod::Post, url, body).await
    }

    /// Creates a file from metadata and content in one multipart call.
    pub async fn create_multipart(
        &self,
        request: &CreateFileRequest,
        content: Bytes,
        content_type: &str,
        fields: &str,
    ) -> DriveResult<DriveFile> {
        let url = self.executor.upload_endpoint(
            "files",
            &[("uploadType", "multipart"), ("fields", fields)],
        )?;
        let multipart = MultipartBody::new(request, content, content_type)?;
        self.executor
            .execute(HttpMethod::Post, url, RequestBody::Multipart(multipart))
            .await
    }

    /// Permanently deletes a file.
    pub async fn delete(&self, file_id: &str) -> DriveResult<()> {
        let path = format!("files/{}", RequestExecutor::encode_path_segment(file_id));
        let url = self.executor.endpoint(&path, &[])?;
        self.executor
            .execute_empty(HttpMethod::Delete, url, RequestBody::Empty)
            .await
    }

    /// Streams the media content of a file.
    pub async fn download(&self, file_id: &str) -> DriveResult<ByteStream> {
        let path = format!("files/{}", RequestExecutor::encode_path_segment(file_id));
        let url = self.executor.endpoint(&path, &[("alt", "media")])?;
        self.executor.execute_streaming(HttpMethod::Get, url).await
    }
}
