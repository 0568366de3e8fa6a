//! Type definitions for the Drive service layer.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use mime::Mime;
use serde::{Deserialize, Serialize};

/// MIME type of a Drive folder.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Drive file metadata.
///
/// Responses carry only the requested field projection, so every field
/// except the id tolerates being absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// File ID.
    pub id: String,

    /// File name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// MIME type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// File description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Parent folder IDs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,

    /// Permissions granted on the file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Permission>,

    /// Link to download the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_content_link: Option<String>,

    /// Link to view the file in Drive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_view_link: Option<String>,

    /// Content size in bytes, as reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,

    /// Last modification time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<DateTime<Utc>>,

    /// Whether the file is in the trash.
    #[serde(default)]
    pub trashed: bool,
}

impl DriveFile {
    /// Returns true if the file is a folder.
    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(FOLDER_MIME_TYPE)
    }
}

/// One page of a file listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    /// Token for the next page, if any.
    #[serde(default)]
    pub next_page_token: Option<String>,

    /// Whether the search was cut short by the backend.
    #[serde(default)]
    pub incomplete_search: bool,

    /// Matching files.
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

/// A permission granted on a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// Permission ID.
    pub id: String,

    /// Kind of principal the permission applies to.
    #[serde(rename = "type")]
    pub principal_type: PrincipalType,

    /// Granted role.
    pub role: PermissionRole,

    /// Email address of the principal, if applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,

    /// Display name of the principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Whether the principal account has been deleted.
    #[serde(default)]
    pub deleted: bool,
}

impl Permission {
    /// Returns true if this is an owner permission.
    pub fn is_owner(&self) -> bool {
        self.role == PermissionRole::Owner
    }
}

/// Kind of principal a permission applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalType {
    /// Individual user.
    User,
    /// Google group.
    Group,
    /// Entire domain.
    Domain,
    /// Anyone with the link.
    Anyone,
}

/// Role granted by a permission.
///
/// The full Drive role set is accepted when reading; this crate only ever
/// writes the reader and writer roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionRole {
    /// Full ownership.
    Owner,
    /// Shared-drive organizer.
    Organizer,
    /// Shared-drive file organizer.
    FileOrganizer,
    /// Read and write access.
    Writer,
    /// Read and comment access.
    Commenter,
    /// Read-only access.
    Reader,
}

/// One page of a permission listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionList {
    /// Token for the next page, if any.
    #[serde(default)]
    pub next_page_token: Option<String>,

    /// Permissions on the file.
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// Request body for creating a file.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    /// File name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// MIME type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// File description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Parent folder IDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<String>>,
}

/// Request body for creating a permission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePermissionRequest {
    /// Role to grant.
    pub role: PermissionRole,

    /// Kind of principal to grant it to.
    #[serde(rename = "type")]
    pub principal_type: PrincipalType,

    /// Email address of the principal, required for users and groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

/// Upload input handed over by the embedding application.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Name the file should get in Drive.
    pub name: String,

    /// Content type of the media.
    pub content_type: Mime,

    /// File content.
    pub content: Bytes,
}

impl FileUpload {
    /// Creates a new upload input.
    pub fn new(name: impl Into<String>, content_type: Mime, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type,
            content: content.into(),
        }
    }
}

/// Kind of Google Workspace document to insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Google Docs document.
    Document,
    /// Google Sheets spreadsheet.
    Spreadsheet,
    /// Google Slides presentation.
    Presentation,
}

impl DocumentKind {
    /// Returns the Drive MIME type for this document kind.
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Document => "application/vnd.google-apps.document",
            DocumentKind::Spreadsheet => "application/vnd.google-apps.spreadsheet",
            DocumentKind::Presentation => "application/vnd.google-apps.presentation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_deserializes_from_projection() {
        let body = json!({
            "id": "abc123",
            "name": "report.pdf",
            "webViewLink": "https://drive.google.com/file/d/abc123/view"
        });
        let file: DriveFile = serde_json::from_value(body).unwrap();
        assert_eq!(file.id, "abc123");
        assert_eq!(file.name.as_deref(), Some("report.pdf"));
        assert!(file.mime_type.is_none());
        assert!(file.parents.is_empty());
        assert!(file.permissions.is_empty());
        assert!(!file.trashed);
    }

    #[test]
    fn test_is_folder() {
        let folder: DriveFile = serde_json::from_value(json!({
            "id": "f1",
            "mimeType": FOLDER_MIME_TYPE
        }))
        .unwrap();
        assert!(folder.is_folder());

        let file: DriveFile = serde_json::from_value(json!({
            "id": "f2",
            "mimeType": "text/plain"
        }))
        .unwrap();
        assert!(!file.is_folder());
    }

    #[test]
    fn test_permission_serde_shape() {
        let body = json!({
            "id": "perm1",
            "type": "user",
            "role": "fileOrganizer",
            "emailAddress": "user@example.com"
        });
        let permission: Permission = serde_json::from_value(body).unwrap();
        assert_eq!(permission.principal_type, PrincipalType::User);
        assert_eq!(permission.role, PermissionRole::FileOrganizer);
        assert!(!permission.is_owner());

        let owner: Permission = serde_json::from_value(json!({
            "id": "perm2",
            "type": "user",
            "role": "owner"
        }))
        .unwrap();
        assert!(owner.is_owner());
    }

    #[test]
    fn test_create_file_request_skips_absent_fields() {
        let request = CreateFileRequest {
            name: Some("notes.txt".to_string()),
            ..Default::default()
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({"name": "notes.txt"}));
    }

    #[test]
    fn test_create_permission_request_uses_wire_names() {
        let request = CreatePermissionRequest {
            role: PermissionRole::Reader,
            principal_type: PrincipalType::User,
            email_address: Some("user@gmail.com".to_string()),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"role": "reader", "type": "user", "emailAddress": "user@gmail.com"})
        );
    }

    #[test]
    fn test_document_kind_mime_types() {
        assert_eq!(
            DocumentKind::Spreadsheet.mime_type(),
            "application/vnd.google-apps.spreadsheet"
        );
        assert_eq!(
            DocumentKind::Document.mime_type(),
            "application/vnd.google-apps.document"
        );
        assert_eq!(
            DocumentKind::Presentation.mime_type(),
            "application/vnd.google-apps.presentation"
        );
    }

    #[test]
    fn test_file_list_defaults() {
        let list: FileList = serde_json::from_value(json!({})).unwrap();
        assert!(list.files.is_empty());
        assert!(list.next_page_token.is_none());
        assert!(!list.incomplete_search);
    }
}
