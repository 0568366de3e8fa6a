//! High-level Drive operations for the embedding application.
//!
//! [`DriveFacade`] is the surface callers use: each method performs at most
//! a couple of backend round trips, applies defaults and local validation,
//! logs, and shapes outcomes into three classes. Expected absences come back
//! as `Ok(None)` or empty collections, validation rejections as report
//! values, and only genuine backend failures as errors.

use crate::client::DriveClient;
use crate::errors::{DriveError, DriveResult};
use crate::services::{FilesService, PermissionsService};
use crate::transport::ByteStream;
use crate::types::{
    CreateFileRequest, CreatePermissionRequest, DocumentKind, DriveFile, FileUpload,
    PermissionRole, PrincipalType, FOLDER_MIME_TYPE,
};
use tracing::{debug, error, info, warn};

mod report;
pub use report::{
    GrantFailure, GrantRejection, GrantReport, GrantStatus, ReconcileReport, RevokeFailure,
};

/// Field projection for permission responses.
const PERMISSION_FIELDS: &str = "id,type,role,emailAddress,displayName";

/// Field projection for permission listings.
const PERMISSION_LIST_FIELDS: &str =
    "permissions(id,type,role,emailAddress,displayName),nextPageToken";

/// Service facade over Drive file and permission operations.
///
/// Cheap to create from a [`DriveClient`] and cheap to clone; clones share
/// the underlying client handle.
///
/// # Example
///
/// ```no_run
/// use gdrive_service::{DriveClient, DriveConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let config = DriveConfig::builder()
/// #     .service_account_email("svc@project.iam.gserviceaccount.com")
/// #     .key_path("/etc/keys/drive.pem")
/// #     .build()?;
/// let facade = DriveClient::connect(config).await?.facade();
///
/// if let Some(file) = facade.get("1f2g3h", None).await? {
///     println!("found {}", file.name.unwrap_or_default());
/// }
/// # Ok(())
/// # }
/// ```
pub struct DriveFacade {
    client: DriveClient,
    files: FilesService,
    permissions: PermissionsService,
}

impl DriveFacade {
    /// Creates a facade over a client handle.
    pub fn new(client: DriveClient) -> Self {
        let files = client.files();
        let permissions = client.permissions();
        Self {
            client,
            files,
            permissions,
        }
    }

    /// Returns the underlying client handle.
    pub fn client(&self) -> &DriveClient {
        &self.client
    }

    fn default_fields(&self) -> &str {
        &self.client.config().default_file_fields
    }

    fn list_fields(&self) -> String {
        format!(
            "files({}),incompleteSearch,nextPageToken",
            self.default_fields()
        )
    }

    // ------------------------------------------------------------------
    // File operations
    // ------------------------------------------------------------------

    /// Fetches file metadata.
    ///
    /// `fields` defaults to the configured projection. An absent file is a
    /// first-class outcome: a not-found response maps to `Ok(None)`. Any
    /// other backend failure surfaces.
    pub async fn get(&self, file_id: &str, fields: Option<&str>) -> DriveResult<Option<DriveFile>> {
        let fields = fields.unwrap_or_else(|| self.default_fields());
        match self.files.get(file_id, fields).await {
            Ok(file) => Ok(Some(file)),
            Err(e) if e.is_not_found() => {
                debug!(file_id = %file_id, "File not found");
                Ok(None)
            }
            Err(e) => {
                error!(file_id = %file_id, error = %e, "Metadata fetch failed");
                Err(e)
            }
        }
    }

    /// Lists the files directly inside a folder.
    ///
    /// A not-found response maps to an empty listing.
    pub async fn list_children(&self, parent_id: &str) -> DriveResult<Vec<DriveFile>> {
        let query = format!("'{}' in parents", escape_query_term(parent_id));
        match self.files.list(&query, &self.list_fields()).await {
            Ok(list) => Ok(list.files),
            Err(e) if e.is_not_found() => {
                debug!(parent_id = %parent_id, "Parent not found, returning empty listing");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Deletes a file, reporting success as a plain flag.
    ///
    /// Soft failure contract: a missing file is logged at warn, any other
    /// backend failure at error, and both report `false`. Nothing is raised.
    pub async fn delete(&self, file_id: &str) -> bool {
        match self.files.delete(file_id).await {
            Ok(()) => {
                debug!(file_id = %file_id, "File deleted");
                true
            }
            Err(e) if e.is_not_found() => {
                warn!(file_id = %file_id, "Delete skipped, file not found");
                false
            }
            Err(e) => {
                error!(file_id = %file_id, error = %e, "Delete failed");
                false
            }
        }
    }

    /// Creates a folder under the configured application folder.
    ///
    /// A timeout maps to `Ok(None)`; any other backend failure surfaces.
    pub async fn create_folder(&self, name: &str) -> DriveResult<Option<DriveFile>> {
        let request = CreateFileRequest {
            name: Some(name.to_string()),
            mime_type: Some(FOLDER_MIME_TYPE.to_string()),
            parents: Some(vec![self.client.config().app_folder_id.clone()]),
            ..Default::default()
        };

        match self.files.create(&request, self.default_fields()).await {
            Ok(folder) => {
                info!(folder_id = %folder.id, name = %name, "Folder created");
                Ok(Some(folder))
            }
            Err(e) if e.is_timeout() => {
                info!(name = %name, "Folder creation timed out");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Uploads a file into a folder, metadata and content in one call.
    ///
    /// An empty description is treated as no description.
    pub async fn upload_file(
        &self,
        upload: FileUpload,
        parent_id: &str,
        description: Option<&str>,
    ) -> DriveResult<DriveFile> {
        let FileUpload {
            name,
            content_type,
            content,
        } = upload;

        let request = CreateFileRequest {
            name: Some(name.clone()),
            mime_type: Some(content_type.to_string()),
            description: description.filter(|d| !d.is_empty()).map(str::to_string),
            parents: Some(vec![parent_id.to_string()]),
        };

        let size = content.len();
        let file = self
            .files
            .create_multipart(&request, content, content_type.as_ref(), self.default_fields())
            .await?;

        info!(file_id = %file.id, name = %name, size = size, "File uploaded");
        Ok(file)
    }

    /// Creates an empty Workspace document inside a folder.
    ///
    /// The parent is fetched first; an absent parent is a not-found error.
    pub async fn insert_document(
        &self,
        parent_id: &str,
        name: &str,
        kind: DocumentKind,
    ) -> DriveResult<DriveFile> {
        let parent = self.get(parent_id, Some("id")).await?.ok_or_else(|| {
            DriveError::not_found(format!("Parent folder {} does not exist", parent_id))
        })?;

        let request = CreateFileRequest {
            name: Some(name.to_string()),
            mime_type: Some(kind.mime_type().to_string()),
            parents: Some(vec![parent.id]),
            ..Default::default()
        };

        let file = self.files.create(&request, self.default_fields()).await?;
        info!(file_id = %file.id, kind = ?kind, "Document created");
        Ok(file)
    }

    /// Searches file content, returning at most one page of matches.
    ///
    /// Zero matches yield an empty vector, never an absent value.
    pub async fn search_full_text(&self, needle: &str) -> DriveResult<Vec<DriveFile>> {
        let query = format!("fullText contains '{}'", escape_query_term(needle));
        let list = self.files.list(&query, &self.list_fields()).await?;
        debug!(needle = %needle, matches = list.files.len(), "Full-text search finished");
        Ok(list.files)
    }

    /// Streams the content of a previously fetched file.
    ///
    /// Files without a content link (folders, Workspace documents) have no
    /// downloadable media and map to `Ok(None)`.
    pub async fn download(&self, file: &DriveFile) -> DriveResult<Option<ByteStream>> {
        if file.web_content_link.is_none() {
            info!(file_id = %file.id, "No content to download");
            return Ok(None);
        }

        let stream = self.files.download(&file.id).await?;
        Ok(Some(stream))
    }

    // ------------------------------------------------------------------
    // Permission operations
    // ------------------------------------------------------------------

    /// Checks an address against the configured domain allow-list.
    pub fn is_allowed_reader(&self, address: &str) -> bool {
        is_allowed_address(address, &self.client.config().reader_domain_allowlist)
    }

    /// Grants a permission to one address.
    ///
    /// An empty file id or an address outside the allow-list is rejected
    /// locally, without a backend call. Role defaults to reader and the
    /// principal to user. The file is fetched first; an absent file is a
    /// not-found error, and other backend failures surface.
    pub async fn add_permission(
        &self,
        file_id: &str,
        address: &str,
        role: Option<PermissionRole>,
        principal: Option<PrincipalType>,
        notify: bool,
        message: Option<&str>,
    ) -> DriveResult<GrantStatus> {
        if file_id.is_empty() {
            warn!("Permission grant rejected, empty file id");
            return Ok(GrantStatus::Rejected(GrantRejection::MissingFileId));
        }
        if !self.is_allowed_reader(address) {
            warn!(address = %address, "Permission grant rejected by address validation");
            return Ok(GrantStatus::Rejected(GrantRejection::AddressNotAllowed));
        }

        let file = self.get(file_id, Some("id")).await?.ok_or_else(|| {
            DriveError::not_found(format!("File {} does not exist", file_id))
        })?;

        let request = CreatePermissionRequest {
            role: role.unwrap_or(PermissionRole::Reader),
            principal_type: principal.unwrap_or(PrincipalType::User),
            email_address: Some(address.to_string()),
        };

        let message = message.filter(|m| notify && !m.is_empty());
        let permission = self
            .permissions
            .create(&file.id, &request, notify, message, PERMISSION_FIELDS)
            .await?;

        info!(file_id = %file.id, address = %address, role = ?request.role, "Permission granted");
        Ok(GrantStatus::Granted(permission))
    }

    /// Grants a permission to each address, recording per-address outcomes.
    ///
    /// A backend failure for one address is recorded in the report and does
    /// not abort the loop.
    pub async fn add_permissions(
        &self,
        file_id: &str,
        addresses: &[String],
        role: Option<PermissionRole>,
        principal: Option<PrincipalType>,
        notify: bool,
        message: Option<&str>,
    ) -> DriveResult<GrantReport> {
        let mut report = GrantReport::default();

        for address in addresses {
            match self
                .add_permission(file_id, address, role, principal, notify, message)
                .await
            {
                Ok(GrantStatus::Granted(_)) => report.granted.push(address.clone()),
                Ok(GrantStatus::Rejected(_)) => report.rejected.push(address.clone()),
                Err(e) => {
                    warn!(address = %address, error = %e, "Permission grant failed");
                    report.failed.push(GrantFailure {
                        address: address.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    /// Removes a permission from a file.
    ///
    /// The file is fetched first; an absent file is a not-found error.
    pub async fn remove_permission(&self, file_id: &str, permission_id: &str) -> DriveResult<()> {
        let file = self.get(file_id, Some("id")).await?.ok_or_else(|| {
            DriveError::not_found(format!("File {} does not exist", file_id))
        })?;

        self.permissions.delete(&file.id, permission_id).await?;
        debug!(file_id = %file.id, permission_id = %permission_id, "Permission removed");
        Ok(())
    }

    /// Reconciles the non-owner reader set of a file.
    ///
    /// Every non-owner permission is deleted, then the reader role is
    /// granted to each address with notifications off. An empty address
    /// slice is valid and means "remove all non-owner readers". Revocations
    /// are best-effort: failures are logged, recorded in the report, and do
    /// not abort the sequence. Owner permissions are never touched.
    pub async fn resolve_readers(
        &self,
        file_id: &str,
        readers: &[String],
    ) -> DriveResult<ReconcileReport> {
        if file_id.is_empty() {
            return Err(DriveError::invalid_argument("File id must not be empty"));
        }

        let file = self.get(file_id, Some("id")).await?.ok_or_else(|| {
            DriveError::not_found(format!("File {} does not exist", file_id))
        })?;

        let listing = self
            .permissions
            .list(&file.id, PERMISSION_LIST_FIELDS)
            .await?;

        let mut report = ReconcileReport::default();
        for permission in listing.permissions.iter().filter(|p| !p.is_owner()) {
            match self.permissions.delete(&file.id, &permission.id).await {
                Ok(()) => {
                    debug!(file_id = %file.id, permission_id = %permission.id, "Permission revoked");
                    report.revoked.push(permission.id.clone());
                }
                Err(e) => {
                    warn!(
                        file_id = %file.id,
                        permission_id = %permission.id,
                        error = %e,
                        "Revocation failed"
                    );
                    report.revoke_failures.push(RevokeFailure {
                        permission_id: permission.id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report.grants = self
            .add_permissions(
                &file.id,
                readers,
                Some(PermissionRole::Reader),
                Some(PrincipalType::User),
                false,
                None,
            )
            .await?;

        info!(
            file_id = %file.id,
            revoked = report.revoked.len(),
            granted = report.grants.granted.len(),
            complete = report.is_complete(),
            "Reader reconciliation finished"
        );
        Ok(report)
    }
}

impl Clone for DriveFacade {
    fn clone(&self) -> Self {
        Self::new(self.client.clone())
    }
}

/// Checks an address against a domain allow-list.
///
/// Deliberately narrower than full address syntax: exactly one `@` with
/// non-empty parts, and the domain must end with an allow-listed suffix.
fn is_allowed_address(address: &str, allowlist: &[String]) -> bool {
    let mut parts = address.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    allowlist
        .iter()
        .any(|suffix| domain.ends_with(suffix.as_str()))
}

/// Escapes a term for interpolation into a Drive query string.
fn escape_query_term(term: &str) -> String {
    term.replace('\\', "\\\\").replace('\'', "\\'")
}
