//! Drive service layer
//!
//! A service-layer facade over the Google Drive REST API v3 for embedding
//! applications: file metadata and content, folder and document creation,
//! full-text search, and reader-permission management, all through a small
//! set of async calls on [`DriveFacade`].
//!
//! The facade sits on a thin client of its own (service-account
//! authentication, reqwest transport, typed endpoint wrappers). Every
//! operation is a direct delegation to the backend; nothing is cached or
//! retried, and expected absences come back as `Ok(None)` or empty
//! collections instead of errors.
//!
//! # Example
//!
//! ```no_run
//! use gdrive_service::{DriveClient, DriveConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DriveConfig::builder()
//!     .service_account_email("svc@project.iam.gserviceaccount.com")
//!     .key_path("/etc/keys/drive.pem")
//!     .application_name("inventory-backend")
//!     .app_folder_id("0B1x2y3z")
//!     .build()?;
//!
//! let facade = DriveClient::connect(config).await?.facade();
//!
//! // Fetch metadata; an unknown id is an absence, not an error.
//! if let Some(file) = facade.get("1f2g3h", None).await? {
//!     println!("{}", file.name.unwrap_or_default());
//! }
//!
//! // Make exactly these two addresses the non-owner readers of a file.
//! let readers = vec!["a@gmail.com".to_string(), "b@gmail.com".to_string()];
//! let report = facade.resolve_readers("1f2g3h", &readers).await?;
//! assert!(report.is_complete());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod facade;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use auth::{AccessToken, AuthProvider, ServiceAccountProvider};
pub use client::DriveClient;
pub use config::{DriveConfig, DriveConfigBuilder};
pub use errors::{DriveError, DriveResult};
pub use facade::{DriveFacade, GrantReport, GrantStatus, ReconcileReport};
pub use types::{DriveFile, DocumentKind, FileUpload, Permission, PermissionRole};

/// Prelude module with commonly used types and traits.
///
/// ```no_run
/// use gdrive_service::prelude::*;
/// ```
pub mod prelude {
    // Client and facade
    pub use crate::client::DriveClient;
    pub use crate::facade::{
        DriveFacade, GrantRejection, GrantReport, GrantStatus, ReconcileReport,
    };

    // Configuration
    pub use crate::config::{DriveConfig, DriveConfigBuilder};

    // Authentication
    pub use crate::auth::{AccessToken, AuthProvider, ServiceAccountProvider};

    // Services
    pub use crate::services::{FilesService, PermissionsService};

    // Common types
    pub use crate::types::{
        CreateFileRequest, CreatePermissionRequest, DocumentKind, DriveFile, FileList,
        FileUpload, Permission, PermissionList, PermissionRole, PrincipalType,
    };

    // Errors
    pub use crate::errors::{DriveError, DriveResult};
}
