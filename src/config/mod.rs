//! Configuration for the Drive service layer.

use crate::auth::{scopes, TOKEN_URL};
use crate::errors::{DriveError, DriveResult};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default base URL for the Drive API.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// Default upload URL for the Drive API.
pub const DEFAULT_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3";

/// Default metadata field projection for single-file fetches.
pub const DEFAULT_FILE_FIELDS: &str =
    "id,name,mimeType,parents,permissions,webContentLink,webViewLink,trashed";

/// Configuration for the Drive service layer.
///
/// Carries everything needed to build the long-lived client handle once at
/// process start: the service-account identity and key location, the
/// application name used as the user agent, the OAuth scope, endpoint URLs,
/// and the facade's behavioral settings (application folder, default field
/// projection, reader-address domain allow-list).
#[derive(Debug, Clone)]
pub struct DriveConfig {
    /// Service-account email address.
    pub service_account_email: String,

    /// Path to the service account's PEM private key.
    pub key_path: Option<PathBuf>,

    /// Application name, sent as the user agent.
    pub application_name: String,

    /// OAuth scope requested for access tokens.
    pub scope: String,

    /// Folder that `create_folder` places new folders in.
    pub app_folder_id: String,

    /// Field projection used when the caller does not supply one.
    pub default_file_fields: String,

    /// Domain suffixes reader addresses are checked against.
    pub reader_domain_allowlist: Vec<String>,

    /// Base URL for the API.
    pub base_url: Url,

    /// Upload URL for the API.
    pub upload_url: Url,

    /// OAuth2 token endpoint.
    pub token_url: String,

    /// Default timeout for requests.
    pub timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl DriveConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> DriveConfigBuilder {
        DriveConfigBuilder::new()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DriveResult<()> {
        if self.service_account_email.is_empty() {
            return Err(DriveError::configuration(
                "Service account email is required",
            ));
        }
        if !self.service_account_email.contains('@') {
            return Err(DriveError::configuration(format!(
                "Service account email '{}' is not an email address",
                self.service_account_email
            )));
        }
        if self.scope.is_empty() {
            return Err(DriveError::configuration("OAuth scope must not be empty"));
        }
        if self.app_folder_id.is_empty() {
            return Err(DriveError::configuration(
                "Application folder id must not be empty",
            ));
        }
        if self.timeout.is_zero() {
            return Err(DriveError::configuration("Timeout must be non-zero"));
        }
        Ok(())
    }
}

/// Builder for [`DriveConfig`].
pub struct DriveConfigBuilder {
    service_account_email: Option<String>,
    key_path: Option<PathBuf>,
    application_name: Option<String>,
    scope: String,
    app_folder_id: String,
    default_file_fields: String,
    reader_domain_allowlist: Vec<String>,
    base_url: Option<String>,
    upload_url: Option<String>,
    token_url: String,
    timeout: Duration,
    connect_timeout: Duration,
}

impl DriveConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            service_account_email: None,
            key_path: None,
            application_name: None,
            scope: scopes::DRIVE.to_string(),
            app_folder_id: "root".to_string(),
            default_file_fields: DEFAULT_FILE_FIELDS.to_string(),
            reader_domain_allowlist: vec!["gmail.com".to_string(), "p-r.com.pl".to_string()],
            base_url: None,
            upload_url: None,
            token_url: TOKEN_URL.to_string(),
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(30),
        }
    }

    /// Sets the service-account email address.
    pub fn service_account_email(mut self, email: impl Into<String>) -> Self {
        self.service_account_email = Some(email.into());
        self
    }

    /// Sets the path to the PEM private key file.
    pub fn key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_path = Some(path.into());
        self
    }

    /// Sets the application name used as the user agent.
    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// Sets the OAuth scope.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Sets the folder new folders are created in.
    pub fn app_folder_id(mut self, folder_id: impl Into<String>) -> Self {
        self.app_folder_id = folder_id.into();
        self
    }

    /// Sets the default metadata field projection.
    pub fn default_file_fields(mut self, fields: impl Into<String>) -> Self {
        self.default_file_fields = fields.into();
        self
    }

    /// Replaces the reader-address domain allow-list.
    pub fn reader_domain_allowlist<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reader_domain_allowlist = domains.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the upload URL.
    pub fn upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = Some(url.into());
        self
    }

    /// Sets the OAuth2 token endpoint.
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> DriveResult<DriveConfig> {
        let service_account_email = self.service_account_email.ok_or_else(|| {
            DriveError::configuration("Service account email is required")
        })?;

        let application_name = self
            .application_name
            .unwrap_or_else(|| format!("gdrive-service/{}", env!("CARGO_PKG_VERSION")));

        let base_url = parse_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        let upload_url = parse_url(self.upload_url.as_deref().unwrap_or(DEFAULT_UPLOAD_URL))?;

        let config = DriveConfig {
            service_account_email,
            key_path: self.key_path,
            application_name,
            scope: self.scope,
            app_folder_id: self.app_folder_id,
            default_file_fields: self.default_file_fields,
            reader_domain_allowlist: self.reader_domain_allowlist,
            base_url,
            upload_url,
            token_url: self.token_url,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
        };

        config.validate()?;

        Ok(config)
    }
}

impl Default for DriveConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_url(raw: &str) -> DriveResult<Url> {
    Url::parse(raw)
        .map_err(|e| DriveError::configuration(format!("Invalid URL '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DriveConfig::builder()
            .service_account_email("svc@project.iam.gserviceaccount.com")
            .key_path("/etc/keys/drive.pem")
            .build()
            .unwrap();

        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.upload_url.as_str(), DEFAULT_UPLOAD_URL);
        assert_eq!(config.scope, scopes::DRIVE);
        assert_eq!(config.app_folder_id, "root");
        assert_eq!(config.default_file_fields, DEFAULT_FILE_FIELDS);
        assert_eq!(
            config.reader_domain_allowlist,
            vec!["gmail.com".to_string(), "p-r.com.pl".to_string()]
        );
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert!(config.application_name.starts_with("gdrive-service/"));
    }

    #[test]
    fn test_custom_config() {
        let config = DriveConfig::builder()
            .service_account_email("svc@project.iam.gserviceaccount.com")
            .application_name("inventory-backend")
            .app_folder_id("folder123")
            .reader_domain_allowlist(["example.org"])
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(config.application_name, "inventory-backend");
        assert_eq!(config.app_folder_id, "folder123");
        assert_eq!(config.reader_domain_allowlist, vec!["example.org"]);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.key_path.is_none());
    }

    #[test]
    fn test_missing_email() {
        let result = DriveConfig::builder().build();
        assert!(matches!(result, Err(DriveError::Configuration(_))));
    }

    #[test]
    fn test_email_must_look_like_address() {
        let result = DriveConfig::builder()
            .service_account_email("not-an-email")
            .build();
        assert!(matches!(result, Err(DriveError::Configuration(_))));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = DriveConfig::builder()
            .service_account_email("svc@project.iam.gserviceaccount.com")
            .base_url("not a url")
            .build();
        assert!(matches!(result, Err(DriveError::Configuration(_))));
    }

    #[test]
    fn test_empty_scope_rejected() {
        let result = DriveConfig::builder()
            .service_account_email("svc@project.iam.gserviceaccount.com")
            .scope("")
            .build();
        assert!(matches!(result, Err(DriveError::Configuration(_))));
    }
}
