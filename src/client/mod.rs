//! Drive API client.

use crate::auth::{AuthProvider, ServiceAccountProvider};
use crate::config::DriveConfig;
use crate::errors::{DriveError, DriveResult};
use crate::facade::DriveFacade;
use crate::services::{FilesService, PermissionsService};
use crate::transport::ReqwestTransport;
use std::sync::Arc;

mod executor;
pub use executor::RequestExecutor;

/// Long-lived Drive client handle.
///
/// Constructed once at process start and shared from then on; cloning is
/// cheap and clones share the transport, the auth provider, and its token
/// cache.
///
/// # Example
///
/// ```no_run
/// use gdrive_service::{DriveClient, DriveConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DriveConfig::builder()
///     .service_account_email("svc@project.iam.gserviceaccount.com")
///     .key_path("/etc/keys/drive.pem")
///     .application_name("inventory-backend")
///     .build()?;
///
/// let client = DriveClient::connect(config).await?;
/// let facade = client.facade();
/// # Ok(())
/// # }
/// ```
pub struct DriveClient {
    config: DriveConfig,
    executor: Arc<RequestExecutor>,
}

impl Clone for DriveClient {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            executor: self.executor.clone(),
        }
    }
}

impl DriveClient {
    /// Creates a client from configuration, reading the service-account key
    /// from the configured key path.
    pub async fn connect(config: DriveConfig) -> DriveResult<Self> {
        config.validate()?;

        let key_path = config.key_path.clone().ok_or_else(|| {
            DriveError::configuration("Key path is required to connect")
        })?;

        let auth = ServiceAccountProvider::from_key_file(
            config.service_account_email.clone(),
            key_path,
            vec![config.scope.clone()],
        )
        .await?
        .with_token_url(config.token_url.clone());

        Self::with_auth_provider(config, Arc::new(auth))
    }

    /// Creates a client with an externally supplied auth provider.
    ///
    /// Useful when token acquisition is handled elsewhere, and in tests.
    pub fn with_auth_provider(
        config: DriveConfig,
        auth: Arc<dyn AuthProvider>,
    ) -> DriveResult<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| {
                DriveError::configuration(format!("Failed to create HTTP client: {}", e))
            })?;
        let transport = Arc::new(ReqwestTransport::new(http_client));

        let executor = Arc::new(RequestExecutor::new(config.clone(), transport, auth));

        Ok(Self { config, executor })
    }

    /// Access the files service for raw file operations.
    pub fn files(&self) -> FilesService {
        FilesService::new(self.executor.clone())
    }

    /// Access the permissions service for raw permission operations.
    pub fn permissions(&self) -> PermissionsService {
        PermissionsService::new(self.executor.clone())
    }

    /// Returns the service facade most callers should use.
    pub fn facade(&self) -> DriveFacade {
        DriveFacade::new(self.clone())
    }

    /// Gets the configuration.
    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// Gets the base URL for the API.
    pub fn base_url(&self) -> &str {
        self.config.base_url.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AccessToken;
    use crate::errors::AuthError;

    struct NoAuth;

    #[async_trait::async_trait]
    impl AuthProvider for NoAuth {
        async fn get_access_token(&self) -> Result<AccessToken, AuthError> {
            unimplemented!()
        }

        async fn refresh_token(&self) -> Result<AccessToken, AuthError> {
            unimplemented!()
        }
    }

    #[test]
    fn test_client_with_auth_provider() {
        let config = DriveConfig::builder()
            .service_account_email("svc@project.iam.gserviceaccount.com")
            .build()
            .unwrap();

        let client = DriveClient::with_auth_provider(config, Arc::new(NoAuth));
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_connect_requires_key_path() {
        let config = DriveConfig::builder()
            .service_account_email("svc@project.iam.gserviceaccount.com")
            .build()
            .unwrap();

        let result = DriveClient::connect(config).await;
        assert!(matches!(result, Err(DriveError::Configuration(_))));
    }
}
