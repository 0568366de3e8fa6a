//! Shared helpers for integration tests.
//!
//! Every test runs the real client stack against a wiremock server: only
//! authentication is faked, so requests carry the exact paths, queries,
//! and bodies production traffic would.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use gdrive_service::auth::{AccessToken, AuthProvider};
use gdrive_service::errors::AuthError;
use gdrive_service::{DriveClient, DriveConfig, DriveFacade};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

/// Auth provider that hands out a static token without network calls.
pub struct FakeAuth;

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn get_access_token(&self) -> Result<AccessToken, AuthError> {
        Ok(AccessToken::new(
            "test-token",
            "Bearer",
            Utc::now() + Duration::hours(1),
            vec![],
        ))
    }

    async fn refresh_token(&self) -> Result<AccessToken, AuthError> {
        self.get_access_token().await
    }
}

/// Configuration pointing both endpoint URLs at the mock server.
pub fn test_config(server: &MockServer) -> DriveConfig {
    DriveConfig::builder()
        .service_account_email("svc@project.iam.gserviceaccount.com")
        .application_name("gdrive-service-tests")
        .app_folder_id("app-folder")
        .base_url(server.uri())
        .upload_url(server.uri())
        .build()
        .expect("test configuration should build")
}

/// Facade over a client built from the given configuration.
pub fn facade_with(config: DriveConfig) -> DriveFacade {
    DriveClient::with_auth_provider(config, Arc::new(FakeAuth))
        .expect("test client should build")
        .facade()
}

/// Facade with the default test configuration.
pub fn facade_for(server: &MockServer) -> DriveFacade {
    facade_with(test_config(server))
}

/// Minimal file metadata response body.
pub fn file_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "mimeType": "text/plain",
        "trashed": false,
    })
}

/// Permission response body.
pub fn permission_json(id: &str, role: &str, email: &str) -> Value {
    json!({
        "id": id,
        "type": "user",
        "role": role,
        "emailAddress": email,
    })
}

/// Error body in the shape the Drive API produces.
pub fn error_json(code: u16, reason: &str, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message,
            "errors": [{
                "domain": "global",
                "reason": reason,
                "message": message,
            }],
        }
    })
}
