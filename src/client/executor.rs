//! Request executor with authentication and error mapping.

use crate::auth::AuthProvider;
use crate::config::DriveConfig;
use crate::errors::{DriveError, DriveResult};
use crate::transport::{ByteStream, HttpMethod, HttpRequest, HttpTransport, RequestBody};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Characters escaped when a value is embedded as a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Executes API requests: builds URLs, attaches the bearer token and user
/// agent, sends through the transport, and maps error responses to
/// [`DriveError`].
pub struct RequestExecutor {
    config: DriveConfig,
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
}

impl RequestExecutor {
    /// Creates a new request executor.
    pub fn new(
        config: DriveConfig,
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            config,
            transport,
            auth,
        }
    }

    /// Returns the configuration the executor was built with.
    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// Percent-encodes a value for use as a URL path segment.
    pub fn encode_path_segment(segment: &str) -> String {
        utf8_percent_encode(segment, PATH_SEGMENT).to_string()
    }

    /// Builds a full API URL from a path and query parameters.
    pub fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> DriveResult<Url> {
        Self::join(&self.config.base_url, path, query)
    }

    /// Builds a full upload URL from a path and query parameters.
    pub fn upload_endpoint(&self, path: &str, query: &[(&str, &str)]) -> DriveResult<Url> {
        Self::join(&self.config.upload_url, path, query)
    }

    // Url::join would treat the base path as a file and drop its last
    // segment, so the path is appended textually instead.
    fn join(base: &Url, path: &str, query: &[(&str, &str)]) -> DriveResult<Url> {
        let mut raw = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );

        if !query.is_empty() {
            let encoded = serde_urlencoded::to_string(query)
                .map_err(|e| DriveError::response(format!("Invalid query string: {}", e)))?;
            raw.push('?');
            raw.push_str(&encoded);
        }

        Url::parse(&raw)
            .map_err(|e| DriveError::invalid_argument(format!("Invalid request URL: {}", e)))
    }

    /// Executes a request and deserializes the JSON response.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        url: Url,
        body: RequestBody,
    ) -> DriveResult<T> {
        let response = self.execute_raw(method, url, body).await?;

        serde_json::from_slice(&response)
            .map_err(|e| DriveError::response(format!("Failed to deserialize response: {}", e)))
    }

    /// Executes a request whose response body is ignored.
    pub async fn execute_empty(
        &self,
        method: HttpMethod,
        url: Url,
        body: RequestBody,
    ) -> DriveResult<()> {
        self.execute_raw(method, url, body).await?;
        Ok(())
    }

    async fn execute_raw(
        &self,
        method: HttpMethod,
        url: Url,
        body: RequestBody,
    ) -> DriveResult<bytes::Bytes> {
        debug!(method = ?method, url = %url, "Executing Drive API request");

        let request = self.build_request(method, url, body).await?;
        let response = self.transport.send(request).await?;

        if !response.status.is_success() {
            return Err(self.handle_error_response(response.status, &response.body));
        }

        Ok(response.body)
    }

    /// Executes a request and returns the response body as a stream.
    pub async fn execute_streaming(
        &self,
        method: HttpMethod,
        url: Url,
    ) -> DriveResult<ByteStream> {
        debug!(method = ?method, url = %url, "Executing streaming Drive API request");

        let request = self.build_request(method, url, RequestBody::Empty).await?;
        let response = self.transport.send_streaming(request).await?;

        if !response.status.is_success() {
            let body = response.stream.collect().await.unwrap_or_default();
            return Err(self.handle_error_response(response.status, &body));
        }

        Ok(response.stream)
    }

    async fn build_request(
        &self,
        method: HttpMethod,
        url: Url,
        body: RequestBody,
    ) -> DriveResult<HttpRequest> {
        let token = self.auth.get_access_token().await?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&token.authorization_header())
                .map_err(|e| DriveError::invalid_argument(format!("Invalid auth header: {}", e)))?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.config.application_name).map_err(|e| {
                DriveError::configuration(format!("Application name is not a valid header: {}", e))
            })?,
        );

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
            timeout: Some(self.config.timeout),
        })
    }

    /// Maps an error response to a domain error.
    ///
    /// The backend reports errors as `{"error": {"code", "message",
    /// "errors": [{"reason", ...}]}}`; the first reason is carried along
    /// when present.
    fn handle_error_response(&self, status: StatusCode, body: &[u8]) -> DriveError {
        #[derive(serde::Deserialize)]
        struct ErrorResponse {
            error: ErrorDetail,
        }

        #[derive(serde::Deserialize)]
        struct ErrorDetail {
            message: String,
            #[serde(default)]
            errors: Vec<ErrorItem>,
        }

        #[derive(serde::Deserialize)]
        struct ErrorItem {
            reason: Option<String>,
        }

        let parsed: Option<ErrorResponse> = serde_json::from_slice(body).ok();

        let (message, reason) = match parsed {
            Some(response) => {
                let reason = response
                    .error
                    .errors
                    .into_iter()
                    .find_map(|item| item.reason);
                (response.error.message, reason)
            }
            None => (
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    String::from_utf8_lossy(body)
                ),
                None,
            ),
        };

        if status == StatusCode::NOT_FOUND {
            return DriveError::NotFound(message);
        }

        DriveError::Api {
            status: status.as_u16(),
            reason,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AccessToken, AuthProvider};
    use crate::errors::AuthError;
    use crate::transport::ReqwestTransport;
    use serde_json::json;

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

    fn test_executor() -> RequestExecutor {
        let config = DriveConfig::builder()
            .service_account_email("svc@project.iam.gserviceaccount.com")
            .build()
            .unwrap();
        let transport = Arc::new(ReqwestTransport::new(reqwest::Client::new()));
        RequestExecutor::new(config, transport, Arc::new(NoAuth))
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let executor = test_executor();

        let url = executor.endpoint("files", &[]).unwrap();
        assert_eq!(url.as_str(), "https://www.googleapis.com/drive/v3/files");

        let url = executor.endpoint("/files/abc123", &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/drive/v3/files/abc123"
        );

        let url = executor.upload_endpoint("files", &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/upload/drive/v3/files"
        );
    }

    #[test]
    fn test_endpoint_encodes_query() {
        let executor = test_executor();

        let url = executor
            .endpoint(
                "files",
                &[("q", "'root' in parents"), ("fields", "files(id,name)")],
            )
            .unwrap();

        assert_eq!(url.path(), "/drive/v3/files");
        let query = url.query().unwrap();
        assert!(query.contains("q=%27root%27+in+parents"));
        assert!(query.contains("fields=files%28id%2Cname%29"));
    }

    #[test]
    fn test_path_segment_encoding() {
        assert_eq!(
            RequestExecutor::encode_path_segment("abc/../x y"),
            "abc%2F..%2Fx%20y"
        );
        assert_eq!(RequestExecutor::encode_path_segment("a-b_c.d"), "a-b_c.d");
    }

    #[test]
    fn test_error_mapping_not_found() {
        let executor = test_executor();
        let body = serde_json::to_vec(&json!({
            "error": {
                "code": 404,
                "message": "File not found: abc123",
                "errors": [{"reason": "notFound"}]
            }
        }))
        .unwrap();

        let error = executor.handle_error_response(StatusCode::NOT_FOUND, &body);
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Not found: File not found: abc123");
    }

    #[test]
    fn test_error_mapping_carries_reason() {
        let executor = test_executor();
        let body = serde_json::to_vec(&json!({
            "error": {
                "code": 403,
                "message": "Rate limit exceeded",
                "errors": [{"reason": "userRateLimitExceeded"}]
            }
        }))
        .unwrap();

        let error = executor.handle_error_response(StatusCode::FORBIDDEN, &body);
        match error {
            DriveError::Api {
                status,
                reason,
                message,
            } => {
                assert_eq!(status, 403);
                assert_eq!(reason.as_deref(), Some("userRateLimitExceeded"));
                assert_eq!(message, "Rate limit exceeded");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_mapping_tolerates_non_json_body() {
        let executor = test_executor();
        let error =
            executor.handle_error_response(StatusCode::INTERNAL_SERVER_ERROR, b"upstream blew up");

        match error {
            DriveError::Api {
                status, message, ..
            } => {
                assert_eq!(status, 500);
                assert!(message.contains("upstream blew up"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
