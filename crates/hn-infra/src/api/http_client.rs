//! HTTP client for the customer backend.
//!
//! 客户后端的 HTTP 适配器。
//!
//! The wire format is the serde shape of the core types themselves, so
//! this adapter carries no DTO layer. Routes:
//!
//! ```text
//! POST /auth/login                  credentials -> AuthSession
//! GET  /customers/me                -> UserProfile
//! POST /devices/push-token          PushTokenRegistration -> 2xx
//! GET  /notifications               -> [NotificationRecord], newest first
//! POST /notifications/{id}/read     -> 2xx
//! ```
//!
//! The bearer token comes through [`AccessTokenProviderPort`] on every
//! authenticated call, never from a field on this struct, so a login or
//! logout changes what the next request sends without rebuilding the
//! client.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use hn_core::auth::{AuthSession, LoginCredentials, UserProfile};
use hn_core::config::ApiConfig;
use hn_core::notification::NotificationRecord;
use hn_core::ports::{AccessTokenProviderPort, ApiClientPort, ApiError, PushTokenRegistration};

pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn AccessTokenProviderPort>,
}

impl HttpApiClient {
    pub fn new(
        config: &ApiConfig,
        tokens: Arc<dyn AccessTokenProviderPort>,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn bearer(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.tokens.access_token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Map a transport-level failure. Body-decoding failures keep their own
/// variant so callers can tell a flaky network from a broken contract.
fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}

/// Turn a non-success status into the matching [`ApiError`]. Consumes the
/// response body for the status message.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}

#[async_trait]
impl ApiClientPort for HttpApiClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, ApiError> {
        debug!("POST /auth/login");
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check(response).await?;
        response.json().await.map_err(transport_error)
    }

    async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        debug!("GET /customers/me");
        let request = self.bearer(self.http.get(self.url("/customers/me"))).await;
        let response = request.send().await.map_err(transport_error)?;
        let response = check(response).await?;
        response.json().await.map_err(transport_error)
    }

    async fn register_push_token(
        &self,
        registration: &PushTokenRegistration,
    ) -> Result<(), ApiError> {
        debug!(user_id = %registration.user_id, "POST /devices/push-token");
        let request = self
            .bearer(self.http.post(self.url("/devices/push-token")))
            .await
            .json(registration);
        let response = request.send().await.map_err(transport_error)?;
        check(response).await?;
        Ok(())
    }

    async fn fetch_notifications(&self) -> Result<Vec<NotificationRecord>, ApiError> {
        debug!("GET /notifications");
        let request = self.bearer(self.http.get(self.url("/notifications"))).await;
        let response = request.send().await.map_err(transport_error)?;
        let response = check(response).await?;
        response.json().await.map_err(transport_error)
    }

    async fn mark_notification_read(&self, id: &str) -> Result<(), ApiError> {
        debug!(notification_id = %id, "POST /notifications/read");
        let path = format!("/notifications/{id}/read");
        let request = self.bearer(self.http.post(self.url(&path))).await;
        let response = request.send().await.map_err(transport_error)?;
        check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_core::ids::UserId;
    use mockito::Matcher;

    struct StaticTokens(Option<String>);

    #[async_trait]
    impl AccessTokenProviderPort for StaticTokens {
        async fn access_token(&self) -> Option<String> {
            self.0.clone()
        }
    }

    fn client(base_url: String, token: Option<&str>) -> HttpApiClient {
        let config = ApiConfig {
            base_url,
            timeout_secs: 5,
        };
        HttpApiClient::new(&config, Arc::new(StaticTokens(token.map(String::from)))).unwrap()
    }

    #[tokio::test]
    async fn test_login_posts_credentials_and_maps_the_session() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login")
            .match_body(Matcher::JsonString(
                r#"{"document": "12345678", "password": "hunter2"}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "accessToken": "tok-1",
                    "expiresInSecs": 3600,
                    "profile": {"id": "u-1", "displayName": "Ana", "email": "ana@example.com"}
                }"#,
            )
            .create_async()
            .await;

        let api = client(server.url(), None);
        let session = api
            .login(&LoginCredentials::new("12345678", "hunter2"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(session.access_token, "tok-1");
        assert_eq!(session.expires_in_secs, 3600);
        assert_eq!(session.profile.id, UserId::from("u-1"));
        assert_eq!(session.profile.email.as_deref(), Some("ana@example.com"));
    }

    #[tokio::test]
    async fn test_rejected_login_is_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/login")
            .with_status(401)
            .create_async()
            .await;

        let api = client(server.url(), None);
        let err = api
            .login(&LoginCredentials::new("12345678", "wrong"))
            .await
            .unwrap_err();
        assert!(err.is_auth_failure());
    }

    #[tokio::test]
    async fn test_profile_fetch_sends_the_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/customers/me")
            .match_header("authorization", "Bearer tok-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "u-1", "displayName": "Ana"}"#)
            .create_async()
            .await;

        let api = client(server.url(), Some("tok-1"));
        let profile = api.fetch_profile().await.unwrap();

        mock.assert_async().await;
        assert_eq!(profile.display_name, "Ana");
        assert!(profile.email.is_none());
    }

    #[tokio::test]
    async fn test_expired_session_surfaces_as_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/customers/me")
            .with_status(401)
            .create_async()
            .await;

        let api = client(server.url(), Some("stale"));
        let err = api.fetch_profile().await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn test_token_registration_posts_the_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/devices/push-token")
            .match_header("authorization", "Bearer tok-1")
            .match_body(Matcher::JsonString(
                r#"{"userId": "u-1", "token": "fcm-1"}"#.to_string(),
            ))
            .with_status(204)
            .create_async()
            .await;

        let api = client(server.url(), Some("tok-1"));
        let registration = PushTokenRegistration {
            user_id: UserId::from("u-1"),
            token: "fcm-1".to_string(),
        };
        api.register_push_token(&registration).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_notification_list_feeds_the_inbox_types() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/notifications")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {
                        "id": "n-2",
                        "title": "Outage resolved",
                        "body": "Service is back in your area.",
                        "receivedAt": "2024-05-02T08:30:00Z",
                        "read": false
                    },
                    {
                        "id": "n-1",
                        "title": "Invoice available",
                        "body": "",
                        "payload": {"invoiceId": "42"},
                        "receivedAt": "2024-05-01T10:00:00Z",
                        "read": true
                    }
                ]"#,
            )
            .create_async()
            .await;

        let api = client(server.url(), Some("tok-1"));
        let records = api.fetch_notifications().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_str(), "n-2");
        assert!(!records[0].read);
        assert_eq!(
            records[1].payload.get("invoiceId").map(String::as_str),
            Some("42")
        );
        assert!(records[1].read);
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/notifications")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"not": "a list"}"#)
            .create_async()
            .await;

        let api = client(server.url(), Some("tok-1"));
        let err = api.fetch_notifications().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_server_error_carries_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/notifications")
            .with_status(503)
            .with_body("maintenance window")
            .create_async()
            .await;

        let api = client(server.url(), Some("tok-1"));
        let err = api.fetch_notifications().await.unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance window");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mark_read_hits_the_notification_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/notifications/n-1/read")
            .match_header("authorization", "Bearer tok-1")
            .with_status(204)
            .create_async()
            .await;

        let api = client(server.url(), Some("tok-1"));
        api.mark_notification_read("n-1").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_network_error() {
        let server = mockito::Server::new_async().await;
        let url = server.url();
        drop(server);

        let api = client(url, None);
        let err = api
            .login(&LoginCredentials::new("12345678", "hunter2"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url_is_tolerated() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/customers/me")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "u-1", "displayName": "Ana"}"#)
            .create_async()
            .await;

        let api = client(format!("{}/", server.url()), Some("tok-1"));
        api.fetch_profile().await.unwrap();
        mock.assert_async().await;
    }
}
