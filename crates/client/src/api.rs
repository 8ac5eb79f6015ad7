//! Typed access to the SleepDash REST API.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use sleepdash_core::sounds::Sound;
use sleepdash_core::users::User;
use sleepdash_shared::{AdminLoginResponse, AdminProfile};
use tracing::{debug, info};

use crate::error::ClientError;
use crate::session::{AdminSession, SessionContext};

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    /// `ok` when the backend is up.
    pub status: String,
    /// Status line.
    #[serde(default)]
    pub message: String,
    /// Backend version.
    #[serde(default)]
    pub version: Option<String>,
}

/// HTTP client bound to a base URL and an admin session.
///
/// Requests carry `Authorization: Bearer` only while the session holds a
/// token. No request-level timeout is set here; callers bound each call.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionContext>,
}

impl ApiClient {
    /// Creates a client for `base_url`, such as `http://127.0.0.1:8080/api`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Network` if the HTTP client cannot be built.
    pub fn new(base_url: &str, session: Arc<SessionContext>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("sleepdash-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// The session this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self.http.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = check_status(builder.send().await?).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Malformed(e.to_string()))
    }

    /// `GET /dashboard/stats` as untyped JSON, for lenient transformation.
    pub async fn dashboard_stats_raw(&self) -> Result<Value, ClientError> {
        self.send(self.request(Method::GET, "dashboard/stats")).await
    }

    /// `GET /users`.
    ///
    /// Accepts either a bare array or a `{users, total}` page. Records
    /// without a usable id are skipped.
    pub async fn users(&self) -> Result<Vec<User>, ClientError> {
        let raw: Value = self.send(self.request(Method::GET, "users")).await?;
        let records = match &raw {
            Value::Array(items) => items,
            Value::Object(obj) => obj
                .get("users")
                .and_then(Value::as_array)
                .ok_or_else(|| ClientError::Malformed("missing users array".to_string()))?,
            _ => return Err(ClientError::Malformed("expected users list".to_string())),
        };

        let now = Utc::now();
        let users: Vec<User> = records.iter().filter_map(|r| User::from_raw(r, now)).collect();
        if users.len() < records.len() {
            debug!(skipped = records.len() - users.len(), "Skipped user records without id");
        }
        Ok(users)
    }

    /// `GET /sounds`.
    pub async fn sounds(&self) -> Result<Vec<Sound>, ClientError> {
        self.send(self.request(Method::GET, "sounds")).await
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.send(self.request(Method::GET, "health")).await
    }

    /// `POST /admin/login`. On success the session is established and
    /// persisted.
    pub async fn admin_login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AdminProfile, ClientError> {
        let body = json!({ "email": email, "password": password });
        let response: AdminLoginResponse = self
            .send(self.http.post(format!("{}/admin/login", self.base_url)).json(&body))
            .await?;
        if !response.success || response.token.is_empty() {
            return Err(ClientError::Malformed("login response without token".to_string()));
        }

        let expires_at = expiry_after(response.expires_in);
        let profile = response.admin.clone();
        self.session
            .establish(AdminSession {
                token: response.token,
                profile: response.admin,
                expires_at,
            })
            .await?;

        info!(email = %profile.email, role = %profile.role, "Operator signed in");
        Ok(profile)
    }

    /// Ends the session. Later requests carry no Authorization header.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.session.logout().await?;
        Ok(())
    }
}

/// `None` when the server sent no positive lifetime or one too large to
/// represent, in which case the session never expires locally.
fn expiry_after(expires_in: i64) -> Option<DateTime<Utc>> {
    if expires_in <= 0 {
        return None;
    }
    TimeDelta::try_seconds(expires_in).and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemorySessionStore, SessionStore};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(
            &format!("{}/api/", server.uri()),
            Arc::new(SessionContext::in_memory()),
        )
        .unwrap()
    }

    fn login_body() -> Value {
        json!({
            "success": true,
            "token": "jwt-abc",
            "admin": {
                "id": "admin",
                "email": "admin@admin.com",
                "name": "Administrator",
                "role": "super-admin"
            },
            "expiresIn": 28800
        })
    }

    #[tokio::test]
    async fn test_dashboard_stats_raw() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalUsers": 500 })))
            .mount(&server)
            .await;

        let raw = client(&server).await.dashboard_stats_raw().await.unwrap();
        assert_eq!(raw["totalUsers"], 500);
    }

    #[tokio::test]
    async fn test_error_status_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/stats"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "missing_token",
                "message": "Authorization header with Bearer token is required"
            })))
            .mount(&server)
            .await;

        let err = client(&server).await.dashboard_stats_raw().await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(err.to_string().contains("Bearer token is required"));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server).await.health().await.unwrap_err();
        assert!(matches!(err, ClientError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_users_accepts_both_shapes() {
        let id = "0190d4a6-8d2f-7c3a-9b1e-2f4a6c8e0b1d";
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": [{ "_id": id, "name": "Sarah" }, { "name": "no id" }],
                "total": 2
            })))
            .mount(&server)
            .await;

        let users = client(&server).await.users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Sarah");

        server.reset().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": id }])))
            .mount(&server)
            .await;

        let users = client(&server).await.users().await.unwrap();
        assert_eq!(users[0].name, "Unknown User");
    }

    #[tokio::test]
    async fn test_login_sets_bearer_and_logout_removes_it() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/login"))
            .and(body_json(json!({ "email": "admin@admin.com", "password": "admin123" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/stats"))
            .and(header("authorization", "Bearer jwt-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalUsers": 1 })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/stats"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client(&server).await;
        assert!(client.dashboard_stats_raw().await.unwrap_err().is_unauthorized());

        let profile = client.admin_login("admin@admin.com", "admin123").await.unwrap();
        assert_eq!(profile.name, "Administrator");
        assert!(client.session().is_authenticated());
        assert_eq!(client.dashboard_stats_raw().await.unwrap()["totalUsers"], 1);

        client.logout().await.unwrap();
        assert!(client.dashboard_stats_raw().await.is_err());

        let requests = server.received_requests().await.unwrap();
        let last = requests.last().unwrap();
        assert!(!last.headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_huge_expiry_means_no_expiry() {
        let server = MockServer::start().await;
        let mut body = login_body();
        body["expiresIn"] = json!(i64::MAX);
        Mock::given(method("POST"))
            .and(path("/api/admin/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let store = Arc::new(MemorySessionStore::new());
        let client = ApiClient::new(
            &format!("{}/api", server.uri()),
            Arc::new(SessionContext::new(store.clone())),
        )
        .unwrap();
        client.admin_login("admin@admin.com", "admin123").await.unwrap();

        assert!(client.session().is_authenticated());
        let stored = store.load().await.unwrap().unwrap();
        assert_eq!(stored.token, "jwt-abc");
        assert_eq!(stored.expires_at, None);
    }

    #[test]
    fn test_expiry_after() {
        assert!(expiry_after(0).is_none());
        assert!(expiry_after(-5).is_none());
        assert!(expiry_after(i64::MAX).is_none());
        let at = expiry_after(3600).unwrap();
        assert!(at > Utc::now() + TimeDelta::minutes(59));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "unauthorized",
                "message": "Invalid email or password"
            })))
            .mount(&server)
            .await;

        let client = client(&server).await;
        let err = client.admin_login("admin@admin.com", "nope").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(!client.session().is_authenticated());
    }
}
