//! HTTP gateway: the single point of outbound traffic.
//!
//! Two cross-cutting policies live here, nowhere else:
//! - outbound: attach `Authorization: Token <token>` when the session store
//!   holds a credential; otherwise send unauthenticated and let the server
//!   decide.
//! - inbound: HTTP 401 clears the session store, fires the session-expired
//!   hook, and still surfaces [`ApiError::Auth`] to the caller.
//!
//! The hook replaces in-band navigation: the hosting shell subscribes to
//! "session expired" and decides what to do (prompt, redirect, exit).

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Callback fired when the server rejects the current session.
pub type SessionExpiredHook = Arc<dyn Fn() + Send + Sync>;

pub struct ApiGateway {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    on_session_expired: Option<SessionExpiredHook>,
}

impl ApiGateway {
    pub fn new(config: &ClientConfig, session: SessionStore) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            on_session_expired: None,
        })
    }

    /// Register the hook fired on authentication failure.
    pub fn with_session_expired_hook(mut self, hook: SessionExpiredHook) -> Self {
        self.on_session_expired = Some(hook);
        self
    }

    /// The session store this gateway attaches credentials from.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let resp = self.send(self.http.get(self.url(path))).await?;
        decode(resp).await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let resp = self.send(self.http.post(self.url(path)).json(body)).await?;
        decode(resp).await
    }

    /// POST with no request body, discarding the response body.
    pub async fn post_empty(&self, path: &str) -> ApiResult<()> {
        self.send(self.http.post(self.url(path))).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, req: RequestBuilder) -> ApiResult<Response> {
        let mut req = req.header(CONTENT_TYPE, "application/json");
        if let Some(token) = self.session.token() {
            req = req.header(AUTHORIZATION, format!("Token {token}"));
        }

        let resp = req.send().await?;
        let status = resp.status();
        debug!(status = status.as_u16(), url = %resp.url(), "response");

        if status == StatusCode::UNAUTHORIZED {
            // The credential is dead. Tear the session down so no later
            // request goes out with the stale token, then tell the shell.
            warn!("authentication rejected, clearing session");
            self.session.clear();
            if let Some(hook) = &self.on_session_expired {
                hook();
            }
            return Err(ApiError::Auth);
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_error(status, &body));
        }

        Ok(resp)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> ApiResult<T> {
    resp.json::<T>()
        .await
        .map_err(|e| ApiError::InvalidData(e.to_string()))
}

/// Map a non-401 error status plus response body onto the error taxonomy.
fn classify_error(status: StatusCode, body: &str) -> ApiError {
    match status {
        StatusCode::PAYMENT_REQUIRED => ApiError::PaymentRequired(
            server_message(body).unwrap_or_else(|| "Payment required".to_string()),
        ),
        StatusCode::NOT_FOUND => ApiError::NotFound,
        s if s.is_client_error() => ApiError::Validation(
            server_message(body)
                .unwrap_or_else(|| format!("Request rejected (HTTP {})", s.as_u16())),
        ),
        s => ApiError::Server(s.as_u16()),
    }
}

/// Pull a user-facing message out of an error body.
///
/// The backend answers with `{"message": …}`, `{"detail": …}` or
/// `{"error": …}` depending on the endpoint, and with a field-error map
/// (`{"field": ["msg", …]}`) for validation failures.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    for key in ["message", "detail", "error"] {
        if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
            return Some(msg.to_string());
        }
    }
    if let Some(obj) = value.as_object() {
        for (field, errors) in obj {
            if let Some(first) = errors
                .as_array()
                .and_then(|a| a.first())
                .and_then(|v| v.as_str())
            {
                return Some(format!("{field}: {first}"));
            }
        }
    }
    None
}
