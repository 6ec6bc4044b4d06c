//! Typed client for the chessevo backend API

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::gateway::{ApiGateway, SessionExpiredHook};
use crate::session::SessionStore;
use crate::traits::AnalysisService;
use crate::types::{
    Analysis, AnalysisListPayload, AnalysisStatusInfo, CreateAnalysisRequest, OpponentReport,
    UserProfile,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    user: UserProfile,
    token: String,
}

/// Network client for the auth and analysis endpoints
pub struct AnalysisClient {
    gateway: ApiGateway,
}

impl AnalysisClient {
    /// Build a client from configuration and an injected session store.
    pub fn new(config: &ClientConfig, session: SessionStore) -> ApiResult<Self> {
        let gateway = ApiGateway::new(config, session)?;
        Ok(Self { gateway })
    }

    /// Register the hook fired when the server rejects the session.
    pub fn with_session_expired_hook(mut self, hook: SessionExpiredHook) -> Self {
        self.gateway = self.gateway.with_session_expired_hook(hook);
        self
    }

    /// The session store backing this client.
    pub fn session(&self) -> &SessionStore {
        self.gateway.session()
    }

    /// Register a new account and store the returned session.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<UserProfile> {
        let body = RegisterRequest {
            username,
            email,
            password,
        };
        let resp: AuthResponse = self.gateway.post_json("/auth/register/", &body).await?;
        self.gateway
            .session()
            .set_session(resp.token, Some(resp.user.clone()));
        info!(username = %resp.user.username, "registered");
        Ok(resp.user)
    }

    /// Log in and store the returned session.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<UserProfile> {
        let body = LoginRequest { username, password };
        let resp: AuthResponse = self.gateway.post_json("/auth/login/", &body).await?;
        self.gateway
            .session()
            .set_session(resp.token, Some(resp.user.clone()));
        info!(username = %resp.user.username, "logged in");
        Ok(resp.user)
    }

    /// Log out and clear the stored session regardless of the server
    /// outcome. A 401 means the token was already dead, which is as good
    /// as a logout.
    pub async fn logout(&self) -> ApiResult<()> {
        let result = self.gateway.post_empty("/auth/logout/").await;
        self.gateway.session().clear();
        match result {
            Err(ApiError::Auth) => Ok(()),
            other => other,
        }
    }

    /// Fetch the account profile and refresh the cached copy.
    pub async fn get_profile(&self) -> ApiResult<UserProfile> {
        let profile: UserProfile = self.gateway.get_json("/auth/profile/").await?;
        self.gateway.session().update_user(profile.clone());
        Ok(profile)
    }

    /// Start a new analysis.
    ///
    /// This initiates billed server-side work. It is the one non-idempotent
    /// operation of the API and is never retried here; re-submission is an
    /// explicit user decision.
    pub async fn create_analysis(&self, request: &CreateAnalysisRequest) -> ApiResult<Analysis> {
        // The create endpoint answers with a partial payload (id, status,
        // echo of the inputs); the Analysis type tolerates the missing
        // result fields.
        let analysis: Analysis = self.gateway.post_json("/analysis/create/", request).await?;
        info!(id = %analysis.id, "analysis created");
        Ok(analysis.normalize())
    }

    /// List the authenticated user's analyses, newest first as the backend
    /// orders them.
    pub async fn list_my_analyses(&self) -> ApiResult<Vec<Analysis>> {
        let payload: AnalysisListPayload = self.gateway.get_json("/analysis/my-analyses/").await?;
        Ok(payload
            .into_vec()
            .into_iter()
            .map(Analysis::normalize)
            .collect())
    }

    /// Fetch one analysis in full.
    pub async fn get_analysis(&self, id: Uuid) -> ApiResult<Analysis> {
        let analysis: Analysis = self.gateway.get_json(&format!("/analysis/{id}/")).await?;
        Ok(analysis.normalize())
    }

    /// Fetch the status projection for one analysis.
    pub async fn get_analysis_status(&self, id: Uuid) -> ApiResult<AnalysisStatusInfo> {
        self.gateway.get_json(&format!("/analysis/{id}/status/")).await
    }

    /// Fetch the opponent-rating breakdown for one analysis.
    pub async fn get_opponent_ratings(&self, id: Uuid) -> ApiResult<OpponentReport> {
        self.gateway
            .get_json(&format!("/analysis/{id}/opponents/"))
            .await
    }
}

#[async_trait]
impl AnalysisService for AnalysisClient {
    async fn create_analysis(&mut self, request: CreateAnalysisRequest) -> ApiResult<Analysis> {
        AnalysisClient::create_analysis(self, &request).await
    }

    async fn list_my_analyses(&mut self) -> ApiResult<Vec<Analysis>> {
        AnalysisClient::list_my_analyses(self).await
    }

    async fn get_analysis(&mut self, id: Uuid) -> ApiResult<Analysis> {
        AnalysisClient::get_analysis(self, id).await
    }

    async fn get_analysis_status(&mut self, id: Uuid) -> ApiResult<AnalysisStatusInfo> {
        AnalysisClient::get_analysis_status(self, id).await
    }
}
