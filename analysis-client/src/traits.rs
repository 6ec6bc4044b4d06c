//! AnalysisService trait abstraction for client implementations

use crate::error::ApiResult;
use crate::types::{Analysis, AnalysisStatusInfo, CreateAnalysisRequest};
use async_trait::async_trait;
use uuid::Uuid;

/// Analysis-lifecycle interface
/// Implemented by both the real AnalysisClient and MockAnalysisService
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Start a new analysis. Billed: implementations must not retry on
    /// their own, and callers must only re-submit on explicit user intent.
    async fn create_analysis(&mut self, request: CreateAnalysisRequest) -> ApiResult<Analysis>;

    /// List the authenticated user's analyses, backend ordering preserved.
    async fn list_my_analyses(&mut self) -> ApiResult<Vec<Analysis>>;

    /// Fetch one analysis in full.
    async fn get_analysis(&mut self, id: Uuid) -> ApiResult<Analysis>;

    /// Fetch the lightweight status projection, intended for polling.
    async fn get_analysis_status(&mut self, id: Uuid) -> ApiResult<AnalysisStatusInfo>;
}
