//! Mock AnalysisService implementation for testing

use crate::error::{ApiError, ApiResult};
use crate::traits::AnalysisService;
use crate::types::{Analysis, AnalysisStatusInfo, CreateAnalysisRequest};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Mock service for testing - compiled in test mode or with the mock feature
pub struct MockAnalysisService {
    responses: Arc<Mutex<MockResponses>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Default)]
struct MockResponses {
    create_analysis: Option<Box<dyn Fn() -> ApiResult<Analysis> + Send>>,
    list_my_analyses: Option<Box<dyn Fn() -> ApiResult<Vec<Analysis>> + Send>>,
    get_analysis: Option<Box<dyn Fn() -> ApiResult<Analysis> + Send>>,
    get_analysis_status: Option<Box<dyn Fn() -> ApiResult<AnalysisStatusInfo> + Send>>,
}

#[derive(Debug, Clone)]
pub enum MockCall {
    CreateAnalysis { request: CreateAnalysisRequest },
    ListMyAnalyses,
    GetAnalysis { id: Uuid },
    GetAnalysisStatus { id: Uuid },
}

impl Default for MockAnalysisService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAnalysisService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(MockResponses::default())),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Configure create_analysis response
    pub fn with_create_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ApiResult<Analysis> + Send + 'static,
    {
        self.responses.lock().unwrap().create_analysis = Some(Box::new(f));
        self
    }

    /// Configure list_my_analyses response
    pub fn with_list_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ApiResult<Vec<Analysis>> + Send + 'static,
    {
        self.responses.lock().unwrap().list_my_analyses = Some(Box::new(f));
        self
    }

    /// Configure get_analysis response
    pub fn with_get_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ApiResult<Analysis> + Send + 'static,
    {
        self.responses.lock().unwrap().get_analysis = Some(Box::new(f));
        self
    }

    /// Configure get_analysis_status response
    pub fn with_status_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ApiResult<AnalysisStatusInfo> + Send + 'static,
    {
        self.responses.lock().unwrap().get_analysis_status = Some(Box::new(f));
        self
    }

    /// Pre-configure the list response with a fixed set of analyses
    pub fn with_seeded_analyses(self, analyses: Vec<Analysis>) -> Self {
        self.with_list_response(move || Ok(analyses.clone()))
    }

    /// Get recorded calls for verification
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear call history
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }
}

#[async_trait]
impl AnalysisService for MockAnalysisService {
    async fn create_analysis(&mut self, request: CreateAnalysisRequest) -> ApiResult<Analysis> {
        self.call_log
            .lock()
            .unwrap()
            .push(MockCall::CreateAnalysis { request });

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.create_analysis {
            f()
        } else {
            Err(ApiError::NotConfigured("create_analysis".to_string()))
        }
    }

    async fn list_my_analyses(&mut self) -> ApiResult<Vec<Analysis>> {
        self.call_log.lock().unwrap().push(MockCall::ListMyAnalyses);

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.list_my_analyses {
            f()
        } else {
            Err(ApiError::NotConfigured("list_my_analyses".to_string()))
        }
    }

    async fn get_analysis(&mut self, id: Uuid) -> ApiResult<Analysis> {
        self.call_log.lock().unwrap().push(MockCall::GetAnalysis { id });

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.get_analysis {
            f()
        } else {
            Err(ApiError::NotConfigured("get_analysis".to_string()))
        }
    }

    async fn get_analysis_status(&mut self, id: Uuid) -> ApiResult<AnalysisStatusInfo> {
        self.call_log
            .lock()
            .unwrap()
            .push(MockCall::GetAnalysisStatus { id });

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.get_analysis_status {
            f()
        } else {
            Err(ApiError::NotConfigured("get_analysis_status".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_operations_fail_and_are_logged() {
        let mut mock = MockAnalysisService::new();
        let id = Uuid::new_v4();

        let result = tokio_test::block_on(mock.get_analysis(id));
        assert!(matches!(result, Err(ApiError::NotConfigured(_))));

        let calls = mock.get_calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(calls[0], MockCall::GetAnalysis { id: logged } if logged == id));

        mock.clear_calls();
        assert!(mock.get_calls().is_empty());
    }

    #[test]
    fn seeded_list_is_returned() {
        let mut mock = MockAnalysisService::new().with_seeded_analyses(vec![]);
        let list = tokio_test::block_on(mock.list_my_analyses()).unwrap();
        assert!(list.is_empty());
    }
}
