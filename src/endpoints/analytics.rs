//! Analytics endpoints

use crate::client::ApiClient;
use crate::error::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JobStats {
    pub views: u64,
    pub applications: u64,
    pub saves: u64,
}

pub struct AnalyticsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AnalyticsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// GET /analytics/company/{id}. Dashboard payload, shape owned by the
    /// backend
    pub async fn company_dashboard(&self, company_id: u64) -> Result<serde_json::Value> {
        self.client
            .get_json(&format!("/analytics/company/{company_id}"))
            .await
    }

    /// GET /analytics/jobs/{id}
    pub async fn job_stats(&self, job_id: u64) -> Result<JobStats> {
        self.client
            .get_json(&format!("/analytics/jobs/{job_id}"))
            .await
    }

    /// GET /analytics/placements, recruiter placement figures
    pub async fn recruiter_placements(&self) -> Result<serde_json::Value> {
        self.client.get_json("/analytics/placements").await
    }
}
