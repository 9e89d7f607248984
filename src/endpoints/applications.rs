//! Job application endpoints

use crate::client::ApiClient;
use crate::endpoints::Page;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Application {
    pub id: u64,
    pub job_id: u64,
    pub candidate_id: u64,
    /// "submitted", "reviewed", "interviewing", "offered", "rejected",
    /// "withdrawn"
    pub status: String,
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub document_ids: Vec<u64>,
    pub submitted_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDraft {
    pub job_id: u64,
    pub cover_letter: Option<String>,
    pub document_ids: Vec<u64>,
}

pub struct ApplicationsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ApplicationsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// POST /applications
    pub async fn submit(&self, draft: &ApplicationDraft) -> Result<Application> {
        self.client.post_json("/applications", draft).await
    }

    /// GET /applications/mine, the current seeker's applications
    pub async fn mine(&self) -> Result<Page<Application>> {
        self.client.get_json("/applications/mine").await
    }

    /// GET /jobs/{job_id}/applications, the inbox for a posted job
    pub async fn for_job(&self, job_id: u64) -> Result<Page<Application>> {
        self.client
            .get_json(&format!("/jobs/{job_id}/applications"))
            .await
    }

    /// GET /applications/{id}
    pub async fn get(&self, id: u64) -> Result<Application> {
        self.client.get_json(&format!("/applications/{id}")).await
    }

    /// PATCH /applications/{id}
    pub async fn update_status(&self, id: u64, status: &str) -> Result<Application> {
        let body = serde_json::json!({ "status": status });
        self.client
            .patch_json(&format!("/applications/{id}"), &body)
            .await
    }

    /// DELETE /applications/{id}
    pub async fn withdraw(&self, id: u64) -> Result<()> {
        self.client
            .delete(&format!("/applications/{id}"))
            .await
            .map(|_| ())
    }
}
