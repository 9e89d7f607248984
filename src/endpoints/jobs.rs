//! Job listing endpoints

use crate::client::{ApiClient, RequestOptions};
use crate::endpoints::Page;
use crate::error::Result;
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    pub title: String,
    pub company_id: u64,
    pub location: Option<String>,
    #[serde(default)]
    pub remote: bool,
    pub employment_type: Option<String>,
    pub salary_min: Option<u64>,
    pub salary_max: Option<u64>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub posted_at: Option<String>,
}

/// Payload for creating or updating a listing
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobDraft {
    pub title: String,
    pub location: Option<String>,
    pub remote: bool,
    pub employment_type: Option<String>,
    pub salary_min: Option<u64>,
    pub salary_max: Option<u64>,
    pub description: String,
}

/// Search filters, sent as query parameters
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub query: Option<String>,
    pub location: Option<String>,
    pub remote: Option<bool>,
    pub employment_type: Option<String>,
    pub salary_min: Option<u64>,
    pub page: Option<u32>,
}

impl JobFilter {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(q) = &self.query {
            query.push(("q".to_string(), q.clone()));
        }
        if let Some(location) = &self.location {
            query.push(("location".to_string(), location.clone()));
        }
        if let Some(remote) = self.remote {
            query.push(("remote".to_string(), remote.to_string()));
        }
        if let Some(employment_type) = &self.employment_type {
            query.push(("employment_type".to_string(), employment_type.clone()));
        }
        if let Some(salary_min) = self.salary_min {
            query.push(("salary_min".to_string(), salary_min.to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page".to_string(), page.to_string()));
        }
        query
    }
}

pub struct JobsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> JobsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// GET /jobs with the filter as query parameters
    pub async fn search(&self, filter: &JobFilter) -> Result<Page<Job>> {
        let options = RequestOptions {
            query: filter.to_query(),
            ..Default::default()
        };
        self.client.get_json_with("/jobs", options).await
    }

    /// GET /jobs/{id}
    pub async fn get(&self, id: u64) -> Result<Job> {
        self.client.get_json(&format!("/jobs/{id}")).await
    }

    /// POST /jobs
    pub async fn create(&self, draft: &JobDraft) -> Result<Job> {
        self.client.post_json("/jobs", draft).await
    }

    /// PUT /jobs/{id}
    pub async fn update(&self, id: u64, draft: &JobDraft) -> Result<Job> {
        self.client.put_json(&format!("/jobs/{id}"), draft).await
    }

    /// DELETE /jobs/{id}
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.client
            .request(
                Method::DELETE,
                &format!("/jobs/{id}"),
                None,
                RequestOptions::default(),
            )
            .await
            .map(|_| ())
    }

    /// GET /jobs/recommended, server-computed matches for the current seeker
    pub async fn recommended(&self) -> Result<Vec<Job>> {
        self.client.get_json("/jobs/recommended").await
    }
}
