//! Candidate search endpoints for companies and recruiters

use crate::client::{ApiClient, RequestOptions};
use crate::endpoints::Page;
use crate::error::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub id: u64,
    pub name: String,
    pub headline: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    pub query: Option<String>,
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub page: Option<u32>,
}

impl CandidateFilter {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(q) = &self.query {
            query.push(("q".to_string(), q.clone()));
        }
        for skill in &self.skills {
            query.push(("skill".to_string(), skill.clone()));
        }
        if let Some(location) = &self.location {
            query.push(("location".to_string(), location.clone()));
        }
        if let Some(page) = self.page {
            query.push(("page".to_string(), page.to_string()));
        }
        query
    }
}

pub struct CandidatesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CandidatesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// GET /candidates
    pub async fn search(&self, filter: &CandidateFilter) -> Result<Page<Candidate>> {
        let options = RequestOptions {
            query: filter.to_query(),
            ..Default::default()
        };
        self.client.get_json_with("/candidates", options).await
    }

    /// GET /candidates/{id}
    pub async fn get(&self, id: u64) -> Result<Candidate> {
        self.client.get_json(&format!("/candidates/{id}")).await
    }

    /// POST /candidates/{id}/shortlist
    pub async fn shortlist(&self, id: u64) -> Result<()> {
        self.client
            .post_empty(&format!("/candidates/{id}/shortlist"))
            .await
            .map(|_| ())
    }

    /// GET /candidates/shortlisted
    pub async fn shortlisted(&self) -> Result<Vec<Candidate>> {
        self.client.get_json("/candidates/shortlisted").await
    }
}
