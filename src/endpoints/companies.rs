//! Company profile and team endpoints

use crate::client::ApiClient;
use crate::endpoints::jobs::Job;
use crate::endpoints::Page;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Company {
    pub id: u64,
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub about: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub about: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamMember {
    pub id: u64,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
}

pub struct CompaniesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CompaniesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// GET /companies/{id}
    pub async fn get(&self, id: u64) -> Result<Company> {
        self.client.get_json(&format!("/companies/{id}")).await
    }

    /// PUT /companies/{id}
    pub async fn update(&self, id: u64, update: &CompanyUpdate) -> Result<Company> {
        self.client
            .put_json(&format!("/companies/{id}"), update)
            .await
    }

    /// GET /companies/{id}/jobs
    pub async fn jobs(&self, id: u64) -> Result<Page<Job>> {
        self.client.get_json(&format!("/companies/{id}/jobs")).await
    }

    /// GET /companies/{id}/members
    pub async fn team_members(&self, id: u64) -> Result<Vec<TeamMember>> {
        self.client
            .get_json(&format!("/companies/{id}/members"))
            .await
    }

    /// POST /companies/{id}/members
    pub async fn invite_member(&self, id: u64, email: &str, role: &str) -> Result<TeamMember> {
        let body = serde_json::json!({ "email": email, "role": role });
        self.client
            .post_json(&format!("/companies/{id}/members"), &body)
            .await
    }
}
