//! Job seeker profile endpoints

use crate::client::ApiClient;
use crate::endpoints::jobs::Job;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub headline: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub resume_document_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub headline: Option<String>,
    pub skills: Option<Vec<String>>,
    pub location: Option<String>,
    pub resume_document_id: Option<u64>,
}

pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// GET /users/profile
    pub async fn profile(&self) -> Result<Profile> {
        self.client.get_json("/users/profile").await
    }

    /// PUT /users/profile
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile> {
        self.client.put_json("/users/profile", update).await
    }

    /// GET /users/saved-jobs
    pub async fn saved_jobs(&self) -> Result<Vec<Job>> {
        self.client.get_json("/users/saved-jobs").await
    }

    /// POST /users/saved-jobs/{job_id}
    pub async fn save_job(&self, job_id: u64) -> Result<()> {
        self.client
            .post_empty(&format!("/users/saved-jobs/{job_id}"))
            .await
            .map(|_| ())
    }

    /// DELETE /users/saved-jobs/{job_id}
    pub async fn unsave_job(&self, job_id: u64) -> Result<()> {
        self.client
            .delete(&format!("/users/saved-jobs/{job_id}"))
            .await
            .map(|_| ())
    }
}
