//! Notification endpoints

use crate::client::ApiClient;
use crate::endpoints::Page;
use crate::error::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: Option<String>,
}

pub struct NotificationsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> NotificationsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// GET /notifications
    pub async fn list(&self) -> Result<Page<Notification>> {
        self.client.get_json("/notifications").await
    }

    /// POST /notifications/{id}/read
    pub async fn mark_read(&self, id: u64) -> Result<()> {
        self.client
            .post_empty(&format!("/notifications/{id}/read"))
            .await
            .map(|_| ())
    }

    /// POST /notifications/read-all
    pub async fn mark_all_read(&self) -> Result<()> {
        self.client
            .post_empty("/notifications/read-all")
            .await
            .map(|_| ())
    }
}
