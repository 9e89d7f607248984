//! Document upload and analysis endpoints
//!
//! Uploads are multipart; the part's content type is set per call instead of
//! the client's JSON default.

use crate::client::{ApiClient, FilePart, RequestBody, RequestOptions};
use crate::error::{ApiError, Result};
use reqwest::Method;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub id: u64,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    /// "resume", "cover_letter", "certificate"
    pub kind: Option<String>,
    pub uploaded_at: Option<String>,
}

pub struct DocumentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DocumentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// POST /documents, as a multipart upload.
    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        kind: Option<&str>,
    ) -> Result<Document> {
        let content_type = content_type_for(file_name)?;
        let part = FilePart {
            name: "file".to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        };

        let mut query = Vec::new();
        if let Some(kind) = kind {
            query.push(("kind".to_string(), kind.to_string()));
        }
        let options = RequestOptions {
            query,
            ..Default::default()
        };

        self.client
            .request(
                Method::POST,
                "/documents",
                Some(RequestBody::Multipart(vec![part])),
                options,
            )
            .await?
            .json()
    }

    /// GET /documents
    pub async fn list(&self) -> Result<Vec<Document>> {
        self.client.get_json("/documents").await
    }

    /// GET /documents/{id}
    pub async fn get(&self, id: u64) -> Result<Document> {
        self.client.get_json(&format!("/documents/{id}")).await
    }

    /// DELETE /documents/{id}
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.client
            .delete(&format!("/documents/{id}"))
            .await
            .map(|_| ())
    }

    /// GET /documents/{id}/analysis, the server-side resume analysis result.
    /// The payload shape is owned by the backend and surfaced opaquely.
    pub async fn analysis(&self, id: u64) -> Result<serde_json::Value> {
        self.client
            .get_json(&format!("/documents/{id}/analysis"))
            .await
    }
}

fn content_type_for(file_name: &str) -> Result<&'static str> {
    let lower_name = file_name.to_lowercase();
    if lower_name.ends_with(".pdf") {
        Ok("application/pdf")
    } else if lower_name.ends_with(".docx") {
        Ok("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
    } else if lower_name.ends_with(".txt") {
        Ok("text/plain")
    } else {
        Err(ApiError::Configuration(format!(
            "unsupported document format: {file_name}"
        )))
    }
}
