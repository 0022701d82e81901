//! HTTP implementation of the remote client capability.
//!
//! Talks to the Mermaid Chart REST API with a bearer token. All failures are
//! surfaced as [`McError::Remote`] so callers never see transport details.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use mermaid_chart_core::error::{McError, Result};
use mermaid_chart_core::remote::{
    BoxFuture, DocumentUpdate, RemoteClient, RemoteDocument, RemoteProject, RemoteUser,
};

/// Build a client and verify the token by fetching the user.
///
/// A missing token fails with [`McError::NotAuthenticated`]; a rejected one
/// gets a message pointing at `login` instead of the raw server response.
pub async fn connect(base_url: &str, auth_token: Option<&str>) -> Result<HttpRemoteClient> {
    let token = auth_token.ok_or(McError::NotAuthenticated)?;
    let client = HttpRemoteClient::new(base_url, token)?;

    if let Err(e) = client.fetch_user().await {
        if matches!(e, McError::Remote { status: Some(401), .. }) {
            return Err(McError::Remote {
                status: Some(401),
                message: "Invalid access token. Try logging in again with the `login` command."
                    .to_string(),
            });
        }
        return Err(e);
    }

    Ok(client)
}

/// [`RemoteClient`] backed by `reqwest` against the REST API.
pub struct HttpRemoteClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl HttpRemoteClient {
    /// Create a client for the given instance. Does not touch the network.
    pub fn new(base_url: &str, auth_token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| McError::Remote {
                status: None,
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.auth_token)
            .send()
            .await
            .map_err(transport_error)?;
        parse_json(response).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .http
            .request(method, self.url(path))
            .bearer_auth(&self.auth_token)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        parse_json(response).await
    }

    pub(crate) async fn fetch_user(&self) -> Result<RemoteUser> {
        self.get_json("/rest-api/users/me").await
    }

    async fn fetch_projects(&self) -> Result<Vec<RemoteProject>> {
        self.get_json("/rest-api/projects").await
    }

    async fn post_document(&self, project_id: &str) -> Result<RemoteDocument> {
        let path = format!("/rest-api/projects/{project_id}/documents");
        self.send_json(reqwest::Method::POST, &path, &serde_json::json!({}))
            .await
    }

    async fn fetch_document(&self, document_id: &str) -> Result<RemoteDocument> {
        self.get_json(&format!("/rest-api/documents/{document_id}"))
            .await
    }

    async fn put_document(&self, update: &DocumentUpdate) -> Result<()> {
        let path = format!("/rest-api/documents/{}", update.document_id);
        let _: serde_json::Value = self.send_json(reqwest::Method::PUT, &path, update).await?;
        Ok(())
    }

    async fn remove_document(&self, document_id: &str) -> Result<RemoteDocument> {
        let path = format!("/rest-api/documents/{document_id}");
        self.send_json(reqwest::Method::DELETE, &path, &serde_json::json!({}))
            .await
    }
}

impl RemoteClient for HttpRemoteClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_user(&self) -> BoxFuture<'_, Result<RemoteUser>> {
        Box::pin(self.fetch_user())
    }

    fn get_projects(&self) -> BoxFuture<'_, Result<Vec<RemoteProject>>> {
        Box::pin(self.fetch_projects())
    }

    fn create_document<'a>(
        &'a self,
        project_id: &'a str,
    ) -> BoxFuture<'a, Result<RemoteDocument>> {
        Box::pin(self.post_document(project_id))
    }

    fn get_document<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, Result<RemoteDocument>> {
        Box::pin(self.fetch_document(document_id))
    }

    fn set_document<'a>(&'a self, update: &'a DocumentUpdate) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.put_document(update))
    }

    fn delete_document<'a>(
        &'a self,
        document_id: &'a str,
    ) -> BoxFuture<'a, Result<RemoteDocument>> {
        Box::pin(self.remove_document(document_id))
    }
}

fn transport_error(e: reqwest::Error) -> McError {
    McError::Remote {
        status: e.status().map(|s| s.as_u16()),
        message: e.to_string(),
    }
}

/// Check the status and decode the body, folding failures into
/// [`McError::Remote`] with whatever body text the server sent.
async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(McError::Remote {
            status: Some(status.as_u16()),
            message: if message.is_empty() {
                status.to_string()
            } else {
                message
            },
        });
    }

    response.json().await.map_err(transport_error)
}
