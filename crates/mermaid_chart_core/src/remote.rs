//! Remote client capability and wire types.
//!
//! The sync operations in [`crate::sync`] only ever talk to Mermaid Chart
//! through the object-safe [`RemoteClient`] trait; the HTTP implementation
//! lives in the CLI crate and tests use an in-memory mock. To keep the trait
//! usable behind `dyn RemoteClient`, all methods return boxed futures.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A boxed future for object-safe async methods.
///
/// Futures are `Send` for compatibility with multi-threaded runtimes.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A Mermaid Chart user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteUser {
    /// Display name.
    #[serde(rename = "fullName")]
    pub full_name: String,
    /// Account email address.
    #[serde(rename = "emailAddress")]
    pub email_address: String,
}

/// A project a document can belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteProject {
    /// Opaque project ID.
    pub id: String,
    /// Project title.
    pub title: String,
}

/// A document stored on Mermaid Chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteDocument {
    /// Opaque document ID.
    #[serde(rename = "documentID")]
    pub document_id: String,
    /// The project this document belongs to.
    #[serde(rename = "projectID")]
    pub project_id: String,
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Document title.
    pub title: String,
    /// The diagram code last stored remotely. `None` if the document was
    /// created but never pushed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Payload for updating a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentUpdate {
    /// The document to update.
    #[serde(rename = "documentID")]
    pub document_id: String,
    /// The project the document belongs to.
    #[serde(rename = "projectID")]
    pub project_id: String,
    /// New title, left unchanged when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The diagram code to store.
    pub code: String,
}

/// Capability for talking to a Mermaid Chart instance.
///
/// Transport failures are surfaced as [`crate::error::McError::Remote`] and
/// are never retried here; retrying `create_document` could create duplicate
/// remote documents.
pub trait RemoteClient: Send + Sync {
    /// The configured instance root, used for identifier validation.
    fn base_url(&self) -> &str;

    /// Fetch the authenticated user.
    fn get_user(&self) -> BoxFuture<'_, Result<RemoteUser>>;

    /// List the user's projects.
    fn get_projects(&self) -> BoxFuture<'_, Result<Vec<RemoteProject>>>;

    /// Create a new (empty) document in the given project.
    fn create_document<'a>(&'a self, project_id: &'a str)
    -> BoxFuture<'a, Result<RemoteDocument>>;

    /// Fetch a document by ID.
    fn get_document<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, Result<RemoteDocument>>;

    /// Update a document. Fails if the server rejects the payload.
    fn set_document<'a>(&'a self, update: &'a DocumentUpdate) -> BoxFuture<'a, Result<()>>;

    /// Delete a document, returning its last-known metadata.
    fn delete_document<'a>(&'a self, document_id: &'a str)
    -> BoxFuture<'a, Result<RemoteDocument>>;
}
