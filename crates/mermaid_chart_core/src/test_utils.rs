//! Test utilities for mermaid_chart_core
//!
//! This module provides shared testing infrastructure: an in-memory mock of
//! the [`RemoteClient`] capability that records calls for assertions, and a
//! scripted project picker.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::error::{McError, Result};
use crate::remote::{
    BoxFuture, DocumentUpdate, RemoteClient, RemoteDocument, RemoteProject, RemoteUser,
};
use crate::sync::{LinkCache, ProjectPicker};

/// Block on a future in tests.
pub(crate) fn block_on_test<F: Future>(f: F) -> F::Output {
    futures_lite::future::block_on(f)
}

#[derive(Default)]
struct MockState {
    documents: HashMap<String, RemoteDocument>,
    set_document_calls: Vec<DocumentUpdate>,
    created_documents: usize,
    get_projects_calls: usize,
}

/// An in-memory mock remote client.
///
/// Uses `Arc<Mutex<..>>` for thread-safety and allows cloning while sharing
/// the same underlying state.
#[derive(Clone)]
pub struct MockRemoteClient {
    base_url: String,
    projects: Vec<RemoteProject>,
    state: Arc<Mutex<MockState>>,
}

impl Default for MockRemoteClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemoteClient {
    /// Create a mock client with one project and no documents.
    pub fn new() -> Self {
        Self {
            base_url: "https://test.mermaidchart.invalid".to_string(),
            projects: vec![RemoteProject {
                id: "my-project-001".to_string(),
                title: "My test project".to_string(),
            }],
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Seed a document (for pull/push tests).
    pub fn add_document(&self, document_id: &str, project_id: &str, code: Option<&str>) {
        self.state.lock().unwrap().documents.insert(
            document_id.to_string(),
            RemoteDocument {
                document_id: document_id.to_string(),
                project_id: project_id.to_string(),
                major: 0,
                minor: 1,
                title: "New diagram".to_string(),
                code: code.map(String::from),
            },
        );
    }

    /// All recorded `set_document` calls, in order.
    pub fn set_document_calls(&self) -> Vec<DocumentUpdate> {
        self.state.lock().unwrap().set_document_calls.clone()
    }

    /// How many documents `create_document` produced.
    pub fn created_documents(&self) -> usize {
        self.state.lock().unwrap().created_documents
    }

    /// How many times the project list was fetched.
    pub fn get_projects_calls(&self) -> usize {
        self.state.lock().unwrap().get_projects_calls
    }
}

impl RemoteClient for MockRemoteClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_user(&self) -> BoxFuture<'_, Result<RemoteUser>> {
        Box::pin(async {
            Ok(RemoteUser {
                full_name: "My Test User".to_string(),
                email_address: "my-test-user@test.invalid".to_string(),
            })
        })
    }

    fn get_projects(&self) -> BoxFuture<'_, Result<Vec<RemoteProject>>> {
        Box::pin(async {
            self.state.lock().unwrap().get_projects_calls += 1;
            Ok(self.projects.clone())
        })
    }

    fn create_document<'a>(
        &'a self,
        project_id: &'a str,
    ) -> BoxFuture<'a, Result<RemoteDocument>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.created_documents += 1;
            let document = RemoteDocument {
                document_id: format!("generated-doc-{}", state.created_documents),
                project_id: project_id.to_string(),
                major: 0,
                minor: 1,
                title: "New diagram".to_string(),
                code: None,
            };
            state
                .documents
                .insert(document.document_id.clone(), document.clone());
            Ok(document)
        })
    }

    fn get_document<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, Result<RemoteDocument>> {
        Box::pin(async move {
            self.state
                .lock()
                .unwrap()
                .documents
                .get(document_id)
                .cloned()
                .ok_or_else(|| McError::Remote {
                    status: Some(404),
                    message: format!("document {document_id} not found"),
                })
        })
    }

    fn set_document<'a>(&'a self, update: &'a DocumentUpdate) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.set_document_calls.push(update.clone());
            if let Some(document) = state.documents.get_mut(&update.document_id) {
                document.code = Some(update.code.clone());
                if let Some(title) = &update.title {
                    document.title = title.clone();
                }
            }
            Ok(())
        })
    }

    fn delete_document<'a>(
        &'a self,
        document_id: &'a str,
    ) -> BoxFuture<'a, Result<RemoteDocument>> {
        Box::pin(async move {
            self.state
                .lock()
                .unwrap()
                .documents
                .remove(document_id)
                .ok_or_else(|| McError::Remote {
                    status: Some(404),
                    message: format!("document {document_id} not found"),
                })
        })
    }
}

/// A picker that always answers with the same project and counts how often
/// it was asked.
pub struct ScriptedPicker {
    project_id: String,
    picks: Arc<Mutex<usize>>,
}

impl ScriptedPicker {
    /// Create a picker that always selects `project_id`.
    pub fn new(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            picks: Arc::new(Mutex::new(0)),
        }
    }

    /// How many times the picker was consulted.
    pub fn pick_count(&self) -> usize {
        *self.picks.lock().unwrap()
    }
}

impl ProjectPicker for ScriptedPicker {
    fn pick_project<'a>(
        &'a self,
        cache: &'a mut LinkCache,
        _title: &'a str,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            *self.picks.lock().unwrap() += 1;
            cache.previous_project_id = Some(self.project_id.clone());
            Ok(self.project_id.clone())
        })
    }
}
