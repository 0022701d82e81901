//! In-memory remote client and scripted prompt used by CLI tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mermaid_chart_core::error::{McError, Result};
use mermaid_chart_core::remote::{
    BoxFuture, DocumentUpdate, RemoteClient, RemoteDocument, RemoteProject, RemoteUser,
};

use super::prompt::Prompt;

/// Instance URL the mock pretends to be.
pub const BASE_URL: &str = "https://test.mermaidchart.invalid";

#[derive(Default)]
struct MockState {
    documents: HashMap<String, RemoteDocument>,
    set_document_calls: Vec<DocumentUpdate>,
    created_documents: usize,
    get_projects_calls: usize,
}

/// [`RemoteClient`] backed by a shared in-memory document table.
#[derive(Default)]
pub struct MockClient {
    state: Arc<Mutex<MockState>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document, as if it had been created (and optionally pushed to)
    /// earlier.
    pub fn add_document(&self, document_id: &str, code: Option<&str>) {
        let mut state = self.state.lock().unwrap();
        state.documents.insert(
            document_id.to_string(),
            RemoteDocument {
                document_id: document_id.to_string(),
                project_id: "proj-1".to_string(),
                major: 0,
                minor: 1,
                title: "New diagram".to_string(),
                code: code.map(|c| c.to_string()),
            },
        );
    }

    pub fn set_document_calls(&self) -> Vec<DocumentUpdate> {
        self.state.lock().unwrap().set_document_calls.clone()
    }

    pub fn created_documents(&self) -> usize {
        self.state.lock().unwrap().created_documents
    }

    pub fn get_projects_calls(&self) -> usize {
        self.state.lock().unwrap().get_projects_calls
    }
}

impl RemoteClient for MockClient {
    fn base_url(&self) -> &str {
        BASE_URL
    }

    fn get_user(&self) -> BoxFuture<'_, Result<RemoteUser>> {
        Box::pin(async {
            Ok(RemoteUser {
                full_name: "Test User".to_string(),
                email_address: "test@example.invalid".to_string(),
            })
        })
    }

    fn get_projects(&self) -> BoxFuture<'_, Result<Vec<RemoteProject>>> {
        Box::pin(async {
            self.state.lock().unwrap().get_projects_calls += 1;
            Ok(vec![RemoteProject {
                id: "proj-1".to_string(),
                title: "My test project".to_string(),
            }])
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
            let Some(document) = state.documents.get_mut(&update.document_id) else {
                return Err(McError::Remote {
                    status: Some(404),
                    message: format!("document {} not found", update.document_id),
                });
            };
            document.code = Some(update.code.clone());
            if let Some(title) = &update.title {
                document.title = title.clone();
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

/// [`Prompt`] that answers from fixed values and counts its calls.
pub struct ScriptedPrompt {
    confirm_answer: bool,
    select_answer: usize,
    input_answer: String,
    confirm_calls: AtomicUsize,
    select_calls: AtomicUsize,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self {
            confirm_answer: true,
            select_answer: 0,
            input_answer: String::new(),
            confirm_calls: AtomicUsize::new(0),
            select_calls: AtomicUsize::new(0),
        }
    }

    pub fn confirm_with(mut self, answer: bool) -> Self {
        self.confirm_answer = answer;
        self
    }

    pub fn select_index(mut self, index: usize) -> Self {
        self.select_answer = index;
        self
    }

    pub fn confirm_count(&self) -> usize {
        self.confirm_calls.load(Ordering::SeqCst)
    }

    pub fn select_count(&self) -> usize {
        self.select_calls.load(Ordering::SeqCst)
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, _message: &str, _default_yes: bool) -> Result<bool> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.confirm_answer)
    }

    fn select(&self, _message: &str, choices: &[String]) -> Result<usize> {
        self.select_calls.fetch_add(1, Ordering::SeqCst);
        assert!(self.select_answer < choices.len());
        Ok(self.select_answer)
    }

    fn input(&self, _message: &str) -> Result<String> {
        Ok(self.input_answer.clone())
    }
}
