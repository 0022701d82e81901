//! Sync operations: `link`, `pull`, and `push` for a single diagram.
//!
//! A diagram is either *unlinked* (no `id` in its frontmatter) or *linked*
//! (its `id` names a remote document). `link` moves a diagram from unlinked
//! to linked, `pull` replaces the local body with the remote code, and `push`
//! uploads the local text (minus the `id` key).
//!
//! These operations never touch the filesystem; callers hand in the diagram
//! text and write the result back themselves. That keeps the ordering
//! guarantee of `link` simple: the local text only gains an `id` after the
//! remote upload has succeeded, so a crash mid-operation can at worst leave
//! an orphaned remote document, never a local `id` pointing nowhere.

use crate::error::{McError, Result};
use crate::frontmatter::{self, Metadata};
use crate::remote::{BoxFuture, DocumentUpdate, RemoteClient, RemoteProject};
use crate::urlid;

/// Cached state shared across all `link` calls of one CLI invocation.
///
/// `link` runs strictly sequentially, so the cache is plain mutable data
/// threaded through the chain; it is discarded when the invocation ends.
#[derive(Debug, Default)]
pub struct LinkCache {
    /// The project the user last selected.
    pub previous_project_id: Option<String>,
    /// Whether the user wants to reuse that project for every remaining
    /// diagram. `None` means we have not asked yet.
    pub reuse_previous: Option<bool>,
    /// Memoized project list, so the user is not made to wait for a second
    /// fetch per diagram.
    pub projects: Option<Vec<RemoteProject>>,
}

/// Capability for choosing which project a new document goes into.
///
/// The interactive implementation lives in the CLI; it owns any memoization
/// semantics beyond the [`LinkCache`] passed through.
pub trait ProjectPicker: Send + Sync {
    /// Ask which project the diagram named `title` should be uploaded to.
    fn pick_project<'a>(
        &'a self,
        cache: &'a mut LinkCache,
        title: &'a str,
    ) -> BoxFuture<'a, Result<String>>;
}

/// Options for [`link`].
#[derive(Debug, Clone)]
pub struct LinkOptions {
    /// Description of the diagram, used for messages and as the uploaded
    /// document title.
    pub title: String,
    /// Skip (instead of fail on) diagrams that already have an `id`. Used
    /// when batch-processing markdown files that mix linked and unlinked
    /// diagrams.
    pub ignore_already_linked: bool,
}

/// Result of [`link`].
#[derive(Debug, Clone, PartialEq)]
pub enum LinkOutcome {
    /// The diagram was linked; holds the text with the `id` injected.
    Linked(String),
    /// The diagram already had an `id` and `ignore_already_linked` was set.
    AlreadyLinked,
}

/// Result of [`push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The remote code already matched; no network write happened.
    UpToDate,
    /// The document was uploaded.
    Pushed,
}

/// Create a new document on Mermaid Chart for the given local diagram.
///
/// Uploads the original, unmodified text (the new `id` is not part of it),
/// then returns the local text with `id: <baseURL>/d/<documentID>` injected.
pub async fn link(
    diagram: &str,
    client: &dyn RemoteClient,
    picker: &dyn ProjectPicker,
    cache: &mut LinkCache,
    options: &LinkOptions,
) -> Result<LinkOutcome> {
    let extracted = frontmatter::extract(diagram)?;

    if extracted.metadata.id.is_some() {
        if options.ignore_already_linked {
            return Ok(LinkOutcome::AlreadyLinked);
        }
        return Err(McError::AlreadyLinked(options.title.clone()));
    }

    let project_id = picker.pick_project(cache, &options.title).await?;

    let created = client.create_document(&project_id).await?;
    log::debug!(
        "created document {} in project {}",
        created.document_id,
        created.project_id
    );

    // Upload before mutating local text: a crash here leaves the remote
    // document orphaned (retryable) rather than a local id with no upload.
    client
        .set_document(&DocumentUpdate {
            document_id: created.document_id.clone(),
            project_id: created.project_id.clone(),
            title: Some(options.title.clone()),
            code: diagram.to_string(),
        })
        .await?;

    let linked = frontmatter::inject(
        diagram,
        &Metadata {
            id: Some(urlid::create_url_id(client.base_url(), &created.document_id)),
            ..Default::default()
        },
    )?;

    Ok(LinkOutcome::Linked(linked))
}

/// Pull down a diagram from Mermaid Chart.
///
/// Returns the remote code with the same `id` re-injected. The result equals
/// the input byte-for-byte when the remote code already matches, which is
/// what callers use to print "up to date" instead of writing.
pub async fn pull(diagram: &str, client: &dyn RemoteClient, title: &str) -> Result<String> {
    let extracted = frontmatter::extract(diagram)?;

    let Some(url_id) = extracted.metadata.id else {
        return Err(McError::NotLinked(title.to_string()));
    };

    let document_id = urlid::document_id(&url_id, client.base_url())?;
    let remote = client.get_document(document_id).await?;

    let Some(code) = remote.code else {
        return Err(McError::NoRemoteCode(title.to_string()));
    };

    // Only body and id are synced here; remote title/config changes are
    // deliberately not merged back.
    frontmatter::inject(
        &code,
        &Metadata {
            id: Some(url_id),
            ..Default::default()
        },
    )
}

/// Push the given diagram to Mermaid Chart.
///
/// The uploaded payload is the local text with only the `id` key stripped
/// (title/config/displayMode are uploaded as part of the code). If the
/// payload already equals the remote code, no network write occurs, avoiding
/// spurious version bumps in the remote document history.
pub async fn push(diagram: &str, client: &dyn RemoteClient, title: &str) -> Result<PushOutcome> {
    let extracted = frontmatter::extract(diagram)?;

    let Some(url_id) = extracted.metadata.id else {
        return Err(McError::NotLinked(title.to_string()));
    };

    let document_id = urlid::document_id(&url_id, client.base_url())?;
    let existing = client.get_document(document_id).await?;

    let payload = frontmatter::remove_keys(diagram, &["id"])?;

    if existing.code.as_deref() == Some(payload.as_str()) {
        log::debug!("{title}: remote code already matches, skipping upload");
        return Ok(PushOutcome::UpToDate);
    }

    client
        .set_document(&DocumentUpdate {
            document_id: existing.document_id,
            project_id: existing.project_id,
            title: None,
            code: payload,
        })
        .await?;

    Ok(PushOutcome::Pushed)
}
