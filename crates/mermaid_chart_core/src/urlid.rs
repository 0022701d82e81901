//! Document identifier codec.
//!
//! A linked diagram stores its remote identity as a URL-shaped token,
//! `<baseURL>/d/<documentID>`, in the `id` frontmatter key. Keeping the base
//! URL inside the token lets us refuse to sync a file that was linked against
//! a different Mermaid Chart instance.

use crate::error::{McError, Result};

/// Build the `id` frontmatter token for a document.
pub fn create_url_id(base_url: &str, document_id: &str) -> String {
    format!("{base_url}/d/{document_id}")
}

/// Recover the document ID from an `id` frontmatter token.
///
/// Fails with [`McError::InvalidIdentifier`] when the token does not have the
/// `<baseURL>/d/<documentID>` shape, and with [`McError::BaseUrlMismatch`]
/// when the embedded base URL is not the instance this client is configured
/// against.
pub fn document_id<'a>(url_id: &'a str, expected_base_url: &str) -> Result<&'a str> {
    // The document ID is everything after the last `/d/`.
    let (base_url, document_id) = url_id
        .rsplit_once("/d/")
        .ok_or_else(|| McError::InvalidIdentifier(url_id.to_string()))?;

    if document_id.is_empty()
        || !document_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(McError::InvalidIdentifier(url_id.to_string()));
    }

    if base_url != expected_base_url {
        return Err(McError::BaseUrlMismatch {
            expected: expected_base_url.to_string(),
            found: base_url.to_string(),
        });
    }

    Ok(document_id)
}
