#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Configuration options
pub mod config;

/// Error (common error types)
pub mod error;

/// Frontmatter codec (extract/inject/remove YAML frontmatter)
pub mod frontmatter;

/// Markdown scanning (fenced mermaid code blocks)
pub mod markdown;

/// Remote client capability and wire types
pub mod remote;

/// Sync operations (link / pull / push)
pub mod sync;

/// Document identifier codec (`<baseURL>/d/<documentID>`)
pub mod urlid;

/// Shared mock client and scripted picker for tests
#[cfg(test)]
pub mod test_utils;
