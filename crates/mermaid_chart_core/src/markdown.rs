//! Locate and rewrite fenced mermaid code blocks in markdown documents.
//!
//! Scanning is span-based: [`find_mermaid_blocks`] records where each block's
//! content lives in the source so that [`splice_blocks`] can rewrite block
//! contents in place without disturbing anything else in the document.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

/// A fenced ```` ```mermaid ```` code block found in a markdown document.
#[derive(Debug, Clone)]
pub struct MermaidBlock {
    /// The block's content, de-indented the way a markdown renderer sees it.
    pub code: String,
    /// 1-based line number of the opening fence, used in diagnostics.
    pub line: usize,
    /// Byte range of the content between the fence lines.
    inner: Range<usize>,
    /// Leading whitespace of the opening fence line, re-applied to
    /// replacement content so blocks nested in lists stay intact.
    indent: String,
}

/// Find every fenced code block tagged as mermaid.
///
/// Only fenced blocks count, and only when the first word of the info string
/// is exactly `mermaid`; indented code blocks and other languages are
/// ignored.
pub fn find_mermaid_blocks(source: &str) -> Vec<MermaidBlock> {
    let mut options = Options::empty();
    // Keep a leading YAML frontmatter block from being parsed as markdown.
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);

    let mut blocks = Vec::new();
    let mut current: Option<(Range<usize>, String)> = None;

    for (event, range) in Parser::new_ext(source, options).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let lang = info.split_whitespace().next().unwrap_or("");
                if lang == "mermaid" {
                    current = Some((range, String::new()));
                }
            }
            Event::Text(text) => {
                if let Some((_, code)) = current.as_mut() {
                    code.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((span, code)) = current.take() {
                    blocks.push(build_block(source, span, code));
                }
            }
            _ => {}
        }
    }

    blocks
}

fn build_block(source: &str, span: Range<usize>, code: String) -> MermaidBlock {
    let span_text = &source[span.clone()];

    // Content starts after the opening fence line.
    let inner_start = match span_text.find('\n') {
        Some(idx) => span.start + idx + 1,
        None => span.end,
    };

    // Content ends before the closing fence line, if the block is closed.
    let trimmed = span_text.trim_end_matches(['\n', '\r']);
    let inner_end = match trimmed.rfind('\n') {
        Some(idx) if is_fence_line(&trimmed[idx + 1..]) => span.start + idx + 1,
        _ => span.end,
    };
    let inner_end = inner_end.max(inner_start);

    // Indentation of the opening fence line (nested list items).
    let line_start = source[..span.start].rfind('\n').map_or(0, |idx| idx + 1);
    let indent: String = source[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect();

    let line = source[..span.start].bytes().filter(|b| *b == b'\n').count() + 1;

    MermaidBlock {
        code,
        line,
        inner: inner_start..inner_end,
        indent,
    }
}

fn is_fence_line(line: &str) -> bool {
    let line = line.trim_start();
    let fence_char = match line.chars().next() {
        Some(c @ ('`' | '~')) => c,
        _ => return false,
    };
    let run = line.chars().take_while(|c| *c == fence_char).count();
    run >= 3 && line.chars().skip(run).all(|c| c == ' ' || c == '\t')
}

/// Rewrite block contents in place.
///
/// `replacements` pairs up with `blocks` (same order as returned by
/// [`find_mermaid_blocks`]); a `None` leaves that block untouched. The fence
/// lines themselves are never modified, and replacement lines get the opening
/// fence's indentation re-applied.
pub fn splice_blocks(
    source: &str,
    blocks: &[MermaidBlock],
    replacements: &[Option<String>],
) -> String {
    debug_assert_eq!(blocks.len(), replacements.len());

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;

    for (block, replacement) in blocks.iter().zip(replacements) {
        let Some(new_code) = replacement else {
            continue;
        };
        out.push_str(&source[cursor..block.inner.start]);
        for line in new_code.lines() {
            if !line.is_empty() {
                out.push_str(&block.indent);
            }
            out.push_str(line);
            out.push('\n');
        }
        cursor = block.inner.end;
    }

    out.push_str(&source[cursor..]);
    out
}
