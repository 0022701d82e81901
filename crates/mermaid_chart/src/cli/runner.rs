//! Batch drivers for `link`, `pull`, and `push`.
//!
//! Each driver takes the paths from the command line and fans out per file.
//! Failures are file-scoped: one bad file is reported and the rest still get
//! processed. The one exception is a failed prompt during `link`, which
//! aborts the remaining chain because every later file would ask again.
//!
//! Plain files hold a single diagram; `.md`/`.markdown` files are scanned
//! for ```` ```mermaid ```` code blocks and each block is synced on its own,
//! named `<basename>:<line>`.

use std::path::{Path, PathBuf};

use futures_util::future::join_all;

use mermaid_chart_core::error::{McError, Result};
use mermaid_chart_core::markdown::{find_mermaid_blocks, splice_blocks};
use mermaid_chart_core::remote::RemoteClient;
use mermaid_chart_core::sync::{self, LinkCache, LinkOptions, LinkOutcome, ProjectPicker, PushOutcome};

/// Link every path, sharing one [`LinkCache`] so the user is asked about
/// project selection as few times as possible.
///
/// Runs sequentially: linking prompts, and interleaved prompts from
/// concurrent files would be unreadable.
pub async fn run_link(
    client: &dyn RemoteClient,
    picker: &dyn ProjectPicker,
    paths: &[PathBuf],
) -> Result<bool> {
    let mut cache = LinkCache::default();
    let mut success = true;

    for path in paths {
        let result = if is_markdown(path) {
            link_markdown(path, client, picker, &mut cache).await
        } else {
            link_diagram(path, client, picker, &mut cache).await
        };

        if let Err(e) = result {
            // A dead prompt can't answer for the remaining files either.
            if matches!(e, McError::Prompt(_)) {
                return Err(e);
            }
            eprintln!("❌ - {e}");
            success = false;
        }
    }

    Ok(success)
}

/// Pull every path concurrently. In `--check` mode nothing is written and
/// the return value reports whether every file was already up to date.
pub async fn run_pull(client: &dyn RemoteClient, paths: &[PathBuf], check: bool) -> bool {
    let tasks = paths.iter().map(|path| async move {
        if is_markdown(path) {
            pull_markdown(path, client, check).await
        } else {
            pull_diagram(path, client, check).await
        }
    });

    join_all(tasks).await.into_iter().fold(true, |ok, result| {
        match result {
            Ok(clean) => ok && clean,
            Err(e) => {
                eprintln!("❌ - {e}");
                false
            }
        }
    })
}

/// Push every path concurrently.
pub async fn run_push(client: &dyn RemoteClient, paths: &[PathBuf]) -> bool {
    let tasks = paths.iter().map(|path| async move {
        if is_markdown(path) {
            push_markdown(path, client).await
        } else {
            push_diagram(path, client).await
        }
    });

    join_all(tasks).await.into_iter().fold(true, |ok, result| {
        match result {
            Ok(()) => ok,
            Err(e) => {
                eprintln!("❌ - {e}");
                false
            }
        }
    })
}

async fn link_diagram(
    path: &Path,
    client: &dyn RemoteClient,
    picker: &dyn ProjectPicker,
    cache: &mut LinkCache,
) -> Result<()> {
    let text = read_file(path)?;
    let title = path.display().to_string();
    let options = LinkOptions {
        title: title.clone(),
        ignore_already_linked: false,
    };

    match sync::link(&text, client, picker, cache, &options).await? {
        LinkOutcome::Linked(linked) => {
            write_file(path, &linked)?;
            println!("✅ - {title} was linked");
        }
        LinkOutcome::AlreadyLinked => {
            println!("○ - {title} is already linked");
        }
    }
    Ok(())
}

async fn link_markdown(
    path: &Path,
    client: &dyn RemoteClient,
    picker: &dyn ProjectPicker,
    cache: &mut LinkCache,
) -> Result<()> {
    let source = read_file(path)?;
    let name = file_name(path);
    let blocks = find_mermaid_blocks(&source);
    if blocks.is_empty() {
        println!("○ - {name} ignored, as it has no mermaid diagrams");
        return Ok(());
    }

    let mut replacements = Vec::with_capacity(blocks.len());
    for block in &blocks {
        let title = format!("{name}:{}", block.line);
        let options = LinkOptions {
            title: title.clone(),
            ignore_already_linked: true,
        };
        match sync::link(&block.code, client, picker, cache, &options).await? {
            LinkOutcome::Linked(linked) => {
                println!("✅ - {title} was linked");
                replacements.push(Some(linked));
            }
            LinkOutcome::AlreadyLinked => {
                println!("○ - {title} is already linked");
                replacements.push(None);
            }
        }
    }

    let updated = splice_blocks(&source, &blocks, &replacements);
    if updated != source {
        write_file(path, &updated)?;
    }
    Ok(())
}

async fn pull_diagram(path: &Path, client: &dyn RemoteClient, check: bool) -> Result<bool> {
    let text = read_file(path)?;
    let title = path.display().to_string();
    let pulled = sync::pull(&text, client, &title).await?;

    if pulled == text {
        println!("✅ - {title} is up to date");
        Ok(true)
    } else if check {
        println!("❌ - {title} would be updated");
        Ok(false)
    } else {
        write_file(path, &pulled)?;
        println!("✅ - {title} was updated");
        Ok(true)
    }
}

async fn pull_markdown(path: &Path, client: &dyn RemoteClient, check: bool) -> Result<bool> {
    let source = read_file(path)?;
    let name = file_name(path);
    let blocks = find_mermaid_blocks(&source);
    if blocks.is_empty() {
        println!("○ - {name} ignored, as it has no mermaid diagrams");
        return Ok(true);
    }

    let mut clean = true;
    let mut replacements = Vec::with_capacity(blocks.len());
    for block in &blocks {
        let title = format!("{name}:{}", block.line);
        let pulled = sync::pull(&block.code, client, &title).await?;

        if pulled == block.code {
            println!("✅ - {title} is up to date");
            replacements.push(None);
        } else if check {
            println!("❌ - {title} would be updated");
            clean = false;
            replacements.push(None);
        } else {
            println!("✅ - {title} was updated");
            replacements.push(Some(pulled));
        }
    }

    if !check {
        let updated = splice_blocks(&source, &blocks, &replacements);
        if updated != source {
            write_file(path, &updated)?;
        }
    }
    Ok(clean)
}

async fn push_diagram(path: &Path, client: &dyn RemoteClient) -> Result<()> {
    let text = read_file(path)?;
    let title = path.display().to_string();
    match sync::push(&text, client, &title).await? {
        PushOutcome::UpToDate => println!("✅ - {title} is up to date"),
        PushOutcome::Pushed => println!("✅ - {title} was pushed"),
    }
    Ok(())
}

/// Push never modifies the markdown file; only the remote changes.
async fn push_markdown(path: &Path, client: &dyn RemoteClient) -> Result<()> {
    let source = read_file(path)?;
    let name = file_name(path);
    let blocks = find_mermaid_blocks(&source);
    if blocks.is_empty() {
        println!("○ - {name} ignored, as it has no mermaid diagrams");
        return Ok(());
    }

    for block in &blocks {
        let title = format!("{name}:{}", block.line);
        match sync::push(&block.code, client, &title).await? {
            PushOutcome::UpToDate => println!("✅ - {title} is up to date"),
            PushOutcome::Pushed => println!("✅ - {title} was pushed"),
        }
    }
    Ok(())
}

fn is_markdown(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md" | "markdown")
    )
}

/// Short display name for per-block titles (`basename:line`).
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| McError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| McError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
