//! One-shot subcommands.
//!
//! Rendered output goes to the caller's writer; the spinner and download
//! notices go to stderr.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use skinsight_client::ClassifierBackend;
use skinsight_core::ClassificationResult;
use tracing::info;

use crate::config::Config;
use crate::display;
use crate::session::{Session, newest_first};

pub async fn ping<B: ClassifierBackend>(backend: &B, out: &mut impl Write) -> anyhow::Result<()> {
    let message = backend.ping().await?;
    writeln!(out, "{message}")?;
    Ok(())
}

/// Classify `file`, then print the result card followed by history.
///
/// JSON output has no spinner, so the linger is skipped.
pub async fn classify<B: ClassifierBackend>(
    backend: B,
    config: &Config,
    base_url: &str,
    file: &Path,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let linger = if config.json {
        Duration::ZERO
    } else {
        config.linger
    };
    let mut session = Session::new(backend, linger);
    session.select(file)?;

    let pb = (!config.json).then(|| display::spinner("Classifying image..."));
    let outcome = session.classify().await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let result = outcome?;

    if config.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
        return Ok(());
    }
    display::print_result_card(out, &result, base_url)?;
    display::print_history(out, &newest_first(session.history()), base_url)?;
    Ok(())
}

/// Print history newest first, keeping at most `limit` entries, and
/// optionally save their images into `download`.
pub async fn history<B: ClassifierBackend>(
    backend: &B,
    config: &Config,
    base_url: &str,
    limit: Option<usize>,
    download: Option<&Path>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let history = backend.previous_classifications().await?;
    let mut shown = newest_first(&history);
    if let Some(limit) = limit {
        shown.truncate(limit);
    }

    if let Some(dir) = download {
        for path in download_images(backend, &shown, dir).await? {
            eprintln!("  Saved {}", path.display());
        }
    }

    if config.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&shown)?)?;
    } else {
        display::print_history(out, &shown, base_url)?;
    }
    Ok(())
}

/// Save each result's image into `dir`. Returns the written paths in order.
async fn download_images<B: ClassifierBackend>(
    backend: &B,
    results: &[&ClassificationResult],
    dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;

    let mut taken = HashSet::new();
    let mut written = Vec::with_capacity(results.len());
    for (i, result) in results.iter().enumerate() {
        let bytes = backend.fetch_image(result).await?;
        let name = unique_name(download_name(&result.image_url, i), &mut taken);
        let path = dir.join(name);
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), bytes = bytes.len(), "saved classified image");
        written.push(path);
    }
    Ok(written)
}

/// Last path segment of an image URL, or a numbered fallback.
///
/// Query and fragment are dropped and both `/` and `\` separate segments, so
/// the name can never leave the download directory.
fn download_name(image_url: &str, index: usize) -> String {
    let path = image_url.split(['?', '#']).next().unwrap_or_default();
    path.rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_string)
        .unwrap_or_else(|| format!("classification-{index}"))
}

/// `name`, or `stem-N.ext` for the first N not already in `taken`.
fn unique_name(name: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.clone()) {
        return name;
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name.as_str(), None),
    };
    let mut n = 1;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{stem}-{n}.{ext}"),
            None => format!("{stem}-{n}"),
        };
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
