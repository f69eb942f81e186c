//! get command - Download objects
//!
//! Each object is saved under its file name in the output directory.
//! Downloads run a few at a time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bx_core::ObjectStore as _;
use bx_core::path::last_segment;
use clap::Args;
use futures::stream::{self, StreamExt};
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;
use crate::output::Progress;

/// Downloads in flight at once
const CONCURRENT_DOWNLOADS: usize = 4;

/// Download objects
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Object keys to download
    #[arg(required = true)]
    pub keys: Vec<String>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Overwrite existing local files
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct GetOutput {
    status: &'static str,
    downloaded: Vec<Downloaded>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failed: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Downloaded {
    key: String,
    path: String,
    size_bytes: u64,
}

/// Local destination for `key`, or an error message when it cannot be downloaded
fn destination(key: &str, dir: &Path) -> Result<PathBuf, String> {
    let key = key.trim_start_matches('/');
    if key.is_empty() || key.ends_with('/') {
        return Err(format!("'{key}' is a folder, not a file"));
    }
    Ok(dir.join(last_segment(key)))
}

/// Pair each key with its local destination
///
/// Repeating a key downloads it once. Two different keys that share a file
/// name would race for the same local path, so they are refused.
fn plan_downloads(
    keys: &[String],
    dir: &Path,
    force: bool,
) -> Result<Vec<(String, PathBuf)>, (ExitCode, String)> {
    let mut planned: HashMap<PathBuf, String> = HashMap::new();
    let mut targets = Vec::with_capacity(keys.len());

    for key in keys {
        let path = destination(key, dir).map_err(|message| (ExitCode::UsageError, message))?;
        let key = key.trim_start_matches('/').to_string();

        if let Some(other) = planned.get(&path) {
            if *other == key {
                continue;
            }
            return Err((
                ExitCode::Conflict,
                format!(
                    "{other} and {key} would both be saved as {}",
                    path.display()
                ),
            ));
        }
        if path.exists() && !force {
            return Err((
                ExitCode::Conflict,
                format!("{} already exists (use --force to overwrite)", path.display()),
            ));
        }

        planned.insert(path.clone(), key.clone());
        targets.push((key, path));
    }

    Ok(targets)
}

/// Execute the get command
pub async fn execute(args: GetArgs, ctx: &Context) -> ExitCode {
    let formatter = &ctx.formatter;

    let targets = match plan_downloads(&args.keys, &args.output, args.force) {
        Ok(targets) => targets,
        Err((code, message)) => {
            formatter.error(&message);
            return code;
        }
    };

    if let Err(e) = tokio::fs::create_dir_all(&args.output).await {
        formatter.error(&format!("Failed to create {}: {e}", args.output.display()));
        return ExitCode::GeneralError;
    }

    let store = match ctx.open_store().await {
        Ok(store) => store,
        Err(code) => return code,
    };

    let progress = Progress::items(formatter.config(), targets.len() as u64, "Downloading");
    let results: Vec<_> = stream::iter(targets)
        .map(|(key, path)| {
            let store = &store;
            let progress = &progress;
            async move {
                let result = match store.get_object(&key).await {
                    Ok(data) => {
                        let size = data.len() as u64;
                        tokio::fs::write(&path, data)
                            .await
                            .map(|()| size)
                            .map_err(bx_core::Error::from)
                    }
                    Err(e) => Err(e),
                };
                progress.advance(&key);
                (key, path, result)
            }
        })
        .buffer_unordered(CONCURRENT_DOWNLOADS)
        .collect()
        .await;
    progress.finish();

    let mut downloaded = Vec::new();
    let mut failed = Vec::new();
    let mut exit = ExitCode::Success;
    for (key, path, result) in results {
        match result {
            Ok(size_bytes) => {
                tracing::debug!(%key, size_bytes, "Downloaded");
                downloaded.push(Downloaded {
                    key,
                    path: path.display().to_string(),
                    size_bytes,
                });
            }
            Err(e) => {
                formatter.error(&format!("Failed to download {key}: {e}"));
                exit = ExitCode::from(&e);
                failed.push(key);
            }
        }
    }

    if formatter.is_json() {
        formatter.json(&GetOutput {
            status: if failed.is_empty() { "success" } else { "partial" },
            downloaded,
            failed,
        });
    } else {
        for item in &downloaded {
            formatter.println(&format!(
                "{} -> {} ({})",
                item.key,
                item.path,
                bx_core::format::format_bytes(Some(item.size_bytes))
            ));
        }
        if failed.is_empty() {
            formatter.success(&format!("Downloaded {} object(s).", downloaded.len()));
        }
    }

    exit
}
