//! put command - Upload local files
//!
//! Files land directly in the target folder. With `-r`, directories are
//! walked and every file keeps its path relative to the directory's parent,
//! so `put -r photos --to data` produces `data/photos/...` keys.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use bx_core::config::validate_storage_class;
use bx_core::path::upload_key;
use bx_core::{ObjectStore as _, PutOptions};
use clap::Args;
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;
use crate::output::Progress;

/// Upload files
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local files (or directories with -r)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Destination folder (default: bucket root)
    #[arg(long, default_value = "")]
    pub to: String,

    /// Storage class (default: configured preference)
    #[arg(long)]
    pub storage_class: Option<String>,

    /// Content type for every file (default: guessed from the extension)
    #[arg(long)]
    pub content_type: Option<String>,

    /// Upload directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Keep going after a failed upload
    #[arg(long)]
    pub continue_on_error: bool,
}

/// One planned upload
#[derive(Debug, Clone, PartialEq, Eq)]
struct Upload {
    source: PathBuf,
    key: String,
}

#[derive(Debug, Serialize)]
struct PutOutput {
    status: &'static str,
    uploaded: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failed: Vec<String>,
    storage_class: String,
}

/// Expand the command-line sources into (file, key) pairs
fn plan_uploads(files: &[PathBuf], folder: &str, recursive: bool) -> anyhow::Result<Vec<Upload>> {
    let mut uploads = Vec::new();
    for source in files {
        let metadata = fs::metadata(source)
            .with_context(|| format!("Cannot access {}", source.display()))?;

        if metadata.is_dir() {
            if !recursive {
                bail!("{} is a directory (use -r to upload it)", source.display());
            }
            let base = source.parent().unwrap_or(Path::new(""));
            let mut found = Vec::new();
            walk_dir(source, &mut found)?;
            found.sort();
            for path in found {
                let relative = path.strip_prefix(base).unwrap_or(&path);
                uploads.push(Upload {
                    key: upload_key(folder, &relative.to_string_lossy())?,
                    source: path,
                });
            }
        } else {
            let name = source
                .file_name()
                .with_context(|| format!("{} has no file name", source.display()))?;
            uploads.push(Upload {
                key: upload_key(folder, &name.to_string_lossy())?,
                source: source.clone(),
            });
        }
    }
    Ok(uploads)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

fn guess_content_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
}

/// Execute the put command
pub async fn execute(args: PutArgs, ctx: &Context) -> ExitCode {
    let formatter = &ctx.formatter;

    let storage_class = match &args.storage_class {
        Some(class) => match validate_storage_class(class) {
            Ok(class) => class,
            Err(e) => return ctx.fail(&e),
        },
        None => ctx.preferences.storage_class.clone(),
    };

    let uploads = match plan_uploads(&args.files, &args.to, args.recursive) {
        Ok(uploads) => uploads,
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            return ExitCode::UsageError;
        }
    };
    if uploads.is_empty() {
        formatter.warning("Nothing to upload");
        return ExitCode::Success;
    }

    let store = match ctx.open_store().await {
        Ok(store) => store,
        Err(code) => return code,
    };

    let progress = Progress::items(formatter.config(), uploads.len() as u64, "Uploading");
    let mut uploaded = Vec::new();
    let mut failed = Vec::new();
    let mut exit = ExitCode::Success;

    for upload in uploads {
        progress.advance(&upload.key);
        let data = match fs::read(&upload.source) {
            Ok(data) => data,
            Err(e) => {
                formatter.error(&format!("Failed to read {}: {e}", upload.source.display()));
                failed.push(upload.key);
                exit = ExitCode::GeneralError;
                if args.continue_on_error {
                    continue;
                }
                break;
            }
        };

        let options = PutOptions {
            content_type: args
                .content_type
                .clone()
                .or_else(|| guess_content_type(&upload.source)),
            storage_class: Some(storage_class.clone()),
        };
        let size = data.len();
        match store.put_object(&upload.key, data, options).await {
            Ok(()) => {
                tracing::debug!(key = %upload.key, size, "Uploaded");
                uploaded.push(upload.key);
            }
            Err(e) => {
                formatter.error(&format!("Failed to upload {}: {e}", upload.source.display()));
                exit = ExitCode::from(&e);
                failed.push(upload.key);
                if !args.continue_on_error {
                    break;
                }
            }
        }
    }
    progress.finish();

    if formatter.is_json() {
        formatter.json(&PutOutput {
            status: if failed.is_empty() { "success" } else { "partial" },
            uploaded,
            failed,
            storage_class,
        });
    } else if failed.is_empty() {
        formatter.success(&format!("Uploaded {} file(s).", uploaded.len()));
    } else {
        formatter.warning(&format!(
            "Completed with errors: {} succeeded, {} failed",
            uploaded.len(),
            failed.len()
        ));
    }

    exit
}
