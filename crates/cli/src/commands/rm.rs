//! rm command - Remove objects or folders
//!
//! Plain keys are deleted as given. With `-r`, each path is treated as a
//! folder and everything under its prefix is deleted page by page.

use bx_core::path::{folder_prefix, normalize_folder_path};
use bx_core::{ObjectStore, collect_records, delete_prefix};
use clap::Args;
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;
use crate::output::Progress;

/// Remove objects
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Object keys, or folder paths with -r
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Remove folders and everything below them
    #[arg(short, long)]
    pub recursive: bool,

    /// Allow removing the whole bucket with -r /
    #[arg(short, long)]
    pub force: bool,

    /// Only show what would be deleted (dry run)
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    status: &'static str,
    dry_run: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    keys: Vec<String>,
    total: usize,
}

/// What one command-line path asks to delete
#[derive(Debug, PartialEq, Eq)]
enum Target {
    Key(String),
    Prefix(String),
}

fn parse_target(path: &str, recursive: bool, force: bool) -> Result<Target, String> {
    if recursive {
        let prefix = folder_prefix(path);
        if prefix.is_empty() && !force {
            return Err("Refusing to remove the whole bucket without --force".to_string());
        }
        return Ok(Target::Prefix(prefix));
    }

    let key = path.trim_start_matches('/');
    if key.is_empty() {
        return Err("Object key cannot be empty".to_string());
    }
    if key.ends_with('/') {
        // A bare folder marker; its contents stay unless -r is given
        let folder = normalize_folder_path(key);
        return Ok(Target::Key(format!("{folder}/")));
    }
    Ok(Target::Key(key.to_string()))
}

/// Execute the rm command
pub async fn execute(args: RmArgs, ctx: &Context) -> ExitCode {
    let formatter = &ctx.formatter;

    let mut targets = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        match parse_target(path, args.recursive, args.force) {
            Ok(target) => targets.push(target),
            Err(message) => {
                formatter.error(&message);
                return ExitCode::UsageError;
            }
        }
    }

    let store = match ctx.open_store().await {
        Ok(store) => store,
        Err(code) => return code,
    };

    let result = if args.dry_run {
        planned_keys(&store, targets).await.map(|keys| {
            let total = keys.len();
            (keys, total)
        })
    } else {
        remove(&store, targets, ctx).await
    };

    let (keys, total) = match result {
        Ok(done) => done,
        Err(e) => return ctx.fail(&e),
    };

    if formatter.is_json() {
        formatter.json(&RmOutput {
            status: "success",
            dry_run: args.dry_run,
            keys,
            total,
        });
    } else if args.dry_run {
        for key in &keys {
            formatter.println(&format!("Would remove: {key}"));
        }
        formatter.println(&format!("{total} object(s) would be removed."));
    } else {
        formatter.success(&format!("Removed {total} object(s)."));
    }

    ExitCode::Success
}

/// Keys that would be deleted, resolving prefixes with a listing
async fn planned_keys<S: ObjectStore>(
    store: &S,
    targets: Vec<Target>,
) -> bx_core::Result<Vec<String>> {
    let mut keys = Vec::new();
    for target in targets {
        match target {
            Target::Key(key) => keys.push(key),
            Target::Prefix(prefix) => keys.extend(
                collect_records(store, &prefix)
                    .await?
                    .into_iter()
                    .map(|record| record.key),
            ),
        }
    }
    Ok(keys)
}

/// Delete the targets, returning the keys reported deleted and their count
async fn remove<S: ObjectStore>(
    store: &S,
    targets: Vec<Target>,
    ctx: &Context,
) -> bx_core::Result<(Vec<String>, usize)> {
    let mut plain = Vec::new();
    let mut prefixes = Vec::new();
    for target in targets {
        match target {
            Target::Key(key) => plain.push(key),
            Target::Prefix(prefix) => prefixes.push(prefix),
        }
    }

    let mut deleted = match plain.len() {
        0 => Vec::new(),
        1 => {
            store.delete_object(&plain[0]).await?;
            plain
        }
        _ => store.delete_objects(plain).await?,
    };
    let mut total = deleted.len();

    for prefix in prefixes {
        let progress = Progress::spinner(ctx.formatter.config(), &format!("Removing {prefix}"));
        let removed = delete_prefix(store, &prefix).await;
        progress.finish();
        total += removed?;
        deleted.push(prefix);
    }

    Ok((deleted, total))
}
