//! mkdir command - Create an empty folder
//!
//! Object stores have no real folders: this writes an empty marker object
//! whose key ends in `/`.

use bx_core::ObjectStore as _;
use bx_core::path::{last_segment, normalize_folder_path, parent_path};
use clap::Args;
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;

/// Create a folder
#[derive(Args, Debug)]
pub struct MkdirArgs {
    /// Folder to create, e.g. data/images
    pub path: String,
}

#[derive(Debug, Serialize)]
struct MkdirOutput {
    status: &'static str,
    key: String,
}

/// Split a folder path into its parent and the new folder's name
fn split_target(path: &str) -> Option<(String, String)> {
    let path = normalize_folder_path(path);
    if path.is_empty() {
        return None;
    }
    let parent = parent_path(&path).unwrap_or_default().to_string();
    let name = last_segment(&path).to_string();
    Some((parent, name))
}

/// Execute the mkdir command
pub async fn execute(args: MkdirArgs, ctx: &Context) -> ExitCode {
    let Some((parent, name)) = split_target(&args.path) else {
        ctx.formatter.error("Folder path cannot be empty");
        return ExitCode::UsageError;
    };

    let store = match ctx.open_store().await {
        Ok(store) => store,
        Err(code) => return code,
    };

    match store.create_folder(&parent, &name).await {
        Ok(key) => {
            if ctx.formatter.is_json() {
                ctx.formatter.json(&MkdirOutput {
                    status: "success",
                    key,
                });
            } else {
                ctx.formatter.success(&format!("Created folder '{key}'"));
            }
            ExitCode::Success
        }
        Err(e) => ctx.fail(&e),
    }
}
