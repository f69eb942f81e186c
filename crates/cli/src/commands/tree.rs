//! tree command - Display a folder and its descendants

use bx_core::build_snapshot;
use bx_core::path::{folder_prefix, normalize_folder_path};
use clap::Args;
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;
use crate::output::Progress;
use crate::output::render::tree_lines;

/// Display a folder as a tree
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Folder path (default: bucket root)
    #[arg(default_value = "")]
    pub path: String,

    /// Maximum depth to descend (0 shows direct children only)
    #[arg(short, long)]
    pub depth: Option<usize>,
}

#[derive(Debug, Serialize)]
struct TreeNode {
    path: String,
    name: String,
    kind: bx_core::EntryKind,
    depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
}

/// Execute the tree command
pub async fn execute(args: TreeArgs, ctx: &Context) -> ExitCode {
    let path = normalize_folder_path(&args.path);
    let store = match ctx.open_store().await {
        Ok(store) => store,
        Err(code) => return code,
    };

    let progress = Progress::spinner(ctx.formatter.config(), "Listing objects...");
    let snapshot = build_snapshot(&store, &folder_prefix(&path)).await;
    progress.finish();

    let hierarchy = match snapshot {
        Ok(hierarchy) => hierarchy,
        Err(e) => return ctx.fail(&e),
    };

    if ctx.formatter.is_json() {
        let nodes: Vec<TreeNode> = hierarchy
            .walk(&path, args.depth)
            .into_iter()
            .map(|item| TreeNode {
                path: bx_core::path::join_path(item.parent, &item.entry.name),
                name: item.entry.name.clone(),
                kind: item.entry.kind,
                depth: item.depth,
                size_bytes: item.entry.size_bytes,
            })
            .collect();
        ctx.formatter.json(&nodes);
    } else {
        for line in tree_lines(&hierarchy, &path, args.depth) {
            ctx.formatter.println(&line);
        }
    }

    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: TreeArgs,
    }

    #[test]
    fn test_tree_args() {
        let cli = TestCli::try_parse_from(["tree", "data", "-d", "2"]).unwrap();
        assert_eq!(cli.args.path, "data");
        assert_eq!(cli.args.depth, Some(2));

        let cli = TestCli::try_parse_from(["tree"]).unwrap();
        assert_eq!(cli.args.depth, None);
    }
}
