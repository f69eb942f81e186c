//! CLI command definitions and execution
//!
//! Every command that touches the bucket takes a fresh snapshot or performs
//! a single mutation; nothing is cached between invocations.

use bx_core::{ConfigManager, Preferences, ProfileManager};
use bx_s3::S3Store;
use clap::{Parser, Subcommand};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod completions;
mod config;
mod get;
mod ls;
mod mkdir;
mod profile;
mod put;
mod rm;
mod tree;

/// bx - bucket explorer
///
/// Browse an S3-compatible bucket as folders and files, and upload,
/// download or delete objects.
#[derive(Parser, Debug)]
#[command(name = "bx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    /// Profile to use instead of the configured default
    #[arg(short, long, global = true, env = "BX_PROFILE")]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the contents of a folder
    Ls(ls::LsArgs),

    /// Display a folder and its descendants as a tree
    Tree(tree::TreeArgs),

    /// Create an empty folder
    Mkdir(mkdir::MkdirArgs),

    /// Upload local files
    Put(put::PutArgs),

    /// Download objects
    Get(get::GetArgs),

    /// Remove objects or folders
    Rm(rm::RmArgs),

    /// Manage bucket profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommands),

    /// View or change preferences
    #[command(subcommand)]
    Config(config::ConfigCommands),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// State shared by every command of one invocation
pub struct Context {
    pub formatter: Formatter,
    pub preferences: Preferences,
    pub config_manager: ConfigManager,
    profile: Option<String>,
}

impl Context {
    pub fn profiles(&self) -> ProfileManager {
        ProfileManager::with_config_manager(self.config_manager.clone())
    }

    /// Connect to the bucket of the selected profile
    pub async fn open_store(&self) -> Result<S3Store, ExitCode> {
        let profile = self
            .profiles()
            .resolve(self.profile.as_deref())
            .map_err(|e| self.fail(&e))?;
        S3Store::new(&profile).await.map_err(|e| self.fail(&e))
    }

    /// Report `err` and map it to its exit code
    pub fn fail(&self, err: &bx_core::Error) -> ExitCode {
        self.formatter.error(&err.to_string());
        ExitCode::from(err)
    }
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let mut output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
        ..Default::default()
    };

    let command = match cli.command {
        Commands::Completions(args) => return completions::execute(args),
        command => command,
    };

    let loaded = ConfigManager::new().and_then(|manager| {
        let config = manager.load()?;
        Ok((manager, config))
    });
    let (config_manager, config) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            Formatter::new(output_config).error(&format!("Failed to load configuration: {e}"));
            return ExitCode::from(&e);
        }
    };

    output_config.color = config.preferences.color;
    let ctx = Context {
        formatter: Formatter::new(output_config),
        preferences: config.preferences,
        config_manager,
        profile: cli.profile,
    };

    match command {
        Commands::Ls(args) => ls::execute(args, &ctx).await,
        Commands::Tree(args) => tree::execute(args, &ctx).await,
        Commands::Mkdir(args) => mkdir::execute(args, &ctx).await,
        Commands::Put(args) => put::execute(args, &ctx).await,
        Commands::Get(args) => get::execute(args, &ctx).await,
        Commands::Rm(args) => rm::execute(args, &ctx).await,
        Commands::Profile(cmd) => profile::execute(cmd, &ctx),
        Commands::Config(cmd) => config::execute(cmd, &ctx),
        Commands::Completions(args) => completions::execute(args),
    }
}
