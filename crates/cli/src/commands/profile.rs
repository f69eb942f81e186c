//! Profile management commands
//!
//! A profile names one bucket on one endpoint, with the credentials used to
//! reach it. The first profile added becomes the default.

use bx_core::{Profile, ProfileManager};
use clap::Subcommand;
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add or replace a profile
    Add(AddArgs),

    /// List all configured profiles
    List,

    /// Remove a profile
    Remove(NameArgs),

    /// Make a profile the default
    Default(NameArgs),
}

/// Arguments for the `profile add` command
#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Profile name (letters, digits, '_' or '-')
    pub name: String,

    /// Bucket to browse
    pub bucket: String,

    /// S3 endpoint URL (default: AWS for the region)
    #[arg(long, default_value = "")]
    pub endpoint: String,

    /// Region
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Access key ID (default: the SDK credential chain)
    #[arg(long, env = "BX_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Secret access key
    #[arg(long, env = "BX_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Use path-style bucket addressing (needed by most self-hosted servers)
    #[arg(long)]
    pub path_style: bool,

    /// Replace an existing profile with the same name
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments naming an existing profile
#[derive(clap::Args, Debug)]
pub struct NameArgs {
    /// Profile name
    pub name: String,
}

/// Profile information for output (without secrets)
#[derive(Debug, Serialize)]
struct ProfileInfo {
    name: String,
    bucket: String,
    endpoint: String,
    region: String,
    path_style: bool,
    static_credentials: bool,
    default: bool,
}

impl ProfileInfo {
    fn new(profile: &Profile, default: Option<&str>) -> Self {
        Self {
            name: profile.name.clone(),
            bucket: profile.bucket.clone(),
            endpoint: profile.endpoint.clone(),
            region: profile.region.clone(),
            path_style: profile.path_style,
            static_credentials: profile.has_static_credentials(),
            default: default == Some(profile.name.as_str()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProfileOperationOutput<'a> {
    success: bool,
    profile: &'a str,
    message: String,
}

impl AddArgs {
    fn into_profile(self) -> Profile {
        let mut profile = Profile::new(self.name, self.endpoint, self.bucket);
        profile.region = self.region;
        profile.path_style = self.path_style;
        profile.with_credentials(
            self.access_key.unwrap_or_default(),
            self.secret_key.unwrap_or_default(),
        )
    }
}

/// Execute a profile subcommand
pub fn execute(cmd: ProfileCommands, ctx: &Context) -> ExitCode {
    let manager = ctx.profiles();
    let outcome = match cmd {
        ProfileCommands::List => return list(&manager, ctx),
        ProfileCommands::Add(args) => {
            let overwrite = args.overwrite;
            let profile = args.into_profile();
            let name = profile.name.clone();
            manager
                .add(profile, overwrite)
                .map(|()| (name, "Profile saved".to_string()))
        }
        ProfileCommands::Remove(args) => manager
            .remove(&args.name)
            .map(|()| (args.name, "Profile removed".to_string())),
        ProfileCommands::Default(args) => manager
            .set_default(&args.name)
            .map(|()| (args.name, "Default profile set".to_string())),
    };

    match outcome {
        Ok((name, message)) => {
            if ctx.formatter.is_json() {
                ctx.formatter.json(&ProfileOperationOutput {
                    success: true,
                    profile: &name,
                    message,
                });
            } else {
                ctx.formatter.success(&format!("{message}: {name}"));
            }
            ExitCode::Success
        }
        Err(e) => ctx.fail(&e),
    }
}

fn list(manager: &ProfileManager, ctx: &Context) -> ExitCode {
    let (profiles, default) = match manager.list().and_then(|p| Ok((p, manager.default_name()?)))
    {
        Ok(loaded) => loaded,
        Err(e) => return ctx.fail(&e),
    };
    let infos: Vec<ProfileInfo> = profiles
        .iter()
        .map(|p| ProfileInfo::new(p, default.as_deref()))
        .collect();

    if ctx.formatter.is_json() {
        ctx.formatter.json(&infos);
        return ExitCode::Success;
    }

    if infos.is_empty() {
        ctx.formatter
            .println("No profiles configured. Add one with 'bx profile add NAME BUCKET'.");
        return ExitCode::Success;
    }
    for info in &infos {
        let marker = if info.default { "*" } else { " " };
        let endpoint = if info.endpoint.is_empty() {
            "(aws)"
        } else {
            info.endpoint.as_str()
        };
        ctx.formatter.println(&format!(
            "{marker} {:<12} {:<24} {endpoint} ({})",
            info.name, info.bucket, info.region
        ));
    }
    ExitCode::Success
}
