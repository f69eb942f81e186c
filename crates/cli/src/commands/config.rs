//! Preference commands

use bx_core::Preferences;
use clap::Subcommand;
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current preferences
    Show,

    /// Change a preference (color, storage_class or dates)
    Set(SetArgs),

    /// Print the configuration file location
    Path,
}

/// Arguments for the `config set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Preference key
    pub key: String,

    /// New value
    pub value: String,
}

#[derive(Debug, Serialize)]
struct ConfigPathOutput {
    path: String,
}

/// Execute a config subcommand
pub fn execute(cmd: ConfigCommands, ctx: &Context) -> ExitCode {
    match cmd {
        ConfigCommands::Show => {
            show(&ctx.preferences, ctx);
            ExitCode::Success
        }
        ConfigCommands::Set(args) => {
            let updated = ctx.config_manager.update(|mut config| {
                config.preferences = config.preferences.with(&args.key, &args.value)?;
                Ok(config)
            });
            match updated {
                Ok(config) => {
                    if ctx.formatter.is_json() {
                        ctx.formatter.json(&config.preferences);
                    } else {
                        ctx.formatter.success(&format!("Set {} = {}", args.key, args.value));
                    }
                    ExitCode::Success
                }
                Err(e) => ctx.fail(&e),
            }
        }
        ConfigCommands::Path => {
            let path = ctx.config_manager.config_path().display().to_string();
            if ctx.formatter.is_json() {
                ctx.formatter.json(&ConfigPathOutput { path });
            } else {
                ctx.formatter.println(&path);
            }
            ExitCode::Success
        }
    }
}

fn show(preferences: &Preferences, ctx: &Context) {
    if ctx.formatter.is_json() {
        ctx.formatter.json(preferences);
        return;
    }
    for line in preference_lines(preferences) {
        ctx.formatter.println(&line);
    }
}

fn preference_lines(preferences: &Preferences) -> Vec<String> {
    vec![
        format!("color         = {}", preferences.color),
        format!("storage_class = {}", preferences.storage_class),
        format!("dates         = {}", preferences.dates),
    ]
}
