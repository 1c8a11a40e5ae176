//! CLI handler for inspecting and editing the configuration.

use anyhow::{bail, Result};

use super::args::{ConfigCliArgs, ConfigCommand, ConfigSetArgs};
use crate::config::Config;
use crate::global;
use crate::workflow::mask_token;

pub fn handle_config_command(args: ConfigCliArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(),
        ConfigCommand::Set(set_args) => set_config(set_args),
    }
}

fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Config file: {}", global::config_file()?.display());
    println!();
    println!("Server:     {}:{}", config.server.host, config.server.port);
    println!("Workflow:");
    println!("  endpoint:    {}", config.workflow.api_base_url);
    println!("  workflow_id: {}", display_or_unset(&config.workflow.workflow_id));
    println!("  token:       {}", display_or_unset(&mask_token(&config.workflow.token)));
    println!("  timeout:     {}s", config.workflow.timeout_seconds);
    println!("  configured:  {}", config.is_workflow_configured());
    println!("Retrieval:");
    println!(
        "  command:     {}",
        config.retrieval.command_path.as_deref().unwrap_or("yt-dlp (PATH)")
    );
    println!("  subtitles:   {}", config.retrieval.subtitles_dir()?.display());
    println!("  cookies:     {}", config.retrieval.cookies_dir()?.display());

    Ok(())
}

fn display_or_unset(value: &str) -> &str {
    if value.trim().is_empty() {
        "(unset)"
    } else {
        value
    }
}

fn set_config(args: ConfigSetArgs) -> Result<()> {
    if args.workflow_id.is_none() && args.token.is_none() && args.api_base_url.is_none() {
        bail!("Nothing to update. Pass --workflow-id, --token or --api-base-url");
    }

    // Environment overrides must not end up in the file
    let mut config = Config::load_from(&global::config_file()?)?;
    apply_settings(&mut config, args)?;
    config.save()?;

    println!("Configuration saved to {}", global::config_file()?.display());
    Ok(())
}

fn apply_settings(config: &mut Config, args: ConfigSetArgs) -> Result<()> {
    if let Some(id) = args.workflow_id {
        let id = id.trim().to_string();
        if id.parse::<i64>().is_err() {
            bail!("Workflow id must be an integer, got '{}'", id);
        }
        config.workflow.workflow_id = id;
    }
    if let Some(token) = args.token {
        config.workflow.token = token.trim().to_string();
    }
    if let Some(url) = args.api_base_url {
        config.workflow.api_base_url = url.trim().to_string();
    }
    Ok(())
}
