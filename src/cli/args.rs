use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "capsum")]
#[command(about = "Video captions to clean text and workflow summaries", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run the HTTP service (default when no command is given)
    Serve(ServeCliArgs),
    /// Download captions for one video, clean them and summarize them
    Fetch(FetchCliArgs),
    /// Clean a caption file that is already on disk
    Clean(CleanCliArgs),
    /// Show or change the configuration
    Config(ConfigCliArgs),
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct ServeCliArgs {
    /// Address to bind (default from config: 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,
    /// Port to listen on (default from config: 5001)
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(ClapArgs, Debug)]
pub struct FetchCliArgs {
    /// Video URL
    pub url: String,
    /// Caption language code
    #[arg(short, long, default_value = "en")]
    pub lang: String,
    /// Browser to read cookies from (chrome, firefox, safari, edge)
    #[arg(long)]
    pub browser: Option<String>,
    /// Exported cookies file
    #[arg(long)]
    pub cookies_file: Option<String>,
    /// Forward the raw caption track instead of cleaned text
    #[arg(long)]
    pub no_clean: bool,
    /// Do not send the text to the workflow even if it is configured
    #[arg(long)]
    pub no_workflow: bool,
    /// Write the cleaned text to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(ClapArgs, Debug)]
pub struct CleanCliArgs {
    /// Caption file (WebVTT) to clean
    pub file: PathBuf,
    /// Write the cleaned text to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct ConfigCliArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the current configuration (token masked)
    Show,
    /// Update workflow settings in the config file
    Set(ConfigSetArgs),
}

#[derive(ClapArgs, Debug)]
pub struct ConfigSetArgs {
    /// Numeric workflow id
    #[arg(long)]
    pub workflow_id: Option<String>,
    /// Bearer token for the workflow API
    #[arg(long)]
    pub token: Option<String>,
    /// Workflow run endpoint
    #[arg(long)]
    pub api_base_url: Option<String>,
}
