use anyhow::Result;
use capsum::{
    app::{self, ServeOptions},
    cli::{handle_clean_command, handle_config_command, handle_fetch_command, Cli, CliCommand},
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("capsum {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(CliCommand::Fetch(args)) => handle_fetch_command(args).await,
        Some(CliCommand::Clean(args)) => handle_clean_command(args),
        Some(CliCommand::Config(args)) => handle_config_command(args),
        Some(CliCommand::Serve(args)) => {
            app::run_service(ServeOptions {
                host: args.host,
                port: args.port,
            })
            .await
        }
        None => app::run_service(ServeOptions::default()).await,
    }
}
