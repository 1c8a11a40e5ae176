//! CLI handler for cleaning a local caption file.

use anyhow::{bail, Context, Result};

use super::args::CleanCliArgs;
use crate::normalizer::Normalizer;

pub fn handle_clean_command(args: CleanCliArgs) -> Result<()> {
    if !args.file.exists() {
        bail!("File not found: {}", args.file.display());
    }

    let bytes = std::fs::read(&args.file).context("Failed to read caption file")?;
    let raw = String::from_utf8_lossy(&bytes);

    let cleaned = Normalizer::create(true)?.run(&raw);

    match &args.output {
        Some(output_path) => {
            std::fs::write(output_path, &cleaned).context("Failed to write output file")?;
            eprintln!("Cleaned text saved to: {}", output_path.display());
        }
        None => println!("{}", cleaned),
    }

    Ok(())
}
