//! Extract command - dump a file's scientific metadata as JSON.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use scicat::metadata::MetadataExtractor;

use crate::cli::ExtractArgs;

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    strict: bool,
    args: ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::extract_config(&args)?;
    let extraction = MetadataExtractor::with_config(config).extract_file(&file)?;

    if !extraction.is_complete() {
        eprintln!(
            "{} {} value(s) in {} replaced by the default",
            "Warning:".yellow().bold(),
            extraction.degraded.len(),
            file.display()
        );
        for degraded in &extraction.degraded {
            eprintln!("  {} {}", degraded.path.white(), degraded.reason.dimmed());
        }
        if strict {
            return Err(format!(
                "{} unreadable value(s) in {}",
                extraction.degraded.len(),
                file.display()
            )
            .into());
        }
    }

    let json = serde_json::to_string_pretty(&extraction.metadata)?;
    match output {
        Some(path) => {
            fs::write(&path, json)?;
            eprintln!(
                "{} {}",
                "Metadata written to".green(),
                path.display().to_string().white()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}
