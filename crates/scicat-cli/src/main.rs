//! scicat CLI - metadata extraction and SciCat ingestion.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::ingest::IngestOptions;

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Extract {
            file,
            output,
            strict,
            extract,
        } => commands::extract::run(file, output, strict, extract),

        Commands::Value {
            file,
            path,
            default,
        } => commands::value::run(file, path, default),

        Commands::Get {
            pid,
            datablocks,
            connection,
        } => commands::get::run(pid, datablocks, connection),

        Commands::Ingest {
            file,
            owner_group,
            access_groups,
            owner,
            contact_email,
            principal_investigator,
            creation_location,
            name,
            thumbnail,
            dry_run,
            extract,
            connection,
        } => {
            let options = IngestOptions {
                owner_group,
                access_groups,
                owner,
                contact_email,
                principal_investigator,
                creation_location,
                name,
                thumbnail,
                dry_run,
            };
            commands::ingest::run(file, options, extract, connection)
        }

        Commands::Token {
            url,
            username,
            password,
        } => commands::token::run(url, username, password),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
