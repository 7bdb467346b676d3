//! CLI argument definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// scicat: extract scientific metadata and talk to a SciCat catalog
#[derive(Parser)]
#[command(name = "scicat")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Backend connection flags; unset values fall back to `SCICAT_*` variables.
#[derive(Args, Clone, Debug, Default)]
pub struct Connection {
    /// SciCat API base URL (e.g. http://localhost:3000/api/v3)
    #[arg(long, env = "SCICAT_URL")]
    pub url: Option<String>,

    /// Access token
    #[arg(long, env = "SCICAT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

/// Flags shaping metadata extraction.
#[derive(Args, Clone, Debug, Default)]
pub struct ExtractArgs {
    /// TOML file with extraction settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Walk every top-level entry, including excluded ones
    #[arg(long)]
    pub include_root: bool,

    /// Top-level entry to leave out (repeatable; replaces the configured list)
    #[arg(long = "exclude", value_name = "NAME")]
    pub exclude_roots: Vec<String>,

    /// Key to omit wherever it occurs (repeatable)
    #[arg(long = "skip", value_name = "KEY")]
    pub skip_keys: Vec<String>,

    /// Keep arrays instead of reducing them to their mean
    #[arg(long)]
    pub leave_as_array: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract scientific metadata from an HDF5/NeXus file as JSON
    Extract {
        /// Path to the HDF5/NeXus file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail if any value had to be replaced by the default
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Read a single value or attribute (`/entry/x` or `/entry/x@units`)
    Value {
        /// Path to the HDF5/NeXus file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path inside the file
        #[arg(value_name = "PATH")]
        path: String,

        /// Value printed when the path cannot be read
        #[arg(long, default_value = "none")]
        default: String,
    },

    /// Fetch a dataset from the catalog
    Get {
        /// Dataset pid
        #[arg(value_name = "PID")]
        pid: String,

        /// Also fetch the dataset's original datablocks
        #[arg(long)]
        datablocks: bool,

        #[command(flatten)]
        connection: Connection,
    },

    /// Extract metadata and register the file as a raw dataset
    Ingest {
        /// Path to the HDF5/NeXus file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Group owning the dataset
        #[arg(long)]
        owner_group: String,

        /// Additional groups with read access (repeatable)
        #[arg(long = "access-group", value_name = "GROUP")]
        access_groups: Vec<String>,

        /// Owner name
        #[arg(long)]
        owner: String,

        /// Contact email
        #[arg(long)]
        contact_email: String,

        /// Principal investigator (defaults to the contact email)
        #[arg(long)]
        principal_investigator: Option<String>,

        /// Where the data was created (instrument or facility)
        #[arg(long)]
        creation_location: String,

        /// Dataset name (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,

        /// Image attached as the dataset thumbnail
        #[arg(long)]
        thumbnail: Option<PathBuf>,

        /// Print the dataset instead of sending it
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        extract: ExtractArgs,

        #[command(flatten)]
        connection: Connection,
    },

    /// Log in and print an access token
    Token {
        /// SciCat API base URL
        #[arg(long, env = "SCICAT_URL")]
        url: String,

        /// Login name
        #[arg(short, long, env = "SCICAT_USERNAME")]
        username: String,

        /// Password
        #[arg(short, long, env = "SCICAT_PASSWORD", hide_env_values = true)]
        password: String,
    },
}
