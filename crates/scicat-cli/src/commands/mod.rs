//! CLI command implementations.

pub mod extract;
pub mod get;
pub mod ingest;
pub mod token;
pub mod value;

use scicat::client::{ClientConfig, ENV_TOKEN, ENV_URL, ScicatClient};
use scicat::metadata::ExtractConfig;

use crate::cli::{Connection, ExtractArgs};

/// Open a client from flags, falling back to `SCICAT_*` variables.
pub fn connect(connection: &Connection) -> Result<ScicatClient, Box<dyn std::error::Error>> {
    let config = ClientConfig::from_lookup(|key| match key {
        ENV_URL => connection.url.clone(),
        ENV_TOKEN => connection.token.clone(),
        _ => std::env::var(key).ok(),
    })?;
    Ok(ScicatClient::new(config)?)
}

/// Extraction settings: the TOML file if given, then flag overrides.
pub fn extract_config(args: &ExtractArgs) -> Result<ExtractConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ExtractConfig::from_toml_file(path)?,
        None => ExtractConfig::default(),
    };
    if !args.exclude_roots.is_empty() {
        config.exclude_root_entries = args.exclude_roots.clone();
    }
    if args.include_root {
        config.include_root_entry = true;
    }
    if !args.skip_keys.is_empty() {
        config.skip_keys.extend(args.skip_keys.iter().cloned());
    }
    if args.leave_as_array {
        config.leave_as_array = true;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_exclude_flags_replace_default() {
        let args = ExtractArgs {
            exclude_roots: vec!["root2".to_string(), "calibration".to_string()],
            ..Default::default()
        };
        let config = extract_config(&args).unwrap();
        assert_eq!(config.exclude_root_entries, vec!["root2", "calibration"]);
    }

    #[test]
    fn test_no_exclude_flags_keep_configured_list() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "exclude_root_entries = [\"logs\"]").unwrap();
        let args = ExtractArgs {
            config: Some(file.path().to_path_buf()),
            skip_keys: vec!["NX_class".to_string()],
            ..Default::default()
        };
        let config = extract_config(&args).unwrap();
        assert_eq!(config.exclude_root_entries, vec!["logs"]);
        assert_eq!(config.skip_keys, vec!["NX_class"]);
        assert!(!config.include_root_entry);
    }
}
