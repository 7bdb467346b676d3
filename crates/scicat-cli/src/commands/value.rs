//! Value command - read one value or attribute from a file.

use std::path::PathBuf;

use scicat::metadata::get_value_from_file;
use serde_json::Value;

pub fn run(file: PathBuf, path: String, default: String) -> Result<(), Box<dyn std::error::Error>> {
    let value = get_value_from_file(&file, &path, &Value::String(default))?;
    match value {
        Value::String(s) => println!("{}", s),
        other => println!("{}", other),
    }
    Ok(())
}
