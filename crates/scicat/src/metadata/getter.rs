//! Single-path lookups: `/entry/sample/name` reads a value,
//! `/entry/sample@units` reads an attribute.

use std::path::Path;

use indexmap::IndexMap;
use log::warn;
use serde_json::Value;

use crate::error::{Result, ScicatError};

use super::coerce::coerce;
use super::source::{TreeSource, open_source};

/// Separates a node path from an attribute name.
pub const ATTRIBUTE_SEPARATOR: char = '@';

/// Read and coerce the value or attribute at `path`.
///
/// Any failure is logged and answered with `default`.
pub fn get_value(
    source: &dyn TreeSource,
    path: &str,
    default: &Value,
    leave_as_array: bool,
) -> Value {
    match try_get_value(source, path, leave_as_array) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                "cannot get value from file path {}, setting to default ({})",
                path, e
            );
            default.clone()
        }
    }
}

/// Read and coerce the value or attribute at `path`, reporting failures.
pub fn try_get_value(source: &dyn TreeSource, path: &str, leave_as_array: bool) -> Result<Value> {
    let raw = match path.rsplit_once(ATTRIBUTE_SEPARATOR) {
        Some((node, attribute)) => source
            .read_attributes(node)?
            .into_iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, value)| value)
            .ok_or_else(|| ScicatError::LeafUnreadable {
                path: path.to_string(),
                message: format!("no attribute named '{}'", attribute),
            })??,
        None => source.read_value(path)?,
    };

    coerce(&raw, leave_as_array).map_err(|e| ScicatError::LeafUnreadable {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Look up several paths at once; results are keyed by path.
pub fn get_values<'a, I>(source: &dyn TreeSource, paths: I, default: &Value) -> IndexMap<String, Value>
where
    I: IntoIterator<Item = &'a str>,
{
    paths
        .into_iter()
        .map(|path| (path.to_string(), get_value(source, path, default, false)))
        .collect()
}

/// Open `file` and read a single path from it.
///
/// Fails when the file cannot be opened; a missing path yields `default`.
pub fn get_value_from_file(file: impl AsRef<Path>, path: &str, default: &Value) -> Result<Value> {
    let source = open_source(file)?;
    Ok(get_value(source.as_ref(), path, default, false))
}
