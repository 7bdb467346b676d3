//! Flattening a hierarchical file into a nested scientific-metadata mapping.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ScicatError};

use super::coerce::ValueCoercer;
use super::merge;
use super::source::{NodeKind, TreeSource, join_path, open_source, split_path};
use super::value::RawValue;

/// Root branch skipped by default (vendor-specific instrument dump).
pub const DEFAULT_EXCLUDED_ROOT: &str = "Saxslab";

/// Value substituted for leaves that cannot be read.
pub const DEFAULT_UNREADABLE: &str = "none";

/// Key holding a leaf's value when the leaf also carries attributes.
pub const VALUE_KEY: &str = "value";

/// Configuration for metadata extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Top-level branch names to skip.
    pub exclude_root_entries: Vec<String>,
    /// Walk every top-level branch, ignoring `exclude_root_entries`, and
    /// keep the branch names in the output.
    pub include_root_entry: bool,
    /// Key names omitted wherever they occur in the tree.
    pub skip_keys: Vec<String>,
    /// Substitute for unreadable leaves.
    pub default: Value,
    /// Keep multi-element arrays instead of reducing them to a mean.
    pub leave_as_array: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            exclude_root_entries: vec![DEFAULT_EXCLUDED_ROOT.to_string()],
            include_root_entry: false,
            skip_keys: Vec::new(),
            default: Value::String(DEFAULT_UNREADABLE.to_string()),
            leave_as_array: false,
        }
    }
}

impl ExtractConfig {
    /// Parse a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ScicatError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_excluded_roots<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_root_entries = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_skip_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_include_root_entry(mut self, include: bool) -> Self {
        self.include_root_entry = include;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_leave_as_array(mut self, leave: bool) -> Self {
        self.leave_as_array = leave;
        self
    }
}

/// Outcome of reading one leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafRead {
    /// Value read and coerced.
    Ok(Value),
    /// Value unavailable; `default` stands in for it.
    Degraded { default: Value, reason: String },
}

impl LeafRead {
    pub fn value(&self) -> &Value {
        match self {
            LeafRead::Ok(v) => v,
            LeafRead::Degraded { default, .. } => default,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            LeafRead::Ok(v) => v,
            LeafRead::Degraded { default, .. } => default,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, LeafRead::Degraded { .. })
    }
}

/// What part of a leaf could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadTarget {
    Value,
    Attributes,
    Attribute,
    Children,
}

/// A read failure that was recovered during the walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradedRead {
    /// Path of the affected node (attributes as `path@name`).
    pub path: String,
    pub target: ReadTarget,
    pub reason: String,
}

/// Result of an extraction: the metadata tree plus the recovered failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Nested metadata, with a single remaining root branch unwrapped.
    pub metadata: Value,
    /// Reads that fell back to defaults or were dropped.
    pub degraded: Vec<DegradedRead>,
}

impl Extraction {
    pub fn is_complete(&self) -> bool {
        self.degraded.is_empty()
    }

    pub fn into_metadata(self) -> Value {
        self.metadata
    }
}

/// Walks a hierarchical source and collects its values and attributes.
pub struct MetadataExtractor {
    config: ExtractConfig,
    coercer: ValueCoercer,
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self::with_config(ExtractConfig::default())
    }

    /// Create an extractor with custom configuration.
    pub fn with_config(config: ExtractConfig) -> Self {
        let coercer = if config.leave_as_array {
            ValueCoercer::preserving_arrays()
        } else {
            ValueCoercer::new()
        };
        Self { config, coercer }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Open a file and extract its metadata.
    ///
    /// Fails only when the file itself cannot be opened; unreadable values
    /// inside it are replaced by the configured default.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<Extraction> {
        let path = path.as_ref();
        debug!("Extracting scientific metadata from {}", path.display());
        let source = open_source(path)?;
        self.extract(source.as_ref())
    }

    /// Extract metadata from an already opened source.
    pub fn extract(&self, source: &dyn TreeSource) -> Result<Extraction> {
        let mut roots = source.children("/")?;
        if !self.config.include_root_entry {
            roots.retain(|name| !self.config.exclude_root_entries.contains(name));
        }
        roots.sort();

        let mut walk = Walk {
            source,
            extractor: self,
            metadata: Map::new(),
            degraded: Vec::new(),
        };
        for name in roots.iter().filter(|name| !self.is_skipped(name)) {
            walk.unwind(&join_path("/", name));
        }

        let Walk {
            metadata, degraded, ..
        } = walk;

        // a single remaining root branch is returned without its wrapper,
        // unless the whole file was asked for
        let metadata = if metadata.len() == 1 && !self.config.include_root_entry {
            metadata
                .into_iter()
                .next()
                .map(|(_, only)| only)
                .unwrap_or_default()
        } else {
            Value::Object(metadata)
        };

        Ok(Extraction { metadata, degraded })
    }

    /// Read and coerce the value at `path`, falling back to the default.
    pub fn read_leaf(&self, source: &dyn TreeSource, path: &str) -> LeafRead {
        let reason = match source.read_value(path) {
            Ok(raw) => match self.coercer.coerce(&raw) {
                Ok(value) => return LeafRead::Ok(value),
                Err(e) => e.to_string(),
            },
            Err(e) => e.to_string(),
        };
        warn!(
            "file has no value at path {}, setting to default: {} ({})",
            path, self.config.default, reason
        );
        LeafRead::Degraded {
            default: self.config.default.clone(),
            reason,
        }
    }

    fn is_skipped(&self, name: &str) -> bool {
        self.config.skip_keys.iter().any(|k| k == name)
    }
}

/// State of one extraction call.
struct Walk<'a> {
    source: &'a dyn TreeSource,
    extractor: &'a MetadataExtractor,
    metadata: Map<String, Value>,
    degraded: Vec<DegradedRead>,
}

impl Walk<'_> {
    fn unwind(&mut self, path: &str) {
        match self.source.node_kind(path) {
            Some(NodeKind::Group) => self.unwind_group(path),
            // unknown paths are read like leaves and degrade there
            Some(NodeKind::Leaf) | None => self.unwind_leaf(path),
        }
    }

    fn unwind_group(&mut self, path: &str) {
        let mut names = match self.source.children(path) {
            Ok(names) => names,
            Err(e) => {
                warn!("cannot list members of group {}: {}", path, e);
                self.record(path, ReadTarget::Children, e.to_string());
                return;
            }
        };
        names.sort();
        let extractor = self.extractor;
        for name in names.iter().filter(|n| !extractor.is_skipped(n)) {
            self.unwind(&join_path(path, name));
        }
    }

    fn unwind_leaf(&mut self, path: &str) {
        let read = self.extractor.read_leaf(self.source, path);
        if let LeafRead::Degraded { reason, .. } = &read {
            self.record(path, ReadTarget::Value, reason.clone());
        }
        let value = read.into_value();

        let attributes = self.read_attributes(path);
        if value == Value::String(String::new()) {
            return;
        }

        let entry = if attributes.is_empty() {
            value
        } else {
            let mut map = Map::new();
            map.insert(VALUE_KEY.to_string(), value);
            for (name, attr) in attributes {
                map.insert(name, attr);
            }
            Value::Object(map)
        };

        let levels: Vec<&str> = split_path(path).collect();
        merge::insert_path(&mut self.metadata, &levels, entry);
    }

    fn read_attributes(&mut self, path: &str) -> Vec<(String, Value)> {
        let raw = match self.source.read_attributes(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("cannot read attributes of {}: {}", path, e);
                self.record(path, ReadTarget::Attributes, e.to_string());
                return Vec::new();
            }
        };

        let mut attributes = Vec::with_capacity(raw.len());
        for (name, read) in raw {
            if self.extractor.is_skipped(&name) {
                continue;
            }
            let coerced = self.coerce_attribute(path, &name, read);
            attributes.push((name, coerced));
        }
        attributes
    }

    /// Coerce one attribute; a failed read or coercion degrades only that
    /// attribute.
    fn coerce_attribute(&mut self, path: &str, name: &str, read: Result<RawValue>) -> Value {
        let reason = match read {
            Ok(raw) => match self.extractor.coercer.coerce(&raw) {
                Ok(v) => return v,
                Err(e) => e.to_string(),
            },
            Err(e) => e.to_string(),
        };
        let default = self.extractor.config.default.clone();
        warn!(
            "attribute {}@{} cannot be read, setting to default: {} ({})",
            path, name, default, reason
        );
        self.record(&format!("{}@{}", path, name), ReadTarget::Attribute, reason);
        default
    }

    fn record(&mut self, path: &str, target: ReadTarget, reason: String) {
        self.degraded.push(DegradedRead {
            path: path.to_string(),
            target,
            reason,
        });
    }
}

/// Extract scientific metadata from a file with the given configuration.
pub fn extract_scientific_metadata(path: impl AsRef<Path>, config: ExtractConfig) -> Result<Value> {
    MetadataExtractor::with_config(config)
        .extract_file(path)
        .map(Extraction::into_metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::source::{Leaf, MemoryTree};
    use serde_json::json;

    fn two_roots() -> MemoryTree {
        let mut tree = MemoryTree::default();
        tree.insert("/root1/x", Leaf::new(3.14).with_attr("units", "m"))
            .insert("/root2/y", Leaf::new(2i64));
        tree
    }

    #[test]
    fn test_excluded_root_and_single_root_unwrap() {
        let config = ExtractConfig::default().with_excluded_roots(["root2"]);
        let result = MetadataExtractor::with_config(config)
            .extract(&two_roots())
            .unwrap();
        assert_eq!(result.metadata, json!({"x": {"value": 3.14, "units": "m"}}));
        assert!(result.is_complete());
    }

    #[test]
    fn test_two_roots_stay_wrapped() {
        let result = MetadataExtractor::new().extract(&two_roots()).unwrap();
        assert_eq!(
            result.metadata,
            json!({"root1": {"x": {"value": 3.14, "units": "m"}}, "root2": {"y": 2}})
        );
    }

    #[test]
    fn test_include_root_ignores_exclusions() {
        let config = ExtractConfig::default()
            .with_excluded_roots(["root2"])
            .with_include_root_entry(true);
        let result = MetadataExtractor::with_config(config)
            .extract(&two_roots())
            .unwrap();
        assert_eq!(result.metadata["root2"], json!({"y": 2}));
    }

    #[test]
    fn test_include_root_keeps_single_branch_name() {
        let mut tree = MemoryTree::default();
        tree.insert("/entry/x", Leaf::new(1i64));
        let config = ExtractConfig::default().with_include_root_entry(true);
        let result = MetadataExtractor::with_config(config).extract(&tree).unwrap();
        assert_eq!(result.metadata, json!({"entry": {"x": 1}}));

        let result = MetadataExtractor::new().extract(&tree).unwrap();
        assert_eq!(result.metadata, json!({"x": 1}));
    }

    #[test]
    fn test_unreadable_attribute_keeps_siblings() {
        let mut tree = MemoryTree::default();
        tree.insert(
            "/entry/x",
            Leaf::new(3.14)
                .with_attr("units", "m")
                .with_unreadable_attr("calibration")
                .with_attr("long_name", "position"),
        );
        let result = MetadataExtractor::new().extract(&tree).unwrap();
        assert_eq!(
            result.metadata,
            json!({"x": {"value": 3.14, "units": "m", "calibration": "none", "long_name": "position"}})
        );
        assert_eq!(result.degraded.len(), 1);
        assert_eq!(result.degraded[0].path, "/entry/x@calibration");
        assert_eq!(result.degraded[0].target, ReadTarget::Attribute);
    }

    #[test]
    fn test_unreadable_leaf_uses_default() {
        let mut tree = MemoryTree::default();
        tree.insert("/entry/good", Leaf::new(1i64))
            .insert("/entry/bad", Leaf::unreadable());
        let result = MetadataExtractor::new().extract(&tree).unwrap();
        assert_eq!(result.metadata, json!({"good": 1, "bad": "none"}));
        assert_eq!(result.degraded.len(), 1);
        assert_eq!(result.degraded[0].path, "/entry/bad");
        assert_eq!(result.degraded[0].target, ReadTarget::Value);
    }

    #[test]
    fn test_empty_string_leaf_skipped() {
        let mut tree = MemoryTree::default();
        tree.insert("/entry/blank", Leaf::new("").with_attr("units", "m"))
            .insert("/entry/kept", Leaf::new("x"));
        let result = MetadataExtractor::new().extract(&tree).unwrap();
        assert_eq!(result.metadata, json!({"kept": "x"}));
    }

    #[test]
    fn test_unreadable_attributes_give_bare_value() {
        let mut tree = MemoryTree::default();
        tree.insert("/entry/a", Leaf::new(1.5).with_unreadable_attributes())
            .insert("/entry/b", Leaf::new(2i64));
        let result = MetadataExtractor::new().extract(&tree).unwrap();
        assert_eq!(result.metadata, json!({"a": 1.5, "b": 2}));
        assert_eq!(result.degraded[0].target, ReadTarget::Attributes);
    }

    #[test]
    fn test_text_array_attribute_degrades() {
        let mut tree = MemoryTree::default();
        tree.insert(
            "/entry/a",
            Leaf::new(1i64).with_attr("axes", vec!["q".to_string(), "i".to_string()]),
        )
        .insert("/entry/b", Leaf::new(2i64));
        let result = MetadataExtractor::new().extract(&tree).unwrap();
        assert_eq!(result.metadata["a"], json!({"value": 1, "axes": "none"}));
        assert_eq!(result.degraded[0].path, "/entry/a@axes");
    }

    #[test]
    fn test_custom_default() {
        let mut tree = MemoryTree::default();
        tree.insert("/e/x", Leaf::unreadable()).insert("/e/y", Leaf::new(1i64));
        let config = ExtractConfig::default().with_default("n/a");
        let result = MetadataExtractor::with_config(config).extract(&tree).unwrap();
        assert_eq!(result.metadata["x"], json!("n/a"));
    }

    #[test]
    fn test_config_from_toml() {
        let config = ExtractConfig::from_toml_str(
            r#"
            exclude_root_entries = ["Saxslab", "calibration"]
            skip_keys = ["sasdata1"]
            leave_as_array = true
            "#,
        )
        .unwrap();
        assert_eq!(config.exclude_root_entries.len(), 2);
        assert_eq!(config.skip_keys, vec!["sasdata1"]);
        assert!(config.leave_as_array);
        assert_eq!(config.default, json!("none"));
        assert!(!config.include_root_entry);
    }

    #[test]
    fn test_default_config() {
        let config = ExtractConfig::default();
        assert_eq!(config.exclude_root_entries, vec!["Saxslab"]);
        assert_eq!(config.default, json!("none"));
    }
}
