//! Scientific metadata extraction from hierarchical (HDF5/NeXus) files.
//!
//! The extractor walks every group and leaf below the root, coerces each
//! value into a JSON scalar and merges the results into one nested mapping
//! suitable for a dataset's `scientificMetadata` field.
//!
//! # Example
//!
//! ```
//! use scicat::metadata::{ExtractConfig, Leaf, MemoryTree, MetadataExtractor};
//! use serde_json::json;
//!
//! let mut tree = MemoryTree::default();
//! tree.insert("/root1/x", Leaf::new(3.14).with_attr("units", "m"))
//!     .insert("/root2/y", Leaf::new(2i64));
//!
//! let config = ExtractConfig::default().with_excluded_roots(["root2"]);
//! let extraction = MetadataExtractor::with_config(config).extract(&tree).unwrap();
//!
//! // the single remaining root branch is unwrapped
//! assert_eq!(extraction.metadata, json!({"x": {"value": 3.14, "units": "m"}}));
//! ```

mod coerce;
mod extract;
mod getter;
mod merge;
mod source;
mod value;

#[cfg(feature = "hdf5")]
mod hdf5_source;

pub use coerce::{CoercionError, INVALID_SENTINEL, ValueCoercer, coerce};
pub use extract::{
    DEFAULT_EXCLUDED_ROOT, DEFAULT_UNREADABLE, DegradedRead, ExtractConfig, Extraction, LeafRead,
    MetadataExtractor, ReadTarget, VALUE_KEY, extract_scientific_metadata,
};
pub use getter::{ATTRIBUTE_SEPARATOR, get_value, get_value_from_file, get_values, try_get_value};
pub use merge::{insert_path, nest, update_deep};
pub use source::{
    Group, Leaf, MemoryTree, Node, NodeKind, TreeSource, join_path, open_source, split_path,
};
pub use value::RawValue;

#[cfg(feature = "hdf5")]
pub use hdf5_source::Hdf5Source;
