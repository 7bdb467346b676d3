//! scicat: client for the SciCat data catalog plus scientific metadata
//! extraction from HDF5/NeXus files.
//!
//! Ingestion usually has two halves: read the hierarchical metadata out of
//! a measurement file, then register a dataset carrying that metadata.
//!
//! # Core Principles
//!
//! - **Best effort extraction**: An unreadable leaf becomes a default value, never an abort
//! - **Reported degradation**: Every leaf that fell back to the default is listed
//! - **Typed records**: Catalog payloads are serde structs with the API's field names
//!
//! # Example
//!
//! ```no_run
//! use scicat::client::ScicatClient;
//! use scicat::metadata::MetadataExtractor;
//! use scicat::model::{DatasetCommon, Ownable, RawDataset};
//!
//! let extraction = MetadataExtractor::new().extract_file("scan_0001.nxs").unwrap();
//! println!("Degraded leaves: {}", extraction.degraded.len());
//!
//! let common = DatasetCommon::new(
//!     Ownable::new("ingestor"),
//!     "scan 0001",
//!     "beamline@example.org",
//!     "/data/scan_0001",
//! )
//! .with_scientific_metadata(extraction.metadata);
//! let dataset = RawDataset::new(common, "beamline", "ingestor", "pi@example.org");
//!
//! let client = ScicatClient::from_env().unwrap();
//! let pid = client.datasets_raw_replace(&dataset).unwrap();
//! println!("Created {}", pid);
//! ```

pub mod client;
pub mod error;
pub mod metadata;
pub mod model;

pub use client::{ClientConfig, InstrumentLookup, ScicatClient, get_token};
pub use error::{Result, ScicatError};
pub use metadata::{
    ExtractConfig, Extraction, MetadataExtractor, RawValue, TreeSource, ValueCoercer,
    extract_scientific_metadata,
};
