//! SciCat REST client and the file helpers used to build its payloads.

mod config;
mod files;
mod scicat_client;

pub use config::{ClientConfig, ENV_PASSWORD, ENV_TIMEOUT, ENV_TOKEN, ENV_URL, ENV_USERNAME};
pub use files::{
    CHECKSUM_ALGORITHM, checksummed_datablock, describe_file, encode_thumbnail, get_checksum,
    get_file_mod_time, get_file_size,
};
pub use scicat_client::{DEFAULT_DATASET_TYPE, InstrumentLookup, ScicatClient, get_token};
