//! HDF5/NeXus backend for [`TreeSource`], built on libhdf5.

use std::path::{Path, PathBuf};

use hdf5::types::{FixedAscii, FixedUnicode, TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::{Container, File, Location};

use crate::error::{Result, ScicatError};

use super::source::{NodeKind, TreeSource};
use super::value::RawValue;

/// Buffer size for fixed-length strings; HDF5 converts shorter stored sizes
/// into it and longer ones are truncated.
const FIXED_STRING_CAPACITY: usize = 1024;

/// An HDF5 file opened read-only. The handle closes on drop.
pub struct Hdf5Source {
    file: File,
    path: PathBuf,
}

impl Hdf5Source {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ScicatError::SourceUnavailable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unreadable(&self, path: &str, message: impl Into<String>) -> ScicatError {
        ScicatError::LeafUnreadable {
            path: format!("{}:{}", self.path.display(), path),
            message: message.into(),
        }
    }
}

impl TreeSource for Hdf5Source {
    fn node_kind(&self, path: &str) -> Option<NodeKind> {
        if path == "/" {
            return Some(NodeKind::Group);
        }
        if !self.file.link_exists(path) {
            return None;
        }
        if self.file.group(path).is_ok() {
            Some(NodeKind::Group)
        } else {
            Some(NodeKind::Leaf)
        }
    }

    fn children(&self, path: &str) -> Result<Vec<String>> {
        Ok(self.file.group(path)?.member_names()?)
    }

    fn read_value(&self, path: &str) -> Result<RawValue> {
        let dataset = self
            .file
            .dataset(path)
            .map_err(|e| self.unreadable(path, e.to_string()))?;
        read_container(&dataset).map_err(|e| self.unreadable(path, e.to_string()))
    }

    fn read_attributes(&self, path: &str) -> Result<Vec<(String, Result<RawValue>)>> {
        match self.node_kind(path) {
            Some(NodeKind::Group) => read_attributes(&self.file.group(path)?),
            Some(NodeKind::Leaf) => read_attributes(&self.file.dataset(path)?),
            None => Err(self.unreadable(path, "no such path")),
        }
    }
}

fn read_attributes(location: &Location) -> Result<Vec<(String, Result<RawValue>)>> {
    let attributes = location
        .attr_names()?
        .into_iter()
        .map(|name| {
            let read = location
                .attr(&name)
                .map_err(ScicatError::from)
                .and_then(|attr| read_container(&attr));
            (name, read)
        })
        .collect();
    Ok(attributes)
}

/// Read a dataset or attribute into a [`RawValue`].
fn read_container(container: &Container) -> Result<RawValue> {
    let descriptor = container.dtype()?.to_descriptor()?;
    let scalar = container.is_scalar();

    let value = match descriptor {
        TypeDescriptor::Integer(_) => {
            let values = container.read_raw::<i64>()?;
            match (scalar, values.as_slice()) {
                (true, [v]) => RawValue::Int(*v),
                _ => RawValue::IntArray(values),
            }
        }
        TypeDescriptor::Unsigned(_) => {
            let values = container.read_raw::<u64>()?;
            match (scalar, values.as_slice()) {
                (true, [v]) => RawValue::UInt(*v),
                _ => match values
                    .iter()
                    .map(|&v| i64::try_from(v))
                    .collect::<std::result::Result<Vec<i64>, _>>()
                {
                    Ok(ints) => RawValue::IntArray(ints),
                    Err(_) => RawValue::FloatArray(values.iter().map(|&v| v as f64).collect()),
                },
            }
        }
        TypeDescriptor::Float(_) => {
            let values = container.read_raw::<f64>()?;
            match (scalar, values.as_slice()) {
                (true, [v]) => RawValue::Float(*v),
                _ => RawValue::FloatArray(values),
            }
        }
        TypeDescriptor::Boolean => {
            let values = container.read_raw::<bool>()?;
            match (scalar, values.as_slice()) {
                (true, [v]) => RawValue::Bool(*v),
                _ => RawValue::IntArray(values.iter().map(|&b| i64::from(b)).collect()),
            }
        }
        TypeDescriptor::VarLenUnicode => {
            let values: Vec<String> = container
                .read_raw::<VarLenUnicode>()?
                .iter()
                .map(|s| s.as_str().to_string())
                .collect();
            text_value(scalar, values)
        }
        TypeDescriptor::VarLenAscii => {
            let values: Vec<String> = container
                .read_raw::<VarLenAscii>()?
                .iter()
                .map(|s| s.as_str().to_string())
                .collect();
            text_value(scalar, values)
        }
        TypeDescriptor::FixedAscii(_) => {
            let values: Vec<String> = container
                .read_raw::<FixedAscii<FIXED_STRING_CAPACITY>>()?
                .iter()
                .map(|s| trim_padding(s.as_str()))
                .collect();
            text_value(scalar, values)
        }
        TypeDescriptor::FixedUnicode(_) => {
            let values: Vec<String> = container
                .read_raw::<FixedUnicode<FIXED_STRING_CAPACITY>>()?
                .iter()
                .map(|s| trim_padding(s.as_str()))
                .collect();
            text_value(scalar, values)
        }
        other => {
            return Err(ScicatError::UnsupportedFormat(format!(
                "HDF5 datatype {:?}",
                other
            )));
        }
    };
    Ok(value)
}

/// Fixed-length strings come back null padded.
fn trim_padding(s: &str) -> String {
    s.trim_end_matches('\0').to_string()
}

fn text_value(scalar: bool, mut values: Vec<String>) -> RawValue {
    if scalar && values.len() == 1 {
        RawValue::Text(values.remove(0))
    } else {
        RawValue::TextArray(values)
    }
}
