//! File helpers used when preparing datablocks and attachments.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Local};
use log::info;
use sha2::{Digest, Sha256};

use crate::error::{Result, ScicatError};
use crate::model::{CreateDatasetOrigDatablock, DataFile};

/// Checksum algorithm reported for [`get_checksum`] digests. Older
/// ingestors stored MD5; `chkAlg` tells the two apart.
pub const CHECKSUM_ALGORITHM: &str = "sha256";

fn io_error(path: &Path, source: std::io::Error) -> ScicatError {
    ScicatError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Size of a file in bytes (symlinks are not followed).
pub fn get_file_size(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    let metadata = fs::symlink_metadata(path).map_err(|e| io_error(path, e))?;
    Ok(metadata.len())
}

/// Hex SHA-256 digest of a file's contents.
pub fn get_checksum(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut reader = BufReader::new(file);

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buffer).map_err(|e| io_error(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Encode an image as a `data:` URI suitable for an attachment thumbnail.
pub fn encode_thumbnail(path: impl AsRef<Path>, image_type: &str) -> Result<String> {
    let path = path.as_ref();
    info!("Creating thumbnail for dataset: {}", path.display());
    let data = fs::read(path).map_err(|e| io_error(path, e))?;
    Ok(format!(
        "data:image/{};base64,{}",
        image_type,
        STANDARD.encode(data)
    ))
}

/// Modification time of a file as an RFC 3339 timestamp in local time.
pub fn get_file_mod_time(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let modified = fs::symlink_metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| io_error(path, e))?;
    Ok(DateTime::<Local>::from(modified).to_rfc3339())
}

/// Describe a file for a datablock. `relative_path` is the path recorded in
/// the catalog, relative to the dataset's source folder.
pub fn describe_file(path: impl AsRef<Path>, relative_path: impl Into<String>) -> Result<DataFile> {
    let path = path.as_ref();
    let size = get_file_size(path)?;
    let mut file = DataFile::new(relative_path, i64::try_from(size).unwrap_or(i64::MAX));
    file.time = Some(get_file_mod_time(path)?);
    file.chk = Some(get_checksum(path)?);
    Ok(file)
}

/// Datablock content for described files, labelled with [`CHECKSUM_ALGORITHM`].
pub fn checksummed_datablock(files: Vec<DataFile>) -> CreateDatasetOrigDatablock {
    let mut content = CreateDatasetOrigDatablock::from_files(files);
    content.chk_alg = Some(CHECKSUM_ALGORITHM.to_string());
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content).expect("Failed to write to temp file");
        file
    }

    #[test]
    fn test_file_size_and_checksum() {
        let file = temp_file(b"abc");
        assert_eq!(get_file_size(file.path()).unwrap(), 3);
        assert_eq!(
            get_checksum(file.path()).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_encode_thumbnail() {
        let file = temp_file(b"png!");
        let encoded = encode_thumbnail(file.path(), "png").unwrap();
        assert_eq!(encoded, "data:image/png;base64,cG5nIQ==");
    }

    #[test]
    fn test_describe_file() {
        let file = temp_file(b"0123456789");
        let described = describe_file(file.path(), "data/run.h5").unwrap();
        assert_eq!(described.path, "data/run.h5");
        assert_eq!(described.size, 10);
        assert!(described.time.is_some());
        assert_eq!(described.chk.as_ref().map(String::len), Some(64));
    }

    #[test]
    fn test_datablock_labels_sha256() {
        let file = temp_file(b"abc");
        let described = describe_file(file.path(), "abc.txt").unwrap();
        let content = checksummed_datablock(vec![described]);

        let wire = serde_json::to_value(&content).unwrap();
        assert_eq!(wire["chkAlg"], "sha256");
        assert_eq!(wire["size"], 3);
        assert_eq!(
            wire["dataFileList"][0]["chk"],
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_missing_file() {
        let err = get_file_size("/no/such/file").unwrap_err();
        assert!(matches!(err, ScicatError::Io { .. }));
    }
}
