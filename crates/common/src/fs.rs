//! Contains various `std::fs` wrapper functions that also contain the target path in their errors.

use crate::errors::FsPathError;
use serde::de::DeserializeOwned;
use std::{fs::File, io::BufReader, path::Path};

type Result<T> = std::result::Result<T, FsPathError>;

/// Wrapper for [`std::fs::read_to_string`].
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|err| FsPathError::read(err, path))
}

/// Reads the JSON file and deserialize it into the provided type.
pub fn read_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| FsPathError::open(err, path))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|source| FsPathError::ReadJson { source, path: path.into() })
}
