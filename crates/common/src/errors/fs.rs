use std::{
    io,
    path::{Path, PathBuf},
};

/// Various error variants for `fs` operations that serve as an addition to the io::Error which
/// does not provide any information about the path.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum FsPathError {
    #[error("failed to read from {path:?}: {source}")]
    Read { source: io::Error, path: PathBuf },
    #[error("failed to open file {path:?}: {source}")]
    Open { source: io::Error, path: PathBuf },
    #[error("failed to parse json file: {path:?}: {source}")]
    ReadJson { source: serde_json::Error, path: PathBuf },
}

impl FsPathError {
    /// Returns the complementary error variant for [`std::fs::read_to_string`].
    pub fn read(source: io::Error, path: impl AsRef<Path>) -> Self {
        Self::Read { source, path: path.as_ref().into() }
    }

    /// Returns the complementary error variant for [`std::fs::File::open`].
    pub fn open(source: io::Error, path: impl AsRef<Path>) -> Self {
        Self::Open { source, path: path.as_ref().into() }
    }
}
