use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The filesystem step that failed, carried by [`TankError::Storage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    ReadRoot,
    CreateRoot,
    ReadInfo,
    ParseInfo,
    CreateDir,
    SetPermissions,
    WriteInfo,
    RemoveInfo,
    RemoveDir,
    RemoveTemp,
}

impl fmt::Display for StorageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StorageOp::ReadRoot => "reading tank directory",
            StorageOp::CreateRoot => "creating tank directory",
            StorageOp::ReadInfo => "reading fish info file",
            StorageOp::ParseInfo => "parsing fish info file",
            StorageOp::CreateDir => "adding fish directory",
            StorageOp::SetPermissions => "restricting fish directory",
            StorageOp::WriteInfo => "writing fish info file",
            StorageOp::RemoveInfo => "deleting fish info file",
            StorageOp::RemoveDir => "deleting fish directory",
            StorageOp::RemoveTemp => "removing stale temp file",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug)]
pub enum TankError {
    #[error("{0}")]
    Validation(String),

    #[error("No fish named {0} exists")]
    NotFound(String),

    #[error("A fish named {0} already exists")]
    Conflict(String),

    #[error("Error {op} at {}: {source}", path.display())]
    Storage {
        op: StorageOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Coarse classification of a [`TankError`]. Callers map this to their own
/// transport codes; the library never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Storage => "storage",
        }
    }
}

impl TankError {
    pub fn storage(op: StorageOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        TankError::Storage {
            op,
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TankError::Validation(_) => ErrorKind::Validation,
            TankError::NotFound(_) => ErrorKind::NotFound,
            TankError::Conflict(_) => ErrorKind::Conflict,
            TankError::Storage { .. } => ErrorKind::Storage,
        }
    }

    /// The path a storage failure was attempted against, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            TankError::Storage { path, .. } => Some(path),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TankError>;
