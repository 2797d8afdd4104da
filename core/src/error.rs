use core::fmt;

/// Failures of the persistence seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Backing store cannot be reached (private mode, revoked permission).
    Unavailable,
    /// Backing store refused the write for lack of space.
    QuotaExceeded,
    /// A persisted document could not be decoded.
    Corrupt { key: &'static str },
    /// A value could not be encoded for storage.
    Encode { key: &'static str },
    /// Host I/O failure.
    Io,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::QuotaExceeded => write!(f, "storage quota exceeded"),
            Self::Corrupt { key } => write!(f, "persisted document '{}' is corrupt", key),
            Self::Encode { key } => write!(f, "document '{}' could not be encoded", key),
            Self::Io => write!(f, "storage i/o error"),
        }
    }
}

pub type StorageResult<T = ()> = Result<T, StorageError>;

/// Engine-level failures surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaffleError {
    /// No participant has remaining eligibility; a spin cannot start.
    EmptyPool,
    /// An import produced no usable rows.
    ImportEmpty,
    /// Operation requires the reel to be at rest.
    Busy,
    /// In-memory state changed but could not be persisted.
    Storage(StorageError),
}

impl fmt::Display for RaffleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPool => write!(f, "no eligible participants"),
            Self::ImportEmpty => write!(f, "import contained no usable rows"),
            Self::Busy => write!(f, "reel is spinning"),
            Self::Storage(err) => write!(f, "persistence failed: {}", err),
        }
    }
}

impl From<StorageError> for RaffleError {
    fn from(err: StorageError) -> Self {
        RaffleError::Storage(err)
    }
}

pub type RaffleResult<T = ()> = Result<T, RaffleError>;
