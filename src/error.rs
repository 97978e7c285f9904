use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Problems with the `BEGIN`/`END` delimited observation stream.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("reached the end of input without encountering the begin sentinel")]
    MissingBegin,
    #[error("reached the end of input without encountering the end sentinel")]
    MissingEnd,
    #[error("line {line_number} is not '<category> <algorithm>': {line:?}")]
    MalformedLine { line_number: usize, line: String },
    #[error("reading observation stream")]
    Io(#[from] io::Error),
}

/// A `supported_api_levels` string that cannot be parsed or extended.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("empty support range")]
    Empty,
    #[error("malformed interval {0:?}")]
    Malformed(String),
    #[error("interval {0:?} ends before it starts")]
    Inverted(String),
    #[error("only the last interval may be open-ended, found {0:?}")]
    OpenNotLast(String),
    #[error("interval {0:?} overlaps or precedes the interval before it")]
    OutOfOrder(String),
    #[error("api level must be at least 1")]
    ZeroLevel,
    #[error("cannot close interval starting at {start} before level {level}")]
    CloseBeforeStart { start: u32, level: u32 },
    #[error("cannot reopen at level {level}; support already recorded through {last}")]
    ReopenBeforeEnd { level: u32, last: u32 },
}

/// The previous ledger document is unreadable or has the wrong shape.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("reading ledger {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parsing ledger JSON")]
    Json(#[from] serde_json::Error),
    #[error("ledger failed schema validation:\n{0}")]
    Schema(String),
    #[error("writing ledger {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("{category}/{algorithm}: cannot update support range")]
    Range {
        category: String,
        algorithm: String,
        #[source]
        source: RangeError,
    },
    #[error("target api level must be at least 1")]
    ZeroLevel,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("cipher {0:?} is not of the form algorithm/mode/padding")]
    CipherName(String),
}
