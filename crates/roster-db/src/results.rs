use mongodb::error::{Error, ErrorKind, WriteFailure};

use roster_data::StoreError;

/// Server error code for unique index violations
pub const DUPLICATE_KEY: i32 = 11000;

/// Check if the store rejected a write because of a unique index
pub fn is_duplicate_key(err: &Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(err)) => err.code == DUPLICATE_KEY,
        ErrorKind::InsertMany(err) => err
            .write_errors
            .as_ref()
            .is_some_and(|errs| errs.iter().any(|err| err.code == DUPLICATE_KEY)),
        ErrorKind::Command(err) => err.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// Convert a driver error, marking unique index violations
/// as `StoreError::Duplicate`.
pub fn classify(err: Error) -> anyhow::Error {
    if is_duplicate_key(&err) {
        StoreError::Duplicate(err.to_string()).into()
    } else {
        err.into()
    }
}

