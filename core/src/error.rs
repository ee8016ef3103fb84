use thiserror::Error;

/// Typed failures surfaced by the core. Each variant is recovered locally by
/// the caller; none of them may leave a day's sum/items invariant violated.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Empty or malformed user input. The input is rejected, no state changes.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The recognition collaborator failed, timed out, or was unreachable.
    /// The single add operation aborts with no partial ledger mutation.
    #[error("food analysis failed: {0}")]
    Analysis(String),

    /// Removal targeted a position that does not exist on that day.
    #[error("no item at index {index} on {date}")]
    IndexOutOfRange { date: String, index: usize },

    /// A snapshot could not be parsed on import. Existing state is untouched.
    #[error("malformed snapshot: {0}")]
    Format(String),

    /// The durable store failed. Fatal when opening the store; during
    /// mutation persistence the engine downgrades this to a logged warning.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.to_string())
    }
}
