use focusflow_core::errors::RemoteError;

/// Failures out of an editing session's `save`.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The local title guard rejected the draft; nothing was sent.
    #[error("title must not be empty")]
    EmptyTitle,

    /// The remote rejected or failed the dispatched mutation.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
