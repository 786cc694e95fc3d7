/// Typed failures surfaced by the remote collaborators.
/// `AuthInvalid` is the session-teardown signal; everything else is left to
/// the caller to present. Nothing here is retried automatically.
#[derive(Clone, Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("remote unavailable: {0}")]
    Unavailable(String),
    #[error("authentication invalid: {0}")]
    AuthInvalid(String),
    #[error("validation rejected: {0}")]
    ValidationRejected(String),
    #[error("not found: {0}")]
    NotFound(String),
}

impl RemoteError {
    /// True when the session must be torn down rather than the error shown.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthInvalid(_))
    }

    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::AuthInvalid(_) => "auth_invalid",
            Self::ValidationRejected(_) => "validation_rejected",
            Self::NotFound(_) => "not_found",
        }
    }

    /// Classify an HTTP status code into the appropriate variant. `detail` is
    /// the server's human-readable error string, passed through verbatim.
    pub fn from_status(status: u16, detail: String) -> Self {
        match status {
            401 | 403 => Self::AuthInvalid(detail),
            404 => Self::NotFound(detail),
            400 | 409 | 422 => Self::ValidationRejected(detail),
            500..=599 => Self::Unavailable(detail),
            _ => Self::Unavailable(format!("unexpected status {status}: {detail}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_classification() {
        assert!(RemoteError::from_status(401, "expired token".into()).is_auth());
        assert!(RemoteError::from_status(403, "forbidden".into()).is_auth());
        assert!(!RemoteError::from_status(500, "boom".into()).is_auth());
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            RemoteError::from_status(404, "Task not found".into()),
            RemoteError::NotFound(_)
        ));
        assert!(matches!(
            RemoteError::from_status(422, "title too long".into()),
            RemoteError::ValidationRejected(_)
        ));
        assert!(matches!(
            RemoteError::from_status(400, "Incorrect email or password".into()),
            RemoteError::ValidationRejected(_)
        ));
        assert!(matches!(
            RemoteError::from_status(503, "maintenance".into()),
            RemoteError::Unavailable(_)
        ));
    }

    #[test]
    fn unexpected_status_keeps_context() {
        let err = RemoteError::from_status(302, "redirect".into());
        assert!(err.to_string().contains("302"));
    }

    #[test]
    fn detail_passes_through_verbatim() {
        let err = RemoteError::from_status(404, "Area not found".into());
        assert_eq!(err.to_string(), "not found: Area not found");
    }

    #[test]
    fn error_kind_strings() {
        assert_eq!(RemoteError::AuthInvalid("x".into()).error_kind(), "auth_invalid");
        assert_eq!(RemoteError::Unavailable("x".into()).error_kind(), "unavailable");
    }
}
