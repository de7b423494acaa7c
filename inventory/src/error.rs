//! Error types and result definitions for pipeline operations.
//!
//! Provides a kind-classified error type for the inventory pipeline. Most
//! failures in this system are contained and logged rather than propagated;
//! the [`ErrorKind`] classification is what callers use to decide which
//! failures surface to the process exit status (configuration and
//! command-source errors) and which fold into a continue-operating path.

use std::borrow::Cow;
use std::error;
use std::fmt;
use std::sync::Arc;

/// Convenient result type for pipeline operations using [`InvError`] as the error type.
pub type InvResult<T> = Result<T, InvError>;

/// Main error type for inventory pipeline operations.
#[derive(Debug, Clone)]
pub struct InvError {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<String>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
}

/// Specific categories of errors that can occur in the pipeline.
///
/// Only [`ErrorKind::ConfigError`] and the two command-source kinds are ever
/// escalated to the invoking caller; everything else is contained at the
/// component that observed it.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // Startup errors
    ConfigError,

    // Dispatch errors
    CommandSourceMissing,
    CommandSourceUnreadable,

    // Channel errors
    QueueError,
    SerializationError,
    MalformedItem,

    // Worker & sink errors
    CollectionFailed,
    PersistenceFailed,
    WorkerPanic,

    // Unknown / Uncategorized
    Unknown,
}

impl InvError {
    /// Creates an error from a kind and a static-or-owned description.
    pub fn new(kind: ErrorKind, description: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            description: description.into(),
            detail: None,
            source: None,
        }
    }

    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the dynamic detail attached to this error, if any.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Attaches dynamic detail (paths, raw payloads, identifiers) and returns
    /// the modified instance.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attaches an originating [`error::Error`] to this error and returns the
    /// modified instance. The stored source is preserved across clones and
    /// exposed via [`error::Error::source`].
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }
}

impl fmt::Display for InvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "[{:?}] {}", self.kind, self.description)?;

        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({source})")?;
        }

        Ok(())
    }
}

impl error::Error for InvError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source as &(dyn error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bail, inv_error};

    #[test]
    fn display_includes_kind_description_and_detail() {
        let err = inv_error!(
            ErrorKind::CommandSourceMissing,
            "commands file not found",
            detail = "/tmp/commands.txt"
        );

        let rendered = err.to_string();
        assert!(rendered.contains("CommandSourceMissing"));
        assert!(rendered.contains("commands file not found"));
        assert!(rendered.contains("/tmp/commands.txt"));
    }

    #[test]
    fn source_is_preserved() {
        let io = std::io::Error::other("boom");
        let err = inv_error!(ErrorKind::QueueError, "queue operation failed", source: io);

        assert_eq!(err.kind(), ErrorKind::QueueError);
        assert!(error::Error::source(&err).is_some());
    }

    #[test]
    fn bail_returns_early() {
        fn failing() -> InvResult<()> {
            bail!(ErrorKind::ConfigError, "invalid settings");
        }

        let err = failing().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigError);
    }
}
