//! Error types and result definitions for join runs.
//!
//! [`JoinError`] carries a classification ([`ErrorKind`]), a static description, optional dynamic
//! detail, an optional source error, the call-site location and a captured backtrace. Fact loading
//! stops at the first failed write and returns that write's error.
//!
//! Lookup misses are never errors: a join key absent from the reference index simply produces no
//! match, and a secondary key absent from the secondary index leaves the record without secondary
//! attributes.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::borrow::Cow;
use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use hybridjoin_config::shared::ValidationError;

/// Convenient result type for join operations using [`JoinError`] as the error type.
pub type JoinResult<T> = Result<T, JoinError>;

#[derive(Debug, Clone)]
struct ErrorPayload {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
    backtrace: Arc<Backtrace>,
}

/// Main error type for join runs.
#[derive(Debug, Clone)]
pub struct JoinError {
    payload: ErrorPayload,
}

/// Categories of errors that can occur while enriching and loading a stream.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // Upstream Errors
    /// The stream source or a reference index is not ready. Fatal to the run.
    UpstreamUnavailable,
    /// A partition could not be read from the reference store. Fatal to the run.
    ReferenceLoadFailed,

    // Record Errors
    /// A record field cannot be coerced to the type its fact column needs.
    MalformedRecord,
    /// A natural key has no surrogate key in its dimension.
    MissingDimensionKey,

    // Configuration & Conversion Errors
    ConfigError,
    ConversionError,

    // Run Errors
    InvalidState,
    DestinationError,

    Unknown,
}

impl JoinError {
    pub fn kind(&self) -> ErrorKind {
        self.payload.kind
    }

    pub fn description(&self) -> &str {
        &self.payload.description
    }

    /// Returns the dynamic detail, if any was attached.
    pub fn detail(&self) -> Option<&str> {
        self.payload.detail.as_deref()
    }

    /// Returns the backtrace captured at construction. It is empty unless `RUST_BACKTRACE` is set.
    pub fn backtrace(&self) -> &Backtrace {
        self.payload.backtrace.as_ref()
    }

    /// Returns the call-site location where this error was created.
    pub fn location(&self) -> &'static Location<'static> {
        self.payload.location
    }

    /// Attaches an originating error, exposed through [`error::Error::source`].
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.payload.source = Some(Arc::new(source));

        self
    }

    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    ) -> Self {
        JoinError {
            payload: ErrorPayload {
                kind,
                description,
                detail,
                source,
                location: Location::caller(),
                backtrace: Arc::new(Backtrace::capture()),
            },
        }
    }
}

/// Errors compare by kind only.
impl PartialEq for JoinError {
    fn eq(&self, other: &JoinError) -> bool {
        self.payload.kind == other.payload.kind
    }
}

impl fmt::Display for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload = &self.payload;
        let location = payload.location;
        write!(
            f,
            "[{:?}] {} @ {}:{}:{}",
            payload.kind,
            payload.description,
            location.file(),
            location.line(),
            location.column()
        )?;

        write_detail(payload.detail.as_deref(), f)?;
        write_backtrace(payload.backtrace.as_ref(), f)
    }
}

impl error::Error for JoinError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.payload
            .source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn error::Error + 'static))
    }
}

fn write_detail(detail: Option<&str>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let Some(detail) = detail else {
        return Ok(());
    };

    if detail.trim().is_empty() {
        return write!(f, "\n  Detail: <empty>");
    }

    write!(f, "\n  Detail:")?;
    for line in detail.lines() {
        write!(f, "\n    {line}")?;
    }

    Ok(())
}

/// Writes the backtrace only when one was actually captured (`RUST_BACKTRACE` set).
fn write_backtrace(backtrace: &Backtrace, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if backtrace.status() != BacktraceStatus::Captured {
        return Ok(());
    }

    write!(f, "\n  Backtrace:")?;
    for line in backtrace.to_string().lines() {
        write!(f, "\n    {line}")?;
    }

    Ok(())
}

/// Creates a [`JoinError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for JoinError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> JoinError {
        JoinError::from_components(kind, Cow::Borrowed(desc), None, None)
    }
}

/// Creates a [`JoinError`] from an error kind, static description, and dynamic detail.
impl<D> From<(ErrorKind, &'static str, D)> for JoinError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> JoinError {
        JoinError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()), None)
    }
}

/// Converts configuration validation failures into [`ErrorKind::ConfigError`].
impl From<ValidationError> for JoinError {
    #[track_caller]
    fn from(err: ValidationError) -> JoinError {
        let detail = err.to_string();
        JoinError::from_components(
            ErrorKind::ConfigError,
            Cow::Borrowed("Invalid pipeline configuration"),
            Some(Cow::Owned(detail)),
            Some(Arc::new(err)),
        )
    }
}

/// Converts [`chrono::ParseError`] into [`ErrorKind::ConversionError`].
impl From<chrono::ParseError> for JoinError {
    #[track_caller]
    fn from(err: chrono::ParseError) -> JoinError {
        let detail = err.to_string();
        JoinError::from_components(
            ErrorKind::ConversionError,
            Cow::Borrowed("Date parsing failed"),
            Some(Cow::Owned(detail)),
            Some(Arc::new(err)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join_error;
    use std::error::Error as _;

    #[test]
    fn single_error_renders_kind_description_and_detail() {
        let err = join_error!(
            ErrorKind::MalformedRecord,
            "Unit price is not a finite number",
            "order 7"
        );

        let rendered = err.to_string();
        assert!(rendered.starts_with("[MalformedRecord] Unit price is not a finite number @ "));
        assert!(rendered.contains("Detail:\n    order 7"));
        assert_eq!(err.detail(), Some("order 7"));
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    }

    #[test]
    fn source_is_exposed_and_equality_ignores_detail() {
        let parse_err = chrono::NaiveDate::parse_from_str("2019/01/01", "%Y-%m-%d").unwrap_err();
        let err = join_error!(
            ErrorKind::ReferenceLoadFailed,
            "Partition read failed",
            "P1",
            source: parse_err
        );

        assert!(err.source().is_some());
        assert_eq!(err.description(), "Partition read failed");
        assert_eq!(err, join_error!(ErrorKind::ReferenceLoadFailed, "Other"));
        assert_ne!(err, join_error!(ErrorKind::DestinationError, "Partition read failed"));
    }

    #[test]
    fn validation_error_becomes_config_error() {
        let err: JoinError = ValidationError::ZeroValue {
            field: "join.window_capacity",
        }
        .into();

        assert_eq!(err.kind(), ErrorKind::ConfigError);
        assert!(err.source().is_some());
    }
}
