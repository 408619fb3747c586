//! Shorthands for [`crate::error::JoinError`] construction.

/// Builds a [`crate::error::JoinError`].
///
/// The kind and a static description come first. A third argument becomes the detail through
/// [`ToString`]; write `detail = value` instead to hand over a `String` or `Cow` without
/// formatting it again. A trailing `source: err` records the underlying error.
///
/// ```
/// use hybridjoin::error::ErrorKind;
/// use hybridjoin::join_error;
///
/// let err = join_error!(ErrorKind::MissingDimensionKey, "No customer key", 300);
/// assert_eq!(err.detail(), Some("300"));
/// ```
#[macro_export]
macro_rules! join_error {
    ($kind:expr, $desc:expr) => {
        $crate::error::JoinError::from(($kind, $desc))
    };
    ($kind:expr, $desc:expr, source: $source:expr) => {
        $crate::error::JoinError::from(($kind, $desc)).with_source($source)
    };
    ($kind:expr, $desc:expr, detail = $detail:expr) => {
        $crate::error::JoinError::from(($kind, $desc, $detail))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        $crate::error::JoinError::from(($kind, $desc, $detail.to_string()))
    };
    ($kind:expr, $desc:expr, $detail:expr, source: $source:expr) => {
        $crate::error::JoinError::from(($kind, $desc, $detail.to_string())).with_source($source)
    };
}

/// Returns early with `Err(join_error!(..))`, taking the same arguments as [`join_error!`].
#[macro_export]
macro_rules! bail {
    ($kind:expr, $desc:expr) => {
        return ::core::result::Result::Err($crate::join_error!($kind, $desc))
    };
    ($kind:expr, $desc:expr, source: $source:expr) => {
        return ::core::result::Result::Err($crate::join_error!($kind, $desc, source: $source))
    };
    ($kind:expr, $desc:expr, detail = $detail:expr) => {
        return ::core::result::Result::Err($crate::join_error!($kind, $desc, detail = $detail))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        return ::core::result::Result::Err($crate::join_error!($kind, $desc, $detail))
    };
}
