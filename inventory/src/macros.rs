//! Macros for pipeline error handling.
//!
//! Convenience macros for creating and returning [`crate::error::InvError`]
//! instances with reduced boilerplate.

/// Creates an [`crate::error::InvError`] from error kind and description, with
/// optional dynamic detail (use `detail =` for an owned [`String`]) and an
/// optional source error.
#[macro_export]
macro_rules! inv_error {
    ($kind:expr, $desc:expr) => {
        $crate::error::InvError::new($kind, $desc)
    };
    ($kind:expr, $desc:expr, source: $source:expr) => {
        $crate::error::InvError::new($kind, $desc).with_source($source)
    };
    ($kind:expr, $desc:expr, detail = $detail:expr) => {
        $crate::error::InvError::new($kind, $desc).with_detail($detail)
    };
    ($kind:expr, $desc:expr, detail = $detail:expr, source: $source:expr) => {
        $crate::error::InvError::new($kind, $desc)
            .with_detail($detail)
            .with_source($source)
    };
}

/// Creates and returns an [`crate::error::InvError`] from the current function.
///
/// Combines error creation with early return. Supports the same optional
/// detail and source arguments as [`inv_error!`].
#[macro_export]
macro_rules! bail {
    ($kind:expr, $desc:expr) => {
        return ::core::result::Result::Err($crate::inv_error!($kind, $desc))
    };
    ($kind:expr, $desc:expr, source: $source:expr) => {
        return ::core::result::Result::Err($crate::inv_error!($kind, $desc, source: $source))
    };
    ($kind:expr, $desc:expr, detail = $detail:expr) => {
        return ::core::result::Result::Err($crate::inv_error!($kind, $desc, detail = $detail))
    };
    ($kind:expr, $desc:expr, detail = $detail:expr, source: $source:expr) => {
        return ::core::result::Result::Err($crate::inv_error!(
            $kind,
            $desc,
            detail = $detail,
            source: $source
        ))
    };
}
