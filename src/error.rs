//! Error types for the vellum core.
//!
//! Recoverable failures are returned as `Result` values per the error policy
//! in the specification: invariant violations at API boundaries (`EArgument`,
//! `ERange`), unsupported pixel representations (`EImageError`), font/shaping
//! failures, and renderer-device failures. Debug-only range checks use
//! `debug_assert!` instead, since they guard internal invariants rather than
//! caller-supplied input.

use thiserror::Error;

/// Raised when a caller-supplied argument violates a documented precondition:
/// an out-of-bounds subrect, an incompatible image cast, or similar.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EArgument {
    #[error("rectangle {rect:?} does not fit within bounds {bounds:?}")]
    RectOutOfBounds {
        rect: (i32, i32, i32, i32),
        bounds: (i32, i32, i32, i32),
    },
    #[error("cannot cast image of type/format {from} to {to}")]
    IncompatibleCast { from: String, to: String },
    #[error("buffer of size {actual} does not match required size {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Raised when a mapped-image access violates address bounds. Debug builds
/// only, per spec.md §7.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ERange {
    #[error("access at offset {offset} exceeds mapped region of {len} bytes")]
    OutOfBounds { offset: usize, len: usize },
}

/// Raised when the active renderer backend cannot represent a pixel
/// type/format combination.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EImageError {
    #[error("pixel format {0:?} is not supported by the active render backend")]
    UnsupportedFormat(crate::pixel::format::PixelFormat),
    #[error("pixel type {0:?} is not supported by the active render backend")]
    UnsupportedType(crate::pixel::format::PixelType),
}

/// Raised by the font pipeline when shaping or face loading fails. Drawing
/// falls back to the fallback face rather than propagating to the caller in
/// most call sites; this type exists for the sites that must report it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FontError {
    #[error("no face available for requested font, and no fallback face is configured")]
    NoFallbackFace,
    #[error("shaper backend failed: {0}")]
    ShaperFailed(String),
    #[error("codepoint U+{0:04X} has no glyph in any configured face")]
    MissingGlyph(u32),
}

/// Renderer backend / device errors, per spec.md §7.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderDeviceError {
    #[error("requested renderer feature is not supported by this backend: {0}")]
    Unsupported(String),
    #[error("shader compilation failed: {0}")]
    ShaderError(String),
    #[error("internal renderer error: {0}")]
    InternalError(String),
}
