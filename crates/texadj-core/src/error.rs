//! Error types for texadj-core.
//!
//! Covers validation of the geometric and configuration values that the
//! GPU-side crates build on.
//!
//! # Usage
//!
//! ```rust
//! use texadj_core::{Error, IRect, Result};
//!
//! fn checked(l: i32, t: i32, r: i32, b: i32) -> Result<IRect> {
//!     IRect::try_from_ltrb(l, t, r, b)
//! }
//!
//! assert!(checked(10, 0, 5, 5).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while validating core values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Rectangle edges are out of order.
    ///
    /// Returned when `left > right` or `top > bottom`.
    #[error("invalid rect ({left}, {top}, {right}, {bottom}): edges out of order")]
    InvalidRect {
        /// Left edge
        left: f32,
        /// Top edge
        top: f32,
        /// Right edge
        right: f32,
        /// Bottom edge
        bottom: f32,
    },

    /// A configuration value could not be parsed or is out of range.
    #[error("invalid config value for {name}: {value:?}")]
    InvalidConfig {
        /// Setting name (usually an environment variable)
        name: String,
        /// Raw value that was rejected
        value: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidRect`] error.
    #[inline]
    pub fn invalid_rect(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::InvalidRect {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates an [`Error::InvalidConfig`] error.
    #[inline]
    pub fn invalid_config(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidConfig {
            name: name.into(),
            value: value.into(),
        }
    }
}
