//! # texadj-core
//!
//! Core types shared by the texture adjustment crates.
//!
//! - [`IRect`], [`Rect`] - Integer texel rectangles and float sampling rectangles
//! - [`ColorSpaceId`], [`AlphaType`] - Color tagging carried by a texture
//! - [`ColorSpaceXform`] - Description of a source-to-destination color conversion
//! - [`Error`] - Validation errors for the types above
//!
//! ## Crate Structure
//!
//! ```text
//! texadj-core (this crate)
//!    ^
//!    |
//!    +-- texadj-gpu (proxies, cache, copy decisions, sampling effects)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod colorspace;
pub mod error;
pub mod rect;

pub use colorspace::*;
pub use error::*;
pub use rect::*;

/// Prelude module for convenient imports.
///
/// ```
/// use texadj_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::colorspace::{AlphaType, ColorSpaceId, ColorSpaceXform};
    pub use crate::error::{Error, Result};
    pub use crate::rect::{IRect, Rect};
}
