//! Rectangle types for texel regions and sampling domains.
//!
//! - [`IRect`] - Integer rectangle in texel space (crop subsets, image bounds)
//! - [`Rect`] - Float rectangle in texel space (constraint rects, domains)
//!
//! # Coordinate System
//!
//! Both types use edge coordinates `left/top/right/bottom` with the origin
//! at the top-left. Right and bottom are exclusive for [`IRect`]; for
//! [`Rect`] they are plain edges.
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   (l,t)┌──────────┐
//!   │        │          │
//!   │        └──────────┘(r,b)
//!   ▼
//!   Y
//! ```
//!
//! # Usage
//!
//! ```rust
//! use texadj_core::{IRect, Rect};
//!
//! let bounds = IRect::from_wh(300, 200);
//! let constraint = Rect::from_ltrb(10.0, 10.0, 100.0, 50.0);
//!
//! assert!(Rect::from(bounds).contains(&constraint));
//! let domain = constraint.inset(0.5, 0.5);
//! assert_eq!(domain.left, 10.5);
//! ```

use crate::{Error, Result};

/// Integer rectangle defined by its edges.
///
/// Used for texture bounds and copy subsets. `right` and `bottom` are
/// exclusive, so `IRect::from_wh(w, h)` covers exactly `w * h` texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IRect {
    /// Left edge (inclusive)
    pub left: i32,
    /// Top edge (inclusive)
    pub top: i32,
    /// Right edge (exclusive)
    pub right: i32,
    /// Bottom edge (exclusive)
    pub bottom: i32,
}

impl IRect {
    /// Creates a rectangle from its edges without validation.
    #[inline]
    pub const fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle at the origin with the given size.
    ///
    /// ```rust
    /// use texadj_core::IRect;
    ///
    /// let r = IRect::from_wh(256, 128);
    /// assert_eq!((r.left, r.top, r.right, r.bottom), (0, 0, 256, 128));
    /// ```
    #[inline]
    pub const fn from_wh(width: u32, height: u32) -> Self {
        Self::from_ltrb(0, 0, width as i32, height as i32)
    }

    /// Creates a rectangle, rejecting edges that are out of order.
    pub fn try_from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Result<Self> {
        if left > right || top > bottom {
            return Err(Error::invalid_rect(
                left as f32,
                top as f32,
                right as f32,
                bottom as f32,
            ));
        }
        Ok(Self::from_ltrb(left, top, right, bottom))
    }

    /// Width in texels.
    #[inline]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height in texels.
    #[inline]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Returns `true` if the rectangle covers no texels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Returns `true` if `other` lies entirely inside this rectangle.
    #[inline]
    pub const fn contains(&self, other: &IRect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Edges as `[left, top, right, bottom]` words, in key order.
    #[inline]
    pub const fn to_words(&self) -> [u32; 4] {
        [
            self.left as u32,
            self.top as u32,
            self.right as u32,
            self.bottom as u32,
        ]
    }
}

impl std::fmt::Display for IRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IRect({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Float rectangle defined by its edges.
///
/// Used for sampling constraints and texture domains. A well-formed
/// rectangle has `left <= right` and `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Right edge
    pub right: f32,
    /// Bottom edge
    pub bottom: f32,
}

impl Rect {
    /// Creates a rectangle from its edges without validation.
    #[inline]
    pub const fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_wh(width: f32, height: f32) -> Self {
        Self::from_ltrb(0.0, 0.0, width, height)
    }

    /// Creates a rectangle, rejecting edges that are out of order.
    ///
    /// ```rust
    /// use texadj_core::Rect;
    ///
    /// assert!(Rect::try_from_ltrb(0.0, 0.0, 4.0, 4.0).is_ok());
    /// assert!(Rect::try_from_ltrb(5.0, 0.0, 4.0, 4.0).is_err());
    /// ```
    pub fn try_from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Result<Self> {
        if !(left <= right && top <= bottom) {
            return Err(Error::invalid_rect(left, top, right, bottom));
        }
        Ok(Self::from_ltrb(left, top, right, bottom))
    }

    /// The largest representable rectangle.
    ///
    /// Used as the starting point when only some edges of a domain need
    /// clamping; unclamped edges never restrict sampling.
    #[inline]
    pub const fn largest() -> Self {
        Self::from_ltrb(f32::MIN, f32::MIN, f32::MAX, f32::MAX)
    }

    /// Width (`right - left`).
    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height (`bottom - top`).
    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Returns `true` if `left <= right` and `top <= bottom`.
    #[inline]
    pub fn is_sorted(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom
    }

    /// Returns `true` if `other` lies entirely inside this rectangle.
    ///
    /// Edges may coincide.
    #[inline]
    pub fn contains(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Returns the rectangle with every edge moved inwards.
    ///
    /// The result may be unsorted when the inset exceeds half the size;
    /// callers that need an ordered rectangle use [`Rect::sorted_to_center`].
    ///
    /// ```rust
    /// use texadj_core::Rect;
    ///
    /// let r = Rect::from_ltrb(0.0, 0.0, 10.0, 4.0).inset(0.5, 0.5);
    /// assert_eq!(r, Rect::from_ltrb(0.5, 0.5, 9.5, 3.5));
    /// ```
    #[inline]
    pub fn inset(&self, dx: f32, dy: f32) -> Rect {
        Rect::from_ltrb(
            self.left + dx,
            self.top + dy,
            self.right - dx,
            self.bottom - dy,
        )
    }

    /// Collapses inverted axes onto their midpoint.
    ///
    /// ```rust
    /// use texadj_core::Rect;
    ///
    /// let r = Rect::from_ltrb(3.0, 0.0, 2.0, 8.0).sorted_to_center();
    /// assert_eq!((r.left, r.right), (2.5, 2.5));
    /// assert_eq!((r.top, r.bottom), (0.0, 8.0));
    /// ```
    pub fn sorted_to_center(mut self) -> Rect {
        if self.left > self.right {
            let mid = (self.left + self.right) * 0.5;
            self.left = mid;
            self.right = mid;
        }
        if self.top > self.bottom {
            let mid = (self.top + self.bottom) * 0.5;
            self.top = mid;
            self.bottom = mid;
        }
        self
    }
}

impl From<IRect> for Rect {
    #[inline]
    fn from(r: IRect) -> Self {
        Rect::from_ltrb(r.left as f32, r.top as f32, r.right as f32, r.bottom as f32)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}
