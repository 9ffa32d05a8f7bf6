//! Texture-coordinate domain clamping.
//!
//! When only part of a texture holds valid content (a subset, or an
//! approx-fit backing larger than the image), sampling near the edge of
//! that content would blend in texels from outside it. A domain clamps
//! coordinates to the texel centers of the edge texels so the filter
//! footprint stays inside.
//!
//! Under mip sampling no single domain works for every level. That case
//! reports [`DomainMode::TightCopy`]; the caller recomputes with bilinear
//! geometry and accepts approximate clamping above level 0.

use texadj_core::Rect;

use crate::proxy::TextureProxy;
use crate::sampler::Filter;

/// Inset that pins sampling to edge texel centers.
const DOMAIN_INSET: f32 = 0.5;

/// Whether the filter footprint must stay inside the constraint rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterConstraint {
    /// Strict: no texel outside the constraint may contribute.
    #[default]
    Yes,
    /// Advisory: filtering may read past the constraint rect.
    No,
}

/// Result of [`determine_domain_mode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DomainMode {
    /// No clamping needed.
    NoDomain,
    /// Clamp sampling to this rectangle.
    Domain(Rect),
    /// Exact clamping would need a tight copy; retry with bilinear geometry.
    TightCopy,
}

impl DomainMode {
    #[inline]
    pub fn domain(&self) -> Option<Rect> {
        match self {
            Self::Domain(r) => Some(*r),
            _ => None,
        }
    }
}

/// Computes the sampling domain for `constraint` within `proxy`.
///
/// `filter` is `None` for bicubic sampling. `coords_limited` means the
/// caller guarantees sample coordinates never leave `constraint`.
pub fn determine_domain_mode(
    constraint: &Rect,
    filter_constraint: FilterConstraint,
    coords_limited: bool,
    proxy: &TextureProxy,
    filter: Option<Filter>,
) -> DomainMode {
    let bounds = Rect::from(proxy.bounds());
    debug_assert!(bounds.contains(constraint), "constraint {constraint} outside {bounds}");

    let exact = proxy.is_functionally_exact();

    if constraint.contains(&bounds) && exact {
        return DomainMode::NoDomain;
    }

    let strict = filter_constraint == FilterConstraint::Yes;

    // Coordinates never leave the constraint and the filter may cross it.
    if exact && coords_limited && !strict {
        return DomainMode::NoDomain;
    }

    let filter_half_width = match filter {
        Some(Filter::Nearest) => {
            if coords_limited {
                return DomainMode::NoDomain;
            }
            0.0
        }
        Some(Filter::Bilerp) => 0.5,
        Some(Filter::MipMap) => {
            if strict || !exact {
                return DomainMode::TightCopy;
            }
            return DomainMode::NoDomain;
        }
        // Bicubic reads a 4x4 neighbourhood.
        None => 1.5,
    };

    let domain = if strict {
        constraint.inset(DOMAIN_INSET, DOMAIN_INSET)
    } else if !exact {
        // Advisory constraint on an approx backing: only the right/bottom
        // content edges border garbage texels.
        let mut domain = Rect::largest();
        if coords_limited {
            let mut clamped = false;
            if bounds.right - filter_half_width < constraint.right {
                domain.right = bounds.right - DOMAIN_INSET;
                clamped = true;
            }
            if bounds.bottom - filter_half_width < constraint.bottom {
                domain.bottom = bounds.bottom - DOMAIN_INSET;
                clamped = true;
            }
            if !clamped {
                return DomainMode::NoDomain;
            }
        } else {
            domain.right = bounds.right - DOMAIN_INSET;
            domain.bottom = bounds.bottom - DOMAIN_INSET;
        }
        domain
    } else {
        return DomainMode::NoDomain;
    };

    DomainMode::Domain(domain.sorted_to_center())
}
