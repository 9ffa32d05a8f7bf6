//! Sampling effects: the description handed to the rendering pipeline.

use std::sync::Arc;

use glam::{Mat3, Vec2};
use texadj_core::{AlphaType, ColorSpaceId, ColorSpaceXform, Rect};

use crate::domain::DomainMode;
use crate::proxy::TextureProxy;
use crate::sampler::{Filter, SamplerState, WrapMode};

/// Shader technique used to sample the texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectKind {
    /// Plain hardware sampling.
    SimpleTexture { sampler: SamplerState },
    /// Hardware sampling with coordinates clamped to `domain`.
    TextureDomain { domain: Rect, filter: Filter },
    /// Bicubic filtering, optionally clamped to `domain`.
    Bicubic {
        domain: Option<Rect>,
        wrap: [WrapMode; 2],
    },
}

/// Fully assembled sampling unit.
#[derive(Debug, Clone)]
pub struct SamplingEffect {
    pub proxy: Arc<TextureProxy>,
    /// Maps local coordinates to texel coordinates of `proxy`.
    pub matrix: Mat3,
    pub kind: EffectKind,
    /// Conversion into the destination color space, when one is needed.
    pub color_xform: Option<ColorSpaceXform>,
}

impl SamplingEffect {
    /// Builds the sampling unit for a resolved proxy and domain mode.
    ///
    /// `filter` is `None` for bicubic. `mode` must not be `TightCopy`.
    pub fn for_domain_and_filter(
        proxy: Arc<TextureProxy>,
        matrix: Mat3,
        mode: DomainMode,
        filter: Option<Filter>,
    ) -> Self {
        debug_assert!(mode != DomainMode::TightCopy);
        let kind = match (filter, mode) {
            (Some(filter), DomainMode::Domain(domain)) => EffectKind::TextureDomain { domain, filter },
            (Some(filter), _) => EffectKind::SimpleTexture {
                sampler: SamplerState::clamp(filter),
            },
            (None, DomainMode::Domain(domain)) => EffectKind::Bicubic {
                domain: Some(domain),
                wrap: [WrapMode::Clamp; 2],
            },
            (None, _) => EffectKind::Bicubic {
                domain: None,
                wrap: [WrapMode::Clamp; 2],
            },
        };
        Self {
            proxy,
            matrix,
            kind,
            color_xform: None,
        }
    }

    /// Wraps the effect in a color-space conversion when `src` and `dst` differ.
    pub fn with_color_xform(
        mut self,
        src: Option<ColorSpaceId>,
        alpha_type: AlphaType,
        dst: Option<ColorSpaceId>,
    ) -> Self {
        self.color_xform = ColorSpaceXform::make(src, alpha_type, dst);
        self
    }

    /// Clamp domain, if the effect has one.
    pub fn domain(&self) -> Option<Rect> {
        match self.kind {
            EffectKind::TextureDomain { domain, .. } => Some(domain),
            EffectKind::Bicubic { domain, .. } => domain,
            EffectKind::SimpleTexture { .. } => None,
        }
    }

    pub fn is_bicubic(&self) -> bool {
        matches!(self.kind, EffectKind::Bicubic { .. })
    }
}

/// `matrix` followed by a scale of `scale` (post-concatenation).
#[inline]
pub(crate) fn post_scale(matrix: Mat3, scale: [f32; 2]) -> Mat3 {
    Mat3::from_scale(Vec2::new(scale[0], scale[1])) * matrix
}
