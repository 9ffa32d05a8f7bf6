//! Texture producers and the machinery they share.
//!
//! [`TextureProducer`] is the closed set of texture sources that can be
//! adapted for sampling. Each variant answers the same questions (size,
//! color info, "give me a proxy for this sampler", "build a sampling unit")
//! and reuses the helpers below for copy caching, the copy decision
//! outcome, domain fallback and final assembly.

use std::sync::Arc;

use glam::Mat3;
use texadj_core::{AlphaType, ColorSpaceId, Rect};

use crate::adjuster::TextureAdjuster;
use crate::caps::GpuCaps;
use crate::context::GpuContext;
use crate::copy::{CopyDecision, CopyParams};
use crate::domain::{DomainMode, FilterConstraint, determine_domain_mode};
use crate::effect::SamplingEffect;
use crate::key::UniqueKey;
use crate::maker::TextureMaker;
use crate::proxy::{TextureProxy, mip_level_count};
use crate::sampler::{Filter, SamplerState};
use crate::{AdjustError, AdjustResult};

/// Hook notified after a derived texture is registered under a new key.
///
/// Receives the key and the id of the context that registered it.
pub type CopyListener = Arc<dyn Fn(&UniqueKey, u32) + Send + Sync>;

/// Everything a caller specifies to get a sampling unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingRequest {
    /// Local-to-texel coordinate transform.
    pub matrix: Mat3,
    /// Valid content region, in texels of the original.
    pub constraint: Rect,
    pub filter_constraint: FilterConstraint,
    /// Coordinates are guaranteed to stay inside `constraint`.
    pub coords_limited: bool,
    /// `None` selects bicubic.
    pub filter: Option<Filter>,
    pub dst_color_space: Option<ColorSpaceId>,
}

impl SamplingRequest {
    /// Strict constraint, unlimited coordinates, untagged destination.
    pub fn new(matrix: Mat3, constraint: Rect, filter: Option<Filter>) -> Self {
        Self {
            matrix,
            constraint,
            filter_constraint: FilterConstraint::Yes,
            coords_limited: false,
            filter,
            dst_color_space: None,
        }
    }

    pub fn with_filter_constraint(mut self, filter_constraint: FilterConstraint) -> Self {
        self.filter_constraint = filter_constraint;
        self
    }

    pub fn with_coords_limited(mut self, coords_limited: bool) -> Self {
        self.coords_limited = coords_limited;
        self
    }

    pub fn with_dst_color_space(mut self, dst: Option<ColorSpaceId>) -> Self {
        self.dst_color_space = dst;
        self
    }

    /// Clamp sampler for the requested filter (nearest for bicubic).
    pub fn sampler(&self) -> SamplerState {
        let mut sampler = SamplerState::default();
        if let Some(filter) = self.filter {
            sampler.set_filter(filter);
        }
        sampler
    }
}

/// A texture source that can be adapted for sampling.
pub enum TextureProducer {
    /// Already-resident texture.
    Adjuster(TextureAdjuster),
    /// Texture generated on demand.
    Maker(TextureMaker),
}

impl TextureProducer {
    pub fn width(&self) -> u32 {
        match self {
            Self::Adjuster(a) => a.width(),
            Self::Maker(m) => m.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Adjuster(a) => a.height(),
            Self::Maker(m) => m.height(),
        }
    }

    pub fn is_alpha_only(&self) -> bool {
        match self {
            Self::Adjuster(a) => a.is_alpha_only(),
            Self::Maker(m) => m.is_alpha_only(),
        }
    }

    pub fn alpha_type(&self) -> AlphaType {
        match self {
            Self::Adjuster(a) => a.alpha_type(),
            Self::Maker(m) => m.alpha_type(),
        }
    }

    pub fn color_space(&self) -> Option<ColorSpaceId> {
        match self {
            Self::Adjuster(a) => a.color_space(),
            Self::Maker(m) => m.color_space(),
        }
    }

    /// Proxy that can be sampled with `sampler`.
    ///
    /// `scale_adjust` must come in as `[1.0, 1.0]`; it is rescaled when a
    /// wrap-mode copy changed the texture size.
    pub fn ref_texture_proxy_for_params(
        &self,
        sampler: &SamplerState,
        scale_adjust: &mut [f32; 2],
    ) -> AdjustResult<Arc<TextureProxy>> {
        match self {
            Self::Adjuster(a) => a.ref_texture_proxy_for_params(sampler, scale_adjust),
            Self::Maker(m) => m.ref_texture_proxy_for_params(sampler, scale_adjust),
        }
    }

    /// Sampling unit for `request`.
    pub fn create_fragment_processor(&self, request: &SamplingRequest) -> AdjustResult<SamplingEffect> {
        match self {
            Self::Adjuster(a) => a.create_fragment_processor(request),
            Self::Maker(m) => m.create_fragment_processor(request),
        }
    }
}

impl From<TextureAdjuster> for TextureProducer {
    fn from(a: TextureAdjuster) -> Self {
        Self::Adjuster(a)
    }
}

impl From<TextureMaker> for TextureProducer {
    fn from(m: TextureMaker) -> Self {
        Self::Maker(m)
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Whether a texture of this size sampled with `sampler` gets mip levels.
pub(crate) fn will_be_mipped(caps: &GpuCaps, width: u32, height: u32, sampler: &SamplerState) -> bool {
    sampler.filter == Filter::MipMap && mip_level_count(width, height) > 0 && caps.mip_map_support
}

/// Looks up a derived texture under `key`, copying `source` on a miss.
///
/// A hit is only accepted if it has mips or mips aren't wanted. A
/// non-mipped hit that must be replaced is unregistered before the new
/// copy is registered. With no key the copy is made but not cached.
///
/// The key's stripe is held across the copy, so a [`GpuCopier`] must not
/// resolve textures through the same cache. The listener runs after the
/// stripe is released.
///
/// [`GpuCopier`]: crate::GpuCopier
pub(crate) fn ref_copy_through_cache(
    ctx: &GpuContext,
    key: Option<UniqueKey>,
    source: &Arc<TextureProxy>,
    params: &CopyParams,
    want_mips: bool,
    listener: Option<&CopyListener>,
) -> Option<Arc<TextureProxy>> {
    let Some(key) = key else {
        tracing::trace!(src = source.id(), "No key; uncached copy");
        return ctx.copier().copy_on_gpu(source, params, want_mips);
    };

    let copy = {
        let cache = ctx.cache();
        let _guard = cache.lock_key(&key);

        let cached = cache.find(&key);
        if let Some(hit) = &cached {
            if !want_mips || hit.is_mipped() {
                tracing::trace!(proxy = hit.id(), "Copy cache hit");
                return Some(hit.clone());
            }
        }

        let Some(copy) = ctx.copier().copy_on_gpu(source, params, want_mips) else {
            tracing::debug!(src = source.id(), w = params.width, h = params.height, want_mips, "Copy failed");
            return None;
        };
        debug_assert_eq!(copy.origin(), source.origin(), "copy must preserve origin");

        if let Some(stale) = cached {
            // A non-mipped copy holds the key but mips are now required.
            debug_assert!(copy.is_mipped() && !stale.is_mipped());
            cache.unregister(&key, &stale);
            tracing::debug!(stale = stale.id(), fresh = copy.id(), "Upgrading cached copy to mipped");
        }
        cache.register(key.clone(), copy.clone());
        copy
    };

    if ctx.is_recording_deferred() {
        tracing::trace!(proxy = copy.id(), "Deferred recording; listener skipped");
    } else if let Some(listener) = listener {
        listener(&key, ctx.id());
    }
    Some(copy)
}

/// Applies a [`CopyDecision`]: returns the original, or the copy produced
/// by `copy`, degrading to the original when only mips were missing.
pub(crate) fn resolve_decision(
    decision: CopyDecision,
    original: Arc<TextureProxy>,
    scale_adjust: &mut [f32; 2],
    copy: impl FnOnce(&CopyParams) -> Option<Arc<TextureProxy>>,
) -> AdjustResult<Arc<TextureProxy>> {
    match decision {
        CopyDecision::NotNeeded => Ok(original),
        CopyDecision::WrapMode {
            params,
            scale_adjust: scale,
        } => {
            tracing::debug!(src = original.id(), w = params.width, h = params.height, "Copy required for wrap mode");
            *scale_adjust = scale;
            copy(&params).ok_or(AdjustError::CopyFailed {
                width: params.width,
                height: params.height,
            })
        }
        CopyDecision::MipsOnly { params } => {
            tracing::debug!(src = original.id(), "Copy required for mips");
            match copy(&params) {
                Some(proxy) => Ok(proxy),
                None => {
                    // The backend falls back to bilinear when mips are missing.
                    tracing::warn!(src = original.id(), "Mip copy failed; sampling original without mips");
                    Ok(original)
                }
            }
        }
    }
}

/// Domain for `request`, with the single bilinear retry on `TightCopy`.
pub(crate) fn domain_mode_with_fallback(request: &SamplingRequest, proxy: &TextureProxy) -> DomainMode {
    let mode = determine_domain_mode(
        &request.constraint,
        request.filter_constraint,
        request.coords_limited,
        proxy,
        request.filter,
    );
    if mode != DomainMode::TightCopy {
        return mode;
    }

    // TODO: copy the constraint subset with its own mip chain and adjust
    // the matrix (non-integer constraint rects included). Until then clamp
    // with bilinear geometry and accept bleed above level 0.
    debug_assert_eq!(request.filter, Some(Filter::MipMap), "only mip sampling needs a tight copy");
    tracing::trace!(proxy = proxy.id(), "Tight copy required; using bilinear domain");
    let mode = determine_domain_mode(
        &request.constraint,
        request.filter_constraint,
        request.coords_limited,
        proxy,
        Some(Filter::Bilerp),
    );
    debug_assert!(mode != DomainMode::TightCopy);
    mode
}

/// Final assembly of a sampling unit around a resolved proxy.
pub(crate) fn assemble(
    proxy: Arc<TextureProxy>,
    matrix: Mat3,
    request: &SamplingRequest,
    color_space: Option<ColorSpaceId>,
    alpha_type: AlphaType,
) -> SamplingEffect {
    let mode = domain_mode_with_fallback(request, &proxy);
    debug_assert!(mode.domain().is_none_or(|d| d.is_sorted()));
    SamplingEffect::for_domain_and_filter(proxy, matrix, mode, request.filter).with_color_xform(
        color_space,
        alpha_type,
        request.dst_color_space,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::TextureDesc;

    #[test]
    fn test_will_be_mipped() {
        let caps = GpuCaps::default();
        assert!(will_be_mipped(&caps, 256, 256, &SamplerState::clamp(Filter::MipMap)));
        assert!(!will_be_mipped(&caps, 256, 256, &SamplerState::clamp(Filter::Bilerp)));
        assert!(!will_be_mipped(&caps, 1, 1, &SamplerState::clamp(Filter::MipMap)));

        let no_mips = GpuCaps {
            mip_map_support: false,
            ..GpuCaps::default()
        };
        assert!(!will_be_mipped(&no_mips, 256, 256, &SamplerState::clamp(Filter::MipMap)));
    }

    #[test]
    fn test_request_sampler_defaults_to_nearest_clamp() {
        let req = SamplingRequest::new(Mat3::IDENTITY, Rect::from_wh(4.0, 4.0), None);
        assert_eq!(req.sampler(), SamplerState::default());
        let req = SamplingRequest::new(Mat3::IDENTITY, Rect::from_wh(4.0, 4.0), Some(Filter::MipMap));
        assert_eq!(req.sampler(), SamplerState::clamp(Filter::MipMap));
    }

    #[test]
    fn test_resolve_decision_mip_failure_degrades() {
        let original = TextureProxy::new(TextureDesc::new(64, 64));
        let mut scale = [1.0, 1.0];
        let decision = CopyDecision::MipsOnly {
            params: CopyParams::full(64, 64, Filter::Nearest, true),
        };
        let got = resolve_decision(decision, original.clone(), &mut scale, |_| None).unwrap();
        assert!(Arc::ptr_eq(&got, &original));
        assert_eq!(scale, [1.0, 1.0]);
    }

    #[test]
    fn test_resolve_decision_wrap_failure_is_error() {
        let original = TextureProxy::new(TextureDesc::new(300, 200));
        let mut scale = [1.0, 1.0];
        let decision = CopyDecision::WrapMode {
            params: CopyParams::full(300, 200, Filter::Nearest, false),
            scale_adjust: [1.0, 1.0],
        };
        let err = resolve_decision(decision, original, &mut scale, |_| None).unwrap_err();
        assert_eq!(err, AdjustError::CopyFailed { width: 300, height: 200 });
    }

    #[test]
    fn test_domain_fallback_keeps_mip_filter() {
        let proxy = TextureProxy::new(TextureDesc::new(100, 100));
        let req = SamplingRequest::new(Mat3::IDENTITY, Rect::from_ltrb(10.0, 10.0, 60.0, 60.0), Some(Filter::MipMap));
        let effect = assemble(proxy, Mat3::IDENTITY, &req, None, AlphaType::Premul);
        assert_eq!(
            effect.kind,
            crate::EffectKind::TextureDomain {
                domain: Rect::from_ltrb(10.5, 10.5, 59.5, 59.5),
                filter: Filter::MipMap,
            }
        );
    }
}
