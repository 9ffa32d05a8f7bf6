//! Copy decisions and the external copy operation.
//!
//! [`decide_copy`] inspects backend caps and the requested sampler and
//! tells the producer whether the original can be sampled as-is, needs a
//! copy for wrap-mode correctness, or needs a copy only to gain mip levels.
//! The copy itself is performed by a [`GpuCopier`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use texadj_core::IRect;

use crate::caps::GpuCaps;
use crate::proxy::{MipMapped, TextureDesc, TextureProxy, is_pow2, next_pow2};
use crate::sampler::{Filter, SamplerState};

/// Description of a derived copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CopyParams {
    /// Region of the original to copy.
    pub subset: IRect,
    /// Destination width.
    pub width: u32,
    /// Destination height.
    pub height: u32,
    /// Filter used when the copy resamples.
    pub filter: Filter,
    /// The copy exists to carry mip levels.
    pub mipped: bool,
}

impl CopyParams {
    /// Full-extent copy of a `width` x `height` original at the same size.
    pub fn full(width: u32, height: u32, filter: Filter, mipped: bool) -> Self {
        Self {
            subset: IRect::from_wh(width, height),
            width,
            height,
            filter,
            mipped,
        }
    }

    /// Returns `true` if the copy changes dimensions.
    pub fn is_resize(&self) -> bool {
        self.subset.width() != self.width as i32 || self.subset.height() != self.height as i32
    }
}

/// External GPU copy/blit.
///
/// Implementations must preserve the source origin. A single blocking call
/// with two outcomes: a new proxy, or `None` when the backend cannot copy.
pub trait GpuCopier: Send + Sync {
    fn copy_on_gpu(
        &self,
        src: &Arc<TextureProxy>,
        params: &CopyParams,
        want_mips: bool,
    ) -> Option<Arc<TextureProxy>>;
}

/// Outcome of [`decide_copy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CopyDecision {
    /// Sample the original directly.
    NotNeeded,
    /// Wrap mode is unsupported for the original; a copy is mandatory.
    /// `scale_adjust` maps coordinates into the (possibly larger) copy.
    WrapMode {
        params: CopyParams,
        scale_adjust: [f32; 2],
    },
    /// Only mip levels are missing; the original is an acceptable fallback.
    MipsOnly { params: CopyParams },
}

/// Decides whether `proxy` can be sampled with `sampler` on this backend.
pub fn decide_copy(caps: &GpuCaps, proxy: &TextureProxy, sampler: &SamplerState) -> CopyDecision {
    if sampler.is_repeated() {
        if let Some((params, scale_adjust)) = copy_needed_for_repeat_wrap_mode(
            caps,
            proxy,
            proxy.width(),
            proxy.height(),
            sampler.filter,
        ) {
            return CopyDecision::WrapMode {
                params,
                scale_adjust,
            };
        }
    }
    match copy_needed_for_mips(caps, proxy, sampler.filter) {
        Some(params) => CopyDecision::MipsOnly { params },
        None => CopyDecision::NotNeeded,
    }
}

/// Copy parameters and coordinate rescale needed to repeat-wrap `proxy`.
///
/// `None` when the backend can repeat-wrap it directly.
pub fn copy_needed_for_repeat_wrap_mode(
    caps: &GpuCaps,
    proxy: &TextureProxy,
    width: u32,
    height: u32,
    filter: Filter,
) -> Option<(CopyParams, [f32; 2])> {
    // Texture types that can't repeat at all: same-size copy into a 2D texture.
    if proxy.has_restricted_sampling() {
        return Some((CopyParams::full(width, height, Filter::Nearest, false), [1.0, 1.0]));
    }

    if !caps.npot_texture_tile_support && (!is_pow2(width) || !is_pow2(height)) {
        let dst_w = next_pow2(width);
        let dst_h = next_pow2(height);
        let scale_adjust = [dst_w as f32 / width as f32, dst_h as f32 / height as f32];
        // Only ever scaling up, so mips never help the resample itself.
        let copy_filter = match filter {
            Filter::Nearest => Filter::Nearest,
            Filter::Bilerp | Filter::MipMap => Filter::Bilerp,
        };
        let params = CopyParams {
            subset: IRect::from_wh(width, height),
            width: dst_w,
            height: dst_h,
            filter: copy_filter,
            mipped: false,
        };
        return Some((params, scale_adjust));
    }

    None
}

/// Copy parameters needed to give `proxy` mip levels for `filter`.
pub fn copy_needed_for_mips(caps: &GpuCaps, proxy: &TextureProxy, filter: Filter) -> Option<CopyParams> {
    let will_need_mips = filter == Filter::MipMap && caps.mip_map_support;
    if will_need_mips && (proxy.mip_mapped() == MipMapped::No || proxy.has_restricted_sampling()) {
        return Some(CopyParams::full(proxy.width(), proxy.height(), Filter::Nearest, true));
    }
    None
}

/// Copier that allocates descriptor-only proxies.
///
/// Produces a 2D, exact-fit proxy with the requested size and mip state
/// and the source's config and origin. Counts copies and can be switched
/// to fail, which makes it the reference implementation of the
/// [`GpuCopier`] contract for headless use and tests.
#[derive(Debug, Default)]
pub struct VirtualCopier {
    copies: AtomicUsize,
    failing: AtomicBool,
}

impl VirtualCopier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copier whose every copy fails.
    pub fn failing() -> Self {
        let c = Self::default();
        c.set_failing(true);
        c
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Number of copy attempts, successful or not.
    pub fn copies(&self) -> usize {
        self.copies.load(Ordering::Relaxed)
    }
}

impl GpuCopier for VirtualCopier {
    fn copy_on_gpu(
        &self,
        src: &Arc<TextureProxy>,
        params: &CopyParams,
        want_mips: bool,
    ) -> Option<Arc<TextureProxy>> {
        self.copies.fetch_add(1, Ordering::Relaxed);
        if self.failing.load(Ordering::Relaxed) {
            tracing::debug!(src = src.id(), "Virtual copy failed");
            return None;
        }
        debug_assert!(src.bounds().contains(&params.subset));

        let mips = if want_mips { MipMapped::Yes } else { MipMapped::No };
        let desc = TextureDesc::new(params.width, params.height)
            .with_config(src.config())
            .with_origin(src.origin())
            .with_mips(mips);
        let copy = TextureProxy::new(desc);
        tracing::trace!(src = src.id(), dst = copy.id(), w = params.width, h = params.height, want_mips, "Virtual copy");
        Some(copy)
    }
}
