//! Producer for textures generated on demand.
//!
//! A [`TextureMaker`] owns a [`TextureGenerator`] (decoded image, picture
//! rasterizer, ...) and only asks it for pixels when a sampler needs them.
//! The generated original is cached under the content's image-id key so
//! every maker for the same content shares it; derived copies are then
//! made exactly as for a resident texture.

use std::sync::Arc;

use texadj_core::{AlphaType, ColorSpaceId, IRect};

use crate::context::GpuContext;
use crate::copy::{CopyParams, decide_copy};
use crate::effect::{SamplingEffect, post_scale};
use crate::key::{UniqueKey, copy_key, image_id_key};
use crate::producer::{
    CopyListener, SamplingRequest, assemble, ref_copy_through_cache, resolve_decision, will_be_mipped,
};
use crate::proxy::{PixelConfig, TextureProxy};
use crate::sampler::SamplerState;
use crate::{AdjustError, AdjustResult};

/// Static description of what a generator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorInfo {
    pub width: u32,
    pub height: u32,
    pub config: PixelConfig,
    pub alpha_type: AlphaType,
    pub color_space: Option<ColorSpaceId>,
}

/// Source of texture content that is materialized lazily.
pub trait TextureGenerator: Send + Sync {
    /// Content identity; 0 disables caching.
    fn content_id(&self) -> u32;

    fn info(&self) -> GeneratorInfo;

    /// Uploads or renders the content. `want_mips` asks for a full mip
    /// chain; generators may ignore it. `None` on failure.
    fn generate(&self, ctx: &GpuContext, want_mips: bool) -> Option<Arc<TextureProxy>>;
}

/// Adapts generated content for sampling.
pub struct TextureMaker {
    context: Arc<GpuContext>,
    generator: Box<dyn TextureGenerator>,
    info: GeneratorInfo,
    listener: Option<CopyListener>,
}

impl TextureMaker {
    pub fn new(context: Arc<GpuContext>, generator: Box<dyn TextureGenerator>) -> Self {
        let info = generator.info();
        Self {
            context,
            generator,
            info,
            listener: None,
        }
    }

    /// Installs the hook notified when a derived copy is registered.
    pub fn with_listener(mut self, listener: CopyListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn is_alpha_only(&self) -> bool {
        self.info.config.is_alpha_only()
    }

    pub fn alpha_type(&self) -> AlphaType {
        self.info.alpha_type
    }

    pub fn color_space(&self) -> Option<ColorSpaceId> {
        self.info.color_space
    }

    pub fn content_id(&self) -> u32 {
        self.generator.content_id()
    }

    fn bounds(&self) -> IRect {
        IRect::from_wh(self.info.width, self.info.height)
    }

    /// Key of the generated original.
    pub fn original_key(&self) -> Option<UniqueKey> {
        image_id_key(self.content_id(), self.bounds())
    }

    pub fn make_copy_key(&self, params: &CopyParams) -> Option<UniqueKey> {
        self.original_key().map(|base| copy_key(&base, params))
    }

    /// Generated original, from the cache when possible.
    ///
    /// A cached original without mips is regenerated when mips are wanted.
    /// If that regeneration fails the cached one is still returned.
    ///
    /// The generator runs without any cache lock held, so it may resolve
    /// other textures through the same context. When two resolvers race,
    /// the first registered original wins and the other is dropped.
    pub fn ref_original(&self, will_be_mipped: bool) -> AdjustResult<Arc<TextureProxy>> {
        let content_id = self.content_id();
        let Some(key) = self.original_key() else {
            return self.generate(will_be_mipped).ok_or(AdjustError::GenerationFailed { content_id });
        };
        let cache = self.context.cache();
        let acceptable = |p: &Arc<TextureProxy>| !will_be_mipped || p.is_mipped();

        if let Some(hit) = cache.find(&key).filter(acceptable) {
            tracing::trace!(content_id, proxy = hit.id(), "Generated original cache hit");
            return Ok(hit);
        }

        let generated = self.generate(will_be_mipped);

        let _guard = cache.lock_key(&key);
        let cached = cache.find(&key);
        if let Some(hit) = cached.as_ref().filter(|p| acceptable(p)) {
            tracing::trace!(content_id, proxy = hit.id(), "Original registered while generating");
            return Ok(hit.clone());
        }

        match generated {
            Some(proxy) => {
                if let Some(stale) = cached {
                    cache.unregister(&key, &stale);
                    tracing::debug!(content_id, stale = stale.id(), fresh = proxy.id(), "Regenerated original with mips");
                }
                cache.register(key, proxy.clone());
                Ok(proxy)
            }
            None => match cached {
                Some(stale) => {
                    tracing::warn!(content_id, "Mipped generation failed; using cached original");
                    Ok(stale)
                }
                None => Err(AdjustError::GenerationFailed { content_id }),
            },
        }
    }

    fn generate(&self, want_mips: bool) -> Option<Arc<TextureProxy>> {
        let proxy = self.generator.generate(&self.context, want_mips)?;
        debug_assert_eq!(
            (proxy.width(), proxy.height()),
            (self.info.width, self.info.height),
            "generator produced wrong size"
        );
        tracing::debug!(content_id = self.content_id(), proxy = proxy.id(), want_mips, "Generated texture");
        Some(proxy)
    }

    /// Proxy that can be sampled with `sampler`.
    ///
    /// `scale_adjust` must come in as `[1.0, 1.0]`.
    pub fn ref_texture_proxy_for_params(
        &self,
        sampler: &SamplerState,
        scale_adjust: &mut [f32; 2],
    ) -> AdjustResult<Arc<TextureProxy>> {
        if self.context.is_abandoned() {
            return Err(AdjustError::Abandoned);
        }
        let caps = self.context.caps();
        if !caps.fits(self.width(), self.height()) {
            return Err(AdjustError::TextureTooLarge {
                width: self.width(),
                height: self.height(),
                limit: caps.max_texture_size,
            });
        }

        let will_be_mipped = will_be_mipped(caps, self.width(), self.height(), sampler);
        let original = self.ref_original(will_be_mipped)?;
        let decision = decide_copy(caps, &original, sampler);
        resolve_decision(decision, original.clone(), scale_adjust, |params| {
            ref_copy_through_cache(
                &self.context,
                self.make_copy_key(params),
                &original,
                params,
                will_be_mipped,
                self.listener.as_ref(),
            )
        })
    }

    /// Sampling unit for `request`.
    pub fn create_fragment_processor(&self, request: &SamplingRequest) -> AdjustResult<SamplingEffect> {
        let mut scale_adjust = [1.0, 1.0];
        let proxy = self.ref_texture_proxy_for_params(&request.sampler(), &mut scale_adjust)?;
        // Any size change comes from a wrap copy; the original has the logical size.
        let matrix = if scale_adjust == [1.0, 1.0] {
            request.matrix
        } else {
            post_scale(request.matrix, scale_adjust)
        };
        Ok(assemble(proxy, matrix, request, self.info.color_space, self.info.alpha_type))
    }
}

impl std::fmt::Debug for TextureMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureMaker")
            .field("context", &self.context.id())
            .field("content_id", &self.content_id())
            .field("info", &self.info)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ProxyCache;
    use crate::caps::GpuCaps;
    use crate::copy::VirtualCopier;
    use crate::proxy::{MipMapped, TextureDesc};
    use crate::sampler::Filter;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct Gen {
        id: u32,
        w: u32,
        h: u32,
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl Gen {
        fn new(id: u32, w: u32, h: u32) -> Arc<Self> {
            Arc::new(Self {
                id,
                w,
                h,
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            })
        }
    }

    impl TextureGenerator for Arc<Gen> {
        fn content_id(&self) -> u32 {
            self.id
        }

        fn info(&self) -> GeneratorInfo {
            GeneratorInfo {
                width: self.w,
                height: self.h,
                config: PixelConfig::Rgba8888,
                alpha_type: AlphaType::Premul,
                color_space: Some(ColorSpaceId::Srgb),
            }
        }

        fn generate(&self, _ctx: &GpuContext, want_mips: bool) -> Option<Arc<TextureProxy>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.fail.load(Ordering::Relaxed) {
                return None;
            }
            let mips = if want_mips { MipMapped::Yes } else { MipMapped::No };
            Some(TextureProxy::new(TextureDesc::new(self.w, self.h).with_mips(mips)))
        }
    }

    fn ctx(caps: GpuCaps) -> Arc<GpuContext> {
        Arc::new(GpuContext::new(caps, Arc::new(ProxyCache::new()), Arc::new(VirtualCopier::new())))
    }

    #[test]
    fn test_original_generated_once() {
        let g = Gen::new(9, 64, 64);
        let maker = TextureMaker::new(ctx(GpuCaps::default()), Box::new(g.clone()));
        let mut scale = [1.0, 1.0];
        let a = maker
            .ref_texture_proxy_for_params(&SamplerState::clamp(Filter::Bilerp), &mut scale)
            .unwrap();
        let b = maker
            .ref_texture_proxy_for_params(&SamplerState::clamp(Filter::Bilerp), &mut scale)
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(g.calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_mip_request_regenerates_original() {
        let g = Gen::new(10, 64, 64);
        let maker = TextureMaker::new(ctx(GpuCaps::default()), Box::new(g.clone()));
        let plain = maker.ref_original(false).unwrap();
        let mipped = maker.ref_original(true).unwrap();
        assert!(!plain.is_mipped());
        assert!(mipped.is_mipped());
        assert_eq!(g.calls.load(Ordering::Relaxed), 2);

        // Now mipped requests and plain requests both hit.
        assert!(Arc::ptr_eq(&maker.ref_original(false).unwrap(), &mipped));
        assert_eq!(g.calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_failed_upgrade_falls_back_to_cached() {
        let g = Gen::new(11, 64, 64);
        let maker = TextureMaker::new(ctx(GpuCaps::default()), Box::new(g.clone()));
        let plain = maker.ref_original(false).unwrap();
        g.fail.store(true, Ordering::Relaxed);
        assert!(Arc::ptr_eq(&maker.ref_original(true).unwrap(), &plain));
    }

    #[test]
    fn test_generation_failure() {
        let g = Gen::new(12, 64, 64);
        g.fail.store(true, Ordering::Relaxed);
        let maker = TextureMaker::new(ctx(GpuCaps::default()), Box::new(g));
        let mut scale = [1.0, 1.0];
        let err = maker
            .ref_texture_proxy_for_params(&SamplerState::default(), &mut scale)
            .unwrap_err();
        assert_eq!(err, AdjustError::GenerationFailed { content_id: 12 });
    }

    #[test]
    fn test_too_large() {
        let caps = GpuCaps {
            max_texture_size: 128,
            ..GpuCaps::default()
        };
        let g = Gen::new(13, 256, 64);
        let maker = TextureMaker::new(ctx(caps), Box::new(g.clone()));
        let mut scale = [1.0, 1.0];
        let err = maker
            .ref_texture_proxy_for_params(&SamplerState::default(), &mut scale)
            .unwrap_err();
        assert_eq!(
            err,
            AdjustError::TextureTooLarge {
                width: 256,
                height: 64,
                limit: 128
            }
        );
        assert_eq!(g.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_uncached_without_content_id() {
        let g = Gen::new(0, 32, 32);
        let context = ctx(GpuCaps::default());
        let maker = TextureMaker::new(context.clone(), Box::new(g.clone()));
        maker.ref_original(false).unwrap();
        maker.ref_original(false).unwrap();
        assert_eq!(g.calls.load(Ordering::Relaxed), 2);
        assert!(context.cache().is_empty());
    }
}
