//! Adjuster for textures that are already resident on the GPU.

use std::sync::Arc;

use texadj_core::{AlphaType, ColorSpaceId};

use crate::context::GpuContext;
use crate::copy::{CopyParams, decide_copy};
use crate::effect::{SamplingEffect, post_scale};
use crate::key::{UniqueKey, copy_key, image_id_key};
use crate::producer::{
    CopyListener, SamplingRequest, assemble, ref_copy_through_cache, resolve_decision, will_be_mipped,
};
use crate::proxy::TextureProxy;
use crate::sampler::SamplerState;
use crate::{AdjustError, AdjustResult};

/// Adapts a resident texture for sampling.
///
/// Cheap to construct; build one per draw from the texture, its content
/// identity and its color info. Derived copies live in the context's
/// shared [`ProxyCache`](crate::ProxyCache), not in the adjuster.
pub struct TextureAdjuster {
    context: Arc<GpuContext>,
    original: Arc<TextureProxy>,
    alpha_type: AlphaType,
    color_space: Option<ColorSpaceId>,
    content_id: u32,
    listener: Option<CopyListener>,
}

impl TextureAdjuster {
    /// `content_id` of [`INVALID_CONTENT_ID`](crate::key::INVALID_CONTENT_ID)
    /// disables copy caching for this texture.
    pub fn new(
        context: Arc<GpuContext>,
        original: Arc<TextureProxy>,
        alpha_type: AlphaType,
        content_id: u32,
        color_space: Option<ColorSpaceId>,
    ) -> Self {
        Self {
            context,
            original,
            alpha_type,
            color_space,
            content_id,
            listener: None,
        }
    }

    /// Installs the hook notified when a copy is registered in the cache.
    pub fn with_listener(mut self, listener: CopyListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn context(&self) -> &Arc<GpuContext> {
        &self.context
    }

    pub fn original(&self) -> &Arc<TextureProxy> {
        &self.original
    }

    pub fn width(&self) -> u32 {
        self.original.width()
    }

    pub fn height(&self) -> u32 {
        self.original.height()
    }

    pub fn is_alpha_only(&self) -> bool {
        self.original.config().is_alpha_only()
    }

    pub fn alpha_type(&self) -> AlphaType {
        self.alpha_type
    }

    pub fn color_space(&self) -> Option<ColorSpaceId> {
        self.color_space
    }

    pub fn content_id(&self) -> u32 {
        self.content_id
    }

    /// Cache key of the copy described by `params`, if the content is keyable.
    pub fn make_copy_key(&self, params: &CopyParams) -> Option<UniqueKey> {
        image_id_key(self.content_id, self.original.bounds()).map(|base| copy_key(&base, params))
    }

    /// Cached copy of the original for `params`, creating it on a miss.
    ///
    /// Returns `None` only when the copier fails.
    pub fn ref_texture_proxy_copy(&self, params: &CopyParams, will_be_mipped: bool) -> Option<Arc<TextureProxy>> {
        ref_copy_through_cache(
            &self.context,
            self.make_copy_key(params),
            &self.original,
            params,
            will_be_mipped,
            self.listener.as_ref(),
        )
    }

    /// Proxy that can be sampled with `sampler`: the original or a cached copy.
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
        debug_assert!(
            caps.fits(self.width(), self.height()),
            "{}x{} exceeds max texture size {}",
            self.width(),
            self.height(),
            caps.max_texture_size
        );

        let will_be_mipped = will_be_mipped(caps, self.width(), self.height(), sampler);
        let decision = decide_copy(caps, &self.original, sampler);
        resolve_decision(decision, self.original.clone(), scale_adjust, |params| {
            self.ref_texture_proxy_copy(params, will_be_mipped)
        })
    }

    /// Sampling unit for `request`.
    pub fn create_fragment_processor(&self, request: &SamplingRequest) -> AdjustResult<SamplingEffect> {
        let mut scale_adjust = [1.0, 1.0];
        let proxy = self.ref_texture_proxy_for_params(&request.sampler(), &mut scale_adjust)?;

        let matrix = if Arc::ptr_eq(&proxy, &self.original) {
            request.matrix
        } else {
            post_scale(request.matrix, scale_adjust)
        };
        Ok(assemble(proxy, matrix, request, self.color_space, self.alpha_type))
    }
}

impl std::fmt::Debug for TextureAdjuster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureAdjuster")
            .field("context", &self.context.id())
            .field("original", &self.original.id())
            .field("content_id", &self.content_id)
            .field("alpha_type", &self.alpha_type)
            .field("color_space", &self.color_space)
            .finish()
    }
}
