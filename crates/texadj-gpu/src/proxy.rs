//! Texture proxies: shared, immutable descriptions of GPU textures.
//!
//! A [`TextureProxy`] stands in for a backend texture. Originals are owned
//! by whoever created them; derived copies are shared between the
//! [`ProxyCache`](crate::ProxyCache) and every call site that resolved them.
//! Proxies are never mutated after creation, identity is `Arc` pointer
//! identity plus the process-unique [`TextureProxy::id`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use texadj_core::IRect;

static NEXT_PROXY_ID: AtomicU32 = AtomicU32::new(1);

/// Pixel storage class. Only the alpha-only distinction matters here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelConfig {
    Alpha8,
    Gray8,
    #[default]
    Rgba8888,
    Bgra8888,
    RgbaHalf,
    RgbaFloat,
}

impl PixelConfig {
    #[inline]
    pub const fn is_alpha_only(self) -> bool {
        matches!(self, Self::Alpha8)
    }
}

/// Which corner texel row 0 maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurfaceOrigin {
    #[default]
    TopLeft,
    BottomLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MipMapped {
    #[default]
    No,
    Yes,
}

/// How closely the backing allocation matches the logical size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackingFit {
    /// Backing store has exactly the logical dimensions.
    #[default]
    Exact,
    /// Backing store may be larger (pooled/bucketed allocation). Texels
    /// outside the logical size hold unrelated content.
    Approx { backing_width: u32, backing_height: u32 },
}

/// Texture target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureType {
    #[default]
    TwoD,
    /// Externally imported image (e.g. video frame); no repeat, no mips.
    External,
    /// Rectangle texture; no repeat, no mips.
    Rectangle,
}

impl TextureType {
    #[inline]
    pub const fn has_restricted_sampling(self) -> bool {
        matches!(self, Self::External | Self::Rectangle)
    }
}

/// Parameters for creating a [`TextureProxy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub config: PixelConfig,
    pub origin: SurfaceOrigin,
    pub mip_mapped: MipMapped,
    pub fit: BackingFit,
    pub texture_type: TextureType,
}

impl TextureDesc {
    /// RGBA, top-left, exact, no mips.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            config: PixelConfig::default(),
            origin: SurfaceOrigin::default(),
            mip_mapped: MipMapped::No,
            fit: BackingFit::Exact,
            texture_type: TextureType::TwoD,
        }
    }

    pub fn with_config(mut self, config: PixelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_origin(mut self, origin: SurfaceOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_mips(mut self, mip_mapped: MipMapped) -> Self {
        self.mip_mapped = mip_mapped;
        self
    }

    pub fn with_fit(mut self, fit: BackingFit) -> Self {
        self.fit = fit;
        self
    }

    pub fn with_texture_type(mut self, texture_type: TextureType) -> Self {
        self.texture_type = texture_type;
        self
    }
}

/// Immutable handle to a GPU texture.
#[derive(Debug)]
pub struct TextureProxy {
    id: u32,
    desc: TextureDesc,
}

impl TextureProxy {
    /// Creates a proxy with a fresh unique id.
    pub fn new(desc: TextureDesc) -> Arc<Self> {
        debug_assert!(desc.width > 0 && desc.height > 0);
        if let BackingFit::Approx {
            backing_width,
            backing_height,
        } = desc.fit
        {
            debug_assert!(backing_width >= desc.width && backing_height >= desc.height);
        }
        let id = NEXT_PROXY_ID.fetch_add(1, Ordering::Relaxed);
        Arc::new(Self { id, desc })
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.desc.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.desc.height
    }

    /// Logical bounds `(0, 0, width, height)`.
    #[inline]
    pub fn bounds(&self) -> IRect {
        IRect::from_wh(self.desc.width, self.desc.height)
    }

    #[inline]
    pub fn config(&self) -> PixelConfig {
        self.desc.config
    }

    #[inline]
    pub fn origin(&self) -> SurfaceOrigin {
        self.desc.origin
    }

    #[inline]
    pub fn mip_mapped(&self) -> MipMapped {
        self.desc.mip_mapped
    }

    #[inline]
    pub fn is_mipped(&self) -> bool {
        self.desc.mip_mapped == MipMapped::Yes
    }

    #[inline]
    pub fn fit(&self) -> BackingFit {
        self.desc.fit
    }

    #[inline]
    pub fn texture_type(&self) -> TextureType {
        self.desc.texture_type
    }

    #[inline]
    pub fn has_restricted_sampling(&self) -> bool {
        self.desc.texture_type.has_restricted_sampling()
    }

    /// Returns `true` when no texel outside the logical size can be sampled.
    pub fn is_functionally_exact(&self) -> bool {
        match self.desc.fit {
            BackingFit::Exact => true,
            BackingFit::Approx {
                backing_width,
                backing_height,
            } => backing_width == self.desc.width && backing_height == self.desc.height,
        }
    }

    pub fn desc(&self) -> &TextureDesc {
        &self.desc
    }
}

/// Number of mip levels below the base for a `width` x `height` texture.
///
/// `floor(log2(max(width, height)))`, zero for 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    let largest = width.max(height);
    if largest < 2 {
        return 0;
    }
    31 - largest.leading_zeros()
}

#[inline]
pub(crate) fn is_pow2(v: u32) -> bool {
    v.is_power_of_two()
}

#[inline]
pub(crate) fn next_pow2(v: u32) -> u32 {
    v.next_power_of_two()
}
