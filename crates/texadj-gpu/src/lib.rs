//! Texture adjustment for GPU sampling.
//!
//! Adapts an already-resident texture so it can be sampled with a requested
//! wrap mode, filter and mip requirement. When the texture cannot be used
//! as-is a derived copy is produced through a [`GpuCopier`] and registered
//! in the shared [`ProxyCache`], so later requests with the same effective
//! parameters reuse it.
//!
//! # Architecture
//!
//! ```text
//! TextureProducer (closed set of variants)
//!     ├── TextureAdjuster (resident texture)
//!     └── TextureMaker    (lazily generated texture)
//!             │
//!             ├── copy::decide_copy        wrap-mode / mips-only / none
//!             ├── ProxyCache + UniqueKey   find / register / unregister
//!             ├── GpuCopier                external copy operation
//!             ├── domain::determine_domain_mode
//!             └── effect::SamplingEffect   final sampling description
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use texadj_gpu::{GpuCaps, GpuContext, ProxyCache, TextureAdjuster, VirtualCopier};
//!
//! let cache = Arc::new(ProxyCache::new());
//! let ctx = Arc::new(GpuContext::new(GpuCaps::from_env()?, cache, Arc::new(VirtualCopier::new())));
//! let adjuster = TextureAdjuster::new(ctx, original, AlphaType::Premul, content_id, None);
//! let request = SamplingRequest::new(matrix, constraint, Some(Filter::Bilerp))
//!     .with_dst_color_space(Some(ColorSpaceId::Srgb));
//! let effect = adjuster.create_fragment_processor(&request)?;
//! ```

pub mod adjuster;
pub mod cache;
pub mod caps;
pub mod context;
pub mod copy;
pub mod domain;
pub mod effect;
pub mod key;
pub mod maker;
pub mod producer;
pub mod proxy;
pub mod sampler;

pub use adjuster::TextureAdjuster;
pub use cache::ProxyCache;
pub use caps::GpuCaps;
pub use context::{GpuContext, RecordingMode};
pub use copy::{CopyDecision, CopyParams, GpuCopier, VirtualCopier};
pub use domain::{DomainMode, FilterConstraint};
pub use effect::{EffectKind, SamplingEffect};
pub use key::{KeyDomain, UniqueKey};
pub use maker::{GeneratorInfo, TextureGenerator, TextureMaker};
pub use producer::{CopyListener, SamplingRequest, TextureProducer};
pub use proxy::{BackingFit, MipMapped, PixelConfig, SurfaceOrigin, TextureDesc, TextureProxy, TextureType};
pub use sampler::{Filter, SamplerState, WrapMode};

use thiserror::Error;

/// Texture adjustment errors.
///
/// Expected failure paths only; backend bugs are caught by debug assertions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdjustError {
    #[error("GPU context was abandoned")]
    Abandoned,

    #[error("Copy for wrap mode failed ({width}x{height})")]
    CopyFailed { width: u32, height: u32 },

    #[error("Texture generation failed for content {content_id}")]
    GenerationFailed { content_id: u32 },

    #[error("Texture too large: {width}x{height} exceeds GPU limit {limit}")]
    TextureTooLarge { width: u32, height: u32, limit: u32 },
}

pub type AdjustResult<T> = Result<T, AdjustError>;
