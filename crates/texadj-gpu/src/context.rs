//! GPU context: caps, shared cache, copier and recording mode.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::cache::ProxyCache;
use crate::caps::GpuCaps;
use crate::copy::GpuCopier;

static NEXT_CONTEXT_ID: AtomicU32 = AtomicU32::new(1);

/// How draws recorded against a context are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingMode {
    /// Work goes straight to the GPU.
    #[default]
    Immediate,
    /// Display-list recording on a worker thread, replayed later. Change
    /// listeners are not registered in this mode because listener
    /// registration is not thread safe.
    Deferred,
}

/// Context that producers resolve textures against.
///
/// Several contexts (e.g. deferred recorders on worker threads) may share
/// one [`ProxyCache`].
pub struct GpuContext {
    id: u32,
    caps: GpuCaps,
    cache: Arc<ProxyCache>,
    copier: Arc<dyn GpuCopier>,
    recording_mode: RecordingMode,
    abandoned: AtomicBool,
}

impl GpuContext {
    /// Immediate-mode context with a fresh unique id.
    pub fn new(caps: GpuCaps, cache: Arc<ProxyCache>, copier: Arc<dyn GpuCopier>) -> Self {
        Self {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            caps,
            cache,
            copier,
            recording_mode: RecordingMode::Immediate,
            abandoned: AtomicBool::new(false),
        }
    }

    pub fn with_recording_mode(mut self, mode: RecordingMode) -> Self {
        self.recording_mode = mode;
        self
    }

    /// Unique id reported to change listeners.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn caps(&self) -> &GpuCaps {
        &self.caps
    }

    #[inline]
    pub fn cache(&self) -> &Arc<ProxyCache> {
        &self.cache
    }

    #[inline]
    pub fn copier(&self) -> &dyn GpuCopier {
        self.copier.as_ref()
    }

    #[inline]
    pub fn recording_mode(&self) -> RecordingMode {
        self.recording_mode
    }

    /// Returns `true` while recording a deferred display list.
    #[inline]
    pub fn is_recording_deferred(&self) -> bool {
        self.recording_mode == RecordingMode::Deferred
    }

    /// Marks the backend as torn down. Every later resolve fails.
    pub fn abandon(&self) {
        if !self.abandoned.swap(true, Ordering::AcqRel) {
            tracing::debug!(context = self.id, "Context abandoned");
        }
    }

    #[inline]
    pub fn is_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for GpuContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuContext")
            .field("id", &self.id)
            .field("caps", &self.caps)
            .field("recording_mode", &self.recording_mode)
            .field("abandoned", &self.is_abandoned())
            .finish()
    }
}
