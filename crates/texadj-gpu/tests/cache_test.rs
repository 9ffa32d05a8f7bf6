//! Shared cache behaviour across adjusters, contexts and threads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use texadj_core::AlphaType;
use texadj_gpu::{
    CopyListener, CopyParams, Filter, GpuCaps, GpuContext, GpuCopier, ProxyCache, RecordingMode, SamplerState,
    TextureAdjuster, TextureDesc, TextureProxy, UniqueKey, VirtualCopier, WrapMode,
};

fn repeat() -> SamplerState {
    SamplerState::new(WrapMode::Repeat, Filter::Bilerp)
}

fn recording_listener() -> (CopyListener, Arc<Mutex<Vec<(UniqueKey, u32)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let listener: CopyListener = Arc::new(move |key: &UniqueKey, ctx_id: u32| {
        sink.lock().unwrap().push((key.clone(), ctx_id));
    });
    (listener, seen)
}

#[test]
fn test_listener_notified_once_per_registration() {
    let copier = Arc::new(VirtualCopier::new());
    let ctx = Arc::new(GpuContext::new(
        GpuCaps::without_npot_tiling(),
        Arc::new(ProxyCache::new()),
        copier.clone(),
    ));
    let (listener, seen) = recording_listener();
    let adj = TextureAdjuster::new(ctx.clone(), TextureProxy::new(TextureDesc::new(300, 200)), AlphaType::Premul, 21, None)
        .with_listener(listener);

    let mut scale = [1.0, 1.0];
    adj.ref_texture_proxy_for_params(&repeat(), &mut scale).unwrap();
    adj.ref_texture_proxy_for_params(&repeat(), &mut scale).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].1, ctx.id());
    assert!(ctx.cache().contains(&seen[0].0));
}

#[test]
fn test_deferred_context_skips_listener() {
    let ctx = Arc::new(
        GpuContext::new(
            GpuCaps::without_npot_tiling(),
            Arc::new(ProxyCache::new()),
            Arc::new(VirtualCopier::new()),
        )
        .with_recording_mode(RecordingMode::Deferred),
    );
    let (listener, seen) = recording_listener();
    let adj = TextureAdjuster::new(ctx.clone(), TextureProxy::new(TextureDesc::new(300, 200)), AlphaType::Premul, 22, None)
        .with_listener(listener);

    let mut scale = [1.0, 1.0];
    adj.ref_texture_proxy_for_params(&repeat(), &mut scale).unwrap();

    // Still cached, just not announced.
    assert_eq!(ctx.cache().len(), 1);
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_contexts_share_cache() {
    let cache = Arc::new(ProxyCache::new());
    let copier = Arc::new(VirtualCopier::new());
    let immediate = Arc::new(GpuContext::new(GpuCaps::without_npot_tiling(), cache.clone(), copier.clone()));
    let deferred = Arc::new(
        GpuContext::new(GpuCaps::without_npot_tiling(), cache.clone(), copier.clone())
            .with_recording_mode(RecordingMode::Deferred),
    );
    let original = TextureProxy::new(TextureDesc::new(300, 200));

    let a = TextureAdjuster::new(immediate, original.clone(), AlphaType::Premul, 23, None);
    let b = TextureAdjuster::new(deferred, original, AlphaType::Premul, 23, None);

    let mut scale = [1.0, 1.0];
    let pa = a.ref_texture_proxy_for_params(&repeat(), &mut scale).unwrap();
    let pb = b.ref_texture_proxy_for_params(&repeat(), &mut scale).unwrap();
    assert!(Arc::ptr_eq(&pa, &pb));
    assert_eq!(copier.copies(), 1);
    assert_eq!(cache.hits(), 1);
}

/// Copier that counts successful copies and yields between lookup and
/// registration so racing resolvers overlap.
#[derive(Default)]
struct SlowCopier {
    inner: VirtualCopier,
    made: AtomicUsize,
}

impl GpuCopier for SlowCopier {
    fn copy_on_gpu(&self, src: &Arc<TextureProxy>, params: &CopyParams, want_mips: bool) -> Option<Arc<TextureProxy>> {
        std::thread::sleep(std::time::Duration::from_millis(5));
        let copy = self.inner.copy_on_gpu(src, params, want_mips)?;
        self.made.fetch_add(1, Ordering::Relaxed);
        Some(copy)
    }
}

#[test]
fn test_concurrent_resolvers_make_one_copy() {
    let copier = Arc::new(SlowCopier::default());
    let cache = Arc::new(ProxyCache::new());
    let original = TextureProxy::new(TextureDesc::new(300, 200));

    let results: Vec<Arc<TextureProxy>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ctx = Arc::new(GpuContext::new(GpuCaps::without_npot_tiling(), cache.clone(), copier.clone()));
                let original = original.clone();
                s.spawn(move || {
                    let adj = TextureAdjuster::new(ctx, original, AlphaType::Premul, 24, None);
                    let mut scale = [1.0, 1.0];
                    adj.ref_texture_proxy_for_params(&repeat(), &mut scale).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(copier.made.load(Ordering::Relaxed), 1);
    assert_eq!(cache.len(), 1);
    assert!(results.iter().all(|p| Arc::ptr_eq(p, &results[0])));
}

#[test]
fn test_concurrent_distinct_contents() {
    let copier = Arc::new(VirtualCopier::new());
    let cache = Arc::new(ProxyCache::with_stripes(4));
    let ctx = Arc::new(GpuContext::new(GpuCaps::without_npot_tiling(), cache.clone(), copier.clone()));

    std::thread::scope(|s| {
        for id in 1..=16u32 {
            let ctx = ctx.clone();
            s.spawn(move || {
                let adj = TextureAdjuster::new(ctx, TextureProxy::new(TextureDesc::new(300, 200)), AlphaType::Premul, id, None);
                let mut scale = [1.0, 1.0];
                for _ in 0..4 {
                    adj.ref_texture_proxy_for_params(&repeat(), &mut scale).unwrap();
                }
            });
        }
    });

    assert_eq!(copier.copies(), 16);
    assert_eq!(cache.len(), 16);
    assert_eq!(cache.hits(), 48);
}

#[test]
fn test_listener_may_use_cache_locks() {
    let cache = Arc::new(ProxyCache::with_stripes(1));
    let ctx = Arc::new(GpuContext::new(
        GpuCaps::without_npot_tiling(),
        cache.clone(),
        Arc::new(VirtualCopier::new()),
    ));
    let notified = Arc::new(AtomicUsize::new(0));
    let listener: CopyListener = {
        let cache = cache.clone();
        let notified = notified.clone();
        Arc::new(move |key: &UniqueKey, _ctx_id: u32| {
            let _guard = cache.lock_key(key);
            assert!(cache.contains(key));
            notified.fetch_add(1, Ordering::Relaxed);
        })
    };
    let adj = TextureAdjuster::new(ctx, TextureProxy::new(TextureDesc::new(300, 200)), AlphaType::Premul, 25, None)
        .with_listener(listener);

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut scale = [1.0, 1.0];
        let _ = tx.send(adj.ref_texture_proxy_for_params(&repeat(), &mut scale).is_ok());
    });

    assert!(rx.recv_timeout(Duration::from_secs(5)).expect("listener blocked on key lock"));
    assert_eq!(notified.load(Ordering::Relaxed), 1);
}
