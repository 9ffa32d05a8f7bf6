//! Benchmarks for texture resolution and domain computation.
//!
//! Run with: `cargo bench -p texadj-gpu`

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use glam::Mat3;
use texadj_core::{AlphaType, IRect, Rect};
use texadj_gpu::domain::determine_domain_mode;
use texadj_gpu::key::{copy_key, image_id_key};
use texadj_gpu::{
    CopyParams, Filter, FilterConstraint, GpuCaps, GpuContext, ProxyCache, SamplerState, SamplingRequest,
    TextureAdjuster, TextureDesc, TextureProxy, VirtualCopier, WrapMode,
};

fn adjuster(caps: GpuCaps, w: u32, h: u32) -> TextureAdjuster {
    let ctx = Arc::new(GpuContext::new(caps, Arc::new(ProxyCache::new()), Arc::new(VirtualCopier::new())));
    TextureAdjuster::new(ctx, TextureProxy::new(TextureDesc::new(w, h)), AlphaType::Premul, 1, None)
}

/// Cached and uncached resolution paths.
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    let direct = adjuster(GpuCaps::default(), 256, 256);
    group.bench_function("no_copy", |b| {
        b.iter(|| {
            let mut scale = [1.0, 1.0];
            direct
                .ref_texture_proxy_for_params(black_box(&SamplerState::clamp(Filter::Bilerp)), &mut scale)
                .unwrap()
        })
    });

    let cached = adjuster(GpuCaps::without_npot_tiling(), 300, 200);
    let repeat = SamplerState::new(WrapMode::Repeat, Filter::Bilerp);
    group.bench_function("cache_hit", |b| {
        b.iter(|| {
            let mut scale = [1.0, 1.0];
            cached.ref_texture_proxy_for_params(black_box(&repeat), &mut scale).unwrap()
        })
    });

    let processor = adjuster(GpuCaps::default(), 512, 512);
    let req = SamplingRequest::new(Mat3::IDENTITY, Rect::from_ltrb(8.0, 8.0, 400.0, 300.0), Some(Filter::Bilerp));
    group.bench_function("fragment_processor", |b| {
        b.iter(|| processor.create_fragment_processor(black_box(&req)).unwrap())
    });

    group.finish();
}

/// Key hashing for typical copy params.
fn bench_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("keys");

    for id in [1u32, 1 << 20] {
        let params = CopyParams {
            subset: IRect::from_wh(300, 200),
            width: 512,
            height: 256,
            filter: Filter::Bilerp,
            mipped: false,
        };
        group.bench_with_input(BenchmarkId::new("copy_key", id), &id, |b, &id| {
            b.iter(|| {
                let base = image_id_key(black_box(id), IRect::from_wh(300, 200)).unwrap();
                copy_key(&base, black_box(&params))
            })
        });
    }

    group.finish();
}

fn bench_domain(c: &mut Criterion) {
    let proxy = TextureProxy::new(TextureDesc::new(1024, 1024));
    let constraint = Rect::from_ltrb(100.0, 100.0, 900.0, 700.0);

    let mut group = c.benchmark_group("domain");
    for (name, filter) in [
        ("nearest", Some(Filter::Nearest)),
        ("bilerp", Some(Filter::Bilerp)),
        ("mipmap", Some(Filter::MipMap)),
        ("bicubic", None),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                determine_domain_mode(
                    black_box(&constraint),
                    FilterConstraint::Yes,
                    false,
                    &proxy,
                    black_box(filter),
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_keys, bench_domain);
criterion_main!(benches);
