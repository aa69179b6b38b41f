//! Benchmarks for the edge-aware tone engines.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use vfx_bilateral::BilateralGrid;
use vfx_heal::heal;
use vfx_core::Rect;
use vfx_retouch::rasterizer::GeometryRasterizer;
use vfx_retouch::{retouch_process, Levels, RetouchParams, Tile};

/// Benchmark the bilateral grid splat/blur/slice pipeline.
fn bench_bilateral(c: &mut Criterion) {
    let mut group = c.benchmark_group("bilateral");

    for &(w, h) in &[(256usize, 256usize), (1024, 1024)] {
        let pixels: Vec<f32> = (0..w * h * 4)
            .map(|i| (i % 255) as f32 / 255.0 * 100.0)
            .collect();

        group.throughput(Throughput::Elements((w * h) as u64));

        group.bench_with_input(
            BenchmarkId::new("splat_blur_slice", format!("{w}x{h}")),
            &pixels,
            |b, pixels| {
                b.iter(|| {
                    let mut grid = BilateralGrid::init(w, h, 16.0, 8.0).unwrap();
                    grid.splat(black_box(pixels)).unwrap();
                    grid.blur();
                    let mut out = vec![0.0f32; pixels.len()];
                    grid.slice(pixels, &mut out, 1.0).unwrap();
                    out
                })
            },
        );
    }

    group.finish();
}

/// Benchmark the Poisson healing solver.
fn bench_heal(c: &mut Criterion) {
    let mut group = c.benchmark_group("heal");

    for &side in &[32usize, 64] {
        let channels = 3;
        let src: Vec<f32> = (0..side * side * channels)
            .map(|i| (i % 255) as f32 / 255.0)
            .collect();
        let mut mask = vec![0.0f32; side * side];
        for y in side / 4..3 * side / 4 {
            for x in side / 4..3 * side / 4 {
                mask[y * side + x] = 1.0;
            }
        }

        group.throughput(Throughput::Elements((side * side) as u64));

        group.bench_with_input(BenchmarkId::new("solve", side), &(src, mask), |b, (src, mask)| {
            b.iter(|| {
                let mut dest = src.clone();
                heal(black_box(src), &mut dest, mask, side, side, channels).unwrap();
                dest
            })
        });
    }

    group.finish();
}

/// Benchmark the à-trous wavelet retouch driver on an empty shape list
/// (decompose + recompose cost, no per-shape operators).
fn bench_retouch_decompose_recompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("retouch");

    for &(w, h, scales) in &[(256usize, 256usize, 4usize), (512, 512, 6)] {
        let pixels: Vec<f32> = (0..w * h * 4)
            .map(|i| (i % 255) as f32 / 255.0 * 100.0)
            .collect();
        let tile = Tile::new(Rect::new(0, 0, w as u32, h as u32), 1.0);
        let rasterizer = GeometryRasterizer::default();

        group.throughput(Throughput::Elements((w * h) as u64));

        group.bench_with_input(
            BenchmarkId::new("decompose_recompose", format!("{w}x{h}_n{scales}")),
            &pixels,
            |b, pixels| {
                b.iter(|| {
                    let params = RetouchParams {
                        shapes: &[],
                        rasterizer: &rasterizer,
                        num_scales: scales,
                        merge_from_scale: 0,
                        levels: Levels::default(),
                        display_scale: None,
                        suppress_mask_display: false,
                        auto_levels: false,
                    };
                    retouch_process(&tile, black_box(pixels), &params).unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_bilateral,
    bench_heal,
    bench_retouch_decompose_recompose,
);

criterion_main!(benches);
