//! Benchmarks for the Quickmark watermarking pipeline.
//!
//! Run with: cargo bench -p quickmark-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Frame, Rgba, RgbaImage};
use quickmark_core::geometry::{Layout, Size};
use quickmark_core::pipeline::composite;
use quickmark_core::pipeline::encode::encode_frames;
use quickmark_core::{Config, OutputFormat};
use std::path::Path;

fn logo() -> RgbaImage {
    RgbaImage::from_pixel(800, 400, Rgba([255, 255, 255, 180]))
}

fn benchmark_layout(c: &mut Criterion) {
    let config = Config::default();

    c.bench_function("layout_compute", |b| {
        b.iter(|| {
            Layout::compute(
                black_box(Size::new(4000, 3000)),
                black_box(Size::new(800, 400)),
                &config,
            )
        })
    });
}

fn benchmark_composite(c: &mut Criterion) {
    let config = Config::default();
    let mark = logo();
    let layout = Layout::compute(Size::new(1920, 1080), Size::new(800, 400), &config);
    let base = RgbaImage::from_pixel(1920, 1080, Rgba([20, 40, 60, 255]));

    c.bench_function("composite_1080p", |b| {
        b.iter(|| {
            let frames = vec![Frame::new(base.clone())];
            composite::apply(frames, black_box(&mark), layout, 0.8)
        })
    });
}

fn benchmark_downsize_and_composite(c: &mut Criterion) {
    let config = Config::default();
    let mark = logo();
    let layout = Layout::compute(Size::new(4000, 3000), Size::new(800, 400), &config);
    let base = RgbaImage::from_pixel(4000, 3000, Rgba([20, 40, 60, 255]));

    let mut group = c.benchmark_group("downsize");
    group.sample_size(10);
    group.bench_function("4000x3000_to_1440x1080", |b| {
        b.iter(|| {
            let frames = vec![Frame::new(base.clone())];
            composite::apply(frames, black_box(&mark), layout, 0.8)
        })
    });
    group.finish();
}

fn benchmark_encode_jpeg(c: &mut Criterion) {
    let base = RgbaImage::from_pixel(1440, 1080, Rgba([20, 40, 60, 255]));

    c.bench_function("encode_jpeg_1440x1080", |b| {
        b.iter(|| {
            let frames = vec![Frame::new(base.clone())];
            let _ = encode_frames(frames, OutputFormat::Jpg, Path::new("bench.jpg"));
        })
    });
}

criterion_group!(
    benches,
    benchmark_layout,
    benchmark_composite,
    benchmark_downsize_and_composite,
    benchmark_encode_jpeg,
);
criterion_main!(benches);
