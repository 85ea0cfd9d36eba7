//! Performance benchmarks for the scoring algorithms
//!
//! Run with: cargo bench --bench metric_benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rarpeval_metrics::{mask_iou, mask_nsd, LabelMap, OneHotMask, OverlapThreshold, SegmentMatcher};
use std::hint::black_box;

/// Label sequence with runs of varying length, like a 10 Hz action track
fn generate_labels(frames: usize, shift: usize) -> Vec<u32> {
    (0..frames).map(|i| (((i + shift) / 37) % 8) as u32).collect()
}

/// Frame with a few rectangular instruments
fn generate_frame(width: u32, height: u32, shift: u32) -> OneHotMask {
    let map = LabelMap::from_fn(width, height, |x, y| {
        let x = x + shift;
        match (x / 160, y / 120) {
            (1, 1) => 1,
            (3, 2) | (3, 3) => 3,
            (6, 5) => 7,
            _ => 0,
        }
    });
    OneHotMask::encode(&map, 10).unwrap()
}

fn bench_f1k(c: &mut Criterion) {
    let mut group = c.benchmark_group("f1k");
    let matcher = SegmentMatcher::new(8, OverlapThreshold::from_percent(10).unwrap());

    for frames in [1_000, 10_000, 100_000] {
        let reference = generate_labels(frames, 0);
        let prediction = generate_labels(frames, 5);

        group.throughput(Throughput::Elements(frames as u64));
        group.bench_with_input(BenchmarkId::new("frames", frames), &frames, |b, _| {
            b.iter(|| {
                matcher
                    .f1_score(black_box(&reference), black_box(&prediction))
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_pixel_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("pixel_metrics");
    group.sample_size(20);

    for (width, height) in [(320, 240), (1280, 720)] {
        let reference = generate_frame(width, height, 0);
        let prediction = generate_frame(width, height, 4);
        let label = format!("{width}x{height}");

        group.bench_function(BenchmarkId::new("iou", &label), |b| {
            b.iter(|| mask_iou(black_box(&reference), black_box(&prediction)).unwrap());
        });
        group.bench_function(BenchmarkId::new("nsd", &label), |b| {
            b.iter(|| mask_nsd(black_box(&reference), black_box(&prediction), 10.0).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_f1k, bench_pixel_metrics);
criterion_main!(benches);
