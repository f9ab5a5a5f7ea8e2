//! Benchmarks for spectral indices and auto-thresholding

use claimsat_algorithms::imagery::{mndwi, normalized_difference, raster_difference};
use claimsat_algorithms::threshold::{auto_threshold, Histogram, ThresholdMethod, MAX_BUCKETS};
use claimsat_core::{Aoi, GeoTransform, Raster};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Reflectance-like band with a deterministic texture
fn create_band(size: usize, base: f64) -> Raster<f64> {
    let data = (0..size * size)
        .map(|i| {
            let (row, col) = (i / size, i % size);
            base + ((row * 7 + col * 13) % 200) as f64 / 1000.0
        })
        .collect();
    let mut r = Raster::from_vec(data, size, size).unwrap();
    let cell = 10.0 / 111_320.0;
    r.set_transform(GeoTransform::new(0.0, size as f64 * cell, cell, -cell));
    r
}

fn full_aoi(r: &Raster<f64>) -> Aoi {
    let (min_x, min_y, max_x, max_y) = r.bounds();
    Aoi::from_bbox([min_x, min_y, max_x, max_y]).unwrap()
}

fn bench_normalized_difference(c: &mut Criterion) {
    let mut group = c.benchmark_group("imagery/normalized_difference");
    for size in [256, 512, 1024, 2048] {
        let green = create_band(size, 0.1);
        let swir = create_band(size, 0.2);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| normalized_difference(black_box(&green), black_box(&swir)).unwrap())
        });
    }
    group.finish();
}

fn bench_otsu(c: &mut Criterion) {
    let mut group = c.benchmark_group("threshold/otsu");
    for size in [256, 512, 1024] {
        let pre = mndwi(&create_band(size, 0.1), &create_band(size, 0.2)).unwrap();
        let post = mndwi(&create_band(size, 0.25), &create_band(size, 0.05)).unwrap();
        let delta = raster_difference(&pre, &post).unwrap();
        let aoi = full_aoi(&delta);

        group.bench_with_input(BenchmarkId::new("histogram", size), &size, |b, _| {
            b.iter(|| Histogram::from_band(black_box(&delta), &aoi, 30.0, MAX_BUCKETS).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("auto_threshold", size), &size, |b, _| {
            b.iter(|| auto_threshold(black_box(&delta), &aoi, ThresholdMethod::Otsu, 30.0).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalized_difference, bench_otsu);
criterion_main!(benches);
