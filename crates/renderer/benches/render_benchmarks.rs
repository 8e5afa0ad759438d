//! Benchmarks for tile rendering.
//!
//! Run with: cargo bench --package renderer --bench render_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use renderer::{png, TileFormat, TileRenderer};
use tile_common::{ConditionCode, WeatherRecord};

fn sample_record(condition: ConditionCode) -> WeatherRecord {
    WeatherRecord::from_observation(18.4, condition.as_str(), "sample", 4.0, 135.0)
}

fn bench_render(c: &mut Criterion) {
    let renderer = TileRenderer::default();
    let mut group = c.benchmark_group("render_tile");

    for condition in [ConditionCode::Clear, ConditionCode::Thunderstorm, ConditionCode::Fog] {
        let record = sample_record(condition);
        for format in [TileFormat::Svg, TileFormat::Png] {
            group.bench_with_input(
                BenchmarkId::new(format.extension(), condition.as_str()),
                &record,
                |b, record| b.iter(|| renderer.render(black_box(Some(record)), format)),
            );
        }
    }

    group.finish();
}

fn bench_empty_png_encode(c: &mut Criterion) {
    let pixels = vec![0u8; 256 * 256 * 4];
    c.bench_function("png_encode_empty_256", |b| {
        b.iter(|| png::create_png_auto(black_box(&pixels), 256, 256))
    });
}

criterion_group!(benches, bench_render, bench_empty_png_encode);
criterion_main!(benches);
