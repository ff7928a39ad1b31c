//! Benchmarks for the mode generators.
//!
//! Performance budgets at 64x64 (one panel, 10 Hz):
//! - Any single generator frame: < 1ms
//! - Life / Fire step frames: < 500μs
//!
//! Run with: cargo bench -p panelfx-modes --bench generators_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use panelfx_core::{ImageStatus, LocalTime, ModeOptions, ModeTag, WeatherStatus};
use panelfx_modes::{Generators, RenderContext};
use panelfx_render::{FontSize, MonoFontRenderer, PixelBuffer};

// =============================================================================
// Panel Size Configurations
// =============================================================================

const SIZES: &[(u16, u16, &str)] = &[
    (64, 32, "64x32"),   // Half panel
    (64, 64, "64x64"),   // Standard panel
    (128, 64, "128x64"), // Two chained panels
];

/// Modes with per-frame work worth measuring.
const MODES: &[ModeTag] = &[
    ModeTag::Rainbow,
    ModeTag::Plasma,
    ModeTag::Squares,
    ModeTag::Life,
    ModeTag::Maze,
    ModeTag::Fire,
    ModeTag::Pacman,
    ModeTag::Spectrum,
    ModeTag::Clock,
];

// =============================================================================
// Generator Frame Benchmarks
// =============================================================================

fn bench_generators(c: &mut Criterion) {
    let options = ModeOptions::default();
    let font = MonoFontRenderer::new(FontSize::Small);
    let weather = WeatherStatus::default();
    let image = ImageStatus::default();

    for &tag in MODES {
        let mut group = c.benchmark_group(format!("generators/{tag}"));
        for &(width, height, name) in SIZES {
            group.throughput(Throughput::Elements(u64::from(width) * u64::from(height)));
            group.bench_with_input(BenchmarkId::from_parameter(name), &(width, height), |b, &(w, h)| {
                let mut gens = Generators::new(7);
                let mut buf = PixelBuffer::new(w, h);
                let mut frame = 0u64;
                b.iter(|| {
                    frame += 1;
                    buf.clear();
                    let ctx = RenderContext {
                        width: w,
                        height: h,
                        frame,
                        brightness: 80,
                        text: "HELLO",
                        options: &options,
                        time: LocalTime::new(12, 34, 56),
                        font: &font,
                        weather: &weather,
                        image: &image,
                    };
                    gens.get_mut(tag).render(ctx, black_box(&mut buf));
                    black_box(&buf);
                });
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_generators);
criterion_main!(benches);
