use badge_forge::{
    BadgeConfig, Canvas, IconSource, Theme, draw_badge, icon::rescale_svg, icon::render_intermediate,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::io;

const STAR: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/icons/star.svg"));

struct InlineIcons;

impl IconSource for InlineIcons {
    fn load_svg(&self, _name: &str) -> io::Result<String> {
        Ok(STAR.to_string())
    }
}

fn bench_rescale(c: &mut Criterion) {
    let mut group = c.benchmark_group("rescale");
    for size in [64.0f32, 144.5, 512.0] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let scaled = rescale_svg(black_box(STAR), size).expect("rescale failed");
                black_box(scaled.markup.len());
            })
        });
    }
    group.finish();
}

fn bench_intermediate(c: &mut Criterion) {
    let scaled = rescale_svg(STAR, 144.5).expect("rescale failed");
    c.bench_function("render_intermediate", |b| {
        b.iter(|| {
            let png = render_intermediate(black_box(&scaled)).expect("render failed");
            black_box(png.len());
        })
    });
}

fn bench_badge(c: &mut Criterion) {
    let theme = Theme::default();
    let color = resvg::tiny_skia::Color::from_rgba8(0xFF, 0x6B, 0x6B, 0xFF);
    let mut group = c.benchmark_group("badge");
    for size in [64u32, 200, 512] {
        let plain = BadgeConfig::new("Badge", "primary", "unused.png");
        let with_icon = plain.clone().with_icon("star.svg");
        group.bench_with_input(BenchmarkId::new("plain", size), &size, |b, &size| {
            b.iter(|| {
                let mut canvas = Canvas::new(size, size).expect("canvas");
                draw_badge(&plain, color, size, &theme, &InlineIcons, &mut canvas)
                    .expect("draw failed");
                black_box(canvas.pixmap().data().len());
            })
        });
        group.bench_with_input(BenchmarkId::new("icon", size), &size, |b, &size| {
            b.iter(|| {
                let mut canvas = Canvas::new(size, size).expect("canvas");
                draw_badge(&with_icon, color, size, &theme, &InlineIcons, &mut canvas)
                    .expect("draw failed");
                black_box(canvas.pixmap().data().len());
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rescale, bench_intermediate, bench_badge);
criterion_main!(benches);
