use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sketch_gfx::basics::PointD;
use sketch_gfx::stroke_builder::StrokeBuilder;
use sketch_gfx::stroke_math::{LineCap, LineJoin};

fn zigzag(n: usize) -> Vec<PointD> {
    (0..n)
        .map(|i| PointD::new(i as f64 * 4.0, if i % 2 == 0 { 0.0 } else { 10.0 }))
        .collect()
}

fn bench_stroke_expand(c: &mut Criterion) {
    let pts = zigzag(1000);
    let mut group = c.benchmark_group("stroke_expand");

    group.bench_function("miter_butt_1000", |b| {
        let mut sb = StrokeBuilder::new();
        sb.math_mut().set_weight(4.0);
        sb.math_mut().set_line_cap(LineCap::Butt);
        sb.math_mut().set_line_join(LineJoin::Miter);
        let mut out = Vec::new();
        b.iter(|| {
            out.clear();
            sb.build_polyline(black_box(&pts), false, &mut out);
            black_box(out.len())
        });
    });

    group.bench_function("round_round_1000", |b| {
        let mut sb = StrokeBuilder::new();
        sb.math_mut().set_weight(4.0);
        sb.math_mut().set_line_cap(LineCap::Round);
        sb.math_mut().set_line_join(LineJoin::Round);
        let mut out = Vec::new();
        b.iter(|| {
            out.clear();
            sb.build_polyline(black_box(&pts), false, &mut out);
            black_box(out.len())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_stroke_expand);
criterion_main!(benches);
