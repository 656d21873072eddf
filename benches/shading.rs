use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};
use liquid_scene::core::Viewport;
use liquid_scene::environment::EnvironmentLoader;
use liquid_scene::geometry::create_sphere;
use liquid_scene::preview::render_preview;
use liquid_scene::shading::{
    BackgroundShading, FragmentSample, LiquidShading, ShadingModel, ShadingUniforms,
};
use liquid_scene::{ScenePreset, SceneState};

/// Benchmark: displacing every vertex of the default liquid sphere once
fn bench_liquid_displacement(c: &mut Criterion) {
    let liquid = LiquidShading::default();
    let mesh = create_sphere(2.0, 128, 128);
    let uniforms = ShadingUniforms::at(12.5);

    c.bench_function("liquid_displace_128x128", |b| {
        b.iter(|| {
            let mut sum = Vec3::ZERO;
            for sample in mesh.surface_samples() {
                sum += liquid.displace(black_box(&sample), &uniforms);
            }
            black_box(sum)
        })
    });
}

/// Benchmark: single liquid fragment
fn bench_liquid_fragment(c: &mut Criterion) {
    let liquid = LiquidShading::default();
    let fragment = FragmentSample::new(Vec2::new(0.4, 0.6), Vec3::new(0.3, 0.2, 0.93), Vec3::new(0.5, 0.4, -3.0));
    let uniforms = ShadingUniforms::at(3.0);

    c.bench_function("liquid_fragment", |b| {
        b.iter(|| black_box(liquid.shade(black_box(&fragment), &uniforms)))
    });
}

/// Benchmark: single background fragment
fn bench_background_fragment(c: &mut Criterion) {
    let bg = BackgroundShading::grey();
    let fragment = FragmentSample::new(Vec2::new(0.5, 0.45), Vec3::Z, Vec3::ZERO);
    let uniforms = ShadingUniforms::at(0.7);

    c.bench_function("background_fragment", |b| {
        b.iter(|| black_box(bg.shade(black_box(&fragment), &uniforms)))
    });
}

/// Benchmark: full CPU preview at a few resolutions
fn bench_preview(c: &mut Criterion) {
    let mut group = c.benchmark_group("preview");
    group.sample_size(10);

    for (width, height) in [(64u32, 48u32), (160, 120), (320, 240)] {
        let viewport = Viewport::new(width, height);
        let state = SceneState::with_environment(
            ScenePreset::Lakeside.config(),
            viewport,
            EnvironmentLoader::disabled(),
        )
        .expect("lakeside preset builds");

        group.bench_with_input(
            BenchmarkId::new("lakeside", format!("{}x{}", width, height)),
            &viewport,
            |b, viewport| b.iter(|| black_box(render_preview(&state, *viewport))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_liquid_displacement,
    bench_liquid_fragment,
    bench_background_fragment,
    bench_preview,
);

criterion_main!(benches);
