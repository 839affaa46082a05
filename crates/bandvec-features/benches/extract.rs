use std::hint::black_box;

use bandvec_core::GrayImage;
use bandvec_features::{binarize, ExtractParams, FeatureExtractor};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn gradient_image(width: usize, height: usize) -> GrayImage {
    let data = (0..height)
        .flat_map(|y| (0..width).map(move |x| ((x * 7 + y * 3) % 256) as u8))
        .collect();
    GrayImage::from_vec(width, height, data).expect("gradient image")
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    for &(w, h) in &[(320usize, 240usize), (1280, 720), (1920, 1080)] {
        let img = gradient_image(w, h);
        let extractor = FeatureExtractor::new(ExtractParams::new(128, 8));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{w}x{h}")),
            &img,
            |b, img| b.iter(|| extractor.extract(black_box(&img.view())).expect("extract")),
        );
    }
    group.finish();
}

fn bench_binarize(c: &mut Criterion) {
    let img = gradient_image(1280, 720);
    c.bench_function("binarize_1280x720", |b| {
        b.iter(|| binarize(black_box(&img.view()), 128).expect("binarize"))
    });
}

criterion_group!(benches, bench_extract, bench_binarize);
criterion_main!(benches);
