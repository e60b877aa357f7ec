use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use kornia_corners::{
    detect_corners_subpixel, CornerDetector, ExtractionPolicy, FastParams, HarrisResponse,
    KitchenRosenfeldResponse, MoravecResponse, ShiTomasiResponse, Threshold,
};
use kornia_image::Image;

fn bench_responses(c: &mut Criterion) {
    let mut group = c.benchmark_group("CornerResponse");
    let mut rng = rand::rng();

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        let parameter_string = format!("{}x{}", width, height);
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let image_size = [*width, *height].into();
        let image_data = (0..width * height)
            .map(|_| rng.random::<u8>())
            .collect::<Vec<_>>();
        let image = Image::<u8, 1>::new(image_size, image_data).unwrap();
        let response = Image::<f32, 1>::from_size_val(image_size, 0.0).unwrap();

        let detectors = [
            CornerDetector::Harris(HarrisResponse::new()),
            CornerDetector::ShiTomasi(ShiTomasiResponse::new()),
            CornerDetector::KitchenRosenfeld(KitchenRosenfeldResponse::new()),
            CornerDetector::Fast(FastParams::new()),
            CornerDetector::Moravec(MoravecResponse::new()),
        ];

        for detector in detectors {
            group.bench_with_input(
                BenchmarkId::new(detector.name(), &parameter_string),
                &(&image, &response),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(detector.compute_response(src, &mut dst)))
                },
            );
        }
    }

    group.finish();
}

fn bench_subpixel(c: &mut Criterion) {
    let mut group = c.benchmark_group("CornerSubpixel");
    let mut rng = rand::rng();

    let image_size = [640, 480].into();
    let image_data = (0..640 * 480)
        .map(|_| rng.random::<f32>())
        .collect::<Vec<_>>();
    let image = Image::<f32, 1>::new(image_size, image_data).unwrap();

    for policy in [
        ExtractionPolicy::LocalMaxima,
        ExtractionPolicy::Threshold(Threshold::Percentile(99.0)),
    ] {
        group.bench_with_input(
            BenchmarkId::new("harris_subpixel", format!("{policy:?}")),
            &image,
            |b, src| {
                b.iter(|| {
                    black_box(detect_corners_subpixel(
                        src,
                        &CornerDetector::default(),
                        &policy,
                    ))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_responses, bench_subpixel);
criterion_main!(benches);
