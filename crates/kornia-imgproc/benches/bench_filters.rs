use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use kornia_image::Image;
use kornia_imgproc::filter::{box_blur, gaussian_blur, spatial_gradient};

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("Filters");
    let mut rng = rand::rng();

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        let parameter_string = format!("{}x{}", width, height);
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        // input image
        let image_size = [*width, *height].into();
        let image_data = (0..width * height)
            .map(|_| rng.random::<f32>())
            .collect::<Vec<_>>();
        let image = Image::<f32, 1>::new(image_size, image_data).unwrap();
        let output = Image::<f32, 1>::from_size_val(image_size, 0.0).unwrap();

        group.bench_with_input(
            BenchmarkId::new("box_blur_3x3", &parameter_string),
            &(&image, &output),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| black_box(box_blur(src, &mut dst, (3, 3))))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("gaussian_blur_9x9", &parameter_string),
            &(&image, &output),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| black_box(gaussian_blur(src, &mut dst, (9, 9), (1.4, 1.4))))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("spatial_gradient", &parameter_string),
            &(&image, &output),
            |b, i| {
                let (src, mut dx) = (i.0, i.1.clone());
                let mut dy = i.1.clone();
                b.iter(|| black_box(spatial_gradient(src, &mut dx, &mut dy)))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_filters);
criterion_main!(benches);
