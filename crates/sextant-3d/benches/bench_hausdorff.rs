use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec3;
use std::hint::black_box;

use sextant_3d::{hausdorff, hausdorff_covariance, nearest_neighbours, PointCloud};

fn make_random_cloud(num_points: usize) -> PointCloud<DVec3> {
    (0..num_points)
        .map(|_| DVec3::new(rand::random(), rand::random(), rand::random()))
        .collect()
}

fn bench_hausdorff(c: &mut Criterion) {
    let mut group = c.benchmark_group("hausdorff");

    for num_points in [100, 1000, 5000].iter() {
        group.throughput(criterion::Throughput::Elements(*num_points as u64));
        let parameter_string = format!("{}", num_points);

        let src = make_random_cloud(*num_points);
        let dst = make_random_cloud(*num_points);

        group.bench_with_input(
            BenchmarkId::new("hausdorff", &parameter_string),
            &(&src, &dst),
            |b, (src, dst)| {
                b.iter(|| black_box(hausdorff(*src, *dst)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("hausdorff_covariance", &parameter_string),
            &(&src, &dst),
            |b, (src, dst)| {
                b.iter(|| black_box(hausdorff_covariance(*src, *dst)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("nearest_neighbours", &parameter_string),
            &(&src, &dst),
            |b, (src, dst)| {
                b.iter(|| black_box(nearest_neighbours(src.points(), *dst)));
            },
        );
    }
}

criterion_group!(benches, bench_hausdorff);
criterion_main!(benches);
