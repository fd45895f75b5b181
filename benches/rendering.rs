use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tiny_skia::{Color, Pixmap};
use walk2draw_core::gps_processor::LocationSample;
use walk2draw_core::journey_vector::JourneyVector;
use walk2draw_core::map_snapshot::{self, PlainSnapshotProvider, SnapshotProvider};
use walk2draw_core::path_projector::{self, StrokeStyle};

// A wobbly walk around Shenzhen universiade, split into `segments` pieces.
fn build_journey(points: usize, segments: usize) -> JourneyVector {
    let lng = 114.212470;
    let lat = 22.697006;
    let per_segment = points / segments;
    let journey = (0..segments)
        .map(|s| {
            (0..per_segment)
                .map(|i| {
                    let t = (s * per_segment + i) as f64;
                    LocationSample::new(
                        lat + 0.0001 * t * (t * 0.05).sin(),
                        lng + 0.0001 * t * (t * 0.05).cos(),
                        1697349116449 + 1000 * t as i64,
                    )
                })
                .collect()
        })
        .collect();
    JourneyVector::from_segments(journey)
}

fn projection_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");
    group.sample_size(10);

    let sizes = vec![512, 1024, 2048];
    let point_counts = vec![1_000, 10_000];

    for points in &point_counts {
        let journey = build_journey(*points, 10);
        let bounds = map_snapshot::journey_bounds(&journey, 0.1, 100.0).unwrap();
        for size in &sizes {
            let snapshot = PlainSnapshotProvider::new([245, 240, 229, 255])
                .snapshot(&bounds, *size, *size)
                .unwrap();
            group.bench_with_input(
                BenchmarkId::new("project", format!("{points}pts_{size}px")),
                &(points, size),
                |b, _| {
                    b.iter(|| {
                        std::hint::black_box(path_projector::project(
                            &journey,
                            snapshot.pixmap(),
                            |lat, lng| snapshot.coordinate_to_pixel(lat, lng),
                            &StrokeStyle::default(),
                        ))
                    })
                },
            );
        }
    }

    // baseline: copying the base image is all an empty journey costs
    let mut base = Pixmap::new(2048, 2048).unwrap();
    base.fill(Color::WHITE);
    group.bench_function("empty_journey_2048px", |b| {
        b.iter(|| {
            std::hint::black_box(path_projector::project(
                &JourneyVector::new(),
                &base,
                |lat, lng| (lat as f32, lng as f32),
                &StrokeStyle::default(),
            ))
        })
    });

    group.finish();
}

criterion_group!(rendering_benches, projection_benchmarks);
criterion_main!(rendering_benches);
