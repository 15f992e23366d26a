use std::path::Path;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use orrery_orbit::*;

fn bench_solve_kepler_low_e(c: &mut Criterion) {
    let m = black_box(2.5);
    let e = black_box(0.0167);
    c.bench_function("solve_kepler_low_e", |bencher| {
        bencher.iter(|| black_box(solve_kepler(m, e)))
    });
}

fn bench_solve_kepler_high_e(c: &mut Criterion) {
    let m = black_box(0.1);
    let e = black_box(0.95);
    c.bench_function("solve_kepler_high_e", |bencher| {
        bencher.iter(|| black_box(solve_kepler(m, e)))
    });
}

fn bench_kepler_position(c: &mut Criterion) {
    let elements = OrbitalElements::new(ElementSet {
        semi_major_axis: 1.496e11,
        eccentricity: 0.0167,
        inclination: 0.1,
        longitude_ascending: 0.4,
        argument_periapsis: 1.8,
        mean_anomaly_epoch: 6.2,
        orbital_period: 3.156e7,
        epoch: 0.0,
    })
    .unwrap();
    let t = black_box(1.0e8);
    c.bench_function("kepler_position_at_time", |bencher| {
        bencher.iter(|| black_box(kepler_position_at_time(&elements, t)))
    });
}

fn bench_system_update(c: &mut Criterion) {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/sol.ron");
    let mut system = load_solar_system(&path).unwrap();
    let mut t = 0.0;
    c.bench_function("solar_system_update", |bencher| {
        bencher.iter(|| {
            t += 86_400.0;
            system.update(black_box(t));
        })
    });
}

criterion_group!(
    benches,
    bench_solve_kepler_low_e,
    bench_solve_kepler_high_e,
    bench_kepler_position,
    bench_system_update,
);
criterion_main!(benches);
