use criterion::{Criterion, black_box, criterion_group, criterion_main};
use orrery_orbit::{Body, BodyIndex, ElementSet, OrbitalElements, SolarSystem};
use orrery_scene::{FrameArena, RenderableHandle, build_frame_list};

fn system(count: usize) -> SolarSystem {
    let mut bodies = vec![Body::new(
        "Root",
        OrbitalElements::new(ElementSet::circular(0.0, 1.0)).unwrap(),
        1.0,
    )];
    for i in 1..count {
        let elements =
            OrbitalElements::new(ElementSet::circular(1.0e9 * i as f64, 1.0e6 * i as f64)).unwrap();
        bodies.push(Body::new(format!("Body {i}"), elements, 1.0).with_parent(BodyIndex(0)));
    }
    SolarSystem::new(bodies).unwrap()
}

fn bench_build_frame_list(c: &mut Criterion) {
    let system = system(10);
    let mut arena = FrameArena::with_capacity(system.len());
    c.bench_function("build_frame_list_10", |bencher| {
        bencher.iter(|| {
            let mut scope = arena.begin_frame();
            let list = build_frame_list(&mut scope, &system, RenderableHandle::default());
            black_box(list.len())
        })
    });
}

fn bench_update_and_build_1000(c: &mut Criterion) {
    let mut system = system(1000);
    let mut arena = FrameArena::with_capacity(system.len());
    let mut t = 0.0;
    c.bench_function("update_and_build_1000", |bencher| {
        bencher.iter(|| {
            t += 86_400.0;
            system.update(t);
            let mut scope = arena.begin_frame();
            let list = build_frame_list(&mut scope, &system, RenderableHandle::default());
            black_box(list.iter().count())
        })
    });
}

criterion_group!(benches, bench_build_frame_list, bench_update_and_build_1000);
criterion_main!(benches);
