// Benchmark for occupancy builds and pointer mapping
// Measures the per-frame work done while a block is dragged

use appointment_grid::grid::{GridGeometry, OccupancyIndex, TimeGrid, WeekColumns};
use appointment_grid::models::appointment::Appointment;
use appointment_grid::models::placement::GridCell;
use appointment_grid::models::settings::GridSettings;
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn week_of(count: usize) -> (WeekColumns, Vec<Appointment>) {
    let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
    let appointments = (0..count)
        .map(|i| {
            let day = monday + Duration::days((i % 7) as i64);
            let mut appointment =
                Appointment::new(format!("a{}", i), day, (i * 3) % 38, 30).unwrap();
            appointment.id = Some(i as i64 + 1);
            appointment
        })
        .collect();
    (WeekColumns::starting(monday), appointments)
}

fn bench_occupancy_build(c: &mut Criterion) {
    let grid = TimeGrid::reference();
    let mut group = c.benchmark_group("occupancy_build");

    for count in [10, 50, 200] {
        let (week, appointments) = week_of(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                OccupancyIndex::build(
                    black_box(&grid),
                    black_box(&week),
                    black_box(&appointments),
                    Some(1),
                )
            })
        });
    }

    group.finish();
}

fn bench_pointer_to_cell(c: &mut Criterion) {
    let grid = TimeGrid::reference();
    let geometry = GridGeometry::from_settings(&GridSettings::default(), &grid);
    let points: Vec<_> = (0..7)
        .flat_map(|day| (0..40).map(move |slot| GridCell::new(day, slot)))
        .map(|cell| geometry.cell_rect(cell).center())
        .collect();

    c.bench_function("pointer_to_cell_full_week", |b| {
        b.iter(|| {
            for point in &points {
                black_box(geometry.pointer_to_cell(black_box(*point)));
            }
        })
    });
}

criterion_group!(benches, bench_occupancy_build, bench_pointer_to_cell);
criterion_main!(benches);
