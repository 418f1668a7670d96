use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use versand::core::*;
use versand::nve::*;

fn warehouse(counters: &InMemoryCounterStore) -> Warehouse {
    WarehouseBuilder::new(WarehouseId(1), "Bench")
        .gln("1234567")
        .nve_prefix(0)
        .build(counters)
        .unwrap()
}

fn packed_picking(packages: &InMemoryPackageStore, count: u64) -> Picking {
    let mut picking = Picking::new(
        PickingId(1),
        "WH/OUT/BENCH",
        PickingType::outgoing(PickingTypeId(1), WarehouseId(1)),
    )
    .with_sale_order(SaleOrderId(1), true);
    for id in 1..=count {
        packages
            .insert(Package::new(PackageId(id), format!("PACK{id:06}")))
            .unwrap();
        let line = picking.add_move_line("Item", dec!(1));
        picking.put_in_pack(line, PackageId(id), packages).unwrap();
    }
    picking
}

fn bench_check_digit(c: &mut Criterion) {
    c.bench_function("gs1_check_digit_17", |b| {
        b.iter(|| black_box(gs1_check_digit(black_box("01234567000000001"))));
    });
}

fn bench_compose(c: &mut Criterion) {
    let gln = Gln::parse("1234567").unwrap();
    let prefix = NvePrefix::new(0).unwrap();
    c.bench_function("nve_compose", |b| {
        b.iter(|| black_box(Nve::compose(prefix, black_box(&gln), black_box("000000042"))));
    });
}

fn bench_allocate(c: &mut Criterion) {
    let counters = InMemoryCounterStore::new();
    let key = CounterKey::Nve(WarehouseId(1));
    counters.create(key.clone(), NumberSequence::new(9)).unwrap();
    c.bench_function("counter_allocate", |b| {
        b.iter(|| black_box(counters.allocate(black_box(&key))));
    });
}

fn bench_assign_100_packages(c: &mut Criterion) {
    c.bench_function("assign_all_100_packages", |b| {
        b.iter_with_setup(
            || {
                let counters = InMemoryCounterStore::new();
                let packages = InMemoryPackageStore::new();
                let wh = warehouse(&counters);
                let picking = packed_picking(&packages, 100);
                (counters, packages, wh, picking)
            },
            |(counters, packages, wh, picking)| {
                black_box(assign_all(&picking, &wh, &counters, &packages).unwrap())
            },
        );
    });
}

fn bench_reassign_noop(c: &mut Criterion) {
    let counters = InMemoryCounterStore::new();
    let packages = InMemoryPackageStore::new();
    let wh = warehouse(&counters);
    let picking = packed_picking(&packages, 100);
    assign_all(&picking, &wh, &counters, &packages).unwrap();

    c.bench_function("assign_all_already_numbered", |b| {
        b.iter(|| black_box(assign_all(&picking, &wh, &counters, &packages).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_check_digit,
    bench_compose,
    bench_allocate,
    bench_assign_100_packages,
    bench_reassign_noop,
);
criterion_main!(benches);
