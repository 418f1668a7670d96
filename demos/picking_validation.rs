use rust_decimal_macros::dec;
use versand::core::*;
use versand::nve::*;

fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let counters = InMemoryCounterStore::new();
    let packages = InMemoryPackageStore::new();

    // Warehouse with a 7-digit GLN: 9 sequence digits per NVE
    let mut warehouses = Warehouses::new();
    warehouses.insert(
        WarehouseBuilder::new(WarehouseId(1), "Lager Mainz")
            .gln("1234567")
            .nve_prefix(0)
            .build(&counters)
            .unwrap(),
    );

    packages
        .insert(
            Package::new(PackageId(1), "PACK0001")
                .with_tare_weight(dec!(0.4))
                .add_content("Akku 48V", dec!(2), dec!(3.2)),
        )
        .unwrap();
    packages
        .insert(Package::new(PackageId(2), "PACK0002").add_content("Ladegerät", dec!(1), dec!(0.9)))
        .unwrap();

    let mut picking = Picking::new(
        PickingId(1),
        "WH/OUT/00001",
        PickingType::outgoing(PickingTypeId(1), WarehouseId(1)),
    )
    .with_sale_order(SaleOrderId(1), true);
    let akku = picking.add_move_line("Akku 48V", dec!(2));
    let charger = picking.add_move_line("Ladegerät", dec!(1));
    picking.put_in_pack(akku, PackageId(1), &packages).unwrap();
    picking.put_in_pack(charger, PackageId(2), &packages).unwrap();
    picking.confirm().unwrap();

    let ctx = NveContext {
        warehouses: &warehouses,
        counters: &counters,
        packages: &packages,
    };
    match validate_picking(&mut picking, ctx, &mut NoInvoicing) {
        Ok(TriggerOutcome::Assigned(report)) => {
            for (package, nve) in &report.assigned {
                let p = packages.get(*package).unwrap().unwrap();
                println!(
                    "{}: NVE {} (check digit {}, gross {} kg)",
                    p.name,
                    nve,
                    nve.check_digit(),
                    p.gross_weight()
                );
            }
        }
        Ok(TriggerOutcome::Skipped(reason)) => println!("No NVE assigned: {reason:?}"),
        Err(e) => eprintln!("Validation failed: {e}"),
    }

    // A warehouse without GLN blocks validation
    let mut incomplete = Warehouses::new();
    incomplete.insert(
        WarehouseBuilder::new(WarehouseId(1), "Lager Mainz")
            .nve_prefix(0)
            .build(&counters)
            .unwrap(),
    );
    packages.insert(Package::new(PackageId(3), "PACK0003")).unwrap();
    let mut second = Picking::new(
        PickingId(2),
        "WH/OUT/00002",
        PickingType::outgoing(PickingTypeId(1), WarehouseId(1)),
    )
    .with_sale_order(SaleOrderId(2), true);
    let line = second.add_move_line("Akku 48V", dec!(1));
    second.put_in_pack(line, PackageId(3), &packages).unwrap();

    let ctx = NveContext {
        warehouses: &incomplete,
        counters: &counters,
        packages: &packages,
    };
    if let Err(e) = validate_picking(&mut second, ctx, &mut NoInvoicing) {
        println!("{}: {e} (state stays {})", second.name, second.state());
    }
}
