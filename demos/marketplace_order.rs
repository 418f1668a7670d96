use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use versand::core::*;
use versand::marketplace::*;
use versand::nve::label::{labels_to_json, picking_labels};
use versand::nve::*;

fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let counters = Arc::new(InMemoryCounterStore::new());
    let packages = InMemoryPackageStore::new();
    let mut warehouses = Warehouses::new();
    warehouses.insert(
        WarehouseBuilder::new(WarehouseId(1), "Lager Mainz")
            .gln("12345678")
            .nve_prefix(3)
            .build(counters.as_ref())
            .unwrap(),
    );

    let mut journals = Journals::new();
    journals
        .insert(Journal::sale(JournalId(1), "INV", "Customer Invoices"))
        .unwrap();
    journals
        .insert(Journal::sale(JournalId(2), "AMZ", "Amazon").with_nve(true))
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    let mut ledger =
        Ledger::new(counters.clone(), NumberingConfig::default()).with_accounting_date(date);

    // Amazon order: routed to the "Amazon" journal, invoiced and posted on confirmation
    let mut order = SaleOrder::new(SaleOrderId(1), "S00001", date).with_marketplace(Marketplace::Amazon);
    order.add_line(SaleOrderLine::new("Akku 48V", dec!(1), dec!(199.00)).with_tax_rate(dec!(19)));
    let outcome = confirm_order(&mut order, &journals, &mut ledger).unwrap();
    for id in &outcome.invoices {
        let invoice = ledger.get(*id).unwrap();
        println!(
            "{} ({:?}) sequence {} gross unit price {}",
            invoice.name,
            invoice.state,
            document_sequence(&invoice.name, invoice.kind, &NumberingConfig::default()),
            invoice.lines[0].price_with_tax()
        );
    }

    // Delivery inherits NVE activation from the Amazon journal
    let mut picking = delivery_picking(
        &order,
        &journals,
        PickingId(1),
        "WH/OUT/00001",
        PickingType::outgoing(PickingTypeId(1), WarehouseId(1)),
    )
    .unwrap();
    packages
        .insert(Package::new(PackageId(1), "PACK0001").add_content("Akku 48V", dec!(1), dec!(3.2)))
        .unwrap();
    picking.put_in_pack(0, PackageId(1), &packages).unwrap();

    let mut orders = HashMap::from([(order.id, order)]);
    let mut invoicer = DeliveryInvoicer::new(&mut ledger, &journals, &mut orders);
    let ctx = NveContext {
        warehouses: &warehouses,
        counters: counters.as_ref(),
        packages: &packages,
    };
    validate_picking(&mut picking, ctx, &mut invoicer).unwrap();

    let labels = picking_labels(&picking, warehouses.get(WarehouseId(1)), &packages).unwrap();
    println!("{}", labels_to_json(&labels).unwrap());

    let refund = ledger.create_credit_note(outcome.invoices[0], &journals).unwrap();
    println!("Credit note {}", ledger.get(refund).unwrap().name);
}
