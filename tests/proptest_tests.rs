//! Property-based tests for check digits, GLN validation and NVE assignment.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "nve")]

use std::collections::HashSet;

use proptest::prelude::*;
use rust_decimal_macros::dec;
use versand::core::*;
use versand::nve::*;

// ── Strategies ──────────────────────────────────────────────────────────────

fn arb_digits(len: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = String> {
    prop::collection::vec(0u8..=9, len)
        .prop_map(|d| d.into_iter().map(|b| char::from(b'0' + b)).collect())
}

fn arb_gln() -> impl Strategy<Value = String> {
    arb_digits(7..=9)
}

struct Site {
    counters: InMemoryCounterStore,
    packages: InMemoryPackageStore,
    warehouse: Warehouse,
}

fn site(gln: &str, prefix: u8) -> Site {
    let counters = InMemoryCounterStore::new();
    let warehouse = WarehouseBuilder::new(WarehouseId(1), "Mainz")
        .gln(gln)
        .nve_prefix(prefix)
        .build(&counters)
        .unwrap();
    Site {
        counters,
        packages: InMemoryPackageStore::new(),
        warehouse,
    }
}

fn packed_picking(site: &Site, first_package: u64, count: u64) -> Picking {
    let mut picking = Picking::new(
        PickingId(first_package),
        "WH/OUT",
        PickingType::outgoing(PickingTypeId(1), WarehouseId(1)),
    )
    .with_sale_order(SaleOrderId(1), true);
    for id in first_package..first_package + count {
        site.packages
            .insert(Package::new(PackageId(id), format!("PACK{id}")))
            .unwrap();
        let line = picking.add_move_line("Akku", dec!(1));
        picking.put_in_pack(line, PackageId(id), &site.packages).unwrap();
    }
    picking
}

// ── Check digit ─────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn check_digit_is_a_single_digit(body in arb_digits(1..=40)) {
        let d = gs1_check_digit(&body).unwrap();
        prop_assert!(d <= 9);
        prop_assert_eq!(gs1_check_digit(&body).unwrap(), d);
    }

    #[test]
    fn appended_check_digit_validates(body in arb_digits(1..=40)) {
        let d = gs1_check_digit(&body).unwrap();
        let full = format!("{body}{d}");
        prop_assert!(has_valid_check_digit(&full));
    }

    #[test]
    fn any_other_final_digit_is_rejected(body in arb_digits(1..=40), wrong in 0u8..=9) {
        let d = gs1_check_digit(&body).unwrap();
        prop_assume!(wrong != d);
        let candidate = format!("{body}{wrong}");
        prop_assert!(!has_valid_check_digit(&candidate));
    }

    #[test]
    fn single_digit_change_is_detected(body in arb_digits(17..=17), pos in 0usize..17, delta in 1u8..=9) {
        let d = gs1_check_digit(&body).unwrap();
        let mut bytes = body.into_bytes();
        bytes[pos] = b'0' + (bytes[pos] - b'0' + delta) % 10;
        let changed = String::from_utf8(bytes).unwrap();
        prop_assert_ne!(gs1_check_digit(&changed).unwrap(), d);
    }

    #[test]
    fn non_digits_rejected(prefix in arb_digits(0..=5), c in "[a-zA-Z ./-]", suffix in arb_digits(0..=5)) {
        let input = format!("{prefix}{c}{suffix}");
        prop_assert!(gs1_check_digit(&input).is_err());
    }
}

// ── GLN ─────────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn gln_padding_accepts_only_seven_to_nine(gln in arb_digits(1..=20)) {
        match validate_gln(&gln) {
            Ok(padding) => {
                prop_assert!((7..=9).contains(&gln.len()));
                prop_assert_eq!(padding + gln.len(), 16);
            }
            Err(_) => prop_assert!(!(7..=9).contains(&gln.len())),
        }
    }

    #[test]
    fn composed_nve_is_eighteen_valid_digits(gln in arb_gln(), prefix in 0u8..=9, n in 1u64..9_999_999) {
        let gln = Gln::parse(&gln).unwrap();
        let seq = format!("{:0>width$}", n, width = gln.padding());
        let nve = Nve::compose(NvePrefix::new(prefix).unwrap(), &gln, &seq).unwrap();
        prop_assert_eq!(nve.as_str().len(), NVE_LEN);
        prop_assert!(nve.is_check_digit_valid());
        prop_assert!(Nve::parse(nve.as_str()).is_ok());
    }
}

// ── Assignment ──────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn allocation_is_contiguous(gln in arb_gln(), runs in prop::collection::vec(1u64..5, 1..6)) {
        let site = site(&gln, 0);
        let mut next_package = 1;
        let mut seen = Vec::new();
        for count in runs {
            let picking = packed_picking(&site, next_package, count);
            next_package += count;
            let report = assign_all(&picking, &site.warehouse, &site.counters, &site.packages).unwrap();
            for (_, nve) in report.assigned {
                let seq = &nve.body()[1 + gln.len()..];
                seen.push(seq.parse::<u64>().unwrap());
            }
        }
        let expected: Vec<u64> = (1..next_package).collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn repeated_assignment_is_idempotent(gln in arb_gln(), count in 1u64..6, repeats in 1usize..4) {
        let site = site(&gln, 4);
        let picking = packed_picking(&site, 1, count);
        let first = assign_all(&picking, &site.warehouse, &site.counters, &site.packages).unwrap();
        let nves: HashSet<_> = first.assigned.iter().map(|(_, n)| n.clone()).collect();
        prop_assert_eq!(nves.len() as u64, count);

        for _ in 0..repeats {
            let again = assign_all(&picking, &site.warehouse, &site.counters, &site.packages).unwrap();
            prop_assert!(again.assigned.is_empty());
        }
        let key = CounterKey::Nve(WarehouseId(1));
        prop_assert_eq!(site.counters.peek(&key).unwrap().value, count + 1);
    }

    #[test]
    fn inactive_pickings_never_allocate(gln in arb_gln(), count in 1u64..6) {
        let site = site(&gln, 0);
        let mut warehouses = Warehouses::new();
        warehouses.insert(site.warehouse.clone());
        let mut picking = packed_picking(&site, 1, count);
        picking.activate_nve = false;

        let ctx = NveContext { warehouses: &warehouses, counters: &site.counters, packages: &site.packages };
        let outcome = validate_picking(&mut picking, ctx, &mut NoInvoicing).unwrap();
        prop_assert_eq!(outcome, TriggerOutcome::Skipped(SkipReason::NveInactive));
        let key = CounterKey::Nve(WarehouseId(1));
        prop_assert_eq!(site.counters.peek(&key).unwrap().value, 1);
    }
}
