use chrono::NaiveDate;
use versand::core::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// --- Check digit ---

#[test]
fn gs1_reference_sscc() {
    // GS1 General Specifications example SSCC 1 0614141 234567890 8
    assert_eq!(gs1_check_digit("10614141234567890").unwrap(), 8);
    assert!(has_valid_check_digit("106141412345678908"));
}

#[test]
fn warehouse_example_body() {
    assert_eq!(gs1_check_digit("01234567000000001").unwrap(), 5);
}

#[test]
fn weights_start_at_the_leftmost_digit() {
    // even-length input: the first digit carries weight 3
    assert_eq!(gs1_check_digit("1000000000000000").unwrap(), 7);
    assert_eq!(gs1_check_digit("0100000000000000").unwrap(), 9);
    assert_eq!(gs1_check_digit("12").unwrap(), 5);
}

#[test]
fn all_zero_body_has_zero_check_digit() {
    assert_eq!(gs1_check_digit("0000000000000000").unwrap(), 0);
}

#[test]
fn single_digit_is_weighted_by_three() {
    assert_eq!(gs1_check_digit("7").unwrap(), 9);
    assert_eq!(gs1_check_digit("0").unwrap(), 0);
}

#[test]
fn non_digit_input_rejected() {
    for bad in ["", "12a4", " 123", "１２３"] {
        assert!(
            matches!(gs1_check_digit(bad), Err(VersandError::InvalidInput(_))),
            "{bad:?} should be rejected"
        );
    }
}

#[test]
fn validity_check_on_malformed_input_is_false() {
    assert!(!has_valid_check_digit(""));
    assert!(!has_valid_check_digit("5"));
    assert!(!has_valid_check_digit("01234567000000001X"));
}

// --- GLN ---

#[test]
fn gln_padding_complements_to_sixteen() {
    assert_eq!(validate_gln("1234567").unwrap(), 9);
    assert_eq!(validate_gln("12345678").unwrap(), 8);
    assert_eq!(validate_gln("123456789").unwrap(), 7);
}

#[test]
fn gln_length_out_of_range() {
    for gln in ["123456", "1234567890", "4012345000009"] {
        let err = validate_gln(gln).unwrap_err();
        assert!(
            err.to_string().contains("7, 8, or 9 digits"),
            "unexpected message for {gln}: {err}"
        );
    }
}

#[test]
fn gln_with_letters_rejected_as_non_numeric() {
    let err = validate_gln("12345A7").unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid GLN '12345A7': GLN must be numeric"
    );
}

#[test]
fn gln_deserialises_through_validation() {
    let ok: Gln = serde_json::from_str("\"12345678\"").unwrap();
    assert_eq!(ok.padding(), 8);
    assert!(serde_json::from_str::<Gln>("\"123\"").is_err());
}

// --- NVE ---

#[test]
fn compose_example_nve() {
    let gln = Gln::parse("1234567").unwrap();
    let nve = Nve::compose(NvePrefix::new(0).unwrap(), &gln, "000000001").unwrap();
    assert_eq!(nve.as_str(), "012345670000000015");
    assert_eq!(nve.as_str().len(), NVE_LEN);
    assert_eq!(nve.body(), "01234567000000001");
    assert_eq!(nve.check_digit(), 5);
}

#[test]
fn every_gln_length_gives_eighteen_digits() {
    for (gln, seq) in [
        ("1234567", "000000042"),
        ("12345678", "00000042"),
        ("123456789", "0000042"),
    ] {
        let gln = Gln::parse(gln).unwrap();
        let nve = Nve::compose(NvePrefix::new(3).unwrap(), &gln, seq).unwrap();
        assert_eq!(nve.as_str().len(), 18);
        assert!(nve.is_check_digit_valid());
        assert!(nve.as_str().starts_with('3'));
    }
}

#[test]
fn sequence_width_must_match_gln() {
    let gln = Gln::parse("1234567").unwrap();
    assert!(Nve::compose(NvePrefix::new(0).unwrap(), &gln, "00000001").is_err());
    assert!(Nve::compose(NvePrefix::new(0).unwrap(), &gln, "0000000001").is_err());
}

#[test]
fn wrong_check_digit_does_not_parse() {
    assert!(Nve::parse("012345670000000015").is_ok());
    assert!(Nve::parse("012345670000000013").is_err());
    assert!(Nve::parse("01234567000000001").is_err());
}

#[test]
fn prefix_digit_range() {
    assert_eq!(NvePrefix::new(9).unwrap().as_char(), '9');
    assert!(NvePrefix::new(10).is_err());
}

// --- Counters ---

#[test]
fn nve_and_document_counters_are_independent() {
    let store = InMemoryCounterStore::new();
    let nve = CounterKey::Nve(WarehouseId(1));
    let doc = CounterKey::Document("AMZ".into());
    store.create(nve.clone(), NumberSequence::new(9)).unwrap();
    store
        .create(doc.clone(), NumberSequence::new(6).with_prefix("{year}-"))
        .unwrap();

    assert_eq!(store.allocate(&nve).unwrap().digits(), "000000001");
    assert_eq!(store.allocate(&nve).unwrap().digits(), "000000002");
    assert_eq!(
        store.allocate(&doc).unwrap().render(date(2025, 1, 2)),
        "2025-000001"
    );
}

#[test]
fn counter_keys_display() {
    assert_eq!(CounterKey::Nve(WarehouseId(4)).to_string(), "nve.sequence.4");
    assert_eq!(
        CounterKey::Document("AMZ".into()).to_string(),
        "document.sequence.AMZ"
    );
}

#[test]
fn snapshot_survives_json() {
    let store = InMemoryCounterStore::new();
    let key = CounterKey::Nve(WarehouseId(1));
    store.create(key.clone(), NumberSequence::new(9)).unwrap();
    store.allocate(&key).unwrap();

    let json = serde_json::to_string(&store.snapshot().unwrap()).unwrap();
    let restored = InMemoryCounterStore::from_snapshot(serde_json::from_str(&json).unwrap());
    assert_eq!(restored.allocate(&key).unwrap().value, 2);
}

#[test]
fn starting_at_zero_is_rejected() {
    assert!(NumberSequence::starting_at(9, 0).is_err());
    assert_eq!(NumberSequence::starting_at(9, 41).unwrap().peek().value, 41);
}

#[test]
fn configuration_missing_message() {
    let err = VersandError::ConfigurationMissing {
        warehouse: "Mainz".into(),
        field: MissingField::Gln,
    };
    assert_eq!(
        err.to_string(),
        "GLN does not exist for warehouse 'Mainz', configure it in the warehouse settings"
    );
}
