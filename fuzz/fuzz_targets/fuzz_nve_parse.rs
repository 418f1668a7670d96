#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic; a parsed NVE must carry a valid check digit.
        if let Ok(nve) = versand::Nve::parse(s) {
            assert!(nve.is_check_digit_valid());
            assert_eq!(nve.as_str().len(), versand::NVE_LEN);
        }
        let _ = versand::gs1_check_digit(s);
        let _ = versand::has_valid_check_digit(s);
    }
});
