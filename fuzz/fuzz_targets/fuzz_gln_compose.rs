#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (u8, &str, u64)| {
    let (prefix, gln, n) = input;
    let (Ok(prefix), Ok(gln)) = (versand::NvePrefix::new(prefix), versand::Gln::parse(gln)) else {
        return;
    };
    let sequence = format!("{:0>width$}", n, width = gln.padding());
    match versand::Nve::compose(prefix, &gln, &sequence) {
        Ok(nve) => assert!(versand::Nve::parse(nve.as_str()).is_ok()),
        Err(_) => assert!(sequence.len() != gln.padding()),
    }
});
