#![no_main]

use libfuzzer_sys::fuzz_target;

use pagekit::template::{Bindings, Template};

fuzz_target!(|data: &str| {
    // Parsing arbitrary text must never panic, and must be deterministic.
    let first = Template::parse(data);
    assert_eq!(first, Template::parse(data));

    // A template that parses must expand with no bindings at all.
    if let Ok(template) = first {
        let _ = template.expand(&Bindings::new());
        assert_eq!(template.as_str(), data);
    }
});
