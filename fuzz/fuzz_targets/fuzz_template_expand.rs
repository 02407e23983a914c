#![no_main]

use libfuzzer_sys::fuzz_target;

use pagekit::template::{Bindings, Template};

// Input layout: "<template>\n<json bindings>".
fuzz_target!(|data: &str| {
    let Some((source, raw)) = data.split_once('\n') else {
        return;
    };
    let Ok(template) = Template::parse(source) else {
        return;
    };
    let Ok(json) = serde_json::from_str::<serde_json::Value>(raw) else {
        return;
    };
    let Ok(bindings) = Bindings::from_json(&json) else {
        return;
    };

    // Expansion is pure: the same inputs give the same output.
    let first = template.expand(&bindings);
    assert_eq!(first, template.expand(&bindings));
});
