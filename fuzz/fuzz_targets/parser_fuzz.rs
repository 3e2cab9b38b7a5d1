//! Parser fuzz target: feed arbitrary text to the schema parser.
//! Neither parsing nor validating an empty document may panic; both return
//! Ok or a typed error.
//! Build with: cargo fuzz run parser_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    if let Ok(schema) = string_schema::parse_schema(s) {
        let _ = schema.validate_value(&serde_json::json!({}));
        let _ = schema.lint();
        let _ = schema.to_json_schema();
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parser_fuzz");
}
