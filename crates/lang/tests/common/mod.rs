use std::fs;
use std::path::Path;

pub fn read_file(path: &str) -> String {
    fs::read_to_string(Path::new(path)).expect("Failed to read file")
}

/// Evaluate a sample program and parse its expected JSON next to it
pub fn load_case(name: &str) -> (String, serde_json::Value) {
    let source = read_file(&format!("tests/samples/{}.konf", name));
    let expected = read_file(&format!("tests/samples/{}.json", name));
    let expected = serde_json::from_str(&expected).expect("Expected output is not valid JSON");
    (source, expected)
}
