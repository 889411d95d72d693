use std::path::Path;

use phosphor_cpu_validation::{run_test_case, touches_fixed_window, W65C02TestCase, UNIMPLEMENTED_OPCODES};

#[test]
fn test_all_opcodes() {
    let test_dir = Path::new("test_data/65x02/wdc65c02/v1");
    if !test_dir.exists() {
        panic!(
            "No SingleStepTests data. Run: git submodule update --init cpu-validation/test_data/65x02"
        );
    }

    let mut total_tests = 0;
    let mut total_files = 0;
    let mut total_skipped = 0;

    for opcode in 0u16..=0xFF {
        let opcode = opcode as u8;
        if UNIMPLEMENTED_OPCODES.contains(&opcode) {
            continue;
        }

        let filename = format!("{:02x}.json", opcode);
        let json_path = test_dir.join(&filename);
        if !json_path.exists() {
            continue;
        }

        let json = std::fs::read_to_string(&json_path)
            .unwrap_or_else(|e| panic!("Failed to read {:?}: {}", json_path, e));
        let tests: Vec<W65C02TestCase> = serde_json::from_str(&json)
            .unwrap_or_else(|e| panic!("Failed to parse {:?}: {}", json_path, e));

        assert!(!tests.is_empty(), "Test file {} is empty", filename);

        for tc in &tests {
            if touches_fixed_window(tc) {
                total_skipped += 1;
                continue;
            }
            run_test_case(tc);
            total_tests += 1;
        }

        total_files += 1;
    }

    eprintln!(
        "Validated {} tests across {} opcode files ({} skipped: touch $C000-$CFFF)",
        total_tests, total_files, total_skipped
    );
    assert!(total_files > 0, "no opcode fixtures were found under {:?}", test_dir);
}
