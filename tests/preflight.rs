use palisade::error::InstallError;
use palisade::preflight::{
    MINIMUM_MEMORY_KB, ensure_sufficient_memory, parse_total_memory_kb,
};

const MEMINFO: &str = "\
MemTotal:        8046508 kB
MemFree:          269100 kB
MemAvailable:    4958544 kB
Buffers:          658768 kB
";

#[test]
fn parses_memtotal_from_full_meminfo() {
    assert_eq!(parse_total_memory_kb(MEMINFO), Some(8_046_508));
}

#[test]
fn memtotal_not_on_first_line_still_found() {
    let meminfo = "MemFree: 5 kB\nMemTotal: 2000000 kB\n";
    assert_eq!(parse_total_memory_kb(meminfo), Some(2_000_000));
}

#[test]
fn garbage_meminfo_is_none() {
    assert_eq!(parse_total_memory_kb("MemTotal: lots kB\n"), None);
    assert_eq!(parse_total_memory_kb("not meminfo at all"), None);
    assert_eq!(parse_total_memory_kb(""), None);
}

#[test]
fn memory_at_the_floor_passes() {
    assert!(ensure_sufficient_memory(MINIMUM_MEMORY_KB).is_ok());
    assert!(ensure_sufficient_memory(MINIMUM_MEMORY_KB + 1).is_ok());
}

#[test]
fn memory_below_the_floor_fails_with_both_numbers() {
    let err = ensure_sufficient_memory(MINIMUM_MEMORY_KB - 1).unwrap_err();
    match err {
        InstallError::InsufficientMemory {
            available_kb,
            required_kb,
        } => {
            assert_eq!(available_kb, MINIMUM_MEMORY_KB - 1);
            assert_eq!(required_kb, MINIMUM_MEMORY_KB);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn floor_matches_the_documented_two_gigabytes() {
    // 2 GB hosts report slightly under 2000000 kB; the floor leaves
    // headroom for that.
    assert_eq!(MINIMUM_MEMORY_KB, 1_900_000);
}
