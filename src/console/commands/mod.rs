//! Per-scope command tables.

pub mod global;
pub mod modules;
pub mod network;
pub mod user;

const UNITS: &[&str] = &["KiB", "MiB", "GiB", "TiB"];

/// Human-readable byte count (`512 B`, `1.50 KiB`, ...).
pub fn byte_str(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{:.2} {}", value, unit)
}

/// Line shown when a listing has no rows, with or without a filter.
pub fn empty_listing(filter: &str, none: &str) -> String {
    if filter.is_empty() {
        none.to_string()
    } else {
        format!("No matches for '{}'", filter)
    }
}
