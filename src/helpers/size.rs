//! Approximate human-readable sizes

const UNITS: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];

/// Format a byte count approximately, in binary units
///
/// # Examples
/// ```ignore
/// approximate_size(1)    // -> "1 byte"
/// approximate_size(512)  // -> "512 bytes"
/// approximate_size(4300) // -> "4.2 KB"
/// ```
pub fn approximate_size(bytes: u64) -> String {
    if bytes == 1 {
        return "1 byte".to_string();
    }
    if bytes < 1024 {
        return format!("{} bytes", bytes);
    }

    let mut unit_size: u64 = 1024;
    let mut unit = 0;
    while unit + 1 < UNITS.len() && bytes / unit_size >= 1024 {
        unit_size *= 1024;
        unit += 1;
    }

    let value = bytes as f64 / unit_size as f64;
    // One decimal while it still fits in three significant digits
    if value < 99.95 {
        format!("{:.1} {}", value, UNITS[unit])
    } else {
        format!("{:.0} {}", value, UNITS[unit])
    }
}
