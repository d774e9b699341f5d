//! Last-modified cache-busting tokens

use chrono::{DateTime, Utc};

/// Encode a modification time for the last-modified query parameter.
///
/// Whole seconds since the Unix epoch in lowercase base 36, so the token
/// changes whenever the resource does. Times before the epoch encode as
/// `None`.
///
/// # Examples
/// ```ignore
/// encode_last_modified(&Utc.timestamp_opt(1_700_000_000, 0).unwrap()) // -> Some("s44we8")
/// ```
pub fn encode_last_modified(time: &DateTime<Utc>) -> Option<String> {
    let seconds = u64::try_from(time.timestamp()).ok()?;
    if seconds == 0 {
        return None;
    }
    Some(to_base36(seconds))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut buf = Vec::new();
    loop {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    buf.reverse();
    String::from_utf8_lossy(&buf).into_owned()
}
