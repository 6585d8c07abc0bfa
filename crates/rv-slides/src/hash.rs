//! Content fingerprint of slide text.
//!
//! The fingerprint keys a slide's container element and scopes its styles,
//! so it must stay byte-for-byte compatible with the stylesheets that already
//! reference it: `hash = hash * 31 + unit` over UTF-16 code units with signed
//! 32-bit wraparound, absolute value, base-36.
//!
//! This is not a cryptographic hash. Two different slides may share a
//! fingerprint; the only consequence is a shared CSS scope.

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Compute the base-36 fingerprint of `text`.
///
/// # Examples
///
/// ```
/// use rv_slides::hash;
///
/// assert_eq!(hash(""), "0");
/// assert_eq!(hash("a"), "2p");
/// assert_eq!(hash("a"), hash("a"));
/// ```
pub fn hash(text: &str) -> String {
    let mut acc: i32 = 0;
    for unit in text.encode_utf16() {
        acc = acc
            .wrapping_shl(5)
            .wrapping_sub(acc)
            .wrapping_add(i32::from(unit));
    }

    // Widen before abs so i32::MIN maps to 2^31 instead of overflowing.
    to_base36(i64::from(acc).unsigned_abs())
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_owned();
    }

    let mut buf = Vec::with_capacity(8);
    while value > 0 {
        // value % 36 < 36, so the index is always in bounds
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    buf.into_iter().map(char::from).collect()
}
