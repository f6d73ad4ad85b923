//! Helpers for generating test resource names and payloads.

use rand::Rng;

/// Generate a random resource name like `ObjectTemp-1804289383`.
///
/// An empty prefix yields just the number.
pub fn rand_name(prefix: &str) -> String {
    let n: u32 = rand::thread_rng().gen_range(1..=0x7fff_ffff);
    if prefix.is_empty() {
        n.to_string()
    } else {
        format!("{prefix}-{n}")
    }
}

/// Repeat `base_text` until it is exactly `size` bytes long.
///
/// `base_text` falls back to `test` when empty. The result is cut on a char
/// boundary, so multi-byte text may come out slightly shorter.
///
/// ```
/// use swiftsign_swift::data::arbitrary_string;
///
/// assert_eq!(arbitrary_string(10, "abc"), "abcabcabca");
/// ```
pub fn arbitrary_string(size: usize, base_text: &str) -> String {
    let base_text = if base_text.is_empty() {
        "test"
    } else {
        base_text
    };

    let mut s = base_text.repeat(size / base_text.len() + 1);
    let mut end = size;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
    s
}
