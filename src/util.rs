// src/util.rs — Helpers for log output

/// Truncate a string for logging (UTF-8 safe).
///
/// Cuts at the last character boundary at or before `max_len` bytes.
pub fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Mask a secret for display, keeping only a short prefix.
pub fn redact(secret: &str) -> String {
    let prefix = truncate_str(secret, 4);
    if prefix.len() == secret.len() {
        "****".into()
    } else {
        format!("{prefix}****")
    }
}
