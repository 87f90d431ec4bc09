//! Shared utility functions

/// Truncate to at most `max_bytes`, backing off to the previous UTF-8
/// character boundary when the cut would split a character.
pub fn truncate_utf8_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Single-line preview of a passage for log messages: whitespace runs become
/// one space and the result is cut to `max_bytes` with a trailing ellipsis.
pub fn log_preview(text: &str, max_bytes: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let cut = truncate_utf8_safe(&flat, max_bytes);
    if cut.len() < flat.len() {
        format!("{}…", cut)
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_shorter_than_max() {
        assert_eq!(truncate_utf8_safe("whale", 10), "whale");
    }

    #[test]
    fn test_truncate_at_utf8_boundary() {
        // "é" is two bytes
        let s = "café au lait";
        assert_eq!(truncate_utf8_safe(s, 4), "caf");
        assert_eq!(truncate_utf8_safe(s, 5), "café");
    }

    #[test]
    fn test_truncate_to_zero() {
        assert_eq!(truncate_utf8_safe("whale", 0), "");
    }

    #[test]
    fn test_log_preview_flattens_and_cuts() {
        assert_eq!(log_preview("Call me\n\n  Ishmael.", 80), "Call me Ishmael.");
        assert_eq!(log_preview("Call me Ishmael.", 7), "Call me…");
        assert_eq!(log_preview("", 10), "");
    }
}
