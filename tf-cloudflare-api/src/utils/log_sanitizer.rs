//! Log sanitization utilities
//!
//! Keeps response bodies and credentials from being dumped in full into
//! debug/error logs.

/// Maximum number of bytes kept by [`truncate_for_log`].
const TRUNCATE_LIMIT: usize = 512;
/// Characters of a secret left visible by [`mask_secret`].
const VISIBLE_SECRET_CHARS: usize = 4;

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    (0..=index).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

/// Truncate a string for safe logging, noting the original length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask a secret, keeping only a short prefix.
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= VISIBLE_SECRET_CHARS * 2 {
        return "****".to_string();
    }
    let prefix: String = secret.chars().take(VISIBLE_SECRET_CHARS).collect();
    format!("{prefix}****")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_string_unchanged() {
        assert_eq!(truncate_for_log("{\"success\":true}"), "{\"success\":true}");
    }

    #[test]
    fn over_limit_truncated() {
        let s = "a".repeat(TRUNCATE_LIMIT + 100);
        let result = truncate_for_log(&s);
        assert!(result.contains(&format!("total {} bytes]", TRUNCATE_LIMIT + 100)));
        assert!(result.len() < s.len());
    }

    #[test]
    fn multibyte_chars_safe() {
        let s = "é".repeat(TRUNCATE_LIMIT);
        assert!(truncate_for_log(&s).contains("... [truncated"));
    }

    #[test]
    fn secrets_are_masked() {
        assert_eq!(mask_secret("abcdefghijklmnop"), "abcd****");
        assert_eq!(mask_secret("short"), "****");
    }
}
