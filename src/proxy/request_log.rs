//! Request logging formatter

use crate::providers::ProviderKind;

/// Format a request log message in compact format
pub fn format_request_log(provider: ProviderKind, query: &str, page: Option<u32>) -> String {
    let mut parts = vec![provider.name().to_string()];

    if let Some(page) = page {
        parts.push(format!("page={}", page));
    }

    parts.push(format!("\"{}\"", truncate_message(&normalize_whitespace(query))));

    format!("→ {}", parts.join(" "))
}

/// Convert newlines and tabs to single spaces, collapse multiple spaces
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate message according to rules:
/// - If <= 100 chars: show all
/// - If > 100 chars: first 25 + " ... " + last 75
fn truncate_message(s: &str) -> String {
    const MAX_TOTAL: usize = 100;
    const PREFIX_LEN: usize = 25;
    const SUFFIX_LEN: usize = 75;
    const ELLIPSIS: &str = " ... ";

    let char_count = s.chars().count();
    if char_count <= MAX_TOTAL {
        return s.to_string();
    }

    let prefix: String = s.chars().take(PREFIX_LEN).collect();
    let suffix: String = s.chars().skip(char_count - SUFFIX_LEN).collect();

    format!("{}{}{}", prefix, ELLIPSIS, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_page() {
        let line = format_request_log(ProviderKind::Unsplash, "sunset beach", Some(2));
        assert_eq!(line, "→ unsplash page=2 \"sunset beach\"");
    }

    #[test]
    fn test_format_without_page() {
        let line = format_request_log(ProviderKind::Runware, "a cat\nwearing\ta hat", None);
        assert_eq!(line, "→ runware \"a cat wearing a hat\"");
    }

    #[test]
    fn test_truncate_short_message() {
        let msg = "x".repeat(100);
        assert_eq!(truncate_message(&msg), msg);
    }

    #[test]
    fn test_truncate_long_message() {
        let msg = format!("{}{}", "a".repeat(60), "b".repeat(60));
        let truncated = truncate_message(&msg);
        assert!(truncated.starts_with(&"a".repeat(25)));
        assert!(truncated.ends_with(&"b".repeat(60)));
        assert!(truncated.contains(" ... "));
        assert_eq!(truncated.chars().count(), 25 + 5 + 75);
    }

    #[test]
    fn test_truncate_multibyte() {
        // Byte slicing would split these characters
        let msg = "山".repeat(150);
        let truncated = truncate_message(&msg);
        assert_eq!(truncated.chars().count(), 105);
    }
}
