use serde_json::Value;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use posts_core::formatting::format_count;
///
/// assert_eq!(format_count(70384), "70,384");
/// assert_eq!(format_count(999), "999");
/// assert_eq!(format_count(-1234567), "-1,234,567");
/// ```
pub fn format_count(value: i64) -> String {
    let grouped = group_thousands(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Render a single table cell as display text.
///
/// Absent values print as `None`; strings print without quotes and with
/// line breaks collapsed to spaces; nested values print as compact JSON.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.split_whitespace().collect::<Vec<_>>().join(" "),
        other => other.to_string(),
    }
}

/// Cut `text` down to at most `max_width` terminal columns, marking the cut
/// with a trailing `…`.
///
/// # Examples
///
/// ```
/// use posts_core::formatting::truncate_to_width;
///
/// assert_eq!(truncate_to_width("hello", 10), "hello");
/// assert_eq!(truncate_to_width("hello world", 6), "hello…");
/// ```
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Right-pad `text` with spaces to exactly `width` terminal columns.
///
/// Text already wider than `width` is returned unchanged.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let current = text.width();
    if current >= width {
        return text.to_string();
    }
    format!("{}{}", text, " ".repeat(width - current))
}

// ── Internal helpers ───────────────────────────────────────────────────────────

/// Insert commas every three digits from the right in a string of ASCII digits.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
