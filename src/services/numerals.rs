//! Chinese numeral to integer conversion for clock and calendar values.

use crate::services::vocab::CHINESE_NUM_MAP;

/// Convert a Chinese numeral string to its integer value.
///
/// Canonical tokens (0–23) hit the lookup table directly. Compound forms
/// follow the spoken rules: a leading 十 means `10 + rest`, a trailing 十
/// means `prefix * 10`. Anything else sums the digit values left to right.
/// Empty or unrecognized input converts to 0.
pub fn chinese_to_arabic(text: &str) -> u32 {
    if text.is_empty() {
        return 0;
    }
    if let Some(&value) = CHINESE_NUM_MAP.get(text) {
        return value;
    }
    if let Some(rest) = text.strip_prefix('十') {
        return 10 + chinese_to_arabic(rest);
    }
    if let Some(head) = text.strip_suffix('十') {
        return chinese_to_arabic(head) * 10;
    }
    text.chars()
        .map(|symbol| {
            CHINESE_NUM_MAP
                .get(symbol.to_string().as_str())
                .copied()
                .unwrap_or(0)
        })
        .sum()
}

/// Parse a token that may be either ASCII digits or a Chinese numeral.
pub fn numeric_token(token: &str) -> u32 {
    if token.is_empty() {
        return 0;
    }
    if token.bytes().all(|b| b.is_ascii_digit()) {
        return token.parse().unwrap_or(0);
    }
    chinese_to_arabic(token)
}
