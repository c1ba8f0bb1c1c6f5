//! CTCP ACTION framing. Other client-to-client queries are passed
//! through untouched as regular message text.

const DELIMITER: char = '\u{1}';

/// Unwraps `\u{1}ACTION <text>\u{1}`, returning the emote text.
///
/// The closing delimiter is optional; some clients omit it.
pub fn parse_action(text: &str) -> Option<&str> {
    let inner = text.strip_prefix(DELIMITER)?;
    let inner = inner.strip_suffix(DELIMITER).unwrap_or(inner);
    let text = inner.strip_prefix("ACTION")?;

    Some(text.strip_prefix(' ').unwrap_or(text))
}

pub fn format_action(text: &str) -> String {
    format!("{DELIMITER}ACTION {text}{DELIMITER}")
}
