//! Fixed-width line composition
//!
//! Receipts are laid out in a monospaced font, so columns are built by
//! string padding, the same way an ESC/POS line builder composes a row.
//! All money is rendered with exactly two decimals.

use rust_decimal::Decimal;

/// Format an amount with two decimals, no thousands separators.
pub fn fmt_money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Format an amount with its currency symbol prefix.
pub fn fmt_currency(symbol: &str, amount: Decimal) -> String {
    format!("{}{}", symbol, fmt_money(amount))
}

/// Truncate to at most `width` characters.
pub fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Left-pad with spaces to `width` (right alignment).
pub fn pad_left(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        truncate(text, width)
    } else {
        format!("{}{}", " ".repeat(width - len), text)
    }
}

/// Right-pad with spaces to `width` (left alignment).
pub fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        truncate(text, width)
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Center within `width`.
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return truncate(text, width);
    }
    let left = (width - len) / 2;
    format!("{}{}", " ".repeat(left), text)
}

/// Two columns: left text filled, right text right-aligned.
///
/// The left part is truncated so the right part always fits whole.
pub fn two_columns(left: &str, right: &str, width: usize) -> String {
    let right_len = right.chars().count();
    if right_len + 1 >= width {
        return truncate(right, width);
    }
    let left_width = width - right_len - 1;
    format!("{} {}", pad_right(left, left_width), right)
}

/// Separator rule made of dashes.
pub fn rule(width: usize) -> String {
    "-".repeat(width)
}

/// Word-wrap free text to `width`, breaking long words hard.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.lines() {
        let mut current = String::new();
        for word in raw.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();
            if current.is_empty() {
                if word_len <= width {
                    current.push_str(word);
                } else {
                    // hard-break an overlong word
                    let mut rest: Vec<char> = word.chars().collect();
                    while rest.len() > width {
                        lines.push(rest[..width].iter().collect());
                        rest = rest[width..].to_vec();
                    }
                    current = rest.into_iter().collect();
                }
            } else if current_len + 1 + word_len <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(current);
                current = String::new();
                if word_len <= width {
                    current.push_str(word);
                } else {
                    let mut rest: Vec<char> = word.chars().collect();
                    while rest.len() > width {
                        lines.push(rest[..width].iter().collect());
                        rest = rest[width..].to_vec();
                    }
                    current = rest.into_iter().collect();
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_two_decimals() {
        assert_eq!(fmt_money(dec!(90)), "90.00");
        assert_eq!(fmt_money(dec!(12.5)), "12.50");
        assert_eq!(fmt_money(dec!(3.456)), "3.46");
        assert_eq!(fmt_currency("$", dec!(100)), "$100.00");
    }

    #[test]
    fn test_two_columns_right_aligned() {
        let line = two_columns("Coffee x2", "10.00", 20);
        assert_eq!(line.chars().count(), 20);
        assert!(line.ends_with("10.00"));
        assert!(line.starts_with("Coffee x2"));
    }

    #[test]
    fn test_two_columns_truncates_left() {
        let line = two_columns("a very long product name here", "9.99", 20);
        assert_eq!(line.chars().count(), 20);
        assert!(line.ends_with(" 9.99"));
    }

    #[test]
    fn test_center_and_pad() {
        assert_eq!(center("ab", 6), "  ab");
        assert_eq!(pad_left("7", 3), "  7");
        assert_eq!(pad_right("7", 3), "7  ");
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        let lines = wrap("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_keeps_words() {
        let lines = wrap("thanks for your visit", 10);
        assert_eq!(lines, vec!["thanks for", "your visit"]);
    }
}
