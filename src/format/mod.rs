//! Number formatting for KPI cards, chart axes and table cells.
//!
//! Amounts are shown the way the loan office reads them: euro sign in
//! front, no decimals, `.` as the thousands separator.

/// Format an integer with `.` thousands separators (`12345` → `12.345`).
pub fn integer(n: u64) -> String {
    group_digits(&n.to_string())
}

/// Format an amount as whole euros (`1234567.6` → `€ 1.234.568`).
pub fn currency(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let rounded = value.round();
    let digits = group_digits(&format!("{:.0}", rounded.abs()));
    if rounded < 0.0 {
        format!("€ -{digits}")
    } else {
        format!("€ {digits}")
    }
}

/// Format a value that is already a percentage (`42.46` → `42.5%`).
pub fn percent(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    format!("{value:.1}%")
}

/// Format a probability in `[0, 1]` as a percentage (`0.734` → `73.4%`).
pub fn probability(p: f64) -> String {
    percent(p * 100.0)
}

/// Format a chart value: counts as integers, sums and averages as currency.
pub fn count_or_currency(value: f64, as_currency: bool) -> String {
    if as_currency {
        currency(value)
    } else if value.is_finite() && value >= 0.0 {
        integer(value.round() as u64)
    } else {
        "-".to_string()
    }
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

fn group_digits(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}
