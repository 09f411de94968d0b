pub mod csv;
pub mod json;
pub mod table;

/// Renders `value` rounded to whole units with comma thousands separators,
/// prefixed by the currency code.
pub fn format_currency(value: f64, currency: &str) -> String {
    if !value.is_finite() {
        return format!("{currency} {value}");
    }
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{currency} {sign}{}", group_thousands(&digits))
}

pub fn format_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

pub fn format_ratio(value: f64) -> String {
    format!("{value:.2}")
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_currency_digits() {
        assert_eq!(format_currency(60_000_000.0, "INR"), "INR 60,000,000");
        assert_eq!(format_currency(999.4, "INR"), "INR 999");
        assert_eq!(format_currency(-1_234_567.6, "USD"), "USD -1,234,568");
        assert_eq!(format_currency(0.0, "INR"), "INR 0");
    }

    #[test]
    fn formats_probabilities_as_percentages() {
        assert_eq!(format_percent(0.59363), "59.4%");
        assert_eq!(format_ratio(1.23456), "1.23");
    }
}
