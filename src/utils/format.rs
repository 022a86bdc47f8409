//! Human-readable rendering of table values.

/// Render a percentage for the pool table.
///
/// Exactly zero renders as `0%`. Anything below 0.01 renders as `<0.01%`
/// so that a tiny non-zero yield is not shown as `0.00%`.
pub fn format_percentage(value: f64) -> String {
    if value == 0.0 {
        return "0%".to_string();
    }
    if value < 0.01 {
        return "<0.01%".to_string();
    }
    format!("{value:.2}%")
}

/// Render a fee tier (hundredths of a basis point) as a percentage, e.g. 3000 -> `0.3%`.
pub fn format_fee_tier(fee_tier: u32) -> String {
    let percent = format!("{:.2}", fee_tier as f64 / 10_000.0);
    let trimmed = percent.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}%")
}

const COMPACT_SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Render a USD amount with a compact suffix, e.g. 1_234_567 -> `$1.23M`.
pub fn format_dollar_amount(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    if value == 0.0 {
        return "$0.00".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    if abs < 0.001 {
        return format!("{sign}<$0.001");
    }

    for (threshold, suffix) in COMPACT_SUFFIXES {
        if abs >= threshold {
            return format!("{sign}${:.2}{suffix}", abs / threshold);
        }
    }

    format!("{sign}${abs:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.0), "0%");
        assert_eq!(format_percentage(0.004), "<0.01%");
        assert_eq!(format_percentage(0.01), "0.01%");
        assert_eq!(format_percentage(10.95), "10.95%");
        assert_eq!(format_percentage(123.456), "123.46%");
    }

    #[test]
    fn test_format_fee_tier() {
        assert_eq!(format_fee_tier(100), "0.01%");
        assert_eq!(format_fee_tier(500), "0.05%");
        assert_eq!(format_fee_tier(3000), "0.3%");
        assert_eq!(format_fee_tier(10_000), "1%");
    }

    #[test]
    fn test_format_dollar_amount() {
        assert_eq!(format_dollar_amount(0.0), "$0.00");
        assert_eq!(format_dollar_amount(0.0001), "<$0.001");
        assert_eq!(format_dollar_amount(0.3), "$0.30");
        assert_eq!(format_dollar_amount(999.0), "$999.00");
        assert_eq!(format_dollar_amount(1_500.0), "$1.50K");
        assert_eq!(format_dollar_amount(2_340_000.0), "$2.34M");
        assert_eq!(format_dollar_amount(7e9), "$7.00B");
        assert_eq!(format_dollar_amount(-1_500.0), "-$1.50K");
        assert_eq!(format_dollar_amount(f64::NAN), "-");
    }
}
