/// Currency prefix shown before every price.
pub const CURRENCY: &str = "MVR";

/// `1234.5` → `"MVR 1,234.50"`.
pub fn format_price(price: f64) -> String {
    format!("{} {}", CURRENCY, group_thousands(price))
}

fn group_thousands(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_groups_and_pads() {
        assert_eq!(format_price(1234.5), "MVR 1,234.50");
        assert_eq!(format_price(999.0), "MVR 999.00");
        assert_eq!(format_price(1_000_000.0), "MVR 1,000,000.00");
        assert_eq!(format_price(0.5), "MVR 0.50");
    }

    #[test]
    fn test_format_price_rounds_to_cents() {
        assert_eq!(format_price(12.345_6), "MVR 12.35");
        assert_eq!(format_price(99_999.999), "MVR 100,000.00");
    }

    #[test]
    fn test_format_price_negative() {
        assert_eq!(format_price(-1500.0), "MVR -1,500.00");
    }
}
