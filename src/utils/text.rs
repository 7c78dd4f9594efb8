/// Format a price as US dollars with thousands separators and two decimals.
pub fn format_price(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (offset, ch) in int_part.chars().enumerate() {
        if offset > 0 && (int_part.len() - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${}.{}", grouped, frac_part)
    } else {
        format!("${}.{}", grouped, frac_part)
    }
}

/// Format a 24h percent change with an explicit sign, e.g. `+2.45%`.
pub fn format_change(change: f64) -> String {
    if change >= 0.0 {
        format!("+{:.2}%", change)
    } else {
        format!("{:.2}%", change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_and_keeps_two_decimals() {
        assert_eq!(format_price(64200.0), "$64,200.00");
        assert_eq!(format_price(1234567.891), "$1,234,567.89");
        assert_eq!(format_price(999.5), "$999.50");
        assert_eq!(format_price(0.0), "$0.00");
    }

    #[test]
    fn change_carries_an_explicit_sign() {
        assert_eq!(format_change(2.45), "+2.45%");
        assert_eq!(format_change(-1.1), "-1.10%");
        assert_eq!(format_change(0.0), "+0.00%");
    }
}
