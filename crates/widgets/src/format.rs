use chrono::NaiveDate;
use voltbill_settings::LanguageCode;

pub const DEFAULT_CURRENCY: &str = "₹";

/// 以 K/M 縮寫大數字。 / Abbreviates large numbers with `K`/`M`.
pub fn format_number(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{}M", to_fixed(value / 1_000_000.0, 1))
    } else if value >= 1_000.0 {
        format!("{}K", to_fixed(value / 1_000.0, 1))
    } else {
        value.to_string()
    }
}

pub fn format_currency(amount: f64, symbol: &str) -> String {
    if amount >= 1_000_000.0 {
        format!("{symbol}{}M", to_fixed(amount / 1_000_000.0, 2))
    } else if amount >= 1_000.0 {
        format!("{symbol}{}K", to_fixed(amount / 1_000.0, 1))
    } else {
        format!("{symbol}{}", to_fixed(amount, 2))
    }
}

/// Fixed-point text with exact halves rounded away from zero.
fn to_fixed(value: f64, digits: usize) -> String {
    let scale = 10f64.powi(digits as i32);
    let rounded = (value * scale).round() / scale;
    format!("{rounded:.digits$}")
}

/// Numeric date in the layout each language's locale uses.
pub fn format_date(date: NaiveDate, language: LanguageCode) -> String {
    match language {
        LanguageCode::Zh => date.format("%Y/%m/%d").to_string(),
        LanguageCode::En => date.format("%m/%d/%Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_abbreviated() {
        assert_eq!(format_number(950.0), "950");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(1_500.0), "1.5K");
        assert_eq!(format_number(2_340_000.0), "2.3M");
    }

    #[test]
    fn currency_uses_symbol_and_precision() {
        assert_eq!(format_currency(87.456, DEFAULT_CURRENCY), "₹87.46");
        assert_eq!(format_currency(4_250.0, DEFAULT_CURRENCY), "₹4.3K");
        assert_eq!(format_currency(1_200_000.0, "$"), "$1.20M");
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(format_number(1_250.0), "1.3K");
        assert_eq!(format_number(3_750_000.0), "3.8M");
        assert_eq!(format_currency(0.125, DEFAULT_CURRENCY), "₹0.13");
        assert_eq!(format_currency(2_250.0, DEFAULT_CURRENCY), "₹2.3K");
        assert_eq!(format_currency(1_005.0, DEFAULT_CURRENCY), "₹1.0K");
    }

    #[test]
    fn dates_follow_language() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 5).unwrap();
        assert_eq!(format_date(date, LanguageCode::Zh), "2025/07/05");
        assert_eq!(format_date(date, LanguageCode::En), "07/05/2025");
    }
}
