// --- File: crates/safari_common/src/format.rs ---
//! Formatting utilities for displaying prices and dates.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::warn;

pub fn format_number_with_commas(num: u64) -> String {
    let num_str = num.to_string();
    let mut result = String::new();

    for (i, ch) in num_str.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }

    result.chars().rev().collect()
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_ascii_uppercase().as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "KES" => Some("KSh "),
        "TZS" => Some("TSh "),
        _ => None,
    }
}

/// `450050, "USD"` → `$4,500.50`. Unknown currencies are prefixed with their code.
pub fn format_money(minor: i64, currency: &str) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    let amount = format!("{}.{:02}", format_number_with_commas(abs / 100), abs % 100);
    match currency_symbol(currency) {
        Some(symbol) => format!("{}{}{}", sign, symbol, amount),
        None => format!("{}{} {}", sign, currency.to_ascii_uppercase(), amount),
    }
}

/// Minor units as an editable major-unit amount: `125000` → `1250`,
/// `125050` → `1250.50`.
pub fn format_major_units(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    if abs % 100 == 0 {
        format!("{}{}", sign, abs / 100)
    } else {
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// `2026-08-01` → `Sat 1 Aug 2026`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%a %-d %b %Y").to_string()
}

pub fn format_duration_days(days: u32) -> String {
    match days {
        1 => "1 day".to_string(),
        n => format!("{} days", n),
    }
}

/// Resolves an IANA timezone name, falling back to UTC.
pub fn site_timezone(name: &str) -> Tz {
    match name.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            warn!("unknown site timezone {:?}, using UTC", name);
            Tz::UTC
        }
    }
}

/// Today's calendar date in the site's timezone.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

pub fn format_timestamp(timestamp: DateTime<Utc>, tz: Tz) -> String {
    timestamp.with_timezone(&tz).format("%-d %b %Y, %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(450050, "USD"), "$4,500.50");
        assert_eq!(format_money(5, "usd"), "$0.05");
        assert_eq!(format_money(123456789, "CHF"), "CHF 1,234,567.89");
        assert_eq!(format_money(-2500, "EUR"), "-€25.00");
    }

    #[test]
    fn test_format_major_units() {
        assert_eq!(format_major_units(125000), "1250");
        assert_eq!(format_major_units(125050), "1250.50");
        assert_eq!(format_major_units(7), "0.07");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        assert_eq!(format_date(date), "Sat 1 Aug 2026");
        assert_eq!(format_duration_days(1), "1 day");
        assert_eq!(format_duration_days(7), "7 days");
    }

    #[test]
    fn test_timezone_fallback_and_conversion() {
        assert_eq!(site_timezone("Mars/Olympus"), Tz::UTC);
        let nairobi = site_timezone("Africa/Nairobi");
        let late_evening = Utc.with_ymd_and_hms(2026, 3, 1, 22, 30, 0).unwrap();
        assert_eq!(format_timestamp(late_evening, nairobi), "2 Mar 2026, 01:30");
    }
}
