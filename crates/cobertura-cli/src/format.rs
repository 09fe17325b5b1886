//! Argentine number formatting for human output: `12.345`, `1.234,57`, `-` when absent

/// Rendered for missing values
pub const ABSENT: &str = "-";

/// Thousands separated by `.`
pub fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

/// Two decimals with `,`, thousands separated by `.`
pub fn format_decimal(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{}{},{}", sign, group_thousands(int_part), frac_part)
}

pub fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| ABSENT.to_string(), format_decimal)
}

pub fn format_km(value: Option<f64>) -> String {
    match value {
        Some(km) => format!("{} km", format_decimal(km)),
        None => ABSENT.to_string(),
    }
}

/// Fraction rendered as a percentage, `0.875` -> `87,50 %`
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{} %", format_decimal(v * 100.0)),
        None => ABSENT.to_string(),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().rev().enumerate() {
        if idx > 0 && idx % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
