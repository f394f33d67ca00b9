// Parsing and formatting helpers.
//
// Keeps the loose CSV number handling in one place so the loader and the
// report code can work with clean `f64`s.
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64`, forgiving the usual export noise.
///
/// - Trims whitespace and a `$` after an optional sign (`-$5` is `-5`).
/// - Strips thousands separators (`","`).
/// - Rejects values containing letters (so `"n/a"` is `None`, not an error).
/// - Returns `None` for anything that cannot be parsed.
///
/// `"inf"` and `"NaN"` are rejected by the letter rule, but an overflowing
/// literal like `1e999` still parses to infinity; callers check finiteness.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.strip_prefix('+').unwrap_or(s)),
    };
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('$').unwrap_or(rest).trim();
    if rest.is_empty() {
        return None;
    }
    if rest.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    format!("{}{}", sign, rest.replace(',', "")).parse::<f64>().ok()
}

/// Parse a 0..=1 fraction. A trailing `%` means the value is a percentage.
pub fn parse_fraction_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    match s.strip_suffix('%') {
        Some(pct) => parse_f64_safe(Some(pct)).map(|v| v / 100.0),
        None => parse_f64_safe(Some(s)),
    }
}

pub fn parse_i64_safe(s: Option<&str>) -> Option<i64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', "").parse::<i64>().ok()
}

/// Arithmetic mean weighted by `weights`; 0 when the weights sum to zero.
pub fn weighted_average(values: &[f64], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    if total.abs() < f64::EPSILON {
        return 0.0;
    }
    let sum: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    sum / total
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `1,234,567.89` style grouping of the integer part.
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    // A value that rounds to zero prints without a sign.
    let neg = n < 0.0 && s.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Beyond i64 the grouping is dropped rather than printing a wrong value.
    let mut res = match int_part.parse::<i64>() {
        Ok(v) => v.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Money in millions, the way the dashboard cards show it: `$85.0M`.
pub fn format_millions(n: f64) -> String {
    let m = format_number(n / 1e6, 1);
    match m.strip_prefix('-') {
        Some(abs) => format!("-${}M", abs),
        None => format!("${}M", m),
    }
}

/// A 0..=1 fraction as a percentage string: `0.255` -> `25.5%`.
pub fn format_percent(fraction: f64) -> String {
    format!("{}%", format_number(fraction * 100.0, 1))
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
