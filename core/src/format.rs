//! Display formatting for dashboard figures.
//!
//! Numbers follow the Indonesian locale used on the plantation side:
//! `.` groups thousands, `,` separates decimals, at most two fraction
//! digits. NaN and infinities never reach the screen as numbers; they
//! render as PLACEHOLDER.

pub const PLACEHOLDER: &str = "—";

pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

pub fn format_rupiah(value: f64) -> String {
    format!("Rp {}", format_number(value))
}

/// `ratio` is a fraction; 0.5 with one digit renders as `50.0%`.
pub fn format_percent(ratio: f64, digits: usize) -> String {
    let pct = ratio * 100.0;
    if !pct.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{pct:.digits$}%")
}

/// A payback period only makes sense when it is finite and positive.
pub fn format_payback(months: f64) -> String {
    if months.is_finite() && months > 0.0 {
        format!("{} months", format_number(months))
    } else {
        PLACEHOLDER.to_string()
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
