//! Fixed-point amount rendering used in repayment words and XML replies.

/// Renders an amount with exactly two decimal places (`100000` -> `"100000.00"`).
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}
