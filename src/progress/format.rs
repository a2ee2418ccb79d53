// src/progress/format.rs

const DAYS_PER_YEAR: f64 = 365.0;
const HOURS_PER_YEAR: f64 = 365.0 * 24.0;

/// Render a model age (in years) with a unit that keeps it readable.
///
/// | age (yr)            | output                   |
/// |---------------------|--------------------------|
/// | `< 1/365`           | hours, 4 decimals        |
/// | `1/365 ..< 1`       | days, 4 decimals         |
/// | `1 ..< 1000`        | years, 3 decimals        |
/// | `>= 1000`           | years, `1.234e+05` style |
pub fn format_age(age: f64) -> String {
    if age < 1.0 / DAYS_PER_YEAR {
        format!("Age: {:.4} hours", age * HOURS_PER_YEAR)
    } else if age < 1.0 {
        format!("Age: {:.4} days", age * DAYS_PER_YEAR)
    } else if age < 1000.0 {
        format!("Age: {age:.3} years")
    } else {
        format!("Age: {} years", scientific(age, 3))
    }
}

/// `{:.Ne}` with a signed, two-digit exponent (`1.234e+05`), which is how
/// MESA and most other tools print it.
fn scientific(value: f64, precision: usize) -> String {
    let raw = format!("{value:.precision$e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            Err(_) => raw,
        },
        None => raw,
    }
}
