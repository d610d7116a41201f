use std::fmt;

/// Renders a number with a fixed count of significant digits, picking
/// between fixed and exponent notation like C's `%g`.
#[derive(Debug, Clone, Copy)]
pub struct Significant {
    value: f64,
    digits: usize,
}

impl Significant {
    pub fn new(value: f64, digits: usize) -> Self {
        Self {
            value,
            digits: digits.max(1),
        }
    }
}

/// Counts are printed with ten significant digits.
pub fn count(value: u64) -> Significant {
    Significant::new(value as f64, 10)
}

/// Log probabilities are printed with three significant digits.
pub fn log(value: f64) -> Significant {
    Significant::new(value, 3)
}

impl fmt::Display for Significant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = self.value;
        if value.is_nan() {
            return f.write_str("nan");
        }
        if value.is_infinite() {
            return f.write_str(if value < 0.0 { "-inf" } else { "inf" });
        }
        if value == 0.0 {
            return f.write_str(if value.is_sign_negative() { "-0" } else { "0" });
        }

        let precision = self.digits - 1;
        let scientific = format!("{value:.precision$e}");
        let (mantissa, exponent) = scientific
            .split_once('e')
            .ok_or(fmt::Error)?;
        let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;

        if exponent < -4 || exponent >= self.digits as i32 {
            let sign = if exponent < 0 { '-' } else { '+' };
            write!(
                f,
                "{}e{}{:02}",
                trim_fraction(mantissa),
                sign,
                exponent.unsigned_abs()
            )
        } else {
            let decimals = (self.digits as i32 - 1 - exponent) as usize;
            let fixed = format!("{value:.decimals$}");
            f.write_str(trim_fraction(&fixed))
        }
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
