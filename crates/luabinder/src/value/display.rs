//! Display implementations for tagged values and kinds

use std::fmt;

use super::*;

/// Significant digits in the interpreter's float format (`%.14g`)
const NUMBER_DIGITS: i32 = 14;

/// Render a float the way the interpreter's `tostring` does.
///
/// `%.14g`: 14 significant digits, exponent form when the decimal exponent
/// is below -4 or at least 14, trailing zeros dropped. Results that read
/// like an integer get a `.0` suffix so they stay distinguishable from
/// integers.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        return if n.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Rounded to the target precision first: the exponent after rounding
    // picks the form
    let scientific = format!("{:.*e}", (NUMBER_DIGITS - 1) as usize, n);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    let mut text = if exponent < -4 || exponent >= NUMBER_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_fraction_zeros(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (NUMBER_DIGITS - 1 - exponent) as usize;
        strip_fraction_zeros(&format!("{:.*}", decimals, n)).to_string()
    };

    if text.bytes().all(|b| b == b'-' || b.is_ascii_digit()) {
        text.push_str(".0");
    }
    text
}

fn strip_fraction_zeros(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::FloatingPoint => "float",
            ValueKind::String => "string",
            ValueKind::OpaqueHandle => "userdata",
            ValueKind::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

impl fmt::Display for LuaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LuaValue::Boolean(b) => write!(f, "{}", b),
            LuaValue::Integer(n) => write!(f, "{}", n),
            LuaValue::Number(n) => f.write_str(&format_number(*n)),
            LuaValue::String(s) => f.write_str(s),
            LuaValue::OpaqueHandle(p) => write!(f, "userdata: {:p}", *p),
            LuaValue::Unsupported(ty) => write!(f, "<unsupported {}>", ty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LuaType;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3.0");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_number(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_number(0.0), "0.0");
        assert_eq!(format_number(-0.0), "-0.0");
    }

    #[test]
    fn test_format_number_significant_digits() {
        assert_eq!(format_number(1.0 / 3.0), "0.33333333333333");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(123456.789), "123456.789");
        assert_eq!(format_number(-2.5e-3), "-0.0025");
    }

    #[test]
    fn test_format_number_exponent_form() {
        assert_eq!(format_number(1e15), "1e+15");
        assert_eq!(format_number(1e14), "1e+14");
        assert_eq!(format_number(1e100), "1e+100");
        assert_eq!(format_number(2f64.powi(53)), "9.007199254741e+15");
        assert_eq!(format_number(1.5e-5), "1.5e-05");
        assert_eq!(format_number(99999999999999.9), "1e+14");
        assert_eq!(format_number(12345678901234.0), "12345678901234.0");
    }

    #[test]
    fn test_value_display() {
        assert_eq!(LuaValue::Boolean(true).to_string(), "true");
        assert_eq!(LuaValue::Integer(-4).to_string(), "-4");
        assert_eq!(LuaValue::Number(1.0).to_string(), "1.0");
        assert_eq!(LuaValue::string("hi").to_string(), "hi");
        assert_eq!(
            LuaValue::Unsupported(LuaType::Table).to_string(),
            "<unsupported table>"
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ValueKind::FloatingPoint.to_string(), "float");
        assert_eq!(ValueKind::OpaqueHandle.to_string(), "userdata");
    }
}
