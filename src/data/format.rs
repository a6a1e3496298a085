//! Display formatters for column values.
//!
//! Formatters only affect presentation. Export always emits the raw value.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::Value;
use crate::error::TableError;

/// Largest decimal precision `Fixed` renders.
pub const MAX_FIXED_PLACES: usize = 20;

/// A pure function from a raw value to its display text.
#[derive(Clone)]
pub enum Formatter {
    /// `$1,234.50`
    Currency,
    /// `12.5%`
    Percent,
    /// `1,234` (rounded)
    Integer,
    /// Fixed number of decimal places, at most [`MAX_FIXED_PLACES`].
    Fixed(usize),
    /// `1.2K`, `3.4M`
    Compact,
    /// Upper-cased text.
    Uppercase,
    /// Caller-supplied formatter. Must be deterministic and side-effect free.
    Custom(Arc<dyn Fn(&Value) -> String + Send + Sync>),
}

impl Formatter {
    /// Wrap a closure as a formatter.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        Formatter::Custom(Arc::new(f))
    }

    /// Render a value for display.
    ///
    /// Numeric formatters fall back to the raw text for non-numeric values.
    pub fn apply(&self, value: &Value) -> String {
        match self {
            Formatter::Uppercase => value.to_string().to_uppercase(),
            Formatter::Custom(f) => f(value),
            numeric => match value.as_f64() {
                Some(x) => numeric.apply_number(x),
                None => value.to_string(),
            },
        }
    }

    fn apply_number(&self, x: f64) -> String {
        match self {
            Formatter::Currency => {
                let sign = if x < 0.0 { "-" } else { "" };
                format!("{}${}", sign, group_thousands(&format!("{:.2}", x.abs())))
            }
            Formatter::Percent => format!("{}%", x),
            Formatter::Integer => group_thousands(&format!("{:.0}", x)),
            Formatter::Fixed(places) => format!("{:.*}", (*places).min(MAX_FIXED_PLACES), x),
            Formatter::Compact => format_compact(x),
            Formatter::Uppercase | Formatter::Custom(_) => x.to_string(),
        }
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formatter::Currency => f.write_str("Currency"),
            Formatter::Percent => f.write_str("Percent"),
            Formatter::Integer => f.write_str("Integer"),
            Formatter::Fixed(n) => write!(f, "Fixed({})", n),
            Formatter::Compact => f.write_str("Compact"),
            Formatter::Uppercase => f.write_str("Uppercase"),
            Formatter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for Formatter {
    type Err = TableError;

    /// Parse a formatter name as used in dataset documents
    /// (`currency`, `percent`, `integer`, `fixed:2`, `compact`, `uppercase`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        if let Some(places) = name.strip_prefix("fixed:") {
            return match places.parse::<usize>() {
                Ok(n) if n <= MAX_FIXED_PLACES => Ok(Formatter::Fixed(n)),
                _ => Err(TableError::UnknownFormatter(s.to_string())),
            };
        }
        match name.as_str() {
            "currency" => Ok(Formatter::Currency),
            "percent" => Ok(Formatter::Percent),
            "integer" => Ok(Formatter::Integer),
            "compact" => Ok(Formatter::Compact),
            "uppercase" => Ok(Formatter::Uppercase),
            _ => Err(TableError::UnknownFormatter(s.to_string())),
        }
    }
}

/// Insert `,` separators into the integer part of a formatted number.
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Format large numbers with K/M suffixes
fn format_compact(x: f64) -> String {
    let magnitude = x.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.1}M", x / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.1}K", x / 1_000.0)
    } else {
        x.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(Formatter::Currency.apply(&Value::Float(1234.5)), "$1,234.50");
        assert_eq!(Formatter::Currency.apply(&Value::Int(-1_000_000)), "-$1,000,000.00");
        assert_eq!(Formatter::Currency.apply(&Value::Float(0.5)), "$0.50");
    }

    #[test]
    fn test_integer_and_fixed() {
        assert_eq!(Formatter::Integer.apply(&Value::Float(9876543.4)), "9,876,543");
        assert_eq!(Formatter::Integer.apply(&Value::Int(999)), "999");
        assert_eq!(Formatter::Fixed(1).apply(&Value::Float(2.26)), "2.3");
    }

    #[test]
    fn test_compact() {
        assert_eq!(Formatter::Compact.apply(&Value::Int(1500)), "1.5K");
        assert_eq!(Formatter::Compact.apply(&Value::Int(2_500_000)), "2.5M");
        assert_eq!(Formatter::Compact.apply(&Value::Int(12)), "12");
    }

    #[test]
    fn test_numeric_formatter_on_text_falls_back() {
        assert_eq!(Formatter::Currency.apply(&Value::from("n/a")), "n/a");
    }

    #[test]
    fn test_percent_and_custom() {
        assert_eq!(Formatter::Percent.apply(&Value::Float(12.5)), "12.5%");
        let shout = Formatter::custom(|v| format!("{}!", v));
        assert_eq!(shout.apply(&Value::from("open")), "open!");
    }

    #[test]
    fn test_parse_names() {
        assert!(matches!("currency".parse::<Formatter>(), Ok(Formatter::Currency)));
        assert!(matches!("Fixed:3".parse::<Formatter>(), Ok(Formatter::Fixed(3))));
        assert!(matches!(
            "money".parse::<Formatter>(),
            Err(TableError::UnknownFormatter(_))
        ));
        assert!("fixed:x".parse::<Formatter>().is_err());
        assert!(matches!("fixed:20".parse::<Formatter>(), Ok(Formatter::Fixed(20))));
        assert!(matches!(
            "fixed:70000".parse::<Formatter>(),
            Err(TableError::UnknownFormatter(_))
        ));
    }

    #[test]
    fn test_fixed_precision_is_capped() {
        let text = Formatter::Fixed(70_000).apply(&Value::Float(1.5));
        assert_eq!(text, format!("1.5{}", "0".repeat(MAX_FIXED_PLACES - 1)));
    }
}
