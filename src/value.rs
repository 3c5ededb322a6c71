use std::fmt;

use chrono::{DateTime, Utc};

/// A runtime value produced by evaluation or supplied as a parameter.
///
/// All numbers are floating point; bitwise operators work on the truncated
/// integer value.
///
/// # Examples
///
/// ```
/// use exprql::Value;
///
/// let null = Value::Null;
/// let boolean = Value::Boolean(true);
/// let number = Value::Float(3.5);
/// let string = Value::String("hello".to_string());
/// let array = Value::Array(vec![Value::Float(1.0), Value::Float(2.0)]);
///
/// assert_eq!(number.to_string(), "3.5");
/// assert_eq!(array.to_string(), "[1 2]");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Float(f64),
    String(String),
    Time(DateTime<Utc>),
    Array(Vec<Value>),
}

impl Value {
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Human-readable type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::Time(_) => "time",
            Value::Array(_) => "array",
        }
    }

    /// Source text that lexes back into a single literal equal to this value.
    ///
    /// Values with no literal syntax (null, arrays, non-finite numbers) return
    /// `None`.
    pub fn literal_text(&self) -> Option<String> {
        match self {
            Value::Boolean(b) => Some(b.to_string()),
            Value::Float(n) if n.is_finite() => Some(format_general(*n)),
            Value::Float(_) => None,
            Value::String(s) => {
                let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
                Some(format!("\"{}\"", escaped))
            }
            Value::Time(t) => Some(format!("\"{}\"", t.to_rfc3339())),
            Value::Null | Value::Array(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Float(n) => f.write_str(&format_general(*n)),
            Value::String(s) => f.write_str(s),
            Value::Time(t) => f.write_str(&t.to_rfc3339()),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// Formats a number in the compact general form: the shortest digits that
/// round-trip, switching to `d.ddde±XX` when the decimal exponent is below -4
/// or at least 6.
pub fn format_general(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    let scientific = format!("{:e}", n);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return n.to_string();
    };
    let exponent: i32 = match exponent.parse() {
        Ok(e) => e,
        Err(_) => return n.to_string(),
    };

    if n != 0.0 && (exponent < -4 || exponent >= 6) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_general_plain() {
        assert_eq!(format_general(5.0), "5");
        assert_eq!(format_general(-3.0), "-3");
        assert_eq!(format_general(2.5), "2.5");
        assert_eq!(format_general(100000.0), "100000");
        assert_eq!(format_general(0.0001), "0.0001");
        assert_eq!(format_general(0.0), "0");
    }

    #[test]
    fn test_format_general_scientific() {
        assert_eq!(format_general(1000000.0), "1e+06");
        assert_eq!(format_general(1234567.0), "1.234567e+06");
        assert_eq!(format_general(0.00001), "1e-05");
        assert_eq!(format_general(-2.5e-10), "-2.5e-10");
        assert_eq!(format_general(1e100), "1e+100");
    }

    #[test]
    fn test_format_general_non_finite() {
        assert_eq!(format_general(f64::INFINITY), "+Inf");
        assert_eq!(format_general(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_general(f64::NAN), "NaN");
    }

    #[test]
    fn test_literal_text() {
        assert_eq!(Value::Float(5.0).literal_text().as_deref(), Some("5"));
        assert_eq!(Value::Boolean(false).literal_text().as_deref(), Some("false"));
        assert_eq!(
            Value::String("say \"hi\"".into()).literal_text().as_deref(),
            Some("\"say \\\"hi\\\"\"")
        );
        assert_eq!(Value::Null.literal_text(), None);
        assert_eq!(Value::Array(vec![]).literal_text(), None);
        assert_eq!(Value::Float(f64::INFINITY).literal_text(), None);
    }
}
