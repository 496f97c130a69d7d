//! Primitive converters.

use uuid::Uuid;

use super::ValueParser;
use crate::value::Value;

/// Exact `"true"` / `"false"`; anything else (including `"TRUE"`) fails.
pub fn parse_bool(raw: &str) -> Option<Value> {
    match raw {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        _ => None,
    }
}

/// Exactly one character.
pub fn parse_char(raw: &str) -> Option<Value> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(Value::Char(c)),
        _ => None,
    }
}

/// Hyphenated 8-4-4-4-12 UUIDs only; simple, braced and URN forms fail.
pub fn parse_uuid(raw: &str) -> Option<Value> {
    const HYPHENS: [usize; 4] = [8, 13, 18, 23];

    let bytes = raw.as_bytes();
    if bytes.len() != 36 {
        return None;
    }
    let well_formed = bytes.iter().enumerate().all(|(i, b)| {
        if HYPHENS.contains(&i) {
            *b == b'-'
        } else {
            b.is_ascii_hexdigit()
        }
    });
    if !well_formed {
        return None;
    }
    Uuid::parse_str(raw).ok().map(Value::Uuid)
}

/// Raw text; never fails.
pub fn parse_text(raw: &str) -> Option<Value> {
    Some(Value::Text(raw.to_string()))
}

/// Numeric width accepted by a [`NumberParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    /// 16-bit signed integer.
    Short,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
}

impl NumberKind {
    fn is_integral(self) -> bool {
        matches!(self, Self::Short | Self::Integer | Self::Long)
    }
}

/// Numeric converter with an optional clamping range.
///
/// Without a range, values are never clamped: an out-of-width integer
/// (`"40000"` for `short`) fails instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberParser {
    kind: NumberKind,
    range: Option<(f64, f64)>,
}

impl NumberParser {
    /// Converter for `kind` without clamping.
    pub fn new(kind: NumberKind) -> Self {
        Self { kind, range: None }
    }

    /// Clamp converted values into `min..=max`.
    ///
    /// A NaN bound leaves the converter unclamped. Infinite bounds are open ends.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        if min.is_nan() || max.is_nan() {
            self.range = None;
            return self;
        }
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.range = Some((lo, hi));
        self
    }

    /// The numeric width.
    pub fn kind(&self) -> NumberKind {
        self.kind
    }

    fn parse_integral(&self, raw: &str) -> Option<i64> {
        match self.kind {
            NumberKind::Short => raw.parse::<i16>().ok().map(i64::from),
            NumberKind::Integer => raw.parse::<i32>().ok().map(i64::from),
            _ => raw.parse::<i64>().ok(),
        }
    }

    fn parse_floating(&self, raw: &str) -> Option<f64> {
        let value = match self.kind {
            NumberKind::Float => raw.parse::<f32>().ok().map(f64::from)?,
            _ => raw.parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl ValueParser for NumberParser {
    fn parse(&self, raw: &str) -> Option<Value> {
        let raw = raw.trim();
        if self.kind.is_integral() {
            let mut value = self.parse_integral(raw)?;
            if let Some((lo, hi)) = self.range {
                let (lo, hi) = (lo.ceil() as i64, hi.floor() as i64);
                if lo <= hi {
                    value = value.clamp(lo, hi);
                }
            }
            Some(Value::Int(value))
        } else {
            let mut value = self.parse_floating(raw)?;
            if let Some((lo, hi)) = self.range {
                value = value.clamp(lo, hi);
            }
            Some(Value::Float(value))
        }
    }
}

/// Case-sensitive match against a fixed set of constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumParser {
    constants: Vec<String>,
}

impl EnumParser {
    /// Converter accepting exactly the given constants.
    pub fn new<I, S>(constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    /// Accepted constants, in declaration order.
    pub fn constants(&self) -> &[String] {
        &self.constants
    }
}

impl ValueParser for EnumParser {
    fn parse(&self, raw: &str) -> Option<Value> {
        self.constants
            .iter()
            .find(|c| c.as_str() == raw)
            .map(|c| Value::Enum(c.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_is_exact() {
        assert_eq!(parse_bool("true"), Some(Value::Bool(true)));
        assert_eq!(parse_bool("false"), Some(Value::Bool(false)));
        assert_eq!(parse_bool("True"), None);
        assert_eq!(parse_bool("1"), None);
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn test_char_requires_single_character() {
        assert_eq!(parse_char("x"), Some(Value::Char('x')));
        assert_eq!(parse_char("é"), Some(Value::Char('é')));
        assert_eq!(parse_char(""), None);
        assert_eq!(parse_char("xy"), None);
    }

    #[test]
    fn test_uuid_is_strict() {
        let raw = "123e4567-e89b-12d3-a456-426614174000";
        assert!(matches!(parse_uuid(raw), Some(Value::Uuid(_))));
        assert_eq!(parse_uuid("123e4567e89b12d3a456426614174000"), None);
        assert_eq!(parse_uuid("{123e4567-e89b-12d3-a456-426614174000}"), None);
        assert_eq!(parse_uuid("urn:uuid:123e4567-e89b-12d3-a456-426614174000"), None);
        assert_eq!(parse_uuid("123e4567-e89b-12d3-a456-42661417400g"), None);
    }

    #[test]
    fn test_integer_widths() {
        let short = NumberParser::new(NumberKind::Short);
        assert_eq!(short.parse("-32768"), Some(Value::Int(-32768)));
        assert_eq!(short.parse("40000"), None);

        let int = NumberParser::new(NumberKind::Integer);
        assert_eq!(int.parse("42"), Some(Value::Int(42)));
        assert_eq!(int.parse("3000000000"), None);
        assert_eq!(int.parse("4.5"), None);

        let long = NumberParser::new(NumberKind::Long);
        assert_eq!(long.parse("3000000000"), Some(Value::Int(3_000_000_000)));
    }

    #[test]
    fn test_floats_reject_non_finite() {
        let double = NumberParser::new(NumberKind::Double);
        assert_eq!(double.parse("2.5"), Some(Value::Float(2.5)));
        assert_eq!(double.parse("NaN"), None);
        assert_eq!(double.parse("inf"), None);

        let float = NumberParser::new(NumberKind::Float);
        assert_eq!(float.parse("1e39"), None);
    }

    #[test]
    fn test_range_clamps_instead_of_failing() {
        let percent = NumberParser::new(NumberKind::Integer).with_range(0.0, 100.0);
        assert_eq!(percent.parse("150"), Some(Value::Int(100)));
        assert_eq!(percent.parse("-3"), Some(Value::Int(0)));
        assert_eq!(percent.parse("abc"), None);

        let speed = NumberParser::new(NumberKind::Double).with_range(10.0, 0.5);
        assert_eq!(speed.parse("20"), Some(Value::Float(10.0)));
    }

    #[test]
    fn test_nan_bound_disables_clamping() {
        let ratio = NumberParser::new(NumberKind::Double).with_range(f64::NAN, 1.0);
        assert_eq!(ratio.parse("0.5"), Some(Value::Float(0.5)));
        assert_eq!(ratio.parse("7.25"), Some(Value::Float(7.25)));

        let count = NumberParser::new(NumberKind::Integer).with_range(0.0, f64::NAN);
        assert_eq!(count.parse("-40"), Some(Value::Int(-40)));
    }

    #[test]
    fn test_infinite_bound_is_open_ended() {
        let positive = NumberParser::new(NumberKind::Long).with_range(0.0, f64::INFINITY);
        assert_eq!(positive.parse("-9"), Some(Value::Int(0)));
        assert_eq!(positive.parse("123456789012"), Some(Value::Int(123_456_789_012)));

        let below = NumberParser::new(NumberKind::Double).with_range(f64::NEG_INFINITY, 2.5);
        assert_eq!(below.parse("-1e300"), Some(Value::Float(-1e300)));
        assert_eq!(below.parse("3"), Some(Value::Float(2.5)));
    }

    #[test]
    fn test_enum_is_case_sensitive() {
        let mode = EnumParser::new(["SURVIVAL", "CREATIVE"]);
        assert_eq!(mode.parse("CREATIVE"), Some(Value::Enum("CREATIVE".into())));
        assert_eq!(mode.parse("creative"), None);
        assert_eq!(mode.constants().len(), 2);
    }
}
