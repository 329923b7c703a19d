//! Number formatting for metric values and axis ticks.
//!
//! Dashboard configurations carry d3-format specifiers (`"$.2s"`, `".2%"`, `",.0f"`), so this
//! module implements that mini-language:
//!
//! ```text
//! [[fill]align][sign][symbol][0][width][,][.precision][~][type]
//! ```
//!
//! Supported types: `e f g r s % p d n` and the empty type. Negative numbers use the
//! typographic minus (`−`) like d3 does.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const MINUS: &str = "\u{2212}";
const CURRENCY_PREFIX: &str = "$";
const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "\u{b5}", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid format specifier `{0}`")]
    Invalid(String),
    #[error("unsupported format type `{kind}` in `{spec}`")]
    UnsupportedType { spec: String, kind: char },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    AfterSign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Minus,
    Plus,
    Paren,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Exponent,
    Fixed,
    General,
    Rounded,
    SiPrefix,
    Percent,
    PercentRounded,
    Decimal,
}

/// A parsed, reusable number formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberFormat {
    spec: String,
    fill: char,
    align: Align,
    sign: Sign,
    currency: bool,
    zero: bool,
    width: Option<usize>,
    comma: bool,
    precision: usize,
    trim: bool,
    kind: Kind,
}

impl NumberFormat {
    pub fn parse(spec: &str) -> Result<Self, FormatError> {
        let invalid = || FormatError::Invalid(spec.to_string());
        let chars: Vec<char> = spec.chars().collect();
        let mut i = 0;

        let align_of = |c: char| match c {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            '=' => Some(Align::AfterSign),
            _ => None,
        };

        let mut fill = ' ';
        let mut align = Align::Right;
        if chars.len() >= 2 && align_of(chars[1]).is_some() {
            fill = chars[0];
            align = align_of(chars[1]).ok_or_else(invalid)?;
            i = 2;
        } else if let Some(a) = chars.first().copied().and_then(align_of) {
            align = a;
            i = 1;
        }

        let sign = match chars.get(i) {
            Some('-') => Some(Sign::Minus),
            Some('+') => Some(Sign::Plus),
            Some('(') => Some(Sign::Paren),
            Some(' ') => Some(Sign::Space),
            _ => None,
        };
        if sign.is_some() {
            i += 1;
        }
        let sign = sign.unwrap_or(Sign::Minus);

        let mut currency = false;
        match chars.get(i) {
            Some('$') => {
                currency = true;
                i += 1;
            }
            // `#` only changes output for binary/octal/hex, which are not supported.
            Some('#') => i += 1,
            _ => {}
        }

        let mut zero = false;
        if chars.get(i) == Some(&'0') {
            zero = true;
            i += 1;
        }

        let width_start = i;
        while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
            i += 1;
        }
        let width = if i > width_start {
            Some(
                chars[width_start..i]
                    .iter()
                    .collect::<String>()
                    .parse::<usize>()
                    .map_err(|_| invalid())?,
            )
        } else {
            None
        };

        let mut comma = false;
        if chars.get(i) == Some(&',') {
            comma = true;
            i += 1;
        }

        let mut precision = None;
        if chars.get(i) == Some(&'.') {
            i += 1;
            let start = i;
            while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
                i += 1;
            }
            if i == start {
                return Err(invalid());
            }
            precision = Some(
                chars[start..i]
                    .iter()
                    .collect::<String>()
                    .parse::<usize>()
                    .map_err(|_| invalid())?,
            );
        }

        let mut trim = false;
        if chars.get(i) == Some(&'~') {
            trim = true;
            i += 1;
        }

        let type_char = chars.get(i).copied();
        if type_char.is_some() {
            i += 1;
        }
        if i != chars.len() {
            return Err(invalid());
        }

        let kind = match type_char {
            Some('e') => Kind::Exponent,
            Some('f') => Kind::Fixed,
            Some('g') => Kind::General,
            Some('r') => Kind::Rounded,
            Some('s') => Kind::SiPrefix,
            Some('%') => Kind::Percent,
            Some('p') => Kind::PercentRounded,
            Some('d') => Kind::Decimal,
            Some('n') => {
                comma = true;
                Kind::General
            }
            None => {
                precision.get_or_insert(12);
                trim = true;
                Kind::General
            }
            Some(kind) if kind.is_ascii_alphabetic() => {
                return Err(FormatError::UnsupportedType {
                    spec: spec.to_string(),
                    kind,
                })
            }
            Some(_) => return Err(invalid()),
        };

        if zero || (fill == '0' && align == Align::AfterSign) {
            zero = true;
            fill = '0';
            align = Align::AfterSign;
        }

        let precision = match (precision, kind) {
            (None, _) => 6,
            (Some(p), Kind::General | Kind::Rounded | Kind::SiPrefix | Kind::PercentRounded) => {
                p.clamp(1, 21)
            }
            (Some(p), _) => p.min(20),
        };

        Ok(Self {
            spec: spec.to_string(),
            fill,
            align,
            sign,
            currency,
            zero,
            width,
            comma,
            precision,
            trim,
            kind,
        })
    }

    pub fn spec(&self) -> &str {
        &self.spec
    }

    pub fn format(&self, value: f64) -> String {
        let mut negative = value < 0.0 || (value == 0.0 && value.is_sign_negative());
        let (mut digits, si_exponent) = if value.is_nan() {
            ("NaN".to_string(), None)
        } else {
            self.format_magnitude(value.abs())
        };

        if self.trim {
            digits = trim_insignificant(&digits);
        }

        if negative && self.sign != Sign::Plus && digits.parse::<f64>().is_ok_and(|v| v == 0.0) {
            negative = false;
        }

        let mut prefix = String::new();
        if negative {
            prefix.push_str(if self.sign == Sign::Paren { "(" } else { MINUS });
        } else {
            match self.sign {
                Sign::Plus => prefix.push('+'),
                Sign::Space => prefix.push(' '),
                Sign::Minus | Sign::Paren => {}
            }
        }
        if self.currency {
            prefix.push_str(CURRENCY_PREFIX);
        }

        let mut suffix = String::new();
        if let Some(exponent) = si_exponent {
            suffix.push_str(SI_PREFIXES[(8 + exponent / 3) as usize]);
        }
        if matches!(self.kind, Kind::Percent | Kind::PercentRounded) {
            suffix.push('%');
        }
        if negative && self.sign == Sign::Paren {
            suffix.push(')');
        }

        // Only the leading integer digits take part in grouping and zero padding.
        let mut body = digits;
        if let Some(split) = body.find(|c: char| !c.is_ascii_digit()) {
            let tail = body.split_off(split);
            suffix.insert_str(0, &tail);
        }

        if self.comma && !self.zero {
            body = group_thousands(&body, None);
        }

        let length = prefix.chars().count() + body.chars().count() + suffix.chars().count();
        let mut padding: String = match self.width {
            Some(width) if length < width => {
                std::iter::repeat(self.fill).take(width - length).collect()
            }
            _ => String::new(),
        };

        if self.comma && self.zero {
            let limit = if padding.is_empty() {
                None
            } else {
                self.width
                    .map(|width| width.saturating_sub(suffix.chars().count()))
            };
            body = group_thousands(&format!("{padding}{body}"), limit);
            padding.clear();
        }

        match self.align {
            Align::Left => format!("{prefix}{body}{suffix}{padding}"),
            Align::AfterSign => format!("{prefix}{padding}{body}{suffix}"),
            Align::Center => {
                let half = padding.chars().count() / 2;
                let left: String = padding.chars().take(half).collect();
                let right: String = padding.chars().skip(half).collect();
                format!("{left}{prefix}{body}{suffix}{right}")
            }
            Align::Right => format!("{padding}{prefix}{body}{suffix}"),
        }
    }

    fn format_magnitude(&self, x: f64) -> (String, Option<i32>) {
        let p = self.precision;
        match self.kind {
            Kind::Exponent => (to_exponential(x, Some(p)), None),
            Kind::Fixed => (format!("{x:.p$}"), None),
            Kind::General => (to_precision(x, p), None),
            Kind::Rounded => (format_rounded(x, p), None),
            Kind::SiPrefix => {
                let (digits, exponent) = format_prefix_auto(x, p);
                (digits, Some(exponent))
            }
            Kind::Percent => (format!("{:.p$}", x * 100.0), None),
            Kind::PercentRounded => (format_rounded(x * 100.0, p), None),
            Kind::Decimal => (format!("{:.0}", x.round()), None),
        }
    }
}

impl FromStr for NumberFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}

/// Parse `spec`, falling back to `fallback` (which must be valid) when the host sends garbage.
pub fn resolve(spec: &str, fallback: &str) -> NumberFormat {
    match NumberFormat::parse(spec) {
        Ok(format) => format,
        Err(err) => {
            tracing::warn!(%err, fallback, "falling back to default number format");
            NumberFormat::parse(fallback).unwrap_or_else(|_| general_format())
        }
    }
}

fn general_format() -> NumberFormat {
    NumberFormat {
        spec: String::new(),
        fill: ' ',
        align: Align::Right,
        sign: Sign::Minus,
        currency: false,
        zero: false,
        width: None,
        comma: false,
        precision: 12,
        trim: true,
        kind: Kind::General,
    }
}

/// Scientific notation with a signed exponent (`1.20e+2`). `None` means shortest round-trip digits.
fn to_exponential(x: f64, fraction_digits: Option<usize>) -> String {
    let raw = match fraction_digits {
        Some(p) => format!("{x:.p$e}"),
        None => format!("{x:e}"),
    };
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{}", exponent.abs())
        }
        None => raw,
    }
}

/// Significant digits (without the decimal point) and decimal exponent of `x` at `p` digits.
fn decimal_parts(x: f64, p: usize) -> (String, i32) {
    let raw = if p == 0 {
        format!("{x:e}")
    } else {
        let digits = p - 1;
        format!("{x:.digits$e}")
    };
    let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let coefficient: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    (coefficient, exponent.parse().unwrap_or(0))
}

fn to_precision(x: f64, p: usize) -> String {
    let (_, exponent) = decimal_parts(x, p);
    if exponent < -6 || exponent >= p as i32 {
        to_exponential(x, Some(p - 1))
    } else {
        let decimals = (p as i32 - 1 - exponent).max(0) as usize;
        format!("{x:.decimals$}")
    }
}

fn format_rounded(x: f64, p: usize) -> String {
    let (coefficient, exponent) = decimal_parts(x, p);
    if exponent < 0 {
        format!("0.{}{coefficient}", "0".repeat((-exponent - 1) as usize))
    } else {
        let split = exponent as usize + 1;
        if coefficient.len() > split {
            format!("{}.{}", &coefficient[..split], &coefficient[split..])
        } else {
            format!("{coefficient}{}", "0".repeat(split - coefficient.len()))
        }
    }
}

/// SI-prefixed digits. Returns the digits and the prefix exponent (a multiple of 3).
fn format_prefix_auto(x: f64, p: usize) -> (String, i32) {
    let (coefficient, exponent) = decimal_parts(x, p);
    let prefix_exponent = (exponent as f64 / 3.0).floor().clamp(-8.0, 8.0) as i32 * 3;
    let i = exponent - prefix_exponent + 1;
    let n = coefficient.len() as i32;

    let digits = if i == n {
        coefficient
    } else if i > n {
        format!("{coefficient}{}", "0".repeat((i - n) as usize))
    } else if i > 0 {
        let split = i as usize;
        format!("{}.{}", &coefficient[..split], &coefficient[split..])
    } else {
        let rest = (p as i32 + i - 1).max(0) as usize;
        format!("0.{}{}", "0".repeat((-i) as usize), decimal_parts(x, rest).0)
    };
    (digits, prefix_exponent)
}

/// Drop trailing fractional zeros (`1.500` → `1.5`, `2.0` → `2`).
fn trim_insignificant(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut start: isize = -1;
    let mut end: isize = -1;
    for (idx, &ch) in chars.iter().enumerate().skip(1) {
        let idx = idx as isize;
        match ch {
            '.' => {
                start = idx;
                end = idx;
            }
            '0' => {
                if start == 0 {
                    start = idx;
                }
                end = idx;
            }
            c if c.is_ascii_digit() => {
                if start > 0 {
                    start = 0;
                }
            }
            _ => break,
        }
    }
    if start > 0 {
        let head: String = chars[..start as usize].iter().collect();
        let tail: String = chars[(end + 1) as usize..].iter().collect();
        format!("{head}{tail}")
    } else {
        s.to_string()
    }
}

/// Insert `,` every three digits from the right, optionally stopping once `width` is reached.
fn group_thousands(digits: &str, width: Option<usize>) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let width = width.unwrap_or(usize::MAX);
    let mut groups: Vec<String> = Vec::new();
    let mut end = chars.len();
    let mut length = 0usize;
    let mut group = 3usize;

    while end > 0 && group > 0 {
        if length.saturating_add(group + 1) > width {
            group = width.saturating_sub(length).max(1);
        }
        let start = end.saturating_sub(group);
        groups.push(chars[start..end].iter().collect());
        end = start;
        length = length.saturating_add(group + 1);
        if length > width {
            break;
        }
        group = 3;
    }

    groups.reverse();
    groups.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(spec: &str, value: f64) -> String {
        NumberFormat::parse(spec).unwrap().format(value)
    }

    #[test]
    fn si_prefix_with_currency() {
        assert_eq!(fmt("$.2s", 1234.0), "$1.2k");
        assert_eq!(fmt("$.2s", 1_500_000.0), "$1.5M");
        assert_eq!(fmt("$.2s", 120.0), "$120");
        assert_eq!(fmt("$.2s", 0.0), "$0.0");
        assert_eq!(fmt("$.2s", -2500.0), "\u{2212}$2.5k");
    }

    #[test]
    fn si_prefix_covers_small_magnitudes() {
        assert_eq!(fmt(".2s", 0.0012), "1.2m");
        assert_eq!(fmt(".2s", 0.0000034), "3.4\u{b5}");
        assert_eq!(fmt(".2s", 0.0000000056), "5.6n");
        assert_eq!(fmt(".2s", 7.2e9), "7.2G");
    }

    #[test]
    fn percent_uses_fixed_decimals() {
        assert_eq!(fmt(".2%", 0.2), "20.00%");
        assert_eq!(fmt(".2%", -0.05), "\u{2212}5.00%");
        assert_eq!(fmt(".0%", 0.123), "12%");
    }

    #[test]
    fn grouping_and_fixed() {
        assert_eq!(fmt(",.0f", 1_234_567.0), "1,234,567");
        assert_eq!(fmt(",.2f", 1234.5), "1,234.50");
        assert_eq!(fmt(".1f", 3.14159), "3.1");
    }

    #[test]
    fn exponent_and_rounded() {
        assert_eq!(fmt(".2e", 123.0), "1.23e+2");
        assert_eq!(fmt(".2r", 0.012345), "0.012");
        assert_eq!(fmt(".3r", 12345.0), "12300");
    }

    #[test]
    fn empty_type_trims_like_general() {
        assert_eq!(fmt("", 1.5), "1.5");
        assert_eq!(fmt("", 42.0), "42");
        assert_eq!(fmt(".3~g", 2.0), "2");
    }

    #[test]
    fn width_fill_and_sign() {
        assert_eq!(fmt("+d", 5.0), "+5");
        assert_eq!(fmt("08.2f", -3.5), "\u{2212}0003.50");
        assert_eq!(fmt("*^9d", 42.0), "***42****");
        assert_eq!(fmt("(.1f", -2.0), "(2.0)");
    }

    #[test]
    fn negative_zero_after_rounding_drops_sign() {
        assert_eq!(fmt(".1f", -0.01), "0.0");
    }

    #[test]
    fn rejects_malformed_specifiers() {
        assert!(matches!(
            NumberFormat::parse(".f"),
            Err(FormatError::Invalid(_))
        ));
        assert!(matches!(
            NumberFormat::parse(".2q"),
            Err(FormatError::UnsupportedType { kind: 'q', .. })
        ));
        assert!(NumberFormat::parse("$.2s extra").is_err());
    }

    #[test]
    fn resolve_falls_back_on_garbage() {
        let format = resolve("not a format", ".2%");
        assert_eq!(format.spec(), ".2%");
        assert_eq!(format.format(0.5), "50.00%");
    }
}
