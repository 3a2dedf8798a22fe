use std::borrow::Cow;

use crate::Value;

/// The closed catalog of built-in validators.
///
/// A validator is a predicate with a test-and-return contract: on success
/// [`check`](Validator::check) hands back the (possibly normalized) value so
/// callers get the usable result directly; on failure it returns `None`.
/// Failing validation is a normal, recoverable outcome — never an error.
///
/// Validators apply to scalars only. A container node always fails, even
/// when every element inside it would pass.
///
/// # Examples
///
/// ```
/// use input_cage::{Validator, Value};
///
/// assert_eq!(Validator::Alnum.check(&Value::from("0")), Some(Value::from("0")));
/// assert_eq!(Validator::Alpha.check(&Value::from("efoihr123-")), None);
/// assert_eq!(Validator::LessThan(25.0).check(&Value::from("0")), Some(Value::from("0")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    /// Non-empty, ASCII letters only.
    Alpha,
    /// Non-empty, ASCII letters and digits only.
    Alnum,
    /// Non-empty, ASCII digits only.
    Digits,
    /// Non-empty, ASCII hex digits only.
    Hex,
    /// Parses fully as a signed integer.
    Int,
    /// Parses fully as a finite number.
    Float,
    /// Numeric and strictly greater than the bound.
    GreaterThan(f64),
    /// Numeric and strictly less than the bound.
    LessThan(f64),
    /// Numeric and within the inclusive range.
    Between {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// `local@domain` with a dotted, well-formed domain.
    Email,
    /// Dot-separated alphanumeric/hyphen labels.
    Hostname,
    /// IPv4 or IPv6 address (via `std::net::IpAddr`).
    Ip,
    /// `scheme://rest` with a well-formed scheme and no whitespace.
    Uri,
    /// US ZIP code, 5 digits or 5+4.
    Zip,
    /// NANP phone number; normalizes to the bare ten-digit string.
    Phone,
    /// Credit-card number passing the Luhn checksum after stripping spaces
    /// and dashes; normalizes to the bare digit string.
    Ccnum,
    /// `YYYY-MM-DD` naming a real calendar date.
    Date,
    /// Membership in a fixed set of strings.
    OneOf(Vec<String>),
    /// Full regular-expression match support (the `regex` crate). An
    /// unparsable pattern fails the check rather than erroring.
    Regex(String),
}

/// Why an accessor name failed to resolve into a validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NameError {
    /// No validator in the catalog has this name.
    Unknown,
    /// The name matched, but the arguments could not be decoded.
    BadArguments,
}

impl Validator {
    /// Resolves an operation name plus dispatch arguments from the catalog.
    ///
    /// Matching is case-insensitive, ignores underscores, and tolerates the
    /// accessor-style `test` prefix. Parameterized validators decode their
    /// arguments from `args`: numeric bounds for `greaterThan` / `lessThan`
    /// / `between`, strings for `oneOf`, a pattern string for `regex`.
    pub(crate) fn from_name(name: &str, args: &[Value]) -> Result<Validator, NameError> {
        let mut norm: String = name
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if let Some(rest) = norm.strip_prefix("test") {
            norm = rest.to_string();
        }
        let validator = match norm.as_str() {
            "alpha" => Validator::Alpha,
            "alnum" => Validator::Alnum,
            "digits" => Validator::Digits,
            "hex" => Validator::Hex,
            "int" => Validator::Int,
            "float" => Validator::Float,
            "greaterthan" => Validator::GreaterThan(num_arg(args, 0)?),
            "lessthan" => Validator::LessThan(num_arg(args, 0)?),
            "between" => Validator::Between {
                min: num_arg(args, 0)?,
                max: num_arg(args, 1)?,
            },
            "email" => Validator::Email,
            "hostname" => Validator::Hostname,
            "ip" => Validator::Ip,
            "uri" => Validator::Uri,
            "zip" => Validator::Zip,
            "phone" => Validator::Phone,
            "ccnum" => Validator::Ccnum,
            "date" => Validator::Date,
            "oneof" => Validator::OneOf(str_args(args)?),
            "regex" => Validator::Regex(str_arg(args, 0)?),
            _ => return Err(NameError::Unknown),
        };
        Ok(validator)
    }

    /// Tests a node, returning the normalized value on success.
    pub fn check(&self, value: &Value) -> Option<Value> {
        let text = value.scalar_text()?;
        match self {
            Validator::Alpha => class_check(&text, |c| c.is_ascii_alphabetic())
                .then(|| value.clone()),
            Validator::Alnum => class_check(&text, |c| c.is_ascii_alphanumeric())
                .then(|| value.clone()),
            Validator::Digits => {
                class_check(&text, |c| c.is_ascii_digit()).then(|| value.clone())
            }
            Validator::Hex => {
                class_check(&text, |c| c.is_ascii_hexdigit()).then(|| value.clone())
            }
            Validator::Int => text.parse::<i64>().ok().map(|_| value.clone()),
            Validator::Float => parse_number(&text).map(|_| value.clone()),
            Validator::GreaterThan(bound) => {
                (parse_number(&text)? > *bound).then(|| value.clone())
            }
            Validator::LessThan(bound) => {
                (parse_number(&text)? < *bound).then(|| value.clone())
            }
            Validator::Between { min, max } => {
                let n = parse_number(&text)?;
                (n >= *min && n <= *max).then(|| value.clone())
            }
            Validator::Email => is_email(&text).then(|| value.clone()),
            Validator::Hostname => is_hostname(&text).then(|| value.clone()),
            Validator::Ip => text
                .parse::<std::net::IpAddr>()
                .ok()
                .map(|_| value.clone()),
            Validator::Uri => is_uri(&text).then(|| value.clone()),
            Validator::Zip => is_zip(&text).then(|| value.clone()),
            Validator::Phone => normalize_phone(&text).map(Value::Str),
            Validator::Ccnum => normalize_ccnum(&text).map(Value::Str),
            Validator::Date => is_date(&text).then(|| value.clone()),
            Validator::OneOf(set) => set.iter().any(|s| s == text.as_ref()).then(|| value.clone()),
            Validator::Regex(pattern) => regex::Regex::new(pattern)
                .ok()
                .filter(|re| re.is_match(&text))
                .map(|_| value.clone()),
        }
    }
}

fn num_arg(args: &[Value], idx: usize) -> Result<f64, NameError> {
    let arg = args.get(idx).ok_or(NameError::BadArguments)?;
    match arg {
        Value::Int(n) => Ok(*n as f64),
        Value::Float(f) => Ok(*f),
        Value::Str(s) => s.parse().map_err(|_| NameError::BadArguments),
        _ => Err(NameError::BadArguments),
    }
}

fn str_arg(args: &[Value], idx: usize) -> Result<String, NameError> {
    match args.get(idx) {
        Some(Value::Str(s)) => Ok(s.clone()),
        _ => Err(NameError::BadArguments),
    }
}

fn str_args(args: &[Value]) -> Result<Vec<String>, NameError> {
    if args.is_empty() {
        return Err(NameError::BadArguments);
    }
    args.iter()
        .map(|arg| match arg.scalar_text() {
            Some(text) => Ok(text.into_owned()),
            None => Err(NameError::BadArguments),
        })
        .collect()
}

fn class_check(text: &str, class: impl Fn(char) -> bool) -> bool {
    !text.is_empty() && text.chars().all(class)
}

/// Full-string numeric parse. Rejects `inf`/`nan` spellings so that
/// free-text like `"2009-12-25"` never sneaks through a numeric comparison.
fn parse_number(text: &Cow<'_, str>) -> Option<f64> {
    if text
        .chars()
        .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E'))
    {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_email(text: &str) -> bool {
    let (local, domain) = match text.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'));
    local_ok && domain.contains('.') && is_hostname(domain)
}

fn is_hostname(text: &str) -> bool {
    !text.is_empty()
        && text.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                && !label.starts_with('-')
                && !label.ends_with('-')
        })
}

fn is_uri(text: &str) -> bool {
    let (scheme, rest) = match text.split_once("://") {
        Some(parts) => parts,
        None => return false,
    };
    let scheme_ok = scheme
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    scheme_ok && !rest.is_empty() && !text.chars().any(|c| c.is_whitespace() || c.is_control())
}

fn is_zip(text: &str) -> bool {
    let (five, plus4) = match text.split_once('-') {
        Some((a, b)) => (a, Some(b)),
        None => (text, None),
    };
    let five_ok = five.len() == 5 && five.bytes().all(|b| b.is_ascii_digit());
    match plus4 {
        Some(four) => five_ok && four.len() == 4 && four.bytes().all(|b| b.is_ascii_digit()),
        None => five_ok,
    }
}

fn normalize_phone(text: &str) -> Option<String> {
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '(' | ')' | '-' | '.' | '+'))
    {
        return None;
    }
    let mut digits: String = text.chars().filter(char::is_ascii_digit).collect();
    // tolerate the NANP country code
    if digits.len() == 11 && digits.starts_with('1') {
        digits.remove(0);
    }
    (digits.len() == 10).then_some(digits)
}

fn normalize_ccnum(text: &str) -> Option<String> {
    let digits: String = text
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !(13..=19).contains(&digits.len()) {
        return None;
    }
    luhn(&digits).then_some(digits)
}

fn luhn(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

fn is_date(text: &str) -> bool {
    let mut parts = text.split('-');
    let (year, month, day) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(y), Some(m), Some(d), None) => (y, m, d),
        _ => return false,
    };
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return false;
    }
    let (year, month, day) = match (
        year.parse::<i32>(),
        month.parse::<u32>(),
        day.parse::<u32>(),
    ) {
        (Ok(y), Ok(m), Ok(d)) => (y, m, d),
        _ => return false,
    };
    if !(1..=12).contains(&month) || day == 0 {
        return false;
    }
    day <= days_in_month(year, month)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
            if leap {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_resolves_catalog_entries() {
        assert_eq!(Validator::from_name("alpha", &[]), Ok(Validator::Alpha));
        assert_eq!(Validator::from_name("testAlnum", &[]), Ok(Validator::Alnum));
        assert_eq!(
            Validator::from_name("testGreaterThan", &[Value::Int(25)]),
            Ok(Validator::GreaterThan(25.0))
        );
        assert_eq!(
            Validator::from_name("between", &[Value::Int(1), Value::Int(9)]),
            Ok(Validator::Between { min: 1.0, max: 9.0 })
        );
        assert_eq!(
            Validator::from_name("testBogus", &[]),
            Err(NameError::Unknown)
        );
        assert_eq!(
            Validator::from_name("testGreaterThan", &[]),
            Err(NameError::BadArguments)
        );
    }

    #[test]
    fn char_class_validators_return_the_value() {
        assert_eq!(Validator::Alnum.check(&Value::from("0")), Some(Value::from("0")));
        assert_eq!(Validator::Alpha.check(&Value::from("eoeijfol")), Some(Value::from("eoeijfol")));
        assert_eq!(Validator::Alpha.check(&Value::from("efoihr123-")), None);
        assert_eq!(Validator::Alpha.check(&Value::from("")), None);
        assert_eq!(Validator::Digits.check(&Value::from("00731")), Some(Value::from("00731")));
        assert_eq!(Validator::Hex.check(&Value::from("deadBEEF")), Some(Value::from("deadBEEF")));
        assert_eq!(Validator::Hex.check(&Value::from("xyz")), None);
    }

    #[test]
    fn containers_always_fail() {
        let mut all_good = Value::map();
        all_good.insert("input", "asldifjlaskjg");
        all_good.insert("one", "wptopriowtg");

        assert_eq!(Validator::Alpha.check(&all_good), None);
        assert_eq!(Validator::Alnum.check(&Value::seq()), None);
    }

    #[test]
    fn numeric_comparisons_require_fully_numeric_input() {
        // a date string is not a number, whatever its prefix parses as
        assert_eq!(Validator::GreaterThan(25.0).check(&Value::from("2009-12-25")), None);
        assert_eq!(Validator::LessThan(25.0).check(&Value::from("0")), Some(Value::from("0")));
        assert_eq!(Validator::GreaterThan(25.0).check(&Value::Int(26)), Some(Value::Int(26)));
        assert_eq!(
            Validator::Between { min: 1.0, max: 9.0 }.check(&Value::from("9")),
            Some(Value::from("9"))
        );
        assert_eq!(Validator::Between { min: 1.0, max: 9.0 }.check(&Value::from("9.5")), None);
        assert_eq!(Validator::Float.check(&Value::from("inf")), None);
        assert_eq!(Validator::Float.check(&Value::from("2.5")), Some(Value::from("2.5")));
        assert_eq!(Validator::Int.check(&Value::from("12.5")), None);
        assert_eq!(Validator::Int.check(&Value::from("-12")), Some(Value::from("-12")));
    }

    #[test]
    fn format_validators() {
        assert!(Validator::Email.check(&Value::from("bob@example.com")).is_some());
        assert_eq!(Validator::Email.check(&Value::from("bob@localhost")), None);
        assert_eq!(Validator::Email.check(&Value::from("not-an-email")), None);

        assert!(Validator::Hostname.check(&Value::from("www.example.com")).is_some());
        assert_eq!(Validator::Hostname.check(&Value::from("-bad.example.com")), None);
        assert_eq!(Validator::Hostname.check(&Value::from("bad..example")), None);

        assert!(Validator::Ip.check(&Value::from("127.0.0.1")).is_some());
        assert!(Validator::Ip.check(&Value::from("::1")).is_some());
        assert_eq!(Validator::Ip.check(&Value::from("999.1.1.1")), None);

        assert!(Validator::Uri.check(&Value::from("https://example.com/x?y=1")).is_some());
        assert_eq!(Validator::Uri.check(&Value::from("example.com")), None);
        assert_eq!(Validator::Uri.check(&Value::from("http:// spaced")), None);

        assert!(Validator::Zip.check(&Value::from("90210")).is_some());
        assert!(Validator::Zip.check(&Value::from("90210-1234")).is_some());
        assert_eq!(Validator::Zip.check(&Value::from("9021")), None);
        assert_eq!(Validator::Zip.check(&Value::from("90210-12")), None);

        assert!(Validator::Date.check(&Value::from("2008-02-29")).is_some());
        assert_eq!(Validator::Date.check(&Value::from("2009-02-29")), None);
        assert_eq!(Validator::Date.check(&Value::from("2009-13-01")), None);
        assert_eq!(Validator::Date.check(&Value::from("09-02-28")), None);
    }

    #[test]
    fn phone_normalizes_to_digits() {
        assert_eq!(
            Validator::Phone.check(&Value::from("(555) 123-4567")),
            Some(Value::from("5551234567"))
        );
        assert_eq!(
            Validator::Phone.check(&Value::from("1-555-123-4567")),
            Some(Value::from("5551234567"))
        );
        assert_eq!(Validator::Phone.check(&Value::from("123-4567")), None);
        assert_eq!(Validator::Phone.check(&Value::from("call me maybe")), None);
    }

    #[test]
    fn ccnum_checks_luhn_and_normalizes() {
        assert_eq!(
            Validator::Ccnum.check(&Value::from("4111 1111 1111 1111")),
            Some(Value::from("4111111111111111"))
        );
        assert_eq!(
            Validator::Ccnum.check(&Value::from("4111-1111-1111-1111")),
            Some(Value::from("4111111111111111"))
        );
        assert_eq!(Validator::Ccnum.check(&Value::from("4111111111111112")), None);
        assert_eq!(Validator::Ccnum.check(&Value::from("4111x1111")), None);
        assert_eq!(Validator::Ccnum.check(&Value::from("411")), None);
    }

    #[test]
    fn one_of_and_regex() {
        let one_of = Validator::OneOf(vec!["red".into(), "green".into(), "blue".into()]);
        assert_eq!(one_of.check(&Value::from("green")), Some(Value::from("green")));
        assert_eq!(one_of.check(&Value::from("mauve")), None);

        let re = Validator::Regex("^[a-z]{3}-\\d+$".to_string());
        assert_eq!(re.check(&Value::from("abc-42")), Some(Value::from("abc-42")));
        assert_eq!(re.check(&Value::from("ABC-42")), None);

        // unparsable pattern fails instead of erroring
        let bad = Validator::Regex("(".to_string());
        assert_eq!(bad.check(&Value::from("anything")), None);
    }
}
