use std::path::{Component, Path, PathBuf};

use crate::Value;

/// The closed catalog of built-in filters.
///
/// A filter is a total transform: it always produces a value, narrowing the
/// input to a sanitized domain. Filters are defined scalar-wise and recurse
/// element-wise into sequences and maps; scalars act on their display form
/// (see [`Value::scalar_text`]).
///
/// # Examples
///
/// ```
/// use input_cage::{Filter, Value};
///
/// let v = Value::from("meet at the bar at 7:30 pm");
/// assert_eq!(Filter::Alpha.apply(&v), "meetatthebaratpm");
/// assert_eq!(Filter::Alnum.apply(&v), "meetatthebarat730pm");
/// assert_eq!(Filter::Digits.apply(&v), "730");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Keep ASCII letters only; tag runs are stripped first, so markup
    /// never leaks letters into the result.
    Alpha,
    /// Keep ASCII letters and digits only (tag runs stripped first).
    Alnum,
    /// Keep ASCII digits only (tag runs stripped first).
    Digits,
    /// Extract the first integer as an `Int` node: tag runs are stripped,
    /// then the first maximal run of ASCII digits (optionally signed) is
    /// parsed; no digits extracts 0.
    Int,
    /// Strip the trailing path segment (`/var/log/app/access.log` becomes
    /// `/var/log/app`).
    Dir,
    /// Resolve a possibly-relative path against the current working
    /// directory into an absolute, lexically normalized path.
    Path,
    /// ROT13 letter substitution; self-inverse, non-letters untouched.
    Rot13,
    /// Strip `<...>` tag runs.
    NoTags,
    /// Keep only the final path segment.
    NoPath,
    /// Strip tags, drop control characters, entity-escape `& < > " '`.
    NoTagsOrSpecial,
}

impl Filter {
    /// Resolves an operation name from the catalog.
    ///
    /// Matching is case-insensitive, ignores underscores, and tolerates the
    /// accessor-style `get` prefix, so `"alpha"`, `"getAlpha"`, `"no_tags"`,
    /// and `"getNoTags"` all resolve.
    pub fn from_name(name: &str) -> Option<Filter> {
        let mut norm: String = name
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if let Some(rest) = norm.strip_prefix("get") {
            norm = rest.to_string();
        }
        match norm.as_str() {
            "alpha" => Some(Filter::Alpha),
            "alnum" => Some(Filter::Alnum),
            "digits" => Some(Filter::Digits),
            "int" => Some(Filter::Int),
            "dir" => Some(Filter::Dir),
            "path" => Some(Filter::Path),
            "rot13" => Some(Filter::Rot13),
            "notags" => Some(Filter::NoTags),
            "nopath" => Some(Filter::NoPath),
            "notagsorspecial" => Some(Filter::NoTagsOrSpecial),
            _ => None,
        }
    }

    /// Canonical catalog name of this filter.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Alpha => "alpha",
            Filter::Alnum => "alnum",
            Filter::Digits => "digits",
            Filter::Int => "int",
            Filter::Dir => "dir",
            Filter::Path => "path",
            Filter::Rot13 => "rot13",
            Filter::NoTags => "noTags",
            Filter::NoPath => "noPath",
            Filter::NoTagsOrSpecial => "noTagsOrSpecial",
        }
    }

    /// Applies the filter, recursing element-wise into containers.
    pub fn apply(&self, value: &Value) -> Value {
        match value {
            Value::Seq(items) => Value::Seq(items.iter().map(|v| self.apply(v)).collect()),
            Value::Map(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), self.apply(v)))
                    .collect(),
            ),
            scalar => self.apply_scalar(scalar),
        }
    }

    fn apply_scalar(&self, value: &Value) -> Value {
        // Numeric scalars short-circuit integer extraction.
        if let Filter::Int = self {
            match value {
                Value::Int(n) => return Value::Int(*n),
                Value::Float(f) => return Value::Int(*f as i64),
                _ => {}
            }
        }
        let text = match value.scalar_text() {
            Some(text) => text,
            None => return value.clone(),
        };
        match self {
            Filter::Alpha => Value::Str(
                strip_tags(&text)
                    .chars()
                    .filter(char::is_ascii_alphabetic)
                    .collect(),
            ),
            Filter::Alnum => Value::Str(
                strip_tags(&text)
                    .chars()
                    .filter(char::is_ascii_alphanumeric)
                    .collect(),
            ),
            Filter::Digits => Value::Str(
                strip_tags(&text)
                    .chars()
                    .filter(char::is_ascii_digit)
                    .collect(),
            ),
            Filter::Int => Value::Int(extract_int(&strip_tags(&text))),
            Filter::Dir => Value::Str(dirname(&text)),
            Filter::Path => Value::Str(normalize_path(&text)),
            Filter::Rot13 => Value::Str(text.chars().map(rot13_char).collect()),
            Filter::NoTags => Value::Str(strip_tags(&text)),
            Filter::NoPath => Value::Str(basename(&text)),
            Filter::NoTagsOrSpecial => Value::Str(escape_special(&strip_tags(&text))),
        }
    }
}

/// Integer extraction: the first maximal run of ASCII digits, parsed. A
/// sign counts only when it is the very first character of the trimmed
/// (tag-stripped) input and immediately precedes a digit. No digits at all
/// extracts 0. Saturates at the `i64` bounds.
fn extract_int(s: &str) -> i64 {
    let trimmed = s.trim();
    let bytes = trimmed.as_bytes();
    let negative = bytes.len() >= 2 && bytes[0] == b'-' && bytes[1].is_ascii_digit();

    let mut n: i64 = 0;
    let mut started = false;
    for c in trimmed.chars() {
        if let Some(d) = c.to_digit(10) {
            n = n.saturating_mul(10).saturating_add(i64::from(d));
            started = true;
        } else if started {
            break;
        }
    }
    if negative {
        n.saturating_neg()
    } else {
        n
    }
}

fn dirname(s: &str) -> String {
    let trimmed = s.trim_end_matches('/');
    if trimmed.is_empty() {
        // "" stays relative, "/", "//", ... collapse to the root
        return if s.is_empty() { ".".to_string() } else { "/".to_string() };
    }
    match trimmed.rfind('/') {
        None => ".".to_string(),
        Some(0) => "/".to_string(),
        Some(idx) => trimmed[..idx].to_string(),
    }
}

fn basename(s: &str) -> String {
    let trimmed = s.trim_end_matches('/');
    match trimmed.rfind('/') {
        None => trimmed.to_string(),
        Some(idx) => trimmed[idx + 1..].to_string(),
    }
}

/// Lexical normalization against the current working directory: no
/// filesystem access, `.` dropped, `..` pops one component (a no-op at the
/// root). Keeps the filter total even for paths that do not exist.
fn normalize_path(s: &str) -> String {
    let candidate = Path::new(s);
    let mut resolved = if candidate.is_absolute() {
        PathBuf::from("/")
    } else {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"))
    };
    for component in candidate.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    resolved.to_string_lossy().into_owned()
}

fn rot13_char(c: char) -> char {
    match c {
        'a'..='z' => (((c as u8 - b'a' + 13) % 26) + b'a') as char,
        'A'..='Z' => (((c as u8 - b'A' + 13) % 26) + b'A') as char,
        _ => c,
    }
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn escape_special(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}
