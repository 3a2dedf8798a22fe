//! Accessor-name resolution for dynamic dispatch.
//!
//! A dynamically supplied accessor name resolves in a single step into a
//! closed enumeration: `get<Op>` maps to a filter, `test<Op>` to a
//! validator, with `getRaw` and `getPurifiedHTML` as the two named special
//! cases. Anything else is left to the registered custom-accessor list.

use crate::validator::NameError;
use crate::{Error, Filter, Validator, Value};

/// A built-in accessor a name resolved to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Builtin {
    /// `get<Filter>` — apply a catalog filter.
    Get(Filter),
    /// `test<Validator>` — test-and-return.
    Test(Validator),
    /// `getRaw` — the audited escape hatch.
    Raw,
    /// `getPurifiedHTML` — run the purification engine.
    PurifiedHtml,
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Resolves a name against the built-in catalog.
///
/// `Ok(None)` means "not a built-in" — the caller then consults the
/// registered-accessor list. A validator name that matches but whose
/// arguments cannot be decoded is an [`Error::InvalidArguments`].
pub(crate) fn resolve_builtin(name: &str, args: &[Value]) -> Result<Option<Builtin>, Error> {
    let norm = normalize(name);
    if norm == "getraw" {
        return Ok(Some(Builtin::Raw));
    }
    if norm == "getpurifiedhtml" {
        return Ok(Some(Builtin::PurifiedHtml));
    }
    if norm.starts_with("get") {
        return Ok(Filter::from_name(name).map(Builtin::Get));
    }
    if norm.starts_with("test") {
        return match Validator::from_name(name, args) {
            Ok(validator) => Ok(Some(Builtin::Test(validator))),
            Err(NameError::Unknown) => Ok(None),
            Err(NameError::BadArguments) => Err(Error::invalid_arguments(name)),
        };
    }
    Ok(None)
}
