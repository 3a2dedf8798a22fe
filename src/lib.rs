//! Guarded access to untrusted nested input through named filters and
//! validators.
//!
//! This crate wraps one snapshot of untrusted input (a form submission, a
//! decoded request body) in a [`Cage`] and forces every read through an
//! explicit transformation or predicate, so unsanitized data cannot be used
//! by accident:
//!
//! - **Filters** (`get`-family) are total transforms that narrow the value
//!   to a sanitized domain — letters only, digits only, an extracted
//!   integer, a normalized path.
//! - **Validators** (`test`-family) follow a test-and-return contract: on
//!   success they hand back the normalized value itself, on failure a plain
//!   `None`. Rejected input is an expected branch, never an error.
//! - An **auto-filter pass** applies a declarative rule set once, at
//!   construction, before the cage becomes observable.
//! - [`Cage::raw`] is the single, distinctly named escape hatch, so every
//!   bypass of the catalog is auditable.
//!
//! # Examples
//!
//! ```
//! use input_cage::{Cage, RuleSet, Value};
//! use serde_json::json;
//!
//! let rules = RuleSet::parse_ini("userid = getInt\nusername = getAlpha\n");
//! let cage = Cage::with_rules(
//!     Value::from(json!({
//!         "userid": "--12<strong>34</strong>",
//!         "username": "se777v77enty_<em>fiv</em>e!",
//!         "bio": {"quote": "meet at the bar at 7:30 pm"},
//!     })),
//!     &rules,
//! )
//! .expect("rule operations are known");
//!
//! // the auto-filter pass already rewrote the snapshot in place
//! assert_eq!(cage.raw("userid").unwrap(), &Value::Int(1234));
//! assert_eq!(cage.raw("username").unwrap(), "seventyfive");
//!
//! // nested reads go through named accessors
//! assert_eq!(cage.get_digits("bio/quote").unwrap(), "730");
//! assert_eq!(cage.test_alpha("bio/quote"), None);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod accessor;
mod cage;
mod error;
mod filter;
pub mod path;
mod purifier;
mod rules;
mod validator;
mod value;

#[cfg(test)]
mod test_utils;

pub use cage::{Cage, CustomAccessor};
pub use error::Error;
pub use filter::Filter;
pub use purifier::{DefaultPurifier, Purifier};
pub use rules::{Rule, RuleSet};
pub use validator::Validator;
pub use value::Value;
