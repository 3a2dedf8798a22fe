//! Shared proptest strategies for unit and property tests.

use proptest::prelude::*;

use crate::Value;

/// A map key safe for path expressions: no delimiter, never empty.
pub fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9_-]{1,12}").expect("valid regex")
}

/// An arbitrary scalar node.
pub fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[ -~]{0,40}".prop_map(Value::Str),
    ]
}

/// An arbitrary snapshot node, nested up to three levels deep.
pub fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Seq),
            prop::collection::vec((arb_key(), inner), 0..4).prop_map(|entries| {
                // keep keys unique so resolution stays deterministic
                let mut map = Value::map();
                for (k, v) in entries {
                    map.insert(k, v);
                }
                map
            }),
        ]
    })
}
