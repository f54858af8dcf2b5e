//! Generic operations over values of unknown shape.

use crate::value::{Value, Kind, deep_eq};

pub fn is_map(v: &Value) -> bool {
    v.kind() == Kind::Map
}

pub fn eq(a: &Value, b: &Value) -> bool {
    deep_eq(a, b)
}

pub fn same_kind(a: &Value, b: &Value) -> bool {
    a.kind() == b.kind()
}

/// Narrow emptiness: only nil, `false` and the empty string are
/// empty. `0`, `[]` and `{}` are not.
pub fn non_empty(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        _ => true
    }
}

/// The first of `values` that is `non_empty`, or `false` if there is
/// none.
pub fn fallback<'v>(values: impl IntoIterator<Item = &'v Value>) -> Value {
    values.into_iter()
        .find(|v| non_empty(v))
        .cloned()
        .unwrap_or(Value::Bool(false))
}

/// For debugging only, the format may change.
pub fn type_of(v: &Value) -> String {
    match v {
        Value::Seq(items) => format!("seq[{}]", items.len()),
        Value::Map(m) => format!("map[{}]", m.len()),
        _ => v.kind().name().into()
    }
}
