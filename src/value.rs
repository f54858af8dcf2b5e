//! Dynamic values as they flow through the per-request data mapping
//! and in and out of builtins.

use std::{collections::BTreeMap, fmt::{self, Display}};

use kstring::KString;

pub type Map = BTreeMap<KString, Value>;

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(KString),
    Seq(Vec<Value>),
    Map(Map),
}

/// Coarse runtime shape of a `Value`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Seq,
    Map,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "nil",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Seq => "seq",
            Kind::Map => "map",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::Seq(_) => Kind::Seq,
            Value::Map(_) => Kind::Map,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None
        }
    }

    /// Look up `key` if self is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Build a map from key/value pairs.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where K: Into<KString>,
          V: Into<Value>
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn seq<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}

/// Deep structural equality. Sequences compare in order, maps by key
/// (their iteration order never matters). Ints and floats are
/// different kinds and thus never equal, NaN isn't equal to itself.
pub fn deep_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Seq(xs), Value::Seq(ys)) =>
            xs.len() == ys.len()
            && xs.iter().zip(ys).all(|(x, y)| deep_eq(x, y)),
        (Value::Map(xs), Value::Map(ys)) =>
            xs.len() == ys.len()
            && xs.iter().all(|(k, x)| ys.get(k).map_or(false, |y| deep_eq(x, y))),
        _ => false
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        deep_eq(self, other)
    }
}

// Display is what ends up in the page for plain values (before HTML
// escaping); composite values are shown as JSON.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::Seq(_) | Value::Map(_) =>
                write!(f, "{}", serde_json::Value::from(self)),
        }
    }
}


// ------------------------------------------------------------------
// Conversions

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}
impl From<i64> for Value {
    fn from(i: i64) -> Self { Value::Int(i) }
}
impl From<i32> for Value {
    fn from(i: i32) -> Self { Value::Int(i.into()) }
}
impl From<f64> for Value {
    fn from(x: f64) -> Self { Value::Float(x) }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::String(KString::from_ref(s)) }
}
impl From<String> for Value {
    fn from(s: String) -> Self { Value::String(KString::from_string(s)) }
}
impl From<KString> for Value {
    fn from(s: KString) -> Self { Value::String(s) }
}
impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self { Value::Seq(v) }
}
impl From<Map> for Value {
    fn from(m: Map) -> Self { Value::Map(m) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value as J;
        match v {
            J::Null => Value::Null,
            J::Bool(b) => Value::Bool(b),
            J::Number(n) =>
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // u64 beyond i64::MAX ends up here, too
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                },
            J::String(s) => Value::String(KString::from_string(s)),
            J::Array(a) => Value::Seq(a.into_iter().map(Value::from).collect()),
            J::Object(o) => Value::Map(
                o.into_iter().map(|(k, v)| (KString::from_string(k), Value::from(v)))
                    .collect()),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        use serde_json::Value as J;
        match v {
            Value::Null => J::Null,
            Value::Bool(b) => J::Bool(*b),
            Value::Int(i) => J::from(*i),
            // NaN and infinities become null
            Value::Float(x) => serde_json::Number::from_f64(*x).map_or(J::Null, J::Number),
            Value::String(s) => J::String(s.to_string()),
            Value::Seq(xs) => J::Array(xs.iter().map(J::from).collect()),
            Value::Map(m) => J::Object(
                m.iter().map(|(k, v)| (k.to_string(), J::from(v))).collect()),
        }
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn t_from_json() {
        let v = Value::from(json!({"a": {"b": [1, 2.5, "x", null, true]}}));
        assert_eq!(v, Value::map([("a", Value::map([(
            "b", Value::seq([Value::Int(1), Value::Float(2.5), "x".into(),
                             Value::Null, Value::Bool(true)]))]))]));
        assert_eq!(v.get("a").map(Value::kind), Some(Kind::Map));
        assert_eq!(v.get("b"), None);
    }

    #[test]
    fn t_deep_eq() {
        assert!(deep_eq(&Value::map([("a", 1)]), &Value::map([("a", 1)])));
        assert!(!deep_eq(&Value::map([("a", 1)]), &Value::map([("a", 2)])));
        assert!(!deep_eq(&Value::map([("a", 1)]), &Value::map([("a", 1), ("b", 1)])));
        assert!(!deep_eq(&Value::seq([1, 2]), &Value::seq([2, 1])));
        assert!(!deep_eq(&Value::Int(1), &Value::Float(1.0)));
        assert!(!deep_eq(&Value::Float(f64::NAN), &Value::Float(f64::NAN)));
        assert!(deep_eq(&Value::Null, &Value::Null));
    }

    #[test]
    fn t_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(0.5).to_string(), "0.5");
        assert_eq!(Value::from("a<b").to_string(), "a<b");
        assert_eq!(Value::seq([1, 2]).to_string(), "[1,2]");
        assert_eq!(Value::map([("k", "v")]).to_string(), r#"{"k":"v"}"#);
    }
}
