//! Look up values in nested data by dotted path.

use itertools::Itertools;

use crate::value::Value;

/// Marks a path token as dynamic in template source; stripped from the
/// first segment, means nothing otherwise.
pub const PATH_MARKER: char = '$';

/// Join `segments` with `.`, after removing one leading `PATH_MARKER`
/// from the first segment (and only there).
pub fn access_key<S: AsRef<str>>(segments: &[S]) -> String {
    segments.iter().enumerate().map(|(i, s)| {
        let s = s.as_ref();
        if i == 0 {
            s.strip_prefix(PATH_MARKER).unwrap_or(s)
        } else {
            s
        }
    }).join(".")
}

/// Descend into `root` following the `.`-separated parts of
/// `dotted`. Every part must name a key of a map. The empty key
/// consists of one empty part, thus only resolves in a map having ""
/// as a key.
pub fn resolve<'v>(root: &'v Value, dotted: &str) -> Option<&'v Value> {
    dotted.split('.').try_fold(root, |v, part| v.get(part))
}

/// The `get` builtin: the value at the path given by `segments`, or,
/// if there's nothing there, the access key itself as a string, so
/// that the page shows what failed to resolve (with a warning if
/// `log`).
pub fn get<S: AsRef<str>>(root: &Value, segments: &[S], log: bool) -> Value {
    let key = access_key(segments);
    if segments.is_empty() {
        return Value::from(key)
    }
    match resolve(root, &key) {
        Some(v) => v.clone(),
        None => {
            crate::warn_if!(log, "get: unresolved path {key:?}");
            Value::from(key)
        }
    }
}
