//! The table of functions templates can call, built per request.
//! Each entry borrows the `RequestContext`, so the table has to be
//! built anew for every request; it is never shared between requests
//! and can't be changed once built.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use crate::{context::RequestContext,
            date_format::format_timestamp,
            float_format::format_float,
            form::Form,
            html::{TrustedHtml, html_escape},
            path_access,
            predicates,
            puzzles::show_puzzles,
            value::{Value, Kind},
            def_boxed_thiserror};

/// The vocabulary, in the order it is documented in.
pub const BUILTIN_NAMES: [&str; 17] = [
    "get", "date", "solved_puzzles",
    "is_stranger", "is_guest", "is_registered", "is_moderator", "is_admin",
    "is_map", "eq", "show_puzzles", "html", "format_float", "fallback",
    "type_of", "same_kind", "form",
];

def_boxed_thiserror!(CallError, pub enum CallErrorKind {
    #[error("no builtin named {0:?}")]
    Unknown(String),
    #[error("{name}: expected {expected} argument(s), got {got}")]
    Arity { name: &'static str, expected: &'static str, got: usize },
    #[error("{name}: argument {index} must be of kind {expected}, got {got}")]
    ArgumentType { name: &'static str, index: usize, expected: Kind, got: Kind },
});

/// What a builtin gives back to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Value(Value),
    /// Not to be escaped again
    Html(TrustedHtml),
    Form(Form),
}

impl Output {
    /// Serialized for insertion into a page: plain values escaped,
    /// HTML as is, forms as their hidden fields.
    pub fn to_html(&self) -> TrustedHtml {
        match self {
            Output::Value(v) => TrustedHtml::from_trusted(html_escape(&v.to_string())),
            Output::Html(h) => h.clone(),
            Output::Form(f) => f.hidden_string(),
        }
    }
}

impl Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Value(v) => Display::fmt(v, f),
            Output::Html(h) => Display::fmt(h, f),
            Output::Form(form) => write!(f, "form({})", form.action()),
        }
    }
}

impl From<Value> for Output {
    fn from(v: Value) -> Self { Output::Value(v) }
}
impl From<bool> for Output {
    fn from(b: bool) -> Self { Output::Value(Value::Bool(b)) }
}
impl From<String> for Output {
    fn from(s: String) -> Self { Output::Value(Value::from(s)) }
}
impl From<TrustedHtml> for Output {
    fn from(h: TrustedHtml) -> Self { Output::Html(h) }
}
impl From<Form> for Output {
    fn from(f: Form) -> Self { Output::Form(f) }
}


/// The arguments of one call, with the name of the builtin for error
/// messages.
#[derive(Clone, Copy)]
pub struct Args<'a> {
    name: &'static str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    fn arity(&self, min: usize, max: usize, expected: &'static str) -> Result<(), CallError> {
        let got = self.values.len();
        if got < min || got > max {
            Err(CallErrorKind::Arity { name: self.name, expected, got })?
        }
        Ok(())
    }

    fn exactly(&self, n: usize) -> Result<(), CallError> {
        const COUNTS: [&str; 3] = ["0", "1", "2"];
        self.arity(n, n, COUNTS.get(n).copied().unwrap_or("more"))
    }

    fn value(&self, index: usize) -> &'a Value {
        &self.values[index]
    }

    fn wrong_kind(&self, index: usize, expected: Kind) -> CallError {
        CallErrorKind::ArgumentType {
            name: self.name,
            index,
            expected,
            got: self.values[index].kind(),
        }.into()
    }

    fn str(&self, index: usize) -> Result<&'a str, CallError> {
        self.values[index].as_str().ok_or_else(|| self.wrong_kind(index, Kind::String))
    }

    fn int(&self, index: usize) -> Result<i64, CallError> {
        self.values[index].as_i64().ok_or_else(|| self.wrong_kind(index, Kind::Int))
    }
}

pub type Builtin<'c> = Box<dyn Fn(Args) -> Result<Output, CallError> + 'c>;

/// Read-only after construction.
pub struct Builtins<'c> {
    table: BTreeMap<&'static str, Builtin<'c>>,
}

impl<'c> Builtins<'c> {
    pub fn get(&self, name: &str) -> Option<&Builtin<'c>> {
        self.table.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// In alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Output, CallError> {
        let (&name, f) = self.table.get_key_value(name).ok_or_else(
            || CallErrorKind::Unknown(name.into()))?;
        f(Args { name, values: args })
    }
}


fn boxed<'c, F>(f: F) -> Builtin<'c>
where F: Fn(Args) -> Result<Output, CallError> + 'c
{
    Box::new(f)
}

struct TableBuilder<'c> {
    table: BTreeMap<&'static str, Builtin<'c>>,
}

impl<'c> TableBuilder<'c> {
    fn add<O: Into<Output>>(
        &mut self,
        name: &'static str,
        f: impl Fn(Args) -> Result<O, CallError> + 'c
    ) {
        let old = self.table.insert(name, boxed(move |args| f(args).map(Into::into)));
        debug_assert!(old.is_none(), "builtin {name:?} defined twice");
    }
}

/// Build the builtins for the request in `ctx`.
pub fn builtins<'c, 's: 'c>(ctx: &'c RequestContext<'s>) -> Builtins<'c> {
    let mut b = TableBuilder { table: BTreeMap::new() };
    let user = ctx.user();
    let classifier = ctx.services().classifier;

    b.add("get", move |a| {
        let segments = (0..a.len()).map(|i| a.str(i))
            .collect::<Result<Vec<&str>, CallError>>()?;
        Ok(path_access::get(ctx.data(), &segments, ctx.config().log_degraded))
    });
    b.add("date", move |a| {
        a.arity(1, 2, "1 or 2")?;
        let timestamp = a.int(0)?;
        let pattern: &str = if a.len() == 2 { a.str(1)? } else { &ctx.config().date_format };
        let config = ctx.config();
        Ok(format_timestamp(timestamp, config.time_zone, pattern, config.log_degraded))
    });

    b.add("solved_puzzles", move |a| {
        a.exactly(0)?;
        Ok(classifier.solved_puzzles(user))
    });
    b.add("is_stranger", move |a| {
        a.exactly(0)?;
        Ok(classifier.is_stranger(user))
    });
    b.add("is_guest", move |a| {
        a.exactly(0)?;
        Ok(classifier.is_guest(user))
    });
    b.add("is_registered", move |a| {
        a.exactly(0)?;
        Ok(classifier.is_registered(user))
    });
    b.add("is_moderator", move |a| {
        a.exactly(0)?;
        Ok(classifier.is_moderator(user))
    });
    b.add("is_admin", move |a| {
        a.exactly(0)?;
        Ok(classifier.is_admin(user))
    });

    b.add("is_map", |a| {
        a.exactly(1)?;
        Ok(predicates::is_map(a.value(0)))
    });
    b.add("eq", |a| {
        a.exactly(2)?;
        Ok(predicates::eq(a.value(0), a.value(1)))
    });
    b.add("show_puzzles", move |a| {
        a.exactly(2)?;
        Ok(show_puzzles(ctx, a.str(0)?, a.str(1)?))
    });
    b.add("html", |a| {
        a.exactly(1)?;
        Ok(TrustedHtml::from_trusted(a.str(0)?))
    });
    b.add("format_float", move |a| {
        a.exactly(2)?;
        Ok(format_float(a.value(0), a.int(1)?, ctx.config().log_degraded))
    });
    b.add("fallback", |a| {
        Ok(predicates::fallback(a.values()))
    });
    b.add("type_of", |a| {
        a.exactly(1)?;
        Ok(predicates::type_of(a.value(0)))
    });
    b.add("same_kind", |a| {
        a.exactly(2)?;
        Ok(predicates::same_kind(a.value(0), a.value(1)))
    });
    b.add("form", move |a| {
        a.exactly(1)?;
        let descriptor = ctx.services().forms.form(ctx.route(), a.str(0)?);
        Ok(Form::new(descriptor))
    });

    Builtins { table: b.table }
}
