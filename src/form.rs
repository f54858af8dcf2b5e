//! Forms that carry the current filter state as hidden fields, so
//! that submitting them doesn't lose it.

use kstring::KString;

use crate::{context::RouteState, html::TrustedHtml};

/// Field names, each with one or more values. Fields keep the order in
/// which they were first pushed, values the order in which they were
/// pushed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterFields(Vec<(KString, Vec<KString>)>);

impl FilterFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<KString>, value: impl Into<KString>) {
        let name = name.into();
        let value = value.into();
        if let Some((_, values)) = self.0.iter_mut().find(|(n, _)| *n == name) {
            values.push(value);
        } else {
            self.0.push((name, vec![value]));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[KString])> {
        self.0.iter().map(|(n, vs)| (n.as_str(), vs.as_slice()))
    }
}

impl<K: Into<KString>, V: Into<KString>> FromIterator<(K, V)> for FilterFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = FilterFields::new();
        for (k, v) in iter {
            fields.push(k, v);
        }
        fields
    }
}

/// Where a form submits to, and the state it has to carry along.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormDescriptor {
    pub action: String,
    pub filter_fields: FilterFields,
}

/// Builds the descriptor for a form bound to an action, given the
/// routing state of the current request.
pub trait FormEncoder {
    fn form(&self, route: &RouteState, action_name: &str) -> FormDescriptor;
}

/// What the `form` builtin hands to templates.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    descriptor: FormDescriptor,
}

impl Form {
    pub fn new(descriptor: FormDescriptor) -> Self {
        Self { descriptor }
    }

    pub fn action(&self) -> &str {
        &self.descriptor.action
    }

    /// One (name, value) pair per value, multi-valued fields expanded
    /// in place.
    pub fn hidden_fields(&self) -> Vec<(&str, &str)> {
        self.descriptor.filter_fields.iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name, v.as_str())))
            .collect()
    }

    /// `hidden_fields` as `<input type="hidden" .../>` elements. Names
    /// and values come from query parameters, thus are escaped.
    pub fn hidden_string(&self) -> TrustedHtml {
        let mut html = TrustedHtml::new();
        for (name, value) in self.hidden_fields() {
            html.push_trusted(r#"<input type="hidden" name=""#);
            html.push_escaped(name);
            html.push_trusted(r#"" value=""#);
            html.push_escaped(value);
            html.push_trusted(r#"" />"#);
        }
        html
    }
}


/// Query parameters whose names start with this are internal to the
/// request (tokens and the like) and not carried over.
pub const RESERVED_PARAM_PREFIX: char = '_';

/// A `FormEncoder` that submits to `/<route words>/<action>` and keeps
/// every non-reserved query parameter of the current request.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterFormEncoder;

impl FormEncoder for FilterFormEncoder {
    fn form(&self, route: &RouteState, action_name: &str) -> FormDescriptor {
        let mut action = String::new();
        for word in route.words().iter().map(|w| w.as_str())
            .chain(std::iter::once(action_name))
            .filter(|w| !w.is_empty())
        {
            action.push('/');
            action.push_str(&crate::query::url_encode(word));
        }
        if action.is_empty() {
            action.push('/');
        }
        let filter_fields = route.query().pairs().iter()
            .filter(|(k, _)| !k.starts_with(RESERVED_PARAM_PREFIX))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        FormDescriptor { action, filter_fields }
    }
}
