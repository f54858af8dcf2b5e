//! HTML that the template engine must not escape again, and the
//! escaping needed to produce it safely.

use std::fmt::{self, Display};

/// Preserialized HTML. Only `from_trusted` (the `html` builtin, whose
/// caller vouches for the contents) and code that passes every
/// interpolated string through `html_escape` create these.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    pub fn from_trusted(s: impl Into<String>) -> Self {
        TrustedHtml(s.into())
    }

    pub fn new() -> Self {
        Self::default()
    }

    /// Append preserialized HTML.
    pub fn push_trusted(&mut self, s: &str) {
        self.0.push_str(s);
    }

    /// Append `s`, escaped.
    pub fn push_escaped(&mut self, s: &str) {
        html_escape_into(&mut self.0, s);
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TrustedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escaping suitable for text and double or single quoted attribute
/// values.
pub fn html_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c)
        }
    }
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    html_escape_into(&mut out, s);
    out
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_escape() {
        assert_eq!(html_escape(r#"<a href="x">&'</a>"#),
                   "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;");
        assert_eq!(html_escape("Motörhead"), "Motörhead");
        assert_eq!(html_escape(""), "");
    }

    #[test]
    fn t_trusted() {
        let mut h = TrustedHtml::new();
        h.push_trusted("<b>");
        h.push_escaped("a<b");
        h.push_trusted("</b>");
        assert_eq!(h.as_str(), "<b>a&lt;b</b>");
        assert_eq!(TrustedHtml::from_trusted("<i>x</i>").to_string(), "<i>x</i>");
    }
}
