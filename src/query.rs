//! Query strings of the current request, as far as the form helper
//! needs them: parsing (with percent decoding) and serializing.

use kstring::KString;
use pct_str::{PctString, PctStr, URIReserved, InvalidPctString};

pub fn url_encode(s: &str) -> String {
    PctString::encode(s.chars(), URIReserved).to_string()
}

// Owns the message, InvalidPctString<&str> would borrow from the
// request.
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("url decoding error: {0}")]
pub struct UrlDecodingError(Box<String>);

impl From<InvalidPctString<&str>> for UrlDecodingError {
    fn from(e: InvalidPctString<&str>) -> Self {
        Self(Box::new(e.to_string()))
    }
}

pub fn url_decode(s: &str) -> Result<String, UrlDecodingError> {
    Ok(PctStr::new(s)?.decode())
}


/// Key/value pairs in the order they were given. Keys may repeat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryString(Vec<(KString, KString)>);

impl QueryString {
    /// Parse the part after `?`. Parts without `=` get the empty
    /// string as value, empty parts are skipped. `+` is taken
    /// literally.
    pub fn from_str(s: &str) -> Result<Self, UrlDecodingError> {
        let mut v = Vec::new();
        for part in s.split('&').filter(|p| !p.is_empty()) {
            let (key, val) = part.split_once('=').unwrap_or((part, ""));
            v.push((KString::from(url_decode(key)?),
                    KString::from(url_decode(val)?)));
        }
        Ok(QueryString(v))
    }

    pub fn pairs(&self) -> &[(KString, KString)] {
        &self.0
    }
}
