//! What the builtins know about the current request.

use kstring::KString;

use crate::{config::Config,
            form::FormEncoder,
            permissions::UserClassifier,
            puzzles::PuzzleRenderer,
            query::{QueryString, url_decode, UrlDecodingError},
            value::Value};


/// Routing state of the request, as far as forms need it: the path,
/// split into its (decoded, non-empty) words, and the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteState {
    words: Vec<KString>,
    query: QueryString,
}

impl RouteState {
    /// `path` like `/news/list`, `query` the part after `?` (without
    /// the `?`).
    pub fn from_path_and_query(path: &str, query: &str) -> Result<Self, UrlDecodingError> {
        let words = path.split('/')
            .filter(|w| !w.is_empty())
            .map(|w| url_decode(w).map(KString::from))
            .collect::<Result<Vec<KString>, _>>()?;
        Ok(Self { words, query: QueryString::from_str(query)? })
    }

    pub fn words(&self) -> &[KString] { &self.words }
    pub fn query(&self) -> &QueryString { &self.query }
}


/// The collaborators the builtins delegate to.
#[derive(Clone, Copy)]
pub struct Services<'s> {
    pub classifier: &'s dyn UserClassifier,
    pub puzzles: &'s dyn PuzzleRenderer,
    pub forms: &'s dyn FormEncoder,
}

/// Created once per request, then only read. The builtins table
/// borrows it, thus can't outlive it.
pub struct RequestContext<'s> {
    data: Value,
    // Copy of data[config.user_key], Null if missing
    user: Value,
    route: RouteState,
    config: &'s Config,
    services: Services<'s>,
}

impl<'s> RequestContext<'s> {
    pub fn new(
        data: Value, route: RouteState, config: &'s Config, services: Services<'s>
    ) -> Self {
        let user = data.get(&config.user_key).cloned().unwrap_or(Value::Null);
        RequestContext { data, user, route, config, services }
    }

    pub fn data(&self) -> &Value { &self.data }
    pub fn user(&self) -> &Value { &self.user }
    pub fn route(&self) -> &RouteState { &self.route }
    pub fn config(&self) -> &'s Config { self.config }
    pub fn services(&self) -> &Services<'s> { &self.services }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestRequest;

    #[test]
    fn t_route_state() {
        let r = RouteState::from_path_and_query("/news/caf%C3%A9//list/", "a=1")
            .expect("valid");
        assert_eq!(r.words().iter().map(|w| w.as_str()).collect::<Vec<_>>(),
                   ["news", "café", "list"]);
        assert_eq!(r.query().pairs().len(), 1);
        assert!(RouteState::from_path_and_query("/%zz", "").is_err());
        assert!(RouteState::from_path_and_query("/", "a=%zz").is_err());
        assert!(RouteState::from_path_and_query("", "").expect("valid").words().is_empty());
    }

    #[test]
    fn t_user() {
        let t = TestRequest::new();
        assert_eq!(t.context().user().get("level"), Some(&Value::Int(150)));

        let mut anon = TestRequest::new();
        anon.data = Value::map([("news", "x")]);
        assert!(anon.context().user().is_null());

        let mut other_key = TestRequest::new();
        other_key.config.user_key = "news".into();
        assert_eq!(other_key.context().user().get("title"),
                   Some(&Value::from("Hello")));
    }
}
