//! A request with a known state, for the tests.

use serde_json::json;

use crate::{config::Config,
            context::{RequestContext, RouteState, Services},
            form::FilterFormEncoder,
            permissions::LevelClassifier,
            puzzles::{PuzzleRenderer, PuzzleTable},
            value::Value};

pub struct TestRequest<'a> {
    pub data: Value,
    pub route: RouteState,
    pub config: Config,
    pub classifier: LevelClassifier,
    pub puzzle_table: PuzzleTable,
    /// Replaces `puzzle_table` if set
    pub puzzles: Option<&'a dyn PuzzleRenderer>,
    pub forms: FilterFormEncoder,
}

pub fn test_data() -> Value {
    Value::from(json!({
        "_user": {"name": "ann", "level": 150, "puzzles_solved": true},
        "news": {
            "title": "Hello",
            "tags": ["x", "y"],
            "published": 1708967013,
            "rating": "4.26"
        },
        "count": 0,
        "empty": ""
    }))
}

impl<'a> TestRequest<'a> {
    pub fn new() -> Self {
        let mut puzzle_table = PuzzleTable::new();
        puzzle_table.insert("users", "register", "puzzles/math");
        TestRequest {
            data: test_data(),
            route: RouteState::from_path_and_query(
                "/news/list", "tag=x&_token=secret&sort=date&tag=y")
                .expect("valid route"),
            config: Config::default(),
            classifier: LevelClassifier::default(),
            puzzle_table,
            puzzles: None,
            forms: FilterFormEncoder,
        }
    }

    pub fn context(&self) -> RequestContext<'_> {
        let puzzles: &dyn PuzzleRenderer = match self.puzzles {
            Some(p) => p,
            None => &self.puzzle_table,
        };
        RequestContext::new(
            self.data.clone(),
            self.route.clone(),
            &self.config,
            Services {
                classifier: &self.classifier,
                puzzles,
                forms: &self.forms,
            })
    }
}
