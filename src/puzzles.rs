//! Puzzles (captcha-like challenges) a form may require.

use std::collections::BTreeMap;

use kstring::KString;

use crate::{config::PuzzleEntry, context::RequestContext};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PuzzleError {
    #[error("no puzzles configured for {module}/{action}")]
    NotConfigured { module: String, action: String },
    #[error("puzzles for {module}/{action}: {message}")]
    Failed { module: String, action: String, message: String },
}

/// Produces the path of the puzzle template to show for an action of a
/// module.
pub trait PuzzleRenderer {
    fn show_puzzles_path(
        &self, context: &RequestContext, module: &str, action: &str
    ) -> Result<String, PuzzleError>;
}

/// The `show_puzzles` builtin: errors become the text shown.
pub fn show_puzzles(context: &RequestContext, module: &str, action: &str) -> String {
    match context.services().puzzles.show_puzzles_path(context, module, action) {
        Ok(path) => path,
        Err(e) => {
            crate::warn_if!(context.config().log_degraded, "show_puzzles: {e}");
            e.to_string()
        }
    }
}

/// Fixed `(module, action) -> path` table.
#[derive(Debug, Clone, Default)]
pub struct PuzzleTable(BTreeMap<(KString, KString), String>);

impl PuzzleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: &str, action: &str, path: impl Into<String>) {
        self.0.insert((KString::from_ref(module), KString::from_ref(action)), path.into());
    }
}

impl<'e> FromIterator<&'e PuzzleEntry> for PuzzleTable {
    fn from_iter<I: IntoIterator<Item = &'e PuzzleEntry>>(iter: I) -> Self {
        let mut table = PuzzleTable::new();
        for e in iter {
            table.insert(&e.module, &e.action, e.path.clone());
        }
        table
    }
}

impl PuzzleRenderer for PuzzleTable {
    fn show_puzzles_path(
        &self, _context: &RequestContext, module: &str, action: &str
    ) -> Result<String, PuzzleError> {
        self.0.get(&(KString::from_ref(module), KString::from_ref(action)))
            .cloned()
            .ok_or_else(|| PuzzleError::NotConfigured {
                module: module.into(),
                action: action.into(),
            })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestRequest;

    #[test]
    fn t_show_puzzles() {
        let t = TestRequest::new();
        let ctx = t.context();
        assert_eq!(show_puzzles(&ctx, "users", "register"), "puzzles/math");
        assert_eq!(show_puzzles(&ctx, "users", "login"),
                   "no puzzles configured for users/login");
    }

    #[test]
    fn t_failing_renderer() {
        struct Broken;
        impl PuzzleRenderer for Broken {
            fn show_puzzles_path(
                &self, _: &RequestContext, module: &str, action: &str
            ) -> Result<String, PuzzleError> {
                Err(PuzzleError::Failed {
                    module: module.into(), action: action.into(),
                    message: "template missing".into()
                })
            }
        }
        let broken = Broken;
        let mut t = TestRequest::new();
        t.puzzles = Some(&broken);
        let ctx = t.context();
        assert_eq!(show_puzzles(&ctx, "news", "comment"),
                   "puzzles for news/comment: template missing");
    }

    #[test]
    fn t_from_entries() {
        let entries = [PuzzleEntry { module: "a".into(), action: "b".into(), path: "p".into() }];
        let table: PuzzleTable = entries.iter().collect();
        let t = TestRequest::new();
        assert_eq!(table.show_puzzles_path(&t.context(), "a", "b"), Ok("p".into()));
        assert!(table.show_puzzles_path(&t.context(), "b", "a").is_err());
    }
}
