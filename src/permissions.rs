//! Classifying the current user, for the `is_*` and `solved_puzzles`
//! builtins.

use serde::Deserialize;

use crate::value::Value;

/// Predicates over the (opaque) current user value. `Value::Null` is
/// the anonymous user and must be handled like any other. For any
/// user, exactly one of `is_stranger`, `is_guest` and `is_registered`
/// must hold.
pub trait UserClassifier {
    fn is_stranger(&self, user: &Value) -> bool;
    fn is_guest(&self, user: &Value) -> bool;
    fn is_registered(&self, user: &Value) -> bool;
    fn is_moderator(&self, user: &Value) -> bool;
    fn is_admin(&self, user: &Value) -> bool;
    fn solved_puzzles(&self, user: &Value) -> bool;
}

/// Minimum levels; below `guest` is a stranger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LevelThresholds {
    pub guest: i64,
    pub registered: i64,
    pub moderator: i64,
    pub admin: i64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        LevelThresholds {
            guest: 1,
            registered: 100,
            moderator: 200,
            admin: 300,
        }
    }
}

pub const LEVEL_KEY: &str = "level";
pub const PUZZLES_SOLVED_KEY: &str = "puzzles_solved";

/// Classifies by the integer `level` field of the user map. Missing
/// users, users that aren't maps and missing or non-integer levels
/// count as level 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelClassifier {
    pub thresholds: LevelThresholds,
}

impl LevelClassifier {
    pub fn new(thresholds: LevelThresholds) -> Self {
        Self { thresholds }
    }

    pub fn level(user: &Value) -> i64 {
        user.get(LEVEL_KEY).and_then(Value::as_i64).unwrap_or(0)
    }
}

impl UserClassifier for LevelClassifier {
    fn is_stranger(&self, user: &Value) -> bool {
        Self::level(user) < self.thresholds.guest
    }
    fn is_guest(&self, user: &Value) -> bool {
        let l = Self::level(user);
        // registered wins should the thresholds overlap
        l >= self.thresholds.guest && l < self.thresholds.registered
    }
    fn is_registered(&self, user: &Value) -> bool {
        let l = Self::level(user);
        l >= self.thresholds.registered && l >= self.thresholds.guest
    }
    fn is_moderator(&self, user: &Value) -> bool {
        Self::level(user) >= self.thresholds.moderator
    }
    fn is_admin(&self, user: &Value) -> bool {
        Self::level(user) >= self.thresholds.admin
    }
    fn solved_puzzles(&self, user: &Value) -> bool {
        matches!(user.get(PUZZLES_SOLVED_KEY), Some(Value::Bool(true)))
    }
}
