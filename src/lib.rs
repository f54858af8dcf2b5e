pub mod warn;
pub mod boxed_error;
pub mod value;
pub mod path_access;
pub mod predicates;
pub mod float_format;
pub mod date_format;
pub mod html;
pub mod query;
pub mod form;
pub mod config;
pub mod permissions;
pub mod puzzles;
pub mod context;
pub mod registry;

#[cfg(test)]
pub mod testing;

pub use registry::{builtins, Builtins, Output, CallError, CallErrorKind};
