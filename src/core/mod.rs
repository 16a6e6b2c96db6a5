//! Core resolution logic: types, generation, paths, matching, passes.

pub mod engine;
pub mod generate;
pub mod matcher;
pub mod path;
pub mod resolver;
pub mod types;
