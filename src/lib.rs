//! Vaultfill: fill placeholder templates in JSON documents.
//!
//! Generates random secrets (`{{alnum:32}}`, `{{b64:16}}`), pulls values from
//! the environment (`{{env:NAME}}`), and cross-references other strings in the
//! same document (`{{ref:'db','password'}}`).

pub mod cli;
pub mod core;
