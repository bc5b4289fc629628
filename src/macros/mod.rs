//! Declarative macros for must-try.

// Both macros are defined with #[macro_export], which exports them at crate root
#[macro_use]
mod raise;
#[macro_use]
mod try_catch;
