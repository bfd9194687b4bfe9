//! Request handlers.
//!
//! Handlers delegate to the injected [`ScriptStore`](abinject_db::store::ScriptStore)
//! and map errors via [`AppError`](crate::error::AppError).

pub mod public;
pub mod scripts;
