//! Domain logic for the script injection platform.
//!
//! Everything here is pure: no I/O, no database, no HTTP. The `db` and `api`
//! crates build on these modules.

pub mod embed;
pub mod error;
pub mod pagination;
pub mod publication;
pub mod public_id;
pub mod syntax;
pub mod types;
pub mod wrapper;
