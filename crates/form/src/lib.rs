//! Host form collaborators.
//!
//! The scanner never touches a form document directly. Everything it needs
//! from the host (the scan input field, the warehouse selector, the child
//! item table and its row-add trigger) is reached through the traits in this
//! crate, so the host framework can be swapped for an in-memory table in
//! tests or in the command-line tool.

pub mod error;
pub mod field;
mod row;
pub mod table;

pub use crate::field::{FieldHandle, FormField, MemoryField};
pub use crate::row::{Fields, Row};
pub use crate::table::{HookHandle, RowHook, RowStore, TableHandle};
