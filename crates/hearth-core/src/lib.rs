//! Core types and trait definitions for Hearth family-member records.
//!
//! This crate is free of HTTP and database dependencies. The API server, the
//! SQLite backend and the terminal client all depend on it.

// Native `async fn` in traits; the trait spells out `Send` futures itself.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod memory;
pub mod record;
pub mod store;

pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use record::{Field, Record, RecordFields, RecordId};
pub use store::RecordStore;
