//! # Statement Harness Core
//!
//! Shared, I/O-free logic for Statement Harness: the canonical transaction
//! model, raw tables, amount normalization, identity keys, batch
//! sort/dedup/grouping, and the persisted-key store abstraction.
//!
//! This crate contains no tokio, sqlx, spreadsheet readers, or network
//! clients. Everything here is deterministic and unit-testable in isolation.

pub mod amount;
pub mod batch;
pub mod error;
pub mod key;
pub mod models;
pub mod store;
pub mod table;

pub use batch::BatchSummary;
pub use error::{ParseError, Result};
pub use models::{
    CanonicalTransaction, FileDescriptor, FileTransaction, Money, ParsedTransaction,
    TransactionType,
};
pub use table::{RawCell, RawRow, RawTable};
pub use store::{memory::InMemoryKeyStore, KeyStore};
