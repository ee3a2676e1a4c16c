//! Content-derived identity keys.
//!
//! A key is computed from the raw text of a format's key columns before
//! any transform runs, so two exports of the same booking produce the same
//! key in every process.
//!
//! Date cells from spreadsheets are rendered in the format's own text date
//! pattern, so a booking keys the same from a CSV and an xlsx export.
//! Numeric amount cells still render as plain numbers (`4.5`, not `4.50`).

use sha2::{Digest, Sha256};

use crate::table::{RawCell, RawRow};

/// Joins the raw key-column values before hashing.
pub const KEY_SEPARATOR: &str = "_";

/// Number of lowercase hex characters kept from the digest.
pub const KEY_LENGTH: usize = 25;

/// Hash already-rendered key parts.
pub fn derive_key<S: AsRef<str>>(parts: &[S]) -> String {
    let joined = parts
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR);
    let digest = Sha256::digest(joined.as_bytes());
    let mut key = hex::encode(digest);
    key.truncate(KEY_LENGTH);
    key
}

/// Key for one row from the named columns, in order.
///
/// `date_format` renders date cells the way the text export prints them.
pub fn row_key(row: &RawRow<'_>, columns: &[&str], date_format: &str) -> String {
    let parts: Vec<String> = columns
        .iter()
        .map(|c| match row.get(c) {
            RawCell::Date(d) => d.format(date_format).to_string(),
            cell => cell.raw_text(),
        })
        .collect();
    derive_key(&parts)
}
