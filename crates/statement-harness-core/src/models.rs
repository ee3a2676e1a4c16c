//! Canonical data model produced by every format parser.
//!
//! A parser turns a bank-specific export into [`CanonicalTransaction`]s.
//! The orchestrator tags them with their source file ([`FileTransaction`])
//! and the dedup step turns them into the externally visible
//! [`ParsedTransaction`].

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};

/// The exact serialized field set of a [`CanonicalTransaction`].
pub const CANONICAL_FIELDS: [&str; 12] = [
    "date",
    "country",
    "account_amount",
    "spending_amount",
    "title",
    "account_currency",
    "spending_currency",
    "type",
    "key",
    "spending_account_rate",
    "user_amount",
    "user_currency",
];

/// Direction of a transaction.
///
/// Variant order matters: sorting ascending puts credits before debits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    /// Classify a raw source value: an exact match on the format's credit
    /// token is a credit, anything else is a debit.
    pub fn from_marker(value: &str, credit_token: &str) -> Self {
        if value.trim() == credit_token {
            TransactionType::Credit
        } else {
            TransactionType::Debit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "CREDIT",
            TransactionType::Debit => "DEBIT",
        }
    }
}

/// An amount in minor currency units with its ISO currency code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    pub amount: u64,
    pub currency: String,
}

impl Money {
    pub fn new(amount: u64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

/// One source file to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub id: String,
    pub url: String,
}

impl FileDescriptor {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

/// Normalized, format-independent transaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTransaction {
    pub date: NaiveDate,
    pub country: Option<String>,
    pub account_amount: u64,
    pub spending_amount: u64,
    pub title: String,
    pub account_currency: String,
    pub spending_currency: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub key: String,
    /// `None` when `account_amount` is zero and the rate is undefined.
    pub spending_account_rate: Option<f64>,
    pub user_amount: u64,
    pub user_currency: String,
}

impl CanonicalTransaction {
    /// Build a record from its account and spending sides.
    ///
    /// The user side mirrors the account side, and the rate is derived
    /// from the two amounts.
    pub fn assemble(
        key: String,
        date: NaiveDate,
        title: String,
        kind: TransactionType,
        country: Option<String>,
        account: Money,
        spending: Money,
    ) -> Self {
        Self {
            date,
            country,
            account_amount: account.amount,
            spending_amount: spending.amount,
            title,
            spending_account_rate: crate::amount::spending_account_rate(
                spending.amount,
                account.amount,
            ),
            user_amount: account.amount,
            user_currency: account.currency.clone(),
            account_currency: account.currency,
            spending_currency: spending.currency,
            kind,
            key,
        }
    }
}

/// A canonical record tagged with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FileTransaction {
    pub file_id: String,
    pub transaction: CanonicalTransaction,
}

/// The pipeline's output unit: canonical fields plus file id and the
/// duplicate flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    #[serde(flatten)]
    pub transaction: CanonicalTransaction,
    pub file_id: String,
    pub is_duplicate: bool,
}

/// Verify that every row serializes to exactly [`CANONICAL_FIELDS`] and
/// carries well-formed currency codes.
pub fn check_shape(rows: &[CanonicalTransaction]) -> Result<()> {
    let expected: BTreeSet<&str> = CANONICAL_FIELDS.iter().copied().collect();

    for (i, row) in rows.iter().enumerate() {
        let value = serde_json::to_value(row)
            .map_err(|e| ParseError::SchemaMismatch(format!("row {}: {}", i + 1, e)))?;
        let object = value.as_object().ok_or_else(|| {
            ParseError::SchemaMismatch(format!("row {} is not a record", i + 1))
        })?;

        let actual: BTreeSet<&str> = object.keys().map(String::as_str).collect();
        if actual != expected {
            let missing: Vec<&str> = expected.difference(&actual).copied().collect();
            let extra: Vec<&str> = actual.difference(&expected).copied().collect();
            return Err(ParseError::SchemaMismatch(format!(
                "row {}: missing {:?}, unexpected {:?}",
                i + 1,
                missing,
                extra
            )));
        }

        for (field, code) in [
            ("account_currency", &row.account_currency),
            ("spending_currency", &row.spending_currency),
            ("user_currency", &row.user_currency),
        ] {
            if !is_currency_code(code) {
                return Err(ParseError::SchemaMismatch(format!(
                    "row {}: {} '{}' is not a 3-letter currency code",
                    i + 1,
                    field,
                    code
                )));
            }
        }
    }

    Ok(())
}

/// True for three ASCII uppercase letters.
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CanonicalTransaction {
        CanonicalTransaction::assemble(
            "abc".into(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            "Coffee".into(),
            TransactionType::Debit,
            None,
            Money::new(450, "CHF"),
            Money::new(480, "EUR"),
        )
    }

    #[test]
    fn test_serialized_fields_match_canonical_set() {
        let value = serde_json::to_value(sample()).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        keys.sort();
        let mut expected = CANONICAL_FIELDS.to_vec();
        expected.sort();
        assert_eq!(keys, expected);
        assert_eq!(value["type"], "DEBIT");
        assert!(value["country"].is_null());
    }

    #[test]
    fn test_check_shape_accepts_valid_rows() {
        check_shape(&[sample(), sample()]).unwrap();
    }

    #[test]
    fn test_check_shape_rejects_bad_currency() {
        let mut row = sample();
        row.spending_currency = "€".into();
        let err = check_shape(&[row]).unwrap_err();
        assert!(matches!(err, ParseError::SchemaMismatch(_)));
    }

    #[test]
    fn test_assemble_mirrors_user_side() {
        let row = sample();
        assert_eq!(row.user_amount, 450);
        assert_eq!(row.user_currency, "CHF");
        let rate = row.spending_account_rate.unwrap();
        assert!((rate - 480.0 / 450.0).abs() < 1e-12);
    }

    #[test]
    fn test_parsed_transaction_flattens() {
        let parsed = ParsedTransaction {
            transaction: sample(),
            file_id: "f1".into(),
            is_duplicate: true,
        };
        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(value["file_id"], "f1");
        assert_eq!(value["is_duplicate"], true);
        assert_eq!(value["title"], "Coffee");
        assert_eq!(value.as_object().unwrap().len(), 14);
    }

    #[test]
    fn test_credit_marker_is_exact() {
        assert_eq!(
            TransactionType::from_marker(" Gutschrift ", "Gutschrift"),
            TransactionType::Credit
        );
        assert_eq!(
            TransactionType::from_marker("Gutschrift storniert", "Gutschrift"),
            TransactionType::Debit
        );
        assert_eq!(
            TransactionType::from_marker("", "Gutschrift"),
            TransactionType::Debit
        );
    }
}
