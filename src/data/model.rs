use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{DataError, Stage};

// ---------------------------------------------------------------------------
// Sentinels
// ---------------------------------------------------------------------------

/// Markers the export uses for "missing". Never legitimate domain values.
pub const SENTINELS: [&str; 3] = ["ERROR", "UNKNOWN", ""];

/// Whether a raw cell is a missing-value marker (surrounding whitespace ignored).
pub fn is_sentinel(value: &str) -> bool {
    SENTINELS.contains(&value.trim())
}

/// Date layout of the `Transaction Date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Column identifiers
// ---------------------------------------------------------------------------

pub const TRANSACTION_ID: &str = "Transaction ID";
pub const CORRECTED_TOTAL: &str = "Corrected Total";

/// Columns holding numbers once cleaned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericColumn {
    Quantity,
    PricePerUnit,
    TotalSpent,
    CorrectedTotal,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 4] = [
        NumericColumn::Quantity,
        NumericColumn::PricePerUnit,
        NumericColumn::TotalSpent,
        NumericColumn::CorrectedTotal,
    ];

    pub fn header(self) -> &'static str {
        match self {
            NumericColumn::Quantity => "Quantity",
            NumericColumn::PricePerUnit => "Price Per Unit",
            NumericColumn::TotalSpent => "Total Spent",
            NumericColumn::CorrectedTotal => CORRECTED_TOTAL,
        }
    }

    /// Heading used on the console report.
    pub fn label(self) -> &'static str {
        match self {
            NumericColumn::Quantity => "Quantity Sold",
            NumericColumn::PricePerUnit => "Unit Price",
            NumericColumn::TotalSpent => "Original Total Spent (from CSV)",
            NumericColumn::CorrectedTotal => "Corrected Total (Calculated)",
        }
    }

    /// Parse a non-sentinel cell. Quantity must be a whole number; the rest
    /// accept any finite decimal.
    pub fn parse(self, value: &str, line: u64, stage: Stage) -> Result<f64, DataError> {
        let text = value.trim();
        let parsed = match self {
            NumericColumn::Quantity => text.parse::<i64>().ok().map(|q| q as f64),
            _ => text.parse::<f64>().ok().filter(|v| v.is_finite()),
        };
        parsed.ok_or_else(|| DataError::Parse {
            stage,
            line,
            column: self.header(),
            value: value.to_string(),
            expected: match self {
                NumericColumn::Quantity => "an integer",
                _ => "a number",
            },
        })
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Columns holding labels, summarised by their mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoricalColumn {
    Item,
    PaymentMethod,
    Location,
    TransactionDate,
}

impl CategoricalColumn {
    pub const ALL: [CategoricalColumn; 4] = [
        CategoricalColumn::Item,
        CategoricalColumn::Location,
        CategoricalColumn::PaymentMethod,
        CategoricalColumn::TransactionDate,
    ];

    pub fn header(self) -> &'static str {
        match self {
            CategoricalColumn::Item => "Item",
            CategoricalColumn::PaymentMethod => "Payment Method",
            CategoricalColumn::Location => "Location",
            CategoricalColumn::TransactionDate => "Transaction Date",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoricalColumn::Item => "Top Selling Items",
            CategoricalColumn::PaymentMethod => "Preferred Payment Methods",
            CategoricalColumn::Location => "Top Locations",
            CategoricalColumn::TransactionDate => "Busiest Day",
        }
    }

    /// Validate a non-sentinel cell. Only dates have a format to check.
    pub fn parse(self, value: &str, line: u64, stage: Stage) -> Result<String, DataError> {
        let text = value.trim();
        if self == CategoricalColumn::TransactionDate
            && NaiveDate::parse_from_str(text, DATE_FORMAT).is_err()
        {
            return Err(DataError::Parse {
                stage,
                line,
                column: self.header(),
                value: value.to_string(),
                expected: "a YYYY-MM-DD date",
            });
        }
        Ok(text.to_string())
    }
}

impl fmt::Display for CategoricalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ---------------------------------------------------------------------------
// RawRecord – one row exactly as read
// ---------------------------------------------------------------------------

/// A sales row before cleaning; every cell is still text and may be a sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based line in the source file, for error messages.
    pub line: u64,
    pub transaction_id: String,
    pub item: String,
    pub quantity: String,
    pub price_per_unit: String,
    /// `None` when the source has no `Total Spent` column.
    pub total_spent: Option<String>,
    pub payment_method: String,
    pub location: String,
    pub transaction_date: String,
}

impl RawRecord {
    pub fn categorical(&self, column: CategoricalColumn) -> &str {
        match column {
            CategoricalColumn::Item => &self.item,
            CategoricalColumn::PaymentMethod => &self.payment_method,
            CategoricalColumn::Location => &self.location,
            CategoricalColumn::TransactionDate => &self.transaction_date,
        }
    }

    pub fn numeric(&self, column: NumericColumn) -> Option<&str> {
        match column {
            NumericColumn::Quantity => Some(&self.quantity),
            NumericColumn::PricePerUnit => Some(&self.price_per_unit),
            NumericColumn::TotalSpent => self.total_spent.as_deref(),
            NumericColumn::CorrectedTotal => None,
        }
    }
}

// ---------------------------------------------------------------------------
// CleanedRecord – sentinels resolved, derived column added
// ---------------------------------------------------------------------------

/// A fully resolved row. Built once by the cleaner and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    #[serde(rename = "Transaction ID")]
    pub transaction_id: String,
    #[serde(rename = "Item")]
    pub item: String,
    #[serde(rename = "Quantity")]
    pub quantity: f64,
    #[serde(rename = "Price Per Unit")]
    pub price_per_unit: f64,
    #[serde(rename = "Total Spent", default)]
    pub total_spent: Option<f64>,
    #[serde(rename = "Payment Method")]
    pub payment_method: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Transaction Date")]
    pub transaction_date: String,
    #[serde(rename = "Corrected Total")]
    pub corrected_total: f64,
}

impl CleanedRecord {
    pub fn categorical(&self, column: CategoricalColumn) -> &str {
        match column {
            CategoricalColumn::Item => &self.item,
            CategoricalColumn::PaymentMethod => &self.payment_method,
            CategoricalColumn::Location => &self.location,
            CategoricalColumn::TransactionDate => &self.transaction_date,
        }
    }

    pub fn numeric(&self, column: NumericColumn) -> Option<f64> {
        match column {
            NumericColumn::Quantity => Some(self.quantity),
            NumericColumn::PricePerUnit => Some(self.price_per_unit),
            NumericColumn::TotalSpent => self.total_spent,
            NumericColumn::CorrectedTotal => Some(self.corrected_total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_recognised_after_trim() {
        assert!(is_sentinel("ERROR"));
        assert!(is_sentinel(" UNKNOWN "));
        assert!(is_sentinel(""));
        assert!(!is_sentinel("Coffee"));
        assert!(!is_sentinel("error"));
    }

    #[test]
    fn quantity_rejects_fractions() {
        let err = NumericColumn::Quantity
            .parse("2.5", 4, Stage::Clean)
            .unwrap_err();
        assert!(matches!(
            err,
            DataError::Parse { line: 4, column: "Quantity", .. }
        ));
        assert_eq!(
            NumericColumn::Quantity.parse("3", 1, Stage::Clean).unwrap(),
            3.0
        );
    }

    #[test]
    fn price_rejects_non_finite() {
        assert!(NumericColumn::PricePerUnit
            .parse("NaN", 2, Stage::Clean)
            .is_err());
        assert_eq!(
            NumericColumn::PricePerUnit
                .parse("2.5", 2, Stage::Clean)
                .unwrap(),
            2.5
        );
    }

    #[test]
    fn dates_must_be_iso() {
        let date = CategoricalColumn::TransactionDate;
        assert_eq!(date.parse("2023-09-08", 1, Stage::Clean).unwrap(), "2023-09-08");
        assert!(date.parse("08/09/2023", 1, Stage::Clean).is_err());
        assert_eq!(
            CategoricalColumn::Item.parse("Tea", 1, Stage::Clean).unwrap(),
            "Tea"
        );
    }
}
