use log::debug;
use serde::Serialize;

use super::error::{DataError, Stage};
use super::model::{is_sentinel, CategoricalColumn, NumericColumn, RawRecord};
use crate::stats;

/// Fallback values substituted for sentinels, derived once from the raw rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Defaults {
    /// Median of valid quantities. May be fractional for an even count.
    pub quantity: f64,
    /// Mean of valid unit prices.
    pub price_per_unit: f64,
    pub item: String,
    pub payment_method: String,
    pub location: String,
    pub transaction_date: String,
}

impl Defaults {
    /// Scan the raw rows. Sentinels never contribute; a non-sentinel that
    /// does not parse is an error rather than being skipped.
    pub fn compute(records: &[RawRecord]) -> Result<Self, DataError> {
        let quantities = valid_numbers(records, NumericColumn::Quantity)?;
        let prices = valid_numbers(records, NumericColumn::PricePerUnit)?;

        let defaults = Defaults {
            quantity: stats::median(&quantities)
                .ok_or_else(|| empty(NumericColumn::Quantity.header()))?,
            price_per_unit: stats::mean(&prices)
                .ok_or_else(|| empty(NumericColumn::PricePerUnit.header()))?,
            item: mode_of(records, CategoricalColumn::Item)?,
            payment_method: mode_of(records, CategoricalColumn::PaymentMethod)?,
            location: mode_of(records, CategoricalColumn::Location)?,
            transaction_date: mode_of(records, CategoricalColumn::TransactionDate)?,
        };
        debug!("computed defaults: {defaults:?}");
        Ok(defaults)
    }

    pub fn categorical(&self, column: CategoricalColumn) -> &str {
        match column {
            CategoricalColumn::Item => &self.item,
            CategoricalColumn::PaymentMethod => &self.payment_method,
            CategoricalColumn::Location => &self.location,
            CategoricalColumn::TransactionDate => &self.transaction_date,
        }
    }
}

fn empty(column: &'static str) -> DataError {
    DataError::EmptyInput {
        stage: Stage::ComputeDefaults,
        column,
    }
}

fn valid_numbers(records: &[RawRecord], column: NumericColumn) -> Result<Vec<f64>, DataError> {
    records
        .iter()
        .filter_map(|r| r.numeric(column).map(|v| (r.line, v)))
        .filter(|(_, v)| !is_sentinel(v))
        .map(|(line, v)| column.parse(v, line, Stage::ComputeDefaults))
        .collect()
}

fn mode_of(records: &[RawRecord], column: CategoricalColumn) -> Result<String, DataError> {
    let values = records
        .iter()
        .map(|r| r.categorical(column))
        .filter(|v| !is_sentinel(v));
    stats::mode(values)
        .map(|(value, _)| value.to_string())
        .ok_or_else(|| empty(column.header()))
}
