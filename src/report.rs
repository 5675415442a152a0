use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::data::defaults::Defaults;
use crate::data::error::{DataError, Stage};
use crate::data::filter;
use crate::data::model::{CategoricalColumn, CleanedRecord, NumericColumn};
use crate::stats;

// ---------------------------------------------------------------------------
// Summary types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: &'static str,
    pub label: &'static str,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample variance (n - 1).
    pub variance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub column: &'static str,
    pub label: &'static str,
    pub mode: String,
    /// Occurrences of `mode`.
    pub occurrences: usize,
}

/// Per-column statistics of the cleaned dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub numeric: Vec<NumericSummary>,
    pub categorical: Vec<CategoricalSummary>,
}

/// Everything the run prints, also serializable as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub defaults: Defaults,
    pub target_item: String,
    pub target_total: f64,
    pub revenue_by_item: BTreeMap<String, f64>,
    pub summary: Summary,
}

// ---------------------------------------------------------------------------
// Summarizer
// ---------------------------------------------------------------------------

/// Mean, median and sample variance per numeric column; mode per categorical
/// column. `Total Spent` is skipped when the source did not carry it.
///
/// Fewer than two rows is an `InsufficientData` error (variance undefined).
pub fn summarize(records: &[CleanedRecord]) -> Result<Summary, DataError> {
    let mut numeric = Vec::new();
    for column in NumericColumn::ALL {
        let values: Vec<f64> = records.iter().filter_map(|r| r.numeric(column)).collect();
        if column == NumericColumn::TotalSpent && values.is_empty() {
            continue;
        }
        numeric.push(summarize_numeric(column, &values)?);
    }

    let categorical = CategoricalColumn::ALL
        .into_iter()
        .map(|column| {
            let (mode, occurrences) = stats::mode(records.iter().map(|r| r.categorical(column)))
                .ok_or_else(|| DataError::EmptyInput {
                    stage: Stage::Summarize,
                    column: column.header(),
                })?;
            Ok(CategoricalSummary {
                column: column.header(),
                label: column.label(),
                mode: mode.to_string(),
                occurrences,
            })
        })
        .collect::<Result<Vec<_>, DataError>>()?;

    Ok(Summary {
        rows: records.len(),
        numeric,
        categorical,
    })
}

fn summarize_numeric(column: NumericColumn, values: &[f64]) -> Result<NumericSummary, DataError> {
    let insufficient = |statistic: &'static str, required: usize| DataError::InsufficientData {
        stage: Stage::Summarize,
        column: column.header(),
        statistic,
        required,
        found: values.len(),
    };

    Ok(NumericSummary {
        column: column.header(),
        label: column.label(),
        count: values.len(),
        mean: stats::mean(values).ok_or_else(|| insufficient("mean", 1))?,
        median: stats::median(values).ok_or_else(|| insufficient("median", 1))?,
        variance: stats::sample_variance(values).ok_or_else(|| insufficient("variance", 2))?,
    })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

impl Report {
    /// Build the report from the cleaned rows.
    pub fn build(
        defaults: Defaults,
        records: &[CleanedRecord],
        target_item: &str,
    ) -> Result<Self, DataError> {
        let target_total = filter::total_for(
            records,
            CategoricalColumn::Item,
            target_item,
            NumericColumn::CorrectedTotal,
        );
        let revenue_by_item =
            filter::totals_by(records, CategoricalColumn::Item, NumericColumn::CorrectedTotal);
        let summary = summarize(records)?;

        Ok(Report {
            defaults,
            target_item: target_item.to_string(),
            target_total,
            revenue_by_item,
            summary,
        })
    }

    /// Human-readable text, numbers shown with `decimals` places.
    pub fn render(&self, decimals: usize) -> String {
        let mut out = String::new();
        let d = decimals;

        // Writing into a String cannot fail.
        let _ = writeln!(out, "--- Total Spent on {} ---", self.target_item);
        let _ = writeln!(out, "total:      {:.d$}", self.target_total);

        let _ = writeln!(out, "\n--- Revenue by Item ---");
        for (item, total) in &self.revenue_by_item {
            let _ = writeln!(out, "{item:<16}{total:>12.d$}");
        }

        for n in &self.summary.numeric {
            let _ = writeln!(out, "\n--- Analysis: {} [{}] ---", n.label, n.column);
            let _ = writeln!(out, "Mean:       {:.d$}", n.mean);
            let _ = writeln!(out, "Median:     {:.d$}", n.median);
            let _ = writeln!(out, "Variance:   {:.d$}", n.variance);
        }

        for c in &self.summary.categorical {
            let _ = writeln!(out, "\n--- Trend: {} [{}] ---", c.label, c.column);
            let _ = writeln!(out, "Most Common (Mode): {} ({} rows)", c.mode, c.occurrences);
        }

        out
    }
}
