use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;

use super::error::{DataError, Stage};
use super::model::{CategoricalColumn, CleanedRecord, NumericColumn, TRANSACTION_ID};

/// Write cleaned rows to `path`, replacing any existing file.
pub fn write_cleaned(path: &Path, records: &[CleanedRecord]) -> Result<(), DataError> {
    let file = File::create(path).map_err(|source| DataError::Io {
        stage: Stage::Write,
        source,
    })?;
    write_records(file, records)?;
    info!("wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Serialize rows in input order, one output row per record.
///
/// `Total Spent` is only emitted when the rows carry it, so a source without
/// that column round-trips without gaining an empty one.
pub fn write_records<W: Write>(sink: W, records: &[CleanedRecord]) -> Result<(), DataError> {
    let csv_err = |e| DataError::from_csv(Stage::Write, e);
    let with_total_spent = records.iter().any(|r| r.total_spent.is_some());

    let mut header = vec![
        TRANSACTION_ID,
        CategoricalColumn::Item.header(),
        NumericColumn::Quantity.header(),
        NumericColumn::PricePerUnit.header(),
    ];
    if with_total_spent {
        header.push(NumericColumn::TotalSpent.header());
    }
    header.extend([
        CategoricalColumn::PaymentMethod.header(),
        CategoricalColumn::Location.header(),
        CategoricalColumn::TransactionDate.header(),
        NumericColumn::CorrectedTotal.header(),
    ]);

    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(&header).map_err(csv_err)?;

    for r in records {
        let mut row = vec![
            r.transaction_id.clone(),
            r.item.clone(),
            r.quantity.to_string(),
            r.price_per_unit.to_string(),
        ];
        if with_total_spent {
            row.push(r.total_spent.map(|v| v.to_string()).unwrap_or_default());
        }
        row.extend([
            r.payment_method.clone(),
            r.location.clone(),
            r.transaction_date.clone(),
            r.corrected_total.to_string(),
        ]);
        writer.write_record(&row).map_err(csv_err)?;
    }

    writer.flush().map_err(|source| DataError::Io {
        stage: Stage::Write,
        source,
    })
}
