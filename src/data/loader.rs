use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;

use super::error::{DataError, Stage};
use super::model::{CategoricalColumn, CleanedRecord, NumericColumn, RawRecord, TRANSACTION_ID};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the raw sales export from disk.
pub fn load_raw(path: &Path) -> Result<Vec<RawRecord>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        stage: Stage::Load,
        source,
    })?;
    let records = read_raw(file)?;
    info!("loaded {} rows from {}", records.len(), path.display());
    Ok(records)
}

/// Load a file previously produced by the writer back into typed records.
pub fn load_cleaned(path: &Path) -> Result<Vec<CleanedRecord>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        stage: Stage::Load,
        source,
    })?;
    read_cleaned(file)
}

// ---------------------------------------------------------------------------
// Raw reader
// ---------------------------------------------------------------------------

/// Header positions of the columns a raw row must carry.
struct Layout {
    transaction_id: usize,
    item: usize,
    quantity: usize,
    price_per_unit: usize,
    total_spent: Option<usize>,
    payment_method: usize,
    location: usize,
    transaction_date: usize,
}

impl Layout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DataError> {
        if headers.iter().all(|h| h.is_empty()) {
            return Err(DataError::MalformedInput {
                stage: Stage::Load,
                reason: "file has no header row".to_string(),
            });
        }

        let position = |name: &str| headers.iter().position(|h| h == name);
        let required = |name: &'static str| {
            position(name).ok_or_else(|| DataError::MalformedInput {
                stage: Stage::Load,
                reason: format!("header is missing column '{name}'"),
            })
        };

        Ok(Layout {
            transaction_id: required(TRANSACTION_ID)?,
            item: required(CategoricalColumn::Item.header())?,
            quantity: required(NumericColumn::Quantity.header())?,
            price_per_unit: required(NumericColumn::PricePerUnit.header())?,
            total_spent: position(NumericColumn::TotalSpent.header()),
            payment_method: required(CategoricalColumn::PaymentMethod.header())?,
            location: required(CategoricalColumn::Location.header())?,
            transaction_date: required(CategoricalColumn::TransactionDate.header())?,
        })
    }
}

/// Read raw rows from any CSV source. Cells stay as text; sentinels are kept.
pub fn read_raw<R: Read>(source: R) -> Result<Vec<RawRecord>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| DataError::from_csv(Stage::Load, e))?
        .clone();
    let layout = Layout::from_headers(&headers)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| DataError::from_csv(Stage::Load, e))?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        // Field count is enforced by the reader, so every index is present.
        let cell = |idx: usize| row.get(idx).unwrap_or_default().to_string();

        records.push(RawRecord {
            line,
            transaction_id: cell(layout.transaction_id),
            item: cell(layout.item),
            quantity: cell(layout.quantity),
            price_per_unit: cell(layout.price_per_unit),
            total_spent: layout.total_spent.map(cell),
            payment_method: cell(layout.payment_method),
            location: cell(layout.location),
            transaction_date: cell(layout.transaction_date),
        });
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Cleaned reader
// ---------------------------------------------------------------------------

pub fn read_cleaned<R: Read>(source: R) -> Result<Vec<CleanedRecord>, DataError> {
    let mut reader = csv::Reader::from_reader(source);
    let records = reader
        .deserialize()
        .map(|row| row.map_err(|e| DataError::from_csv(Stage::Load, e)))
        .collect::<Result<Vec<CleanedRecord>, _>>()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Transaction ID,Item,Quantity,Price Per Unit,Total Spent,Payment Method,Location,Transaction Date";

    #[test]
    fn reads_rows_and_keeps_sentinels() {
        let csv = format!(
            "{HEADER}\n\
             TXN_1,Coffee,2,2.0,4.0,Cash,In-store,2023-09-08\n\
             TXN_2,ERROR,UNKNOWN,,4.0,\"Credit Card\",UNKNOWN,2023-05-16\n"
        );
        let records = read_raw(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].item, "Coffee");
        assert_eq!(records[0].total_spent.as_deref(), Some("4.0"));
        assert_eq!(records[0].line, 2);
        assert_eq!(records[1].item, "ERROR");
        assert_eq!(records[1].quantity, "UNKNOWN");
        assert_eq!(records[1].price_per_unit, "");
        assert_eq!(records[1].payment_method, "Credit Card");
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn quoted_commas_stay_in_one_cell() {
        let csv = format!("{HEADER}\nTXN_1,\"Cake, Slice\",1,3.0,3.0,Cash,Takeaway,2023-01-01\n");
        let records = read_raw(csv.as_bytes()).unwrap();
        assert_eq!(records[0].item, "Cake, Slice");
        assert_eq!(records[0].location, "Takeaway");
    }

    #[test]
    fn total_spent_column_is_optional() {
        let csv = "Transaction ID,Item,Quantity,Price Per Unit,Payment Method,Location,Transaction Date\n\
                   TXN_1,Tea,1,1.5,Cash,In-store,2023-02-02\n";
        let records = read_raw(csv.as_bytes()).unwrap();
        assert_eq!(records[0].total_spent, None);
    }

    #[test]
    fn missing_header_column_is_malformed() {
        let csv = "Transaction ID,Item,Quantity,Payment Method,Location,Transaction Date\n";
        let err = read_raw(csv.as_bytes()).unwrap_err();
        match err {
            DataError::MalformedInput { stage, reason } => {
                assert_eq!(stage, Stage::Load);
                assert!(reason.contains("Price Per Unit"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_file_is_malformed() {
        let err = read_raw("".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MalformedInput { .. }));
    }

    #[test]
    fn short_row_is_malformed() {
        let csv = format!("{HEADER}\nTXN_1,Coffee,2\n");
        let err = read_raw(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MalformedInput { .. }), "{err}");
    }
}
