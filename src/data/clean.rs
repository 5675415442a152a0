use log::info;

use super::defaults::Defaults;
use super::error::{DataError, Stage};
use super::model::{is_sentinel, CategoricalColumn, CleanedRecord, NumericColumn, RawRecord};

/// Clean every row independently. Output order follows input order.
pub fn clean_all(records: &[RawRecord], defaults: &Defaults) -> Result<Vec<CleanedRecord>, DataError> {
    let cleaned = records
        .iter()
        .map(|r| clean_record(r, defaults))
        .collect::<Result<Vec<_>, _>>()?;
    info!("cleaned {} rows", cleaned.len());
    Ok(cleaned)
}

/// Resolve sentinels in one row and derive `Corrected Total`.
pub fn clean_record(raw: &RawRecord, defaults: &Defaults) -> Result<CleanedRecord, DataError> {
    let quantity = number_or(raw, NumericColumn::Quantity, defaults.quantity)?;
    let price_per_unit = number_or(raw, NumericColumn::PricePerUnit, defaults.price_per_unit)?;
    // A missing stored total is superseded by Corrected Total, so 0.0 stands in.
    let total_spent = match raw.total_spent {
        Some(_) => Some(number_or(raw, NumericColumn::TotalSpent, 0.0)?),
        None => None,
    };

    Ok(CleanedRecord {
        transaction_id: raw.transaction_id.clone(),
        item: label_or(raw, CategoricalColumn::Item, defaults)?,
        quantity,
        price_per_unit,
        total_spent,
        payment_method: label_or(raw, CategoricalColumn::PaymentMethod, defaults)?,
        location: label_or(raw, CategoricalColumn::Location, defaults)?,
        transaction_date: label_or(raw, CategoricalColumn::TransactionDate, defaults)?,
        corrected_total: quantity * price_per_unit,
    })
}

fn number_or(raw: &RawRecord, column: NumericColumn, fallback: f64) -> Result<f64, DataError> {
    match raw.numeric(column) {
        Some(v) if !is_sentinel(v) => column.parse(v, raw.line, Stage::Clean),
        _ => Ok(fallback),
    }
}

fn label_or(
    raw: &RawRecord,
    column: CategoricalColumn,
    defaults: &Defaults,
) -> Result<String, DataError> {
    let value = raw.categorical(column);
    if is_sentinel(value) {
        Ok(defaults.categorical(column).to_string())
    } else {
        column.parse(value, raw.line, Stage::Clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Defaults {
        Defaults {
            quantity: 3.0,
            price_per_unit: 2.95,
            item: "Coffee".to_string(),
            payment_method: "Digital Wallet".to_string(),
            location: "Takeaway".to_string(),
            transaction_date: "2023-06-16".to_string(),
        }
    }

    fn raw(item: &str, quantity: &str, price: &str) -> RawRecord {
        RawRecord {
            line: 2,
            transaction_id: "TXN_1961373".to_string(),
            item: item.to_string(),
            quantity: quantity.to_string(),
            price_per_unit: price.to_string(),
            total_spent: Some("7.5".to_string()),
            payment_method: "Credit Card".to_string(),
            location: "In-store".to_string(),
            transaction_date: "2023-09-08".to_string(),
        }
    }

    #[test]
    fn sentinel_item_takes_mode_and_total_is_derived() {
        let cleaned = clean_record(&raw("ERROR", "3", "2.5"), &defaults()).unwrap();
        assert_eq!(cleaned.item, "Coffee");
        assert_eq!(cleaned.quantity, 3.0);
        assert_eq!(cleaned.price_per_unit, 2.5);
        assert_eq!(cleaned.corrected_total, 7.5);
    }

    #[test]
    fn clean_values_pass_through_unchanged() {
        let input = raw("Tea", "4", "1.5");
        let cleaned = clean_record(&input, &defaults()).unwrap();
        assert_eq!(cleaned.transaction_id, input.transaction_id);
        assert_eq!(cleaned.item, "Tea");
        assert_eq!(cleaned.quantity, 4.0);
        assert_eq!(cleaned.price_per_unit, 1.5);
        assert_eq!(cleaned.total_spent, Some(7.5));
        assert_eq!(cleaned.payment_method, "Credit Card");
        assert_eq!(cleaned.location, "In-store");
        assert_eq!(cleaned.transaction_date, "2023-09-08");
    }

    #[test]
    fn defaulted_numbers_still_multiply_exactly() {
        let cleaned = clean_record(&raw("Tea", "UNKNOWN", ""), &defaults()).unwrap();
        assert_eq!(cleaned.quantity, 3.0);
        assert_eq!(cleaned.price_per_unit, 2.95);
        assert_eq!(cleaned.corrected_total, 3.0 * 2.95);
    }

    #[test]
    fn every_categorical_sentinel_is_replaced() {
        let mut input = raw("Tea", "1", "1.0");
        input.payment_method = "UNKNOWN".to_string();
        input.location = "".to_string();
        input.transaction_date = "ERROR".to_string();
        input.total_spent = Some("ERROR".to_string());
        let cleaned = clean_record(&input, &defaults()).unwrap();
        assert_eq!(cleaned.payment_method, "Digital Wallet");
        assert_eq!(cleaned.location, "Takeaway");
        assert_eq!(cleaned.transaction_date, "2023-06-16");
        assert_eq!(cleaned.total_spent, Some(0.0));
    }

    #[test]
    fn bad_date_reports_clean_stage() {
        let mut input = raw("Tea", "1", "1.0");
        input.transaction_date = "yesterday".to_string();
        let err = clean_record(&input, &defaults()).unwrap_err();
        assert_eq!(err.stage(), Stage::Clean);
        assert!(err.to_string().contains("Transaction Date"));
    }

    #[test]
    fn input_rows_are_left_untouched() {
        let rows = vec![raw("ERROR", "2", "2.0"), raw("Cake", "ERROR", "3.0")];
        let before = rows.clone();
        let cleaned = clean_all(&rows, &defaults()).unwrap();
        assert_eq!(rows, before);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[1].item, "Cake");
        assert_eq!(cleaned[1].corrected_total, 9.0);
    }
}
