use std::collections::BTreeMap;

use super::model::{CategoricalColumn, CleanedRecord, NumericColumn};

// ---------------------------------------------------------------------------
// Row selection
// ---------------------------------------------------------------------------

/// Rows whose `column` equals `value` exactly.
pub fn matching<'a>(
    records: &'a [CleanedRecord],
    column: CategoricalColumn,
    value: &'a str,
) -> impl Iterator<Item = &'a CleanedRecord> + 'a {
    records
        .iter()
        .filter(move |r| r.categorical(column) == value)
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Sum `field` over rows where `column == value`. No matches sum to 0.0.
///
/// Rows without the field (a `Total Spent` column absent from the source)
/// contribute nothing.
pub fn total_for(
    records: &[CleanedRecord],
    column: CategoricalColumn,
    value: &str,
    field: NumericColumn,
) -> f64 {
    matching(records, column, value)
        .filter_map(|r| r.numeric(field))
        .sum()
}

/// Sum `field` for every distinct value of `column`, keyed in lexical order.
pub fn totals_by(
    records: &[CleanedRecord],
    column: CategoricalColumn,
    field: NumericColumn,
) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for r in records {
        if let Some(v) = r.numeric(field) {
            *totals.entry(r.categorical(column).to_string()).or_default() += v;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(item: &str, quantity: f64, price: f64) -> CleanedRecord {
        CleanedRecord {
            transaction_id: "TXN".to_string(),
            item: item.to_string(),
            quantity,
            price_per_unit: price,
            total_spent: None,
            payment_method: "Cash".to_string(),
            location: "In-store".to_string(),
            transaction_date: "2023-01-01".to_string(),
            corrected_total: quantity * price,
        }
    }

    #[test]
    fn sums_corrected_total_for_one_item() {
        let rows = vec![row("Coffee", 2.0, 2.0), row("Tea", 1.0, 1.5), row("Coffee", 1.0, 2.0)];
        let total = total_for(
            &rows,
            CategoricalColumn::Item,
            "Coffee",
            NumericColumn::CorrectedTotal,
        );
        assert_eq!(total, 6.0);
        assert_eq!(matching(&rows, CategoricalColumn::Item, "Tea").count(), 1);
    }

    #[test]
    fn no_match_is_zero() {
        let rows = vec![row("Tea", 1.0, 1.5)];
        let total = total_for(
            &rows,
            CategoricalColumn::Item,
            "Coffee",
            NumericColumn::CorrectedTotal,
        );
        assert_eq!(total, 0.0);
        assert_eq!(
            total_for(&[], CategoricalColumn::Item, "Coffee", NumericColumn::CorrectedTotal),
            0.0
        );
    }

    #[test]
    fn missing_field_contributes_nothing() {
        let rows = vec![row("Tea", 1.0, 1.5)];
        let total = total_for(&rows, CategoricalColumn::Item, "Tea", NumericColumn::TotalSpent);
        assert_eq!(total, 0.0);
    }

    #[test]
    fn groups_by_item() {
        let rows = vec![row("Tea", 2.0, 1.5), row("Cake", 1.0, 3.0), row("Tea", 1.0, 1.5)];
        let totals = totals_by(&rows, CategoricalColumn::Item, NumericColumn::CorrectedTotal);
        let keys: Vec<&str> = totals.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Cake", "Tea"]);
        assert_eq!(totals["Tea"], 4.5);
        assert_eq!(totals["Cake"], 3.0);
    }
}
