//! CSV import and export for inventory items
//!
//! The supplier column carries the supplier's display name rather than an
//! id, so exported files stay readable and survive being imported into a
//! different deployment. On import the name is resolved against the live
//! supplier list; unresolved names leave the item unlinked but still
//! import the row.

use std::collections::HashMap;
use std::io::Read;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use uuid::Uuid;

use crate::client::{ApiClient, ClientError};
use crate::model::{InventoryItem, ItemInput, Supplier};

/// Column order written on export; import only requires `name` and
/// `quantity` and matches headers case-insensitively
pub const CSV_HEADERS: [&str; 6] = [
    "name",
    "quantity",
    "lowStockThreshold",
    "price",
    "category",
    "supplier",
];

/// CSV errors
#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("CSV processing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not load suppliers for import: {0}")]
    SupplierFetch(ClientError),
}

/// Serialize items to CSV text
pub fn export_items(items: &[InventoryItem], suppliers: &[Supplier]) -> Result<String, CsvError> {
    let names: HashMap<Uuid, &str> = suppliers
        .iter()
        .map(|s| (s.id, s.name.as_str()))
        .collect();

    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for item in items {
        let supplier_name = item
            .supplier
            .and_then(|id| names.get(&id).copied())
            .unwrap_or("");
        let quantity = item.quantity.to_string();
        let threshold = item.low_stock_threshold.to_string();
        let price = item.price.to_string();

        writer.write_record([
            item.name.as_str(),
            quantity.as_str(),
            threshold.as_str(),
            price.as_str(),
            item.category.as_str(),
            supplier_name,
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| CsvError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// One CSV row mapped onto an item payload, supplier still unresolved
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// 1-based line number in the source file, counting the header
    pub line: u64,
    pub input: ItemInput,
    pub supplier_name: Option<String>,
}

/// Result of parsing a file: usable rows plus per-row errors
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub rows: Vec<ParsedRow>,
    pub errors: Vec<(u64, String)>,
}

/// Parse item rows out of CSV text
///
/// A row needs a non-empty name and a parseable quantity; every other
/// column falls back to its default when absent or malformed.
pub fn parse_items<R: Read>(reader: R) -> Result<ParseOutcome, CsvError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    };

    let name_col = column("name").ok_or(CsvError::MissingColumn("name"))?;
    let quantity_col = column("quantity").ok_or(CsvError::MissingColumn("quantity"))?;
    let threshold_col = column("lowStockThreshold");
    let price_col = column("price");
    let category_col = column("category");
    let supplier_col = column("supplier");

    let mut outcome = ParseOutcome::default();
    for (index, record) in csv_reader.records().enumerate() {
        let line = index as u64 + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                outcome.errors.push((line, e.to_string()));
                continue;
            }
        };

        let name = record.get(name_col).unwrap_or("").trim();
        if name.is_empty() {
            outcome.errors.push((line, "Missing item name".to_string()));
            continue;
        }

        let quantity = match record.get(quantity_col).unwrap_or("").trim().parse::<u32>() {
            Ok(quantity) => quantity,
            Err(_) => {
                outcome.errors.push((
                    line,
                    "Quantity must be a non-negative integer".to_string(),
                ));
                continue;
            }
        };

        let low_stock_threshold = threshold_col
            .and_then(|col| record.get(col))
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0);
        let price = price_col
            .and_then(|col| record.get(col))
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0.0);
        let category = category_col
            .and_then(|col| record.get(col))
            .map(|value| value.trim().to_string())
            .unwrap_or_default();
        let supplier_name = supplier_col
            .and_then(|col| record.get(col))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(String::from);

        outcome.rows.push(ParsedRow {
            line,
            input: ItemInput {
                name: name.to_string(),
                quantity,
                low_stock_threshold,
                supplier: None,
                price,
                category,
            },
            supplier_name,
        });
    }

    Ok(outcome)
}

/// Aggregate outcome of an import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub total_rows: usize,
    pub imported: usize,
    pub failed: usize,
    pub errors: Vec<(u64, String)>,
}

impl ImportReport {
    /// One-line summary for the toast
    pub fn summary(&self) -> String {
        format!("Imported {} of {} items", self.imported, self.total_rows)
    }
}

/// Import CSV rows as individual create calls
///
/// Each row is its own request: rows created before a failure stay
/// created, and the report carries one entry per failed row.
pub async fn import_items<R: Read>(reader: R, client: &ApiClient) -> Result<ImportReport, CsvError> {
    let outcome = parse_items(reader)?;

    let suppliers = client
        .list_suppliers()
        .await
        .map_err(CsvError::SupplierFetch)?;
    let by_name: HashMap<String, Uuid> = suppliers
        .into_iter()
        .map(|s| (s.name.to_lowercase(), s.id))
        .collect();

    let mut report = ImportReport {
        total_rows: outcome.rows.len() + outcome.errors.len(),
        imported: 0,
        failed: outcome.errors.len(),
        errors: outcome.errors,
    };

    for row in outcome.rows {
        let mut input = row.input;
        input.supplier = row
            .supplier_name
            .as_deref()
            .and_then(|name| by_name.get(&name.to_lowercase()).copied());

        match client.create_item(&input).await {
            Ok(_) => report.imported += 1,
            Err(e) => {
                report.failed += 1;
                report
                    .errors
                    .push((row.line, e.user_message("Create failed")));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(name: &str, quantity: u32, supplier: Option<Uuid>) -> InventoryItem {
        let now = Utc::now();
        InventoryItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            quantity,
            low_stock_threshold: 5,
            supplier,
            price: 9.99,
            category: "parts".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn export_writes_supplier_names() {
        let supplier = Supplier {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            email: None,
            phone: None,
            address: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let items = vec![
            item("Widget", 5, Some(supplier.id)),
            item("Bolt", 80, None),
        ];

        let text = export_items(&items, &[supplier]).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "name,quantity,lowStockThreshold,price,category,supplier"
        );
        assert_eq!(lines.next().unwrap(), "Widget,5,5,9.99,parts,Acme");
        assert_eq!(lines.next().unwrap(), "Bolt,80,5,9.99,parts,");
    }

    #[test]
    fn parse_applies_defaults_for_optional_columns() {
        let text = "name,quantity\nWidget,5\n";
        let outcome = parse_items(text.as_bytes()).unwrap();

        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.rows.len(), 1);
        let row = &outcome.rows[0];
        assert_eq!(row.input.name, "Widget");
        assert_eq!(row.input.quantity, 5);
        assert_eq!(row.input.low_stock_threshold, 0);
        assert_eq!(row.input.price, 0.0);
        assert_eq!(row.input.category, "");
        assert_eq!(row.supplier_name, None);
    }

    #[test]
    fn parse_collects_row_errors_and_keeps_good_rows() {
        let text = "name,quantity,price\nWidget,5,1.5\n,3,2.0\nBolt,many,0.1\nNut,7,\n";
        let outcome = parse_items(text.as_bytes()).unwrap();

        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.rows[0].input.name, "Widget");
        assert_eq!(outcome.rows[1].input.name, "Nut");
        // malformed price falls back instead of failing the row
        assert_eq!(outcome.rows[1].input.price, 0.0);

        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.errors[0].0, 3);
        assert_eq!(outcome.errors[1].0, 4);
    }

    #[test]
    fn parse_requires_name_and_quantity_columns() {
        let err = parse_items("quantity\n5\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CsvError::MissingColumn("name")));

        let err = parse_items("name,price\nWidget,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CsvError::MissingColumn("quantity")));
    }

    #[test]
    fn parse_headers_are_case_insensitive() {
        let text = "Name,QUANTITY,lowstockthreshold\nWidget,5,2\n";
        let outcome = parse_items(text.as_bytes()).unwrap();
        assert_eq!(outcome.rows[0].input.low_stock_threshold, 2);
    }

    #[test]
    fn import_report_summary() {
        let report = ImportReport {
            total_rows: 5,
            imported: 3,
            failed: 2,
            errors: vec![],
        };
        assert_eq!(report.summary(), "Imported 3 of 5 items");
    }
}
