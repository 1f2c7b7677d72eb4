use std::path::{Path, PathBuf};

use anyhow::Context;
use rust_xlsxwriter::Workbook;
use serde_json::Value;

/// One scraped business listing. Optional fields stay `None` when the
/// page offered no element for them; the blank cell only appears at
/// export time.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Listing {
    pub name: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub reviews_count: Option<u64>,
    pub reviews_average: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Every listing scraped so far, in scrape order. Nothing is deduplicated:
/// a listing visited twice shows up twice.
#[derive(Debug, Default)]
pub struct ListingBook {
    pub listings: Vec<Listing>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// Flat view of a [`ListingBook`]: one column per (flattened) field, one
/// row per listing.
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ListingBook {
    pub fn push(&mut self, listing: Listing) {
        self.listings.push(listing);
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Flattens the book into columns and rows. Column order follows field
    /// order; a nested value would flatten into `parent_child` columns.
    /// The header is derived from the record shape, so an empty book still
    /// yields the full column set.
    pub fn to_table(&self) -> anyhow::Result<Table> {
        let header_source =
            serde_json::to_value(Listing::default()).context("listing does not serialize")?;
        let columns = flatten_record(&header_source)
            .into_iter()
            .map(|(column, _)| column)
            .collect();

        let mut rows = Vec::with_capacity(self.listings.len());
        for listing in &self.listings {
            let record =
                serde_json::to_value(listing).context("listing does not serialize")?;
            rows.push(
                flatten_record(&record)
                    .into_iter()
                    .map(|(_, cell)| cell)
                    .collect(),
            );
        }

        Ok(Table { columns, rows })
    }

    /// Writes `<base_name>.<ext>` and returns the path written. An empty
    /// book produces a valid header-only file.
    pub fn export(&self, format: ExportFormat, base_name: &str) -> anyhow::Result<PathBuf> {
        let table = self.to_table()?;
        let path = PathBuf::from(format!("{}.{}", base_name, format.extension()));

        match format {
            ExportFormat::Csv => write_csv(&table, &path)?,
            ExportFormat::Xlsx => write_xlsx(&table, &path)?,
        }

        Ok(path)
    }
}

fn flatten_record(value: &Value) -> Vec<(String, Value)> {
    let mut flat = Vec::new();
    walk("", value, &mut flat);
    flat
}

fn walk(prefix: &str, value: &Value, flat: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(fields) => {
            for (key, nested) in fields {
                let path = match prefix.is_empty() {
                    true => key.clone(),
                    false => format!("{}_{}", prefix, key),
                };
                walk(&path, nested, flat);
            }
        }
        other => flat.push((prefix.to_string(), other.clone())),
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn write_csv(table: &Table, path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(cell_text))?;
    }
    writer.flush()?;

    Ok(())
}

fn write_xlsx(table: &Table, path: &Path) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (column, name) in table.columns.iter().enumerate() {
        worksheet.write_string(0, column as u16, name.as_str())?;
    }
    for (row, cells) in table.rows.iter().enumerate() {
        let row = row as u32 + 1;
        for (column, cell) in cells.iter().enumerate() {
            match cell {
                Value::Null => {}
                Value::Number(number) => {
                    worksheet.write_number(row, column as u16, number.as_f64().unwrap_or_default())?;
                }
                Value::String(text) => {
                    worksheet.write_string(row, column as u16, text.as_str())?;
                }
                other => {
                    worksheet.write_string(row, column as u16, other.to_string())?;
                }
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to save {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ExportFormat, Listing, ListingBook};

    fn chai_khana() -> Listing {
        Listing {
            name: Some("Chai Khana Gulberg".to_string()),
            address: Some("12-A, Main Boulevard, Gulberg III, Lahore".to_string()),
            website: Some("chaikhana.pk".to_string()),
            phone_number: Some("+92 42 35761234".to_string()),
            reviews_count: Some(1234),
            reviews_average: Some(4.5),
            latitude: 31.5203696,
            longitude: 74.3587473,
        }
    }

    fn unnamed_spot() -> Listing {
        Listing {
            latitude: 31.4697,
            longitude: 74.2728,
            ..Listing::default()
        }
    }

    #[test]
    fn table_columns_follow_field_order() {
        let book = ListingBook::default();
        let table = book.to_table().unwrap();

        assert_eq!(
            table.columns,
            vec![
                "name",
                "address",
                "website",
                "phone_number",
                "reviews_count",
                "reviews_average",
                "latitude",
                "longitude",
            ]
        );
        assert!(table.rows.is_empty());
    }

    #[test]
    fn rows_keep_insertion_order() {
        let mut book = ListingBook::default();
        book.push(chai_khana());
        book.push(unnamed_spot());
        book.push(chai_khana());

        let table = book.to_table().unwrap();

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][0], "Chai Khana Gulberg");
        assert_eq!(table.rows[1][0], serde_json::Value::Null);
        assert_eq!(table.rows[2][0], "Chai Khana Gulberg");
    }

    #[test]
    fn csv_export_round_trips_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("listings").display().to_string();

        let mut book = ListingBook::default();
        book.push(chai_khana());
        book.push(unnamed_spot());

        let path = book.export(ExportFormat::Csv, &base).unwrap();
        assert!(path.to_string_lossy().ends_with("listings.csv"));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.get(0), Some("name"));
        assert_eq!(headers.get(7), Some("longitude"));

        let records: Vec<csv::StringRecord> =
            reader.records().map(|record| record.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(0), Some("Chai Khana Gulberg"));
        assert_eq!(records[0].get(4), Some("1234"));
        assert_eq!(records[0].get(5), Some("4.5"));
        assert_eq!(records[0].get(6), Some("31.5203696"));

        // The nameless listing keeps its row, with empty cells for every
        // field the page did not offer.
        assert_eq!(records[1].get(0), Some(""));
        assert_eq!(records[1].get(4), Some(""));
        assert_eq!(records[1].get(6), Some("31.4697"));
    }

    #[test]
    fn empty_book_still_writes_valid_files() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("empty").display().to_string();

        let book = ListingBook::default();
        let csv_path = book.export(ExportFormat::Csv, &base).unwrap();
        let xlsx_path = book.export(ExportFormat::Xlsx, &base).unwrap();

        let content = std::fs::read_to_string(csv_path).unwrap();
        assert_eq!(
            content,
            "name,address,website,phone_number,reviews_count,reviews_average,latitude,longitude\n"
        );
        assert!(std::fs::metadata(xlsx_path).unwrap().len() > 0);
    }

    #[test]
    fn xlsx_export_saves_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("listings").display().to_string();

        let mut book = ListingBook::default();
        book.push(chai_khana());

        let path = book.export(ExportFormat::Xlsx, &base).unwrap();

        assert!(path.to_string_lossy().ends_with("listings.xlsx"));
        assert!(std::fs::metadata(path).unwrap().len() > 0);
    }
}
