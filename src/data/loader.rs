use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray, UInt32Array, UInt64Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use crate::error::DataLoadError;

use super::model::{Company, CompanyTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the companies table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-separated, header row first
/// * `.tsv`          – tab-separated
/// * `.json`         – `[{ "Global Rank": 1, "Company": "...", ... }, ...]`
/// * `.parquet`      – flat columns with the same names
///
/// Column names are matched after trimming, ignoring case. Rows missing any
/// of rank, sales, profits, market value, latitude or longitude are dropped.
pub fn load_file(path: &Path) -> Result<CompanyTable, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "csv" | "txt" => read_delimited(path, b','),
        "tsv" => read_delimited(path, b'\t'),
        "json" => read_json(path),
        "parquet" | "pq" => read_parquet(path),
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    }
    .map_err(|source| DataLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let total = raw.rows.len();
    let table = assemble(raw)?;
    let dropped = total - table.len();
    if dropped > 0 {
        log::warn!(
            "Dropped {dropped} of {total} rows from {} with missing rank, financials or coordinates",
            path.display()
        );
    }
    log::info!(
        "Loaded {} companies ({} continents) from {}",
        table.len(),
        table.continents().count(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Format-independent rows
// ---------------------------------------------------------------------------

/// One untyped cell as read from a file.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Null,
}

impl Cell {
    fn text(s: &str) -> Cell {
        if s.trim().is_empty() {
            Cell::Null
        } else {
            Cell::Text(s.to_string())
        }
    }

    /// Finite number, accepting `$1,234.5`-style text.
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => {
                let s = s.trim();
                let s = s.strip_prefix('$').unwrap_or(s);
                s.replace(',', "").parse::<f64>().ok()
            }
            Cell::Null => None,
        };
        value.filter(|v| v.is_finite())
    }

    fn as_rank(&self) -> Option<u32> {
        self.as_f64()
            .filter(|v| v.fract() == 0.0 && *v >= 1.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
    }

    fn into_text(self) -> String {
        match self {
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(v) => v.to_string(),
            Cell::Null => String::new(),
        }
    }
}

/// Header plus rows of cells, aligned by column position.
#[derive(Debug, Default)]
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

/// Dataset columns, with the header text each one is matched against.
#[derive(Debug, Clone, Copy)]
enum Column {
    Rank,
    Company,
    Country,
    Continent,
    Sales,
    Profits,
    MarketValue,
    Latitude,
    Longitude,
}

impl Column {
    const ALL: [Column; 9] = [
        Column::Rank,
        Column::Company,
        Column::Country,
        Column::Continent,
        Column::Sales,
        Column::Profits,
        Column::MarketValue,
        Column::Latitude,
        Column::Longitude,
    ];

    fn header(self) -> &'static str {
        match self {
            Column::Rank => "Global Rank",
            Column::Company => "Company",
            Column::Country => "Country",
            Column::Continent => "Continent",
            Column::Sales => "Sales ($billion)",
            Column::Profits => "Profits ($billion)",
            Column::MarketValue => "Market Value ($billion)",
            Column::Latitude => "Latitude_final",
            Column::Longitude => "Longitude_final",
        }
    }
}

fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase()
}

/// Position of every [`Column`] in the file header.
struct ColumnIndex([usize; 9]);

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self, DataLoadError> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let mut idx = [0usize; 9];
        for (slot, col) in idx.iter_mut().zip(Column::ALL) {
            let wanted = normalize_header(col.header());
            *slot = normalized
                .iter()
                .position(|h| *h == wanted)
                .ok_or(DataLoadError::MissingColumn(col.header()))?;
        }
        Ok(ColumnIndex(idx))
    }

    fn cell<'r>(&self, row: &'r [Cell], col: Column) -> &'r Cell {
        row.get(self.0[col as usize]).unwrap_or(&Cell::Null)
    }

    /// Build a record, or `None` when a required value is missing.
    fn company(&self, row: Vec<Cell>) -> Option<Company> {
        let global_rank = self.cell(&row, Column::Rank).as_rank()?;
        let sales = self.cell(&row, Column::Sales).as_f64()?;
        let profits = self.cell(&row, Column::Profits).as_f64()?;
        let market_value = self.cell(&row, Column::MarketValue).as_f64()?;
        let latitude = self.cell(&row, Column::Latitude).as_f64()?;
        let longitude = self.cell(&row, Column::Longitude).as_f64()?;

        let text = |col: Column| self.cell(&row, col).clone().into_text();
        Some(Company {
            global_rank,
            company: text(Column::Company),
            country: text(Column::Country),
            continent: text(Column::Continent),
            sales,
            profits,
            market_value,
            latitude,
            longitude,
        })
    }
}

fn assemble(raw: RawTable) -> Result<CompanyTable, DataLoadError> {
    let index = ColumnIndex::resolve(&raw.headers)?;
    let records = raw
        .rows
        .into_iter()
        .filter_map(|row| index.company(row))
        .collect();
    Ok(CompanyTable::from_records(records))
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn read_delimited(path: &Path, delimiter: u8) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(String::is_empty) {
        bail!("CSV has no header row");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(Cell::text).collect());
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Keys may differ between records; absent keys read as null.
fn read_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_cell).unwrap_or(Cell::Null))
                .collect()
        })
        .collect();

    let headers = headers.iter().map(|h| h.trim().to_string()).collect();
    Ok(RawTable { headers, rows })
}

fn json_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::text(s),
        JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
        JsonValue::Null => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Flat Parquet file as written by `df.to_parquet()` or the sample generator.
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().trim().to_string())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = batch.columns();
        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| arrow_cell(col, row)).collect());
        }
    }

    Ok(RawTable { headers, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Null;
    }
    let any = col.as_any();
    let cell = match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|a| Cell::text(a.value(row))),
        DataType::LargeUtf8 => any
            .downcast_ref::<LargeStringArray>()
            .map(|a| Cell::text(a.value(row))),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| Cell::Number(a.value(row) as f64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| Cell::Number(a.value(row) as f64)),
        DataType::UInt32 => any
            .downcast_ref::<UInt32Array>()
            .map(|a| Cell::Number(a.value(row) as f64)),
        DataType::UInt64 => any
            .downcast_ref::<UInt64Array>()
            .map(|a| Cell::Number(a.value(row) as f64)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| Cell::Number(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| Cell::Number(a.value(row))),
        other => {
            log::debug!("Ignoring parquet column of type {other:?}");
            None
        }
    };
    cell.unwrap_or(Cell::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_cells_accept_currency_text() {
        assert_eq!(Cell::text(" $1,234.5 ").as_f64(), Some(1234.5));
        assert_eq!(Cell::text("-3.2").as_f64(), Some(-3.2));
        assert_eq!(Cell::text("n/a").as_f64(), None);
        assert_eq!(Cell::text("NaN").as_f64(), None);
        assert_eq!(Cell::text("").as_f64(), None);
    }

    #[test]
    fn test_rank_must_be_positive_integer() {
        assert_eq!(Cell::Number(1.0).as_rank(), Some(1));
        assert_eq!(Cell::text("12").as_rank(), Some(12));
        assert_eq!(Cell::Number(1.5).as_rank(), None);
        assert_eq!(Cell::Number(0.0).as_rank(), None);
    }

    #[test]
    fn test_headers_resolve_ignoring_case_and_whitespace() {
        let headers: Vec<String> = [
            " global rank", "COMPANY", "Country ", "continent", "Sales ($billion)",
            "Profits ($billion)", " Market Value ($billion) ", "latitude_final",
            "Longitude_final",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert!(ColumnIndex::resolve(&headers).is_ok());
    }

    #[test]
    fn test_missing_column_is_reported() {
        let headers = vec!["Global Rank".to_string(), "Company".to_string()];
        assert!(matches!(
            ColumnIndex::resolve(&headers),
            Err(DataLoadError::MissingColumn("Country"))
        ));
    }

    #[test]
    fn test_assemble_drops_incomplete_rows() {
        let headers = Column::ALL.iter().map(|c| c.header().to_string()).collect();
        let full = vec![
            Cell::Number(1.0),
            Cell::text("Apple"),
            Cell::text("USA"),
            Cell::text("North America"),
            Cell::Number(274.5),
            Cell::Number(57.4),
            Cell::Number(1285.5),
            Cell::Number(37.3),
            Cell::Number(-122.0),
        ];
        let mut missing_lat = full.clone();
        missing_lat[7] = Cell::Null;
        let mut no_continent = full.clone();
        no_continent[3] = Cell::Null;

        let table = assemble(RawTable {
            headers,
            rows: vec![full, missing_lat, no_continent],
        })
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].company, "Apple");
        assert_eq!(table.records()[1].continent, "");
    }
}
