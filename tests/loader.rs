use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

use top2000_explorer::DataLoadError;
use top2000_explorer::data::cache::DatasetCache;
use top2000_explorer::data::loader::load_file;

const HEADER: &str = " Global Rank,Company,Country,Continent,Sales ($billion),Profits ($billion),Market Value ($billion),Latitude_final ,Longitude_final";

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn sample_csv(dir: &TempDir) -> PathBuf {
    let body = [
        HEADER,
        "1,JPMorgan Chase,United States,North America,189.2,40.4,\"375.2\",40.71,-74.01",
        "2,ICBC,China,Asia,208.1,45.8,249.5,39.90,116.40",
        "3,Missing Coordinates,China,Asia,100.0,10.0,100.0,,",
        "4,Saudi Aramco,Saudi Arabia,Asia,229.7,49.3,\"$1,897.2\",26.31,50.14",
        ",No Rank,France,Europe,1.0,1.0,1.0,48.85,2.35",
    ]
    .join("\n");
    write(dir, "companies.csv", &body)
}

#[test]
fn test_csv_drops_incomplete_rows_and_keeps_order() {
    let dir = TempDir::new().unwrap();
    let table = load_file(&sample_csv(&dir)).unwrap();

    let names: Vec<_> = table.records().iter().map(|c| c.company.as_str()).collect();
    assert_eq!(names, vec!["JPMorgan Chase", "ICBC", "Saudi Aramco"]);
    assert_eq!(table.records()[2].market_value, 1897.2);
    assert_eq!(table.records()[0].longitude, -74.01);
}

#[test]
fn test_short_csv_row_is_dropped() {
    let dir = TempDir::new().unwrap();
    let body = [
        HEADER,
        "1,Apple,United States,North America,274.5,57.4,1285.5,37.33,-122.03",
        "2,Truncated,China,Asia,100.0,10.0,100.0",
        "3,Toyota,Japan,Asia,269.7,21.2,181.1,35.08,137.15",
    ]
    .join("\n");
    let table = load_file(&write(&dir, "short.csv", &body)).unwrap();

    let names: Vec<_> = table.records().iter().map(|c| c.company.as_str()).collect();
    assert_eq!(names, vec!["Apple", "Toyota"]);
}

#[test]
fn test_tsv_is_tab_separated() {
    let dir = TempDir::new().unwrap();
    let body = format!(
        "{}\n1\tApple\tUnited States\tNorth America\t274.5\t57.4\t1285.5\t37.33\t-122.03\n",
        HEADER.replace(',', "\t")
    );
    let table = load_file(&write(&dir, "companies.tsv", &body)).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.records()[0].continent, "North America");
}

#[test]
fn test_json_records() {
    let dir = TempDir::new().unwrap();
    let body = r#"[
        {"Global Rank": 1, "Company": "Apple", "Country": "United States",
         "Continent": "North America", "Sales ($billion)": 274.5,
         "Profits ($billion)": 57.4, "Market Value ($billion)": 1285.5,
         "Latitude_final": 37.33, "Longitude_final": -122.03},
        {"Global Rank": 2, "Company": "Toyota", "Country": "Japan",
         "Continent": "Asia", "Sales ($billion)": 269.7,
         "Profits ($billion)": 21.2, "Market Value ($billion)": 181.1,
         "Latitude_final": null, "Longitude_final": 137.15}
    ]"#;
    let table = load_file(&write(&dir, "companies.json", body)).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.records()[0].global_rank, 1);
}

fn write_parquet(path: &Path) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Global Rank", DataType::Int64, true),
        Field::new("Company", DataType::Utf8, false),
        Field::new("Country", DataType::Utf8, false),
        Field::new("Continent", DataType::Utf8, true),
        Field::new("Sales ($billion)", DataType::Float64, false),
        Field::new("Profits ($billion)", DataType::Float64, false),
        Field::new("Market Value ($billion)", DataType::Float64, false),
        Field::new("Latitude_final", DataType::Float64, false),
        Field::new("Longitude_final", DataType::Float64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(vec![Some(1), None])),
        Arc::new(StringArray::from(vec!["Apple", "Unranked"])),
        Arc::new(StringArray::from(vec!["United States", "Peru"])),
        Arc::new(StringArray::from(vec![Some("North America"), None])),
        Arc::new(Float64Array::from(vec![274.5, 1.0])),
        Arc::new(Float64Array::from(vec![57.4, 1.0])),
        Arc::new(Float64Array::from(vec![1285.5, 1.0])),
        Arc::new(Float64Array::from(vec![37.33, -12.0])),
        Arc::new(Float64Array::from(vec![-122.03, -77.0])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let mut writer = ArrowWriter::try_new(fs::File::create(path).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn test_parquet_columns() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("companies.parquet");
    write_parquet(&path);

    let table = load_file(&path).unwrap();
    assert_eq!(table.len(), 1);
    let apple = &table.records()[0];
    assert_eq!(apple.company, "Apple");
    assert_eq!(apple.market_value, 1285.5);
}

#[test]
fn test_missing_file() {
    let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
    assert!(matches!(err, DataLoadError::NotFound(_)));
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let err = load_file(&write(&dir, "companies.xlsx", "")).unwrap_err();
    assert!(matches!(err, DataLoadError::UnsupportedFormat(ext) if ext == "xlsx"));
}

#[test]
fn test_missing_required_column() {
    let dir = TempDir::new().unwrap();
    let body = "Global Rank,Company,Country\n1,Apple,United States\n";
    let err = load_file(&write(&dir, "narrow.csv", body)).unwrap_err();
    assert!(matches!(err, DataLoadError::MissingColumn("Continent")));
}

#[test]
fn test_malformed_json_reports_read_error() {
    let dir = TempDir::new().unwrap();
    let err = load_file(&write(&dir, "broken.json", "{not json")).unwrap_err();
    assert!(matches!(err, DataLoadError::Read { .. }));
    let chain = format!("{:#}", anyhow::Error::from(err));
    assert!(chain.contains("parsing JSON"), "{chain}");
}

#[test]
fn test_cache_loads_once_per_path() {
    let dir = TempDir::new().unwrap();
    let path = sample_csv(&dir);
    let cache = DatasetCache::new();

    let first = cache.get_or_load(&path).unwrap();
    fs::remove_file(&path).unwrap();
    let second = cache.get_or_load(&path).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let other = dir.path().join("other.csv");
    assert!(matches!(
        cache.get_or_load(&other),
        Err(DataLoadError::AlreadyLoaded { .. })
    ));
}

#[test]
fn test_cache_failure_leaves_slot_empty() {
    let dir = TempDir::new().unwrap();
    let cache = DatasetCache::new();

    assert!(cache.get_or_load(&dir.path().join("missing.csv")).is_err());
    assert!(cache.get().is_none());

    let table = cache.get_or_load(&sample_csv(&dir)).unwrap();
    assert_eq!(table.len(), 3);
}
