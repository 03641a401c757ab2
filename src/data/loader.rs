use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, RawRow};

// ---------------------------------------------------------------------------
// Column contract
// ---------------------------------------------------------------------------

/// Accepted header names (compared case-insensitively) for each field.
const CATEGORY_COLUMNS: &[&str] = &["sex", "category"];
const YEAR_COLUMNS: &[&str] = &["time", "year"];
const VALUE_COLUMNS: &[&str] = &["value"];

fn find_column<'a, I>(headers: I, candidates: &[&str], label: &str) -> Result<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let headers: Vec<&str> = headers.into_iter().collect();
    candidates
        .iter()
        .find_map(|cand| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(cand)))
        .with_context(|| {
            format!("missing {label} column (expected one of {candidates:?}, found {headers:?})")
        })
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `Sex`, `Time`, `Value` columns
/// * `.json`    – `[{ "Sex": ..., "Time": ..., "Value": ... }, ...]`
/// * `.parquet` – the same three columns, any of string / integer / float
///
/// Rows whose year or value cannot be coerced are dropped, not reported.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => read_csv_rows(path)?,
        "json" => read_json_rows(path)?,
        "parquet" | "pq" => read_parquet_rows(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let total = rows.len();
    let dataset = Dataset::from_raw_rows(rows);
    log::info!(
        "Loaded {} of {total} rows from {} ({} categories)",
        dataset.len(),
        path.display(),
        dataset.categories.len()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Short rows are accepted; their missing cells read as "" and the row is
/// dropped during coercion if that leaves the year or value empty.
fn read_csv_rows(path: &Path) -> Result<Vec<RawRow>> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    read_csv_from(reader)
}

fn read_csv_from<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<RawRow>> {
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let cat_idx = find_column(headers.iter(), CATEGORY_COLUMNS, "category")?;
    let year_idx = find_column(headers.iter(), YEAR_COLUMNS, "year")?;
    let value_idx = find_column(headers.iter(), VALUE_COLUMNS, "value")?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(RawRow::new(
            record.get(cat_idx).unwrap_or(""),
            record.get(year_idx).unwrap_or(""),
            record.get(value_idx).unwrap_or(""),
        ));
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Sex": "Males", "Time": 2004, "Value": 12.5 },
///   ...
/// ]
/// ```
fn read_json_rows(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json_rows(&text)
}

fn parse_json_rows(text: &str) -> Result<Vec<RawRow>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let field = |candidates: &[&str]| -> String {
            obj.iter()
                .find(|(key, _)| candidates.iter().any(|c| key.trim().eq_ignore_ascii_case(c)))
                .map(|(_, v)| json_to_text(v))
                .unwrap_or_default()
        };

        rows.push(RawRow::new(
            field(CATEGORY_COLUMNS),
            field(YEAR_COLUMNS),
            field(VALUE_COLUMNS),
        ));
    }
    Ok(rows)
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a Parquet file with `Sex`, `Time` and `Value` columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Cells are turned back into text so the
/// record model applies the same coercion rules as for CSV.
fn read_parquet_rows(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let names = schema.fields().iter().map(|f| f.name().as_str());
        let cat_idx = find_column(names.clone(), CATEGORY_COLUMNS, "category")?;
        let year_idx = find_column(names.clone(), YEAR_COLUMNS, "year")?;
        let value_idx = find_column(names, VALUE_COLUMNS, "value")?;

        let cat_col = batch.column(cat_idx);
        let year_col = batch.column(year_idx);
        let value_col = batch.column(value_idx);

        for row in 0..batch.num_rows() {
            rows.push(RawRow::new(
                cell_text(cat_col, row),
                cell_text(year_col, row),
                cell_text(value_col, row),
            ));
        }
    }

    Ok(rows)
}

/// Render one Arrow cell as text. Nulls and unsupported types become "".
fn cell_text(col: &Arc<dyn Array>, row: usize) -> String {
    if col.is_null(row) {
        return String::new();
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).to_string())
            .unwrap_or_default(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row).to_string())
            .unwrap_or_default(),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row).to_string())
            .unwrap_or_default(),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| float_text(a.value(row) as f64))
            .unwrap_or_default(),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| float_text(a.value(row)))
            .unwrap_or_default(),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| a.value(row).to_string())
            .unwrap_or_default(),
        other => {
            log::warn!("Unsupported parquet column type {other:?}; treating as missing");
            String::new()
        }
    }
}

/// Whole floats print without a fraction so a float year column still
/// yields a 4-digit token (Pandas writes `Time` as float when it has NaNs).
fn float_text(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(ext: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(ext)
            .tempfile()
            .expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn csv_drops_bad_rows_and_ignores_extra_columns() {
        let file = write_temp(
            ".csv",
            "Indicator,Sex,Time,Value\n\
             x,Males,2000,10\n\
             x,Females,2000,..\n\
             x,Females,20001,3\n\
             x,Males and females,2001,4.5\n",
        );
        let ds = load_file(file.path()).expect("load csv");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dropped_rows, 2);
        assert_eq!(ds.records[1].category, "Males and females");
        assert_eq!(ds.records[1].year, 2001);
        assert_eq!(ds.records[1].value, 4.5);
    }

    #[test]
    fn csv_short_row_is_dropped_not_fatal() {
        let file = write_temp(".csv", "Sex,Time,Value\nMales,2000,10\nFemales,2001\nMales,2002,5\n");
        let ds = load_file(file.path()).expect("load csv");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dropped_rows, 1);
        let years: Vec<i32> = ds.records.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2000, 2002]);
    }

    #[test]
    fn csv_headers_are_case_insensitive_with_aliases() {
        let file = write_temp(".csv", "category,YEAR,value\nFemales,1999,1\n");
        let ds = load_file(file.path()).expect("load csv");
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].year, 1999);
    }

    #[test]
    fn csv_missing_column_is_an_error() {
        let file = write_temp(".csv", "Sex,Value\nMales,1\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("year"));
    }

    #[test]
    fn json_accepts_numbers_and_strings() {
        let rows = parse_json_rows(
            r#"[
                {"Sex": "Males", "Time": 2004, "Value": 12.5},
                {"Sex": "Females", "Time": "2005", "Value": "3"},
                {"Sex": "Females", "Time": null, "Value": 1}
            ]"#,
        )
        .expect("parse json");
        assert_eq!(rows[0], RawRow::new("Males", "2004", "12.5"));
        assert_eq!(rows[1], RawRow::new("Females", "2005", "3"));
        let ds = Dataset::from_raw_rows(rows);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dropped_rows, 1);
    }

    #[test]
    fn json_must_be_an_array() {
        assert!(parse_json_rows(r#"{"Sex": "Males"}"#).is_err());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let file = write_temp(".xlsx", "");
        assert!(load_file(file.path()).is_err());
    }

    #[test]
    fn parquet_float_years_and_null_cells() {
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("Sex", DataType::Utf8, true),
            Field::new("Time", DataType::Float64, true),
            Field::new("Value", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Males", "Females", "Males", "Females"])),
                Arc::new(Float64Array::from(vec![Some(2004.0), None, Some(2005.0), Some(2006.0)])),
                Arc::new(Int64Array::from(vec![Some(10), Some(20), Some(30), None])),
            ],
        )
        .expect("build batch");

        let file = tempfile::Builder::new()
            .suffix(".parquet")
            .tempfile()
            .expect("create temp file");
        let mut writer =
            ArrowWriter::try_new(file.reopen().expect("reopen"), schema, None).expect("writer");
        writer.write(&batch).expect("write batch");
        writer.close().expect("close writer");

        let ds = load_file(file.path()).expect("load parquet");
        assert_eq!(ds.dropped_rows, 2);
        let rows: Vec<(&str, i32, f64)> = ds
            .records
            .iter()
            .map(|r| (r.category.as_str(), r.year, r.value))
            .collect();
        assert_eq!(rows, vec![("Males", 2004, 10.0), ("Males", 2005, 30.0)]);
    }

    #[test]
    fn whole_floats_print_as_integers() {
        assert_eq!(float_text(2004.0), "2004");
        assert_eq!(float_text(2.5), "2.5");
    }
}
