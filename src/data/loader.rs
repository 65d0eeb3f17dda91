use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, Dataset};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – comma-delimited with a header row (the survey exports)
/// * `.json`    – `[{ "col": value, ... }, ...]`
/// * `.parquet` – flat numeric / string columns
pub fn load_file(name: &str, path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(name, path),
        "json" => load_json(name, path),
        "parquet" | "pq" => load_parquet(name, path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }?;

    log::info!(
        "Loaded {name} from {}: {} rows x {} columns ({} numeric)",
        path.display(),
        dataset.n_rows(),
        dataset.n_columns(),
        dataset.numeric_columns().count()
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Collects cells column by column while rows stream in.
struct ColumnBuilder {
    names: Vec<String>,
    cells: Vec<Vec<CellValue>>,
}

impl ColumnBuilder {
    fn new(raw_names: impl IntoIterator<Item = String>) -> Self {
        let names = unique_column_names(raw_names);
        let cells = vec![Vec::new(); names.len()];
        ColumnBuilder { names, cells }
    }

    fn push(&mut self, col: usize, value: CellValue) {
        self.cells[col].push(value);
    }

    fn finish(self, name: &str) -> Dataset {
        let columns = self
            .names
            .into_iter()
            .zip(self.cells)
            .map(|(col, cells)| Column::from_cells(col, cells))
            .collect();
        Dataset::new(name, columns)
    }
}

/// Blank headers become `Unnamed: <pos>`, repeats get a `.1`, `.2`, ... suffix.
fn unique_column_names(raw: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.into_iter()
        .enumerate()
        .map(|(pos, name)| {
            let name = if name.trim().is_empty() {
                format!("Unnamed: {pos}")
            } else {
                name
            };
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = if *count == 0 {
                name
            } else {
                format!("{name}.{count}")
            };
            *count += 1;
            unique
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one observation per row.
/// Rows with a different number of fields than the header are an error.
fn load_csv(name: &str, path: &Path) -> Result<Dataset, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers = reader.headers().map_err(csv_err)?.clone();
    let mut columns = ColumnBuilder::new(headers.iter().map(str::to_string));

    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        for (col_idx, value) in record.iter().enumerate() {
            columns.push(col_idx, CellValue::parse(value));
        }
    }

    Ok(columns.finish(name))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "point": "HP01", "0": -1.2, "5": -2.4 },
///   ...
/// ]
/// ```
///
/// Column order follows first appearance; keys absent from a record are missing.
fn load_json(name: &str, path: &Path) -> Result<Dataset, LoadError> {
    let root: JsonValue =
        serde_json::from_reader(std::io::BufReader::new(open(path)?)).map_err(|source| {
            LoadError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?;

    let layout_err = |reason: String| LoadError::Layout {
        path: path.to_path_buf(),
        reason,
    };

    let records = root
        .as_array()
        .ok_or_else(|| layout_err("expected a top-level JSON array".into()))?;

    let mut order: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| layout_err(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !order.contains(key) {
                order.push(key.clone());
            }
        }
    }

    let mut columns = ColumnBuilder::new(order.iter().cloned());
    for rec in records {
        // Checked above: every record is an object.
        let Some(obj) = rec.as_object() else { continue };
        for (col_idx, key) in order.iter().enumerate() {
            let cell = obj.get(key).map(json_to_cell).unwrap_or(CellValue::Missing);
            columns.push(col_idx, cell);
        }
    }

    Ok(columns.finish(name))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::Number(n) => n
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(n.to_string())),
        JsonValue::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
        JsonValue::String(s) => CellValue::parse(s),
        JsonValue::Null => CellValue::Missing,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per channel.
///
/// Int32/Int64/Float32/Float64/Boolean columns are numeric, Utf8 columns are
/// text. Any other type is kept as a text column so it drops out of the
/// correlation.
fn load_parquet(name: &str, path: &Path) -> Result<Dataset, LoadError> {
    let parquet_err = |source| LoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };

    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?).map_err(parquet_err)?;
    let field_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(parquet_err)?;

    let mut columns = ColumnBuilder::new(field_names);

    for batch_result in reader {
        let batch = batch_result.map_err(|source| LoadError::Arrow {
            path: path.to_path_buf(),
            source,
        })?;

        for col_idx in 0..batch.num_columns() {
            let col = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                columns.push(col_idx, extract_cell(col, row));
            }
        }
    }

    Ok(columns.finish(name))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Missing;
    }
    let any = col.as_any();
    let cell = match col.data_type() {
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| CellValue::Number(a.value(row) as f64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| CellValue::Number(a.value(row) as f64)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| CellValue::Number(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| CellValue::Number(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::Number(if a.value(row) { 1.0 } else { 0.0 })),
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|a| CellValue::Text(a.value(row).to_string())),
        DataType::LargeUtf8 => Some(CellValue::Text(col.as_string::<i64>().value(row).to_string())),
        other => Some(CellValue::Text(format!("{other:?}"))),
    };
    cell.unwrap_or(CellValue::Missing)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::data::model::ColumnData;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("surface-correlation-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn csv_keeps_column_order_and_types() {
        let path = scratch_file(
            "order.csv",
            "point,10,0,5\nA,1.0,2,3\nB,2.5,,6\n",
        );
        let ds = load_file("order", &path).unwrap();
        let names: Vec<&str> = ds.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["point", "10", "0", "5"]);
        assert!(matches!(ds.columns[0].data, ColumnData::Text(_)));
        let zero = ds.column("0").unwrap().as_numeric().unwrap();
        assert_eq!(zero[0], 2.0);
        assert!(zero[1].is_nan());
        assert_eq!(ds.n_rows(), 2);
    }

    #[test]
    fn csv_names_blank_and_repeated_headers() {
        let path = scratch_file("headers.csv", ",a,a\n0,1,2\n1,3,4\n");
        let ds = load_file("headers", &path).unwrap();
        let names: Vec<&str> = ds.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Unnamed: 0", "a", "a.1"]);
    }

    #[test]
    fn ragged_csv_is_a_parse_error() {
        let path = scratch_file("ragged.csv", "a,b\n1,2\n3\n");
        let err = load_file("ragged", &path).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }), "{err}");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("surface-correlation-does-not-exist.csv");
        let err = load_file("missing", &path).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }), "{err}");
    }

    #[test]
    fn json_records_load_in_key_order() {
        let path = scratch_file(
            "records.json",
            r#"[{"b": 1, "a": "x", "c": true}, {"b": 2.5, "a": "y", "c": null, "d": 4}]"#,
        );
        let ds = load_file("records", &path).unwrap();
        let names: Vec<&str> = ds.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c", "d"]);
        assert_eq!(ds.column("b").unwrap().as_numeric().unwrap(), [1.0, 2.5]);
        let c = ds.column("c").unwrap().as_numeric().unwrap();
        assert_eq!(c[0], 1.0);
        assert!(c[1].is_nan());
        assert!(ds.column("d").unwrap().as_numeric().unwrap()[0].is_nan());
    }

    #[test]
    fn parquet_columns_keep_order_types_and_nulls() {
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("settlement", DataType::Float64, true),
            Field::new("flag", DataType::Boolean, false),
            Field::new("label", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![10, 20, 30])),
                Arc::new(Float64Array::from(vec![Some(-1.5), None, Some(2.25)])),
                Arc::new(BooleanArray::from(vec![true, false, true])),
                Arc::new(StringArray::from(vec!["P1", "P2", "P3"])),
            ],
        )
        .unwrap();

        let path = scratch_file("columns.parquet", "");
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file("columns", &path).unwrap();
        let names: Vec<&str> = ds.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id", "settlement", "flag", "label"]);
        assert_eq!(ds.n_rows(), 3);

        assert_eq!(ds.column("id").unwrap().as_numeric().unwrap(), [10.0, 20.0, 30.0]);
        let settlement = ds.column("settlement").unwrap().as_numeric().unwrap();
        assert_eq!(settlement[0], -1.5);
        assert!(settlement[1].is_nan());
        assert_eq!(settlement[2], 2.25);
        assert_eq!(ds.column("flag").unwrap().as_numeric().unwrap(), [1.0, 0.0, 1.0]);
        match &ds.column("label").unwrap().data {
            ColumnData::Text(values) => assert_eq!(values, &["P1", "P2", "P3"]),
            other => panic!("label should be text, got {other:?}"),
        }

        let numeric: Vec<&str> = ds.numeric_columns().map(|(name, _)| name).collect();
        assert_eq!(numeric, ["id", "settlement", "flag"]);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let path = scratch_file("data.xlsx", "");
        assert!(matches!(
            load_file("x", &path),
            Err(LoadError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }
}
